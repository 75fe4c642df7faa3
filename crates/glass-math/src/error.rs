//! The error type shared by every fallible operation in this crate.

use crate::{registry::Shape, DType};

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by constructors, operators, accessors and the type registry.
///
/// All of these describe programmer errors (mismatched shapes, misspelled swizzles, ...). None of
/// them are transient, and an operation that fails never leaves its receiver partially modified.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Wrong number or shape of constructor arguments.
    #[error("invalid arguments for {type_name}(): {reason}")]
    Arity { type_name: String, reason: String },

    /// An operator or function is not defined for the given operand forms or shapes.
    #[error("{0}")]
    TypeMismatch(String),

    /// A swizzle or field name is not recognized by the type.
    #[error("'{type_name}' object has no attribute '{name}'")]
    UnknownAttribute { type_name: String, name: String },

    /// A valid read-only swizzle (one that repeats a component) was used as an assignment target.
    #[error("property '{name}' of '{type_name}' object has no setter")]
    ReadOnlyAttribute { type_name: String, name: String },

    /// The type registry was asked for a type that does not exist.
    #[error("no canonical type for dtype {dtype:?} with shape {shape:?}")]
    Configuration { dtype: DType, shape: Shape },

    /// A canonical type name could not be parsed.
    #[error("unknown type name '{0}'")]
    UnknownTypeName(String),

    /// Integer floor division or modulo by zero.
    #[error("integer division or modulo by zero")]
    DivisionByZero,

    /// Attempted to invert a matrix whose determinant is zero.
    #[error("matrix is not invertible (determinant is zero)")]
    Singular,

    /// Component or column index past the end of a value.
    #[error("index {index} out of range for '{type_name}'")]
    IndexOutOfRange { type_name: String, index: usize },
}

impl Error {
    pub(crate) fn arity(type_name: &str, reason: impl Into<String>) -> Self {
        Self::Arity {
            type_name: type_name.to_string(),
            reason: reason.into(),
        }
    }

    /// A binary operator applied to an unsupported pair of operands.
    pub(crate) fn operands(op: &str, lhs: &str, rhs: &str) -> Self {
        Self::TypeMismatch(format!(
            "unsupported operand type(s) for {op}: '{lhs}' and '{rhs}'"
        ))
    }

    /// A library function applied to arguments it is not defined for.
    pub(crate) fn undefined(func: &str, args: &[&str]) -> Self {
        let args = args
            .iter()
            .map(|arg| format!("'{arg}'"))
            .collect::<Vec<_>>()
            .join(" and ");
        Self::TypeMismatch(format!("{func} is not defined for {args}"))
    }

    pub(crate) fn unknown_attribute(type_name: &str, name: &str) -> Self {
        Self::UnknownAttribute {
            type_name: type_name.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn read_only(type_name: &str, name: &str) -> Self {
        Self::ReadOnlyAttribute {
            type_name: type_name.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn out_of_range(type_name: &str, index: usize) -> Self {
        Self::IndexOutOfRange {
            type_name: type_name.to_string(),
            index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            Error::operands("+", "vec3", "vec4").to_string(),
            "unsupported operand type(s) for +: 'vec3' and 'vec4'"
        );
        assert_eq!(
            Error::undefined("cross", &["vec2", "vec2"]).to_string(),
            "cross is not defined for 'vec2' and 'vec2'"
        );
        assert_eq!(
            Error::read_only("vec2", "xx").to_string(),
            "property 'xx' of 'vec2' object has no setter"
        );
    }
}
