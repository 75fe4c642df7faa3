//! The component-type ladder.
//!
//! Every value stores its components as one of five element types ("dtypes"). The dtypes form a
//! total order that drives automatic type promotion: `bool < int < uint < float < double`.

use std::fmt;

use crate::{
    config,
    error::{Error, Result},
    ops::{BinaryOp, CompareOp},
};

/// Component storage type of a value.
///
/// The derived [`Ord`] implementation is the promotion rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DType {
    Bool,
    Int,
    UInt,
    Float,
    Double,
}

impl DType {
    /// All dtypes, in promotion order.
    pub const ALL: [DType; 5] = [
        DType::Bool,
        DType::Int,
        DType::UInt,
        DType::Float,
        DType::Double,
    ];

    /// Prefix used when building canonical type names (`bvec3`, `imat2x2`, `vec4`, ...).
    pub const fn prefix(self) -> &'static str {
        match self {
            DType::Bool => "b",
            DType::Int => "i",
            DType::UInt => "u",
            DType::Float => "",
            DType::Double => "d",
        }
    }

    /// Name of the plain scalar type for this dtype, as used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int => "int",
            DType::UInt => "uint",
            DType::Float => "float",
            DType::Double => "double",
        }
    }

    /// Returns whether this is `float` or `double`.
    pub const fn is_float(self) -> bool {
        matches!(self, DType::Float | DType::Double)
    }

    /// The additive identity of this dtype.
    pub const fn zero(self) -> Scalar {
        match self {
            DType::Bool => Scalar::Bool(false),
            DType::Int => Scalar::Int(0),
            DType::UInt => Scalar::UInt(0),
            DType::Float => Scalar::Float(0.0),
            DType::Double => Scalar::Double(0.0),
        }
    }

    /// The multiplicative identity of this dtype.
    pub const fn one(self) -> Scalar {
        match self {
            DType::Bool => Scalar::Bool(true),
            DType::Int => Scalar::Int(1),
            DType::UInt => Scalar::UInt(1),
            DType::Float => Scalar::Float(1.0),
            DType::Double => Scalar::Double(1.0),
        }
    }

    /// The dtype that floating-point-only functions produce for inputs of this dtype.
    pub(crate) const fn to_float(self) -> DType {
        match self {
            DType::Double => DType::Double,
            _ => DType::Float,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Picks the dtype of the result of `lhs op rhs`.
///
/// This is the higher-ranked of the two operand dtypes, except that true division, and
/// exponentiation by a negative exponent, between operands that are both ranked `uint` or lower
/// always produces `float` (integer results would be silently truncated otherwise).
///
/// ```
/// # use glass_math::*;
/// assert_eq!(promote(BinaryOp::Add, DType::Int, DType::Float, false), DType::Float);
/// assert_eq!(promote(BinaryOp::Div, DType::Int, DType::Int, false), DType::Float);
/// assert_eq!(promote(BinaryOp::Pow, DType::Int, DType::Int, false), DType::Int);
/// assert_eq!(promote(BinaryOp::Pow, DType::Int, DType::Int, true), DType::Float);
/// ```
pub fn promote(op: BinaryOp, lhs: DType, rhs: DType, negative_exponent: bool) -> DType {
    let integral = lhs <= DType::UInt && rhs <= DType::UInt;
    let forces_float = op == BinaryOp::Div || (op == BinaryOp::Pow && negative_exponent);
    if integral && forces_float {
        DType::Float
    } else {
        lhs.max(rhs)
    }
}

/// A single component value, tagged with its dtype.
#[derive(Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Float(f32),
    Double(f64),
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Float(0.0)
    }
}

impl Scalar {
    /// Returns the dtype tag of this scalar.
    pub const fn dtype(self) -> DType {
        match self {
            Scalar::Bool(_) => DType::Bool,
            Scalar::Int(_) => DType::Int,
            Scalar::UInt(_) => DType::UInt,
            Scalar::Float(_) => DType::Float,
            Scalar::Double(_) => DType::Double,
        }
    }

    /// Converts this scalar to another dtype.
    ///
    /// Conversions behave like C conversions: anything non-zero is `true`, floats are truncated
    /// towards zero when converted to integers, and out-of-range integers wrap around.
    ///
    /// ```
    /// # use glass_math::*;
    /// assert_eq!(Scalar::Float(2.75).cast(DType::Int), Scalar::Int(2));
    /// assert_eq!(Scalar::Int(-1).cast(DType::UInt), Scalar::UInt(u32::MAX));
    /// assert_eq!(Scalar::Double(0.5).cast(DType::Bool), Scalar::Bool(true));
    /// ```
    pub fn cast(self, dtype: DType) -> Scalar {
        match dtype {
            DType::Bool => Scalar::Bool(self.as_bool()),
            DType::Int => Scalar::Int(self.as_i32()),
            DType::UInt => Scalar::UInt(self.as_u32()),
            DType::Float => Scalar::Float(self.as_f32()),
            DType::Double => Scalar::Double(self.as_f64()),
        }
    }

    pub fn as_bool(self) -> bool {
        match self {
            Scalar::Bool(b) => b,
            Scalar::Int(i) => i != 0,
            Scalar::UInt(u) => u != 0,
            Scalar::Float(f) => f != 0.0,
            Scalar::Double(d) => d != 0.0,
        }
    }

    pub fn as_i32(self) -> i32 {
        match self {
            Scalar::Bool(b) => b as i32,
            Scalar::Int(i) => i,
            Scalar::UInt(u) => u as i32,
            Scalar::Float(f) => f as i32,
            Scalar::Double(d) => d as i32,
        }
    }

    pub fn as_u32(self) -> u32 {
        match self {
            Scalar::Bool(b) => b as u32,
            Scalar::Int(i) => i as u32,
            Scalar::UInt(u) => u,
            Scalar::Float(f) => f as i64 as u32,
            Scalar::Double(d) => d as i64 as u32,
        }
    }

    pub fn as_f32(self) -> f32 {
        match self {
            Scalar::Bool(b) => b as u8 as f32,
            Scalar::Int(i) => i as f32,
            Scalar::UInt(u) => u as f32,
            Scalar::Float(f) => f,
            Scalar::Double(d) => d as f32,
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Scalar::Bool(b) => b as u8 as f64,
            Scalar::Int(i) => i.into(),
            Scalar::UInt(u) => u.into(),
            Scalar::Float(f) => f.into(),
            Scalar::Double(d) => d,
        }
    }

    /// Returns whether this scalar is strictly less than zero.
    pub fn is_negative(self) -> bool {
        match self {
            Scalar::Bool(_) | Scalar::UInt(_) => false,
            Scalar::Int(i) => i < 0,
            Scalar::Float(f) => f < 0.0,
            Scalar::Double(d) => d < 0.0,
        }
    }

    /// Computes `self op rhs`, promoting both operands according to [`promote`].
    ///
    /// ```
    /// # use glass_math::*;
    /// let half = Scalar::Int(1).binary(BinaryOp::Div, Scalar::Int(2)).unwrap();
    /// assert_eq!(half, Scalar::Float(0.5));
    /// ```
    pub fn binary(self, op: BinaryOp, rhs: Scalar) -> Result<Scalar> {
        let dtype = promote(op, self.dtype(), rhs.dtype(), rhs.is_negative());
        apply(op, self, rhs, dtype)
    }

    /// Componentwise comparison kernel; compares in the higher-ranked dtype of the two.
    pub fn compare(self, op: CompareOp, rhs: Scalar) -> bool {
        match common(self, rhs) {
            (Scalar::Int(a), Scalar::Int(b)) => op.eval(&a, &b),
            (Scalar::UInt(a), Scalar::UInt(b)) => op.eval(&a, &b),
            (Scalar::Float(a), Scalar::Float(b)) => op.eval(&a, &b),
            (Scalar::Double(a), Scalar::Double(b)) => op.eval(&a, &b),
            (a, b) => op.eval(&a.as_f64(), &b.as_f64()),
        }
    }
}

/// Casts both operands to their common (higher-ranked) dtype, treating `bool` as `int`.
fn common(lhs: Scalar, rhs: Scalar) -> (Scalar, Scalar) {
    let dtype = lhs.dtype().max(rhs.dtype()).max(DType::Int);
    (lhs.cast(dtype), rhs.cast(dtype))
}

/// Applies `op` to two scalars, computing in (and returning) `dtype`.
///
/// `bool` results are computed as `int` and converted afterwards, so `true + true` is `true`.
pub(crate) fn apply(op: BinaryOp, lhs: Scalar, rhs: Scalar, dtype: DType) -> Result<Scalar> {
    let work = dtype.max(DType::Int);
    let out = match (lhs.cast(work), rhs.cast(work)) {
        (Scalar::Int(a), Scalar::Int(b)) => Scalar::Int(int_op(op, a, b)?),
        (Scalar::UInt(a), Scalar::UInt(b)) => Scalar::UInt(uint_op(op, a, b)?),
        (Scalar::Float(a), Scalar::Float(b)) => Scalar::Float(f32_op(op, a, b)),
        (Scalar::Double(a), Scalar::Double(b)) => Scalar::Double(f64_op(op, a, b)),
        (a, b) => Scalar::Double(f64_op(op, a.as_f64(), b.as_f64())),
    };
    Ok(out.cast(dtype))
}

fn int_op(op: BinaryOp, a: i32, b: i32) -> Result<i32> {
    Ok(match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div | BinaryOp::FloorDiv => {
            if b == 0 {
                return Err(Error::DivisionByZero);
            }
            let q = a.wrapping_div(b);
            if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
                q - 1
            } else {
                q
            }
        }
        BinaryOp::Rem => {
            if b == 0 {
                return Err(Error::DivisionByZero);
            }
            let r = a.wrapping_rem(b);
            if r != 0 && ((r < 0) != (b < 0)) {
                r + b
            } else {
                r
            }
        }
        // Negative exponents are promoted to `float` before reaching here.
        BinaryOp::Pow => a.wrapping_pow(b.max(0) as u32),
    })
}

fn uint_op(op: BinaryOp, a: u32, b: u32) -> Result<u32> {
    Ok(match op {
        BinaryOp::Add => a.wrapping_add(b),
        BinaryOp::Sub => a.wrapping_sub(b),
        BinaryOp::Mul => a.wrapping_mul(b),
        BinaryOp::Div | BinaryOp::FloorDiv => a.checked_div(b).ok_or(Error::DivisionByZero)?,
        BinaryOp::Rem => a.checked_rem(b).ok_or(Error::DivisionByZero)?,
        BinaryOp::Pow => a.wrapping_pow(b),
    })
}

macro_rules! float_op {
    ($name:ident, $t:ty) => {
        fn $name(op: BinaryOp, a: $t, b: $t) -> $t {
            match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                BinaryOp::FloorDiv => (a / b).floor(),
                BinaryOp::Rem => {
                    // Result takes the sign of the divisor.
                    let r = a % b;
                    if r != 0.0 && ((r < 0.0) != (b < 0.0)) {
                        r + b
                    } else {
                        r
                    }
                }
                BinaryOp::Pow => a.powf(b),
            }
        }
    };
}
float_op!(f32_op, f32);
float_op!(f64_op, f64);

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (*self, config::precision()) {
            (Scalar::Bool(b), _) => b.fmt(f),
            (Scalar::Int(i), _) => i.fmt(f),
            (Scalar::UInt(u), _) => u.fmt(f),
            (Scalar::Float(v), Some(prec)) => write!(f, "{v:.prec$}"),
            (Scalar::Double(v), Some(prec)) => write!(f, "{v:.prec$}"),
            (Scalar::Float(v), None) => v.fmt(f),
            (Scalar::Double(v), None) => v.fmt(f),
        }
    }
}

// Prints just the payload; the dtype is almost always clear from context.
impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(b) => b.fmt(f),
            Scalar::Int(i) => i.fmt(f),
            Scalar::UInt(u) => write!(f, "{u}u"),
            Scalar::Float(v) => v.fmt(f),
            Scalar::Double(v) => write!(f, "{v:?}d"),
        }
    }
}

macro_rules! scalar_from {
    ($($t:ty => $variant:ident),+) => {
        $(
            impl From<$t> for Scalar {
                #[inline]
                fn from(value: $t) -> Self {
                    Scalar::$variant(value)
                }
            }
        )+
    };
}
scalar_from!(bool => Bool, i32 => Int, u32 => UInt, f32 => Float, f64 => Double);
