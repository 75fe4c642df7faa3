//! Operator dispatch shared by all value families.
//!
//! Arithmetic between two operands works the same way for every math form, unless a family
//! redefines it (matrix and quaternion multiplication):
//!
//! - the result dtype is picked by [`promote`],
//! - a scalar operand is broadcast to every component,
//! - two non-scalar operands must be *homogeneous* (same math form and shape) and are combined
//!   component by component.

use std::ops;

use crate::{
    dtype::{apply, promote},
    error::{Error, Result},
    matrix, quat,
    registry::{MathForm, Shape},
    DType, Operand, Scalar, Value,
};

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    /// True division. Integer operands produce a `float` result.
    Div,
    /// Division rounding towards negative infinity.
    FloorDiv,
    /// Remainder with the sign of the divisor.
    Rem,
    Pow,
}

impl BinaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::FloorDiv => "//",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
        }
    }
}

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl CompareOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    /// The operator that gives the same result with swapped operands.
    pub const fn flip(self) -> Self {
        match self {
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Ge => CompareOp::Le,
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Le => CompareOp::Ge,
            op => op,
        }
    }

    pub(crate) fn eval<T: PartialOrd>(self, a: &T, b: &T) -> bool {
        match self {
            CompareOp::Gt => a > b,
            CompareOp::Ge => a >= b,
            CompareOp::Lt => a < b,
            CompareOp::Le => a <= b,
            CompareOp::Eq => a == b,
            CompareOp::Ne => a != b,
        }
    }
}

/// Returns whether `a` and `b` have the same math form and shape.
pub fn is_homogeneous(a: &Operand, b: &Operand) -> bool {
    a.shape() == b.shape()
}

/// Picks component `i` of a homogeneous operand, or the only component of a broadcast scalar.
#[inline]
pub(crate) fn broadcast(components: &[Scalar], i: usize) -> Scalar {
    match components {
        [single] => *single,
        _ => components[i],
    }
}

/// Computes `lhs op rhs` component by component.
pub(crate) fn elementwise(lhs: &Value, op: BinaryOp, rhs: &Operand) -> Result<Value> {
    if let Operand::Value(v) = rhs {
        if v.shape() != lhs.shape() {
            return Err(Error::operands(op.symbol(), lhs.type_name(), v.type_name()));
        }
    }

    let dtype = promote(op, lhs.dtype(), rhs.dtype(), rhs.has_negative());
    let ty = lhs.ty.with_dtype(dtype)?;
    let b = rhs.components();
    Value::try_from_fn(ty, |i| apply(op, lhs.data[i], broadcast(b, i), dtype))
}

impl Value {
    /// Computes `self op rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeMismatch`] if the operator is not defined for the two operands, and
    /// [`Error::DivisionByZero`] for integer `//` or `%` by zero.
    pub fn binary(&self, op: BinaryOp, rhs: impl Into<Operand>) -> Result<Value> {
        self.binary_operand(op, &rhs.into())
    }

    pub(crate) fn binary_operand(&self, op: BinaryOp, rhs: &Operand) -> Result<Value> {
        match self.form() {
            MathForm::Matrix => matrix::binary(self, op, rhs),
            MathForm::Quaternion => quat::binary(self, op, rhs),
            _ => elementwise(self, op, rhs),
        }
    }

    /// Computes `lhs op self`, where `lhs` is broadcast to every component.
    pub fn binary_reflected(&self, op: BinaryOp, lhs: impl Into<Scalar>) -> Result<Value> {
        let lhs = lhs.into();
        let shaped = matches!(self.form(), MathForm::Matrix | MathForm::Quaternion);
        let divides = matches!(
            op,
            BinaryOp::Div | BinaryOp::FloorDiv | BinaryOp::Rem | BinaryOp::Pow
        );
        if shaped && divides {
            return Err(Error::operands(
                op.symbol(),
                lhs.dtype().name(),
                self.type_name(),
            ));
        }

        let dtype = promote(op, lhs.dtype(), self.dtype(), self.has_negative());
        let ty = self.ty.with_dtype(dtype)?;
        Value::try_from_fn(ty, |i| apply(op, lhs, self.data[i], dtype))
    }

    /// Computes `self op= rhs`, overwriting `self` in place and notifying the observer once.
    ///
    /// The result is converted back to the dtype of `self`. The operation must not change the
    /// shape of `self`: `rhs` has to be a scalar or homogeneous with `self`, with the exception of
    /// `mat *= mat` (where `rhs` must be square with as many rows as `self` has columns) and
    /// `quat *= quat` (Hamilton product). On error, `self` is left untouched.
    ///
    /// ```
    /// # use glass_math::*;
    /// let mut v = ivec2(7, 9);
    /// v.compound(BinaryOp::Div, 2).unwrap();
    /// assert_eq!(v, ivec2(3, 4));
    /// ```
    pub fn compound(&mut self, op: BinaryOp, rhs: impl Into<Operand>) -> Result<()> {
        let rhs = rhs.into();
        let mismatch = |lhs: &Value| {
            Error::operands(
                &format!("{}=", op.symbol()),
                lhs.type_name(),
                rhs.type_name(),
            )
        };

        let result = match self.binary_operand(op, &rhs) {
            Ok(result) => result,
            Err(Error::TypeMismatch(_)) => return Err(mismatch(self)),
            Err(e) => return Err(e),
        };
        if result.shape() != self.shape() {
            return Err(mismatch(self));
        }

        let dtype = self.dtype();
        for (dst, src) in self.data.iter_mut().zip(result.components()) {
            *dst = src.cast(dtype);
        }
        self.notify();
        Ok(())
    }

    /// Compares `self` to `rhs` component by component.
    ///
    /// Returns a boolean value with the shape of `self` (a `bvec4` for quaternions), not a single
    /// `bool`. Use `==` to test whole values for equality.
    ///
    /// ```
    /// # use glass_math::*;
    /// let gt = vec3(1.0, 2.0, 3.0).compare(CompareOp::Gt, vec3(0.0, 2.0, 4.0)).unwrap();
    /// assert_eq!(gt, bvec3(true, false, false));
    /// ```
    pub fn compare(&self, op: CompareOp, rhs: impl Into<Operand>) -> Result<Value> {
        let rhs = rhs.into();
        if let Operand::Value(v) = &rhs {
            if v.shape() != self.shape() {
                return Err(Error::operands(op.symbol(), self.type_name(), v.type_name()));
            }
        }

        let shape = match self.shape() {
            Shape::Quaternion => Shape::Vector(4),
            shape => shape,
        };
        let ty = self.ty.registry().get(DType::Bool, shape)?;
        let b = rhs.components();
        Value::try_from_fn(ty, |i| {
            Ok(Scalar::Bool(self.data[i].compare(op, broadcast(b, i))))
        })
    }

    pub fn gt(&self, rhs: impl Into<Operand>) -> Result<Value> {
        self.compare(CompareOp::Gt, rhs)
    }

    pub fn ge(&self, rhs: impl Into<Operand>) -> Result<Value> {
        self.compare(CompareOp::Ge, rhs)
    }

    pub fn lt(&self, rhs: impl Into<Operand>) -> Result<Value> {
        self.compare(CompareOp::Lt, rhs)
    }

    pub fn le(&self, rhs: impl Into<Operand>) -> Result<Value> {
        self.compare(CompareOp::Le, rhs)
    }

    /// Componentwise negation.
    ///
    /// Negating a `bool` value is a logical NOT. Negating a `uint` value produces an `int` value.
    pub fn negate(&self) -> Result<Value> {
        let dtype = match self.dtype() {
            DType::UInt => DType::Int,
            dtype => dtype,
        };
        let ty = self.ty.with_dtype(dtype)?;
        Value::try_from_fn(ty, |i| Ok(self.data[i].negate()))
    }

    /// `self ** rhs`.
    pub fn pow(&self, rhs: impl Into<Operand>) -> Result<Value> {
        self.binary(BinaryOp::Pow, rhs)
    }

    /// `self // rhs`.
    pub fn floor_div(&self, rhs: impl Into<Operand>) -> Result<Value> {
        self.binary(BinaryOp::FloorDiv, rhs)
    }

    pub(crate) fn has_negative(&self) -> bool {
        self.components().any(Scalar::is_negative)
    }
}

impl Scalar {
    /// Negation; a logical NOT for `bool` and a signed result for `uint`.
    pub fn negate(self) -> Scalar {
        match self {
            Scalar::Bool(b) => Scalar::Bool(!b),
            Scalar::Int(i) => Scalar::Int(i.wrapping_neg()),
            Scalar::UInt(u) => Scalar::Int((u as i32).wrapping_neg()),
            Scalar::Float(f) => Scalar::Float(-f),
            Scalar::Double(d) => Scalar::Double(-d),
        }
    }
}

impl Operand {
    /// Computes `self op rhs` for any combination of scalars and values.
    pub fn binary(&self, op: BinaryOp, rhs: &Operand) -> Result<Operand> {
        match (self, rhs) {
            (Operand::Scalar(a), Operand::Scalar(b)) => a.binary(op, *b).map(Operand::Scalar),
            (Operand::Scalar(a), Operand::Value(b)) => {
                b.binary_reflected(op, *a).map(Operand::Value)
            }
            (Operand::Value(a), rhs) => a.binary_operand(op, rhs).map(Operand::Value),
        }
    }

    /// Componentwise comparison; comparing two scalars yields a `bool` scalar.
    pub fn compare(&self, op: CompareOp, rhs: &Operand) -> Result<Operand> {
        match (self, rhs) {
            (Operand::Scalar(a), Operand::Scalar(b)) => Ok(Operand::Scalar(a.compare(op, *b).into())),
            (Operand::Scalar(a), Operand::Value(b)) => b.compare(op.flip(), *a).map(Operand::Value),
            (Operand::Value(a), rhs) => a.compare(op, rhs).map(Operand::Value),
        }
    }

    pub fn negate(&self) -> Result<Operand> {
        match self {
            Operand::Scalar(s) => Ok(Operand::Scalar(s.negate())),
            Operand::Value(v) => v.negate().map(Operand::Value),
        }
    }
}

macro_rules! value_ops {
    ($($trait:ident :: $method:ident => $op:ident),+) => {
        $(
            impl<R: Into<Operand>> ops::$trait<R> for &Value {
                type Output = Result<Value>;

                fn $method(self, rhs: R) -> Result<Value> {
                    self.binary(BinaryOp::$op, rhs)
                }
            }

            impl<R: Into<Operand>> ops::$trait<R> for Value {
                type Output = Result<Value>;

                fn $method(self, rhs: R) -> Result<Value> {
                    self.binary(BinaryOp::$op, rhs)
                }
            }
        )+
    };
}
value_ops!(Add::add => Add, Sub::sub => Sub, Mul::mul => Mul, Div::div => Div, Rem::rem => Rem);

macro_rules! reflected_ops {
    ($($t:ty),+) => {
        $(
            reflected_ops!(@impl $t, Add::add => Add, Sub::sub => Sub, Mul::mul => Mul, Div::div => Div, Rem::rem => Rem);
        )+
    };
    (@impl $t:ty, $($trait:ident :: $method:ident => $op:ident),+) => {
        $(
            impl ops::$trait<&Value> for $t {
                type Output = Result<Value>;

                fn $method(self, rhs: &Value) -> Result<Value> {
                    rhs.binary_reflected(BinaryOp::$op, self)
                }
            }

            impl ops::$trait<Value> for $t {
                type Output = Result<Value>;

                fn $method(self, rhs: Value) -> Result<Value> {
                    rhs.binary_reflected(BinaryOp::$op, self)
                }
            }
        )+
    };
}
reflected_ops!(bool, i32, u32, f32, f64, Scalar);

impl ops::Neg for &Value {
    type Output = Result<Value>;

    fn neg(self) -> Result<Value> {
        self.negate()
    }
}

impl ops::Neg for Value {
    type Output = Result<Value>;

    fn neg(self) -> Result<Value> {
        self.negate()
    }
}

impl ops::Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::*;

    #[test]
    fn vector_add() {
        let sum = (vec3(1.0, 2.0, 3.0) + vec3(4.0, 5.0, 6.0)).unwrap();
        assert_eq!(sum, vec3(5.0, 7.0, 9.0));
    }

    #[test]
    fn integer_division_promotes() {
        let q = (ivec2(3, 4) / ivec2(2, 2)).unwrap();
        assert_eq!(q.dtype(), DType::Float);
        assert_eq!(q, vec2(1.5, 2.0));

        let q = (ivec2(1, 0) / ivec2(2, 1)).unwrap();
        assert_eq!(q, vec2(0.5, 0.0));

        let q = ivec2(7, -7).floor_div(2).unwrap();
        assert_eq!(q, ivec2(3, -4));
    }

    #[test]
    fn mixed_dtypes() {
        let r = (ivec3(1, 2, 3) * dvec3(0.5, 0.5, 0.5)).unwrap();
        assert_eq!(r, dvec3(0.5, 1.0, 1.5));

        let r = (uvec2(1, 2) + ivec2(1, 1)).unwrap();
        assert_eq!(r.type_name(), "uvec2");

        let r = (bvec2(true, false) + bvec2(true, true)).unwrap();
        assert_eq!(r, bvec2(true, true));
    }

    #[test]
    fn pow() {
        assert_eq!(ivec2(2, 3).pow(2).unwrap(), ivec2(4, 9));
        let r = ivec2(2, 4).pow(ivec2(-1, 1)).unwrap();
        assert_eq!(r, vec2(0.5, 4.0));
    }

    #[test]
    fn scalar_broadcast_and_reflection() {
        assert_eq!((vec2(1.0, 2.0) * 2).unwrap(), vec2(2.0, 4.0));
        assert_eq!((1.0f32 - &vec2(1.0, 2.0)).unwrap(), vec2(0.0, -1.0));
        assert_eq!((12i32 / ivec2(3, 4)).unwrap(), vec2(4.0, 3.0));
        assert_eq!((7i32 % ivec2(2, -2)).unwrap(), ivec2(1, -1));
    }

    #[test]
    fn shape_mismatch() {
        assert_eq!(
            vec3(1.0, 2.0, 3.0) + vec4(1.0, 2.0, 3.0, 4.0),
            Err(Error::operands("+", "vec3", "vec4"))
        );
        assert!(matches!(
            vec4(1.0, 2.0, 3.0, 4.0) * quat(1.0, 0.0, 0.0, 0.0),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn integer_division_by_zero() {
        assert_eq!(ivec2(1, 2) % ivec2(1, 0), Err(Error::DivisionByZero));
    }

    #[test]
    fn compound_assignment() {
        let mut v = vec3(1.0, 2.0, 3.0);
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        v.set_observer(move |_| {
            c.fetch_add(1, Ordering::Relaxed);
        });

        v.compound(BinaryOp::Add, vec3(1.0, 1.0, 1.0)).unwrap();
        assert_eq!(v, vec3(2.0, 3.0, 4.0));
        assert_eq!(count.load(Ordering::Relaxed), 1);

        v.compound(BinaryOp::Mul, 0.5).unwrap();
        assert_eq!(v, vec3(1.0, 1.5, 2.0));
        assert_eq!(count.load(Ordering::Relaxed), 2);

        assert_eq!(
            v.compound(BinaryOp::Add, vec2(1.0, 1.0)),
            Err(Error::operands("+=", "vec3", "vec2"))
        );
        assert_eq!(v, vec3(1.0, 1.5, 2.0));
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn compound_keeps_dtype() {
        let mut v = ivec2(5, 6);
        v.compound(BinaryOp::Mul, 1.5).unwrap();
        assert_eq!(v, ivec2(7, 9));

        let mut v = uvec2(1, 2);
        assert_eq!(v.compound(BinaryOp::Rem, 0u32), Err(Error::DivisionByZero));
        assert_eq!(v, uvec2(1, 2));
    }

    #[test]
    fn ordering_is_componentwise() {
        let a = vec3(1.0, 2.0, 3.0);
        assert_eq!(a.gt(vec3(0.0, 2.0, 4.0)).unwrap(), bvec3(true, false, false));
        assert_eq!(a.le(2).unwrap(), bvec3(true, true, false));
        assert_eq!(
            a.compare(CompareOp::Ne, vec3(1.0, 0.0, 3.0)).unwrap(),
            bvec3(false, true, false)
        );

        let t = bvec3(true, false, true);
        assert_eq!(t, bvec3(true, false, true));
        assert_eq!(
            t.gt(bvec3(false, false, true)).unwrap(),
            bvec3(true, false, false)
        );

        let q = quat(1.0, 2.0, 3.0, 4.0).ge(2.0).unwrap();
        assert_eq!(q, bvec4(false, true, true, true));
    }

    #[test]
    fn scalar_operand_comparison() {
        let lhs = Operand::from(2.0);
        let r = lhs.compare(CompareOp::Lt, &vec2(1.0, 3.0).into()).unwrap();
        assert_eq!(r, bvec2(false, true));
    }

    #[test]
    fn negation() {
        assert_eq!((-vec2(1.0, -2.0)).unwrap(), vec2(-1.0, 2.0));
        assert_eq!((-bvec2(true, false)).unwrap(), bvec2(false, true));
        let n = (-uvec3(1, 2, 3)).unwrap();
        assert_eq!(n, ivec3(-1, -2, -3));
        assert_eq!(-Scalar::UInt(4), Scalar::Int(-4));
    }
}
