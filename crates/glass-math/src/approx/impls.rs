use super::ApproxEq;
use crate::{Operand, Scalar, Value};

macro_rules! float_impl {
    ($($t:ty),+) => {
        $(
            impl ApproxEq for $t {
                fn abs_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
                    if !self.is_finite() || !other.is_finite() {
                        // `inf == inf`, `inf != -inf`, `NaN != NaN`
                        return self == other;
                    }
                    (*self as f64 - *other as f64).abs() <= tolerance
                }

                fn rel_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
                    if !self.is_finite() || !other.is_finite() {
                        return self == other;
                    }
                    let (a, b) = (*self as f64, *other as f64);
                    (a - b).abs() <= a.abs().max(b.abs()) * tolerance
                }

                fn ulps_diff_eq(&self, other: &Self, ulps: u32) -> bool {
                    if self.is_sign_negative() != other.is_sign_negative() {
                        return self == other; // `-0.0 == +0.0`
                    }
                    if self.is_nan() || other.is_nan() {
                        return false;
                    }
                    self.to_bits().abs_diff(other.to_bits()) <= ulps.into()
                }
            }
        )+
    };
}

float_impl!(f32, f64);

/// Scalars of different dtypes are compared as `f64`, except for ULP comparisons of two `float`
/// scalars, which count `f32` steps.
impl ApproxEq for Scalar {
    fn abs_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.as_f64().abs_diff_eq(&other.as_f64(), tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.as_f64().rel_diff_eq(&other.as_f64(), tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps: u32) -> bool {
        match (self, other) {
            (Scalar::Float(a), Scalar::Float(b)) => a.ulps_diff_eq(b, ulps),
            _ => self.as_f64().ulps_diff_eq(&other.as_f64(), ulps),
        }
    }
}

impl ApproxEq for [Scalar] {
    fn abs_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| a.abs_diff_eq(b, tolerance))
    }

    fn rel_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.len() == other.len()
            && self.iter().zip(other).all(|(a, b)| a.rel_diff_eq(b, tolerance))
    }

    fn ulps_diff_eq(&self, other: &Self, ulps: u32) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.ulps_diff_eq(b, ulps))
    }
}

/// Values are only approximately equal if they have the same concrete type.
impl ApproxEq for Value {
    fn abs_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.ty() == other.ty() && self.as_slice().abs_diff_eq(other.as_slice(), tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.ty() == other.ty() && self.as_slice().rel_diff_eq(other.as_slice(), tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps: u32) -> bool {
        self.ty() == other.ty() && self.as_slice().ulps_diff_eq(other.as_slice(), ulps)
    }
}

impl ApproxEq for Operand {
    fn abs_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        match (self, other) {
            (Operand::Scalar(a), Operand::Scalar(b)) => a.abs_diff_eq(b, tolerance),
            (Operand::Value(a), Operand::Value(b)) => a.abs_diff_eq(b, tolerance),
            _ => false,
        }
    }

    fn rel_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        match (self, other) {
            (Operand::Scalar(a), Operand::Scalar(b)) => a.rel_diff_eq(b, tolerance),
            (Operand::Value(a), Operand::Value(b)) => a.rel_diff_eq(b, tolerance),
            _ => false,
        }
    }

    fn ulps_diff_eq(&self, other: &Self, ulps: u32) -> bool {
        match (self, other) {
            (Operand::Scalar(a), Operand::Scalar(b)) => a.ulps_diff_eq(b, ulps),
            (Operand::Value(a), Operand::Value(b)) => a.ulps_diff_eq(b, ulps),
            _ => false,
        }
    }
}

impl<T: ApproxEq + ?Sized> ApproxEq for &T {
    fn abs_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        T::abs_diff_eq(self, other, tolerance)
    }

    fn rel_diff_eq(&self, other: &Self, tolerance: f64) -> bool {
        T::rel_diff_eq(self, other, tolerance)
    }

    fn ulps_diff_eq(&self, other: &Self, ulps: u32) -> bool {
        T::ulps_diff_eq(self, other, ulps)
    }
}
