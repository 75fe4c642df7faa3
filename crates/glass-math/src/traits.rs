use crate::{DType, Scalar};

/// Rust primitive types that can be stored as components of a value.
///
/// This is implemented for [`bool`], [`i32`], [`u32`], [`f32`] and [`f64`], and is what allows
/// typed constructors like [`Value::from_slice`][crate::Value::from_slice] and typed accessors like
/// [`Value::to_array`][crate::Value::to_array] to exist.
pub trait Component: Copy + Into<Scalar> {
    /// The dtype this type is stored as.
    const DTYPE: DType;

    /// Converts `scalar` to this type, with the conversion rules of [`Scalar::cast`].
    fn from_scalar(scalar: Scalar) -> Self;
}

macro_rules! component {
    ($($t:ty => $variant:ident),+) => {
        $(
            impl Component for $t {
                const DTYPE: DType = DType::$variant;

                fn from_scalar(scalar: Scalar) -> Self {
                    match scalar.cast(DType::$variant) {
                        Scalar::$variant(v) => v,
                        // `cast` always returns the requested variant.
                        _ => unreachable!(),
                    }
                }
            }
        )+
    };
}
component!(bool => Bool, i32 => Int, u32 => UInt, f32 => Float, f64 => Double);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_scalar() {
        assert_eq!(f32::from_scalar(Scalar::Int(-3)), -3.0);
        assert_eq!(u32::from_scalar(Scalar::Bool(true)), 1);
        assert!(!bool::from_scalar(Scalar::Double(0.0)));
        assert_eq!(<i32 as Component>::DTYPE, DType::Int);
    }
}
