use crate::{
    dtype::apply,
    error::{Error, Result},
    registry::{builtin, ConcreteType, MathForm, Shape},
    traits::Component,
    value::Buffer,
    BinaryOp, Operand, Scalar, Value,
};

/// Builds a vector of type `ty` from constructor arguments.
///
/// The rules are tried in order:
///
/// 1. No arguments: all components are zero.
/// 2. A single scalar: broadcast to every component.
/// 3. A single vector with at least as many components as `ty`: its leading components are
///    copied (this is how `vec3(v4)` drops the `w` component).
/// 4. A list of scalars and vectors whose component counts add up to exactly the length of `ty`:
///    the components are concatenated in order.
pub(crate) fn construct(ty: &'static ConcreteType, args: &[Operand]) -> Result<Value> {
    let n = ty.shape().product();
    match args {
        [] => return Ok(Value::zeroed(ty)),
        [Operand::Scalar(s)] => return Ok(Value::from_buffer(ty, (0..n).map(|_| *s).collect())),
        [Operand::Value(v)] if v.form() == MathForm::Vector && v.len() >= n => {
            return Ok(Value::from_buffer(ty, v.components().take(n).collect()));
        }
        _ => {}
    }

    for arg in args {
        if let Operand::Value(v) = arg {
            if v.form() != MathForm::Vector {
                return Err(Error::arity(
                    ty.name(),
                    format!("unsupported argument type '{}'", v.type_name()),
                ));
            }
        }
    }

    let total = args.iter().map(|arg| arg.components().len()).sum::<usize>();
    if total != n {
        return Err(Error::arity(
            ty.name(),
            format!("expected {n} components, got {total}"),
        ));
    }

    let mut data = Buffer::new();
    for arg in args {
        data.extend_from_slice(arg.components());
    }
    Ok(Value::from_buffer(ty, data))
}

impl Value {
    /// Computes the dot product of two values of the same shape.
    ///
    /// The sum is accumulated in the promoted dtype of the two operands.
    ///
    /// ```
    /// # use glass_math::*;
    /// let a = ivec3(1, 3, -5);
    /// let b = ivec3(4, -2, -1);
    /// assert_eq!(a.dot(&b).unwrap(), Scalar::Int(3));
    /// ```
    pub fn dot(&self, other: &Value) -> Result<Scalar> {
        if self.shape() != other.shape() {
            return Err(Error::undefined(
                "dot",
                &[self.type_name(), other.type_name()],
            ));
        }

        let dtype = self.dtype().max(other.dtype());
        self.components()
            .zip(other.components())
            .try_fold(dtype.zero(), |acc, (a, b)| {
                let prod = apply(BinaryOp::Mul, a, b, dtype)?;
                apply(BinaryOp::Add, acc, prod, dtype)
            })
    }

    /// Returns the squared length of a vector or quaternion.
    pub fn length2(&self) -> Result<Scalar> {
        self.dot(self)
    }

    /// Returns the Euclidean length of a vector or quaternion.
    ///
    /// The result is a `double` for `double` values and a `float` otherwise.
    pub fn length(&self) -> Result<Scalar> {
        let length = self.length2()?.as_f64().sqrt();
        Ok(Scalar::Double(length).cast(self.dtype().to_float()))
    }

    /// Divides this value by its length.
    ///
    /// ```
    /// # use glass_math::*;
    /// let z = vec3(0.0, 0.0, 4.0).normalize().unwrap();
    /// assert_eq!(z, vec3(0.0, 0.0, 1.0));
    /// ```
    pub fn normalize(&self) -> Result<Value> {
        self.binary(BinaryOp::Div, self.length()?)
    }

    /// Computes the cross product of two 3-component vectors.
    ///
    /// The result is a `dvec3` if either operand is a `dvec3`, and a `vec3` otherwise.
    pub fn cross(&self, other: &Value) -> Result<Value> {
        let (Shape::Vector(3), Shape::Vector(3)) = (self.shape(), other.shape()) else {
            return Err(Error::undefined(
                "cross",
                &[self.type_name(), other.type_name()],
            ));
        };

        let a = self.components().map(Scalar::as_f64).collect::<Vec<_>>();
        let b = other.components().map(Scalar::as_f64).collect::<Vec<_>>();
        #[rustfmt::skip]
        let cross = [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ];

        let dtype = self.dtype().max(other.dtype()).to_float();
        let ty = self.ty.registry().vector(dtype, 3)?;
        Ok(Value::from_buffer(
            ty,
            cross.into_iter().map(Scalar::Double).collect(),
        ))
    }
}

fn typed<T: Component>(components: &[T]) -> Value {
    let ty = builtin(T::DTYPE, Shape::Vector(components.len()));
    Value::from_buffer(ty, components.iter().map(|&c| c.into()).collect())
}

macro_rules! vector_ctors {
    ($($name:ident($($c:ident),+): $t:ty;)+) => {
        $(
            #[doc = concat!("Creates a `", stringify!($name), "` from its components.")]
            #[inline]
            pub fn $name($($c: $t),+) -> Value {
                typed(&[$($c),+])
            }
        )+
    };
}

vector_ctors! {
    vec2(x, y): f32;
    vec3(x, y, z): f32;
    vec4(x, y, z, w): f32;
    dvec2(x, y): f64;
    dvec3(x, y, z): f64;
    dvec4(x, y, z, w): f64;
    ivec2(x, y): i32;
    ivec3(x, y, z): i32;
    ivec4(x, y, z, w): i32;
    uvec2(x, y): u32;
    uvec3(x, y, z): u32;
    uvec4(x, y, z, w): u32;
    bvec2(x, y): bool;
    bvec3(x, y, z): bool;
    bvec4(x, y, z, w): bool;
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn vector(name: &str, args: &[Operand]) -> Result<Value> {
        Value::from_name(name, args)
    }

    #[test]
    fn components_in_order() {
        for dtype in DType::ALL {
            for n in 2..=4 {
                let ty = TypeRegistry::global().vector(dtype, n).unwrap();
                let args = (0..n)
                    .map(|i| Operand::from(Scalar::Int(i as i32 + 1).cast(dtype)))
                    .collect::<Vec<_>>();
                let v = Value::new(ty, &args).unwrap();
                assert_eq!(v.len(), n);
                for (i, arg) in args.iter().enumerate() {
                    assert_eq!(v.get(i).unwrap(), *arg, "{v} component {i}");
                }
            }
        }
    }

    #[test]
    fn zero_and_broadcast() {
        assert_eq!(vector("uvec3", &[]).unwrap(), uvec3(0, 0, 0));
        assert_eq!(vector("vec4", &[2.into()]).unwrap(), vec4(2.0, 2.0, 2.0, 2.0));
        assert_eq!(vector("bvec2", &[7.into()]).unwrap(), bvec2(true, true));
    }

    #[test]
    fn narrowing() {
        let v4 = vec4(1.0, 2.0, 3.0, 4.0);
        assert_eq!(vector("vec3", &[(&v4).into()]).unwrap(), vec3(1.0, 2.0, 3.0));
        assert_eq!(vector("ivec2", &[v4.into()]).unwrap(), ivec2(1, 2));
    }

    #[test]
    fn fragments() {
        let xy = vec2(1.0, 2.0);
        let expected = vec4(1.0, 2.0, 3.0, 4.0);
        assert_eq!(construct!("vec4", &xy, 3.0, 4.0).unwrap(), expected);
        assert_eq!(
            construct!("vec4", 0.0, &xy, 0.0).unwrap(),
            vec4(0.0, 1.0, 2.0, 0.0)
        );
        assert_eq!(
            construct!("vec4", &xy, vec2(3.0, 4.0)).unwrap(),
            expected
        );
        assert_eq!(
            construct!("dvec3", 1, true, 0.5f32).unwrap(),
            dvec3(1.0, 1.0, 0.5)
        );
    }

    #[test]
    fn arity_errors() {
        let xy = vec2(1.0, 2.0);
        assert!(matches!(
            construct!("vec3", &xy),
            Err(Error::Arity { .. })
        ));
        assert!(matches!(
            construct!("vec3", &xy, 1.0, 2.0),
            Err(Error::Arity { .. })
        ));
        assert!(matches!(
            construct!("vec4", 1.0, 2.0),
            Err(Error::Arity { .. })
        ));
        assert!(matches!(
            construct!("vec4", quat(1.0, 0.0, 0.0, 0.0)),
            Err(Error::Arity { .. })
        ));
        assert!(matches!(
            construct!("vec4", construct!("mat2").unwrap()),
            Err(Error::Arity { .. })
        ));
    }

    #[test]
    fn dot() {
        assert_eq!(
            ivec3(1, 3, -5).dot(&ivec3(1, 3, -5)).unwrap(),
            Scalar::Int(35)
        );
        assert_eq!(vec2(1.0, 0.0).dot(&vec2(0.0, 1.0)).unwrap(), Scalar::Float(0.0));
        assert!(vec2(1.0, 0.0).dot(&vec3(0.0, 1.0, 0.0)).is_err());
    }

    #[test]
    fn length() {
        assert_eq!(vec2(3.0, 4.0).length().unwrap(), Scalar::Float(5.0));
        assert_eq!(ivec2(3, 4).length().unwrap(), Scalar::Float(5.0));
        assert_eq!(dvec2(3.0, 4.0).length().unwrap(), Scalar::Double(5.0));
        assert_eq!(ivec2(4, 0).length2().unwrap(), Scalar::Int(16));
        assert_eq!(ivec2(0, 2).normalize().unwrap(), vec2(0.0, 1.0));
    }

    #[test]
    fn cross() {
        let x = vec3(1.0, 0.0, 0.0);
        let y = vec3(0.0, 1.0, 0.0);
        let z = vec3(0.0, 0.0, 1.0);
        assert_eq!(x.cross(&y).unwrap(), z);
        assert_eq!(y.cross(&x).unwrap(), (-&z).unwrap());
        assert_eq!(
            ivec3(1, 0, 0).cross(&dvec3(0.0, 1.0, 0.0)).unwrap(),
            dvec3(0.0, 0.0, 1.0)
        );
        assert_eq!(
            x.cross(&vec2(1.0, 0.0)),
            Err(Error::undefined("cross", &["vec3", "vec2"]))
        );
    }
}
