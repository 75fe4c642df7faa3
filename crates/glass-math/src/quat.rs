//! Quaternions, stored as `(w, x, y, z)`.
//!
//! Unit-length quaternions ("*versors*") are commonly used to represent rotations in 3D space.
//! Multiplying a quaternion with a `vec3` rotates the vector; multiplying two quaternions composes
//! their rotations (Hamilton product).

use crate::{
    error::{Error, Result},
    registry::{builtin, ConcreteType, MathForm, Shape},
    value::Buffer,
    BinaryOp, DType, Operand, Scalar, Value,
};

mod ops;

pub(crate) use ops::binary;

const W: usize = 0;
const X: usize = 1;
const Y: usize = 2;
const Z: usize = 3;

/// Builds a quaternion of type `ty` from constructor arguments.
pub(crate) fn construct(ty: &'static ConcreteType, args: &[Operand]) -> Result<Value> {
    let data = match args {
        [] => return Ok(identity(ty)),
        [Operand::Value(q)] if q.form() == MathForm::Quaternion => q.data.clone(),
        [Operand::Scalar(w), Operand::Value(v)] if v.shape() == Shape::Vector(3) => {
            let mut data = Buffer::new();
            data.push(*w);
            data.extend(v.components());
            data
        }
        [Operand::Scalar(w), Operand::Scalar(x), Operand::Scalar(y), Operand::Scalar(z)] => {
            [*w, *x, *y, *z].into_iter().collect()
        }
        _ => {
            let args = args.iter().map(Operand::type_name).collect::<Vec<_>>();
            return Err(Error::arity(
                ty.name(),
                format!("expected (), (quat), (w, vec3) or (w, x, y, z), got ({})", args.join(", ")),
            ));
        }
    };
    Ok(Value::from_buffer(ty, data))
}

fn identity(ty: &'static ConcreteType) -> Value {
    let mut q = Value::zeroed(ty);
    q.data[W] = ty.dtype().one();
    q
}

/// Reads the `w`, `x`, `y`, `z` or `xyz` field of a quaternion.
pub(crate) fn attr(q: &Value, name: &str) -> Result<Operand> {
    match name {
        "w" => Ok(Operand::Scalar(q.data[W])),
        "x" => Ok(Operand::Scalar(q.data[X])),
        "y" => Ok(Operand::Scalar(q.data[Y])),
        "z" => Ok(Operand::Scalar(q.data[Z])),
        "xyz" => q.gather(X..=Z),
        _ => Err(Error::unknown_attribute(q.type_name(), name)),
    }
}

/// Writes the `w`, `x`, `y`, `z` or `xyz` field of a quaternion.
///
/// Single fields take a scalar, `xyz` requires a 3-component vector.
pub(crate) fn set_attr(q: &mut Value, name: &str, value: Operand) -> Result<()> {
    let index = match name {
        "w" => W,
        "x" => X,
        "y" => Y,
        "z" => Z,
        "xyz" => {
            return match &value {
                Operand::Value(v) if v.shape() == Shape::Vector(3) => {
                    q.scatter(name, &[X, Y, Z], &value)
                }
                _ => Err(Error::TypeMismatch(format!(
                    "'xyz' of '{}' requires a 'vec3', got '{}'",
                    q.type_name(),
                    value.type_name()
                ))),
            };
        }
        _ => return Err(Error::unknown_attribute(q.type_name(), name)),
    };

    match value {
        Operand::Scalar(s) => q.set_component(index, s),
        Operand::Value(v) => Err(Error::TypeMismatch(format!(
            "'{name}' of '{}' requires a scalar, got '{}'",
            q.type_name(),
            v.type_name()
        ))),
    }
}

/// Computes `conjugate(q) / |q|²`.
pub(crate) fn inverse(q: &Value) -> Result<Value> {
    let length2 = q.length2()?;
    if length2.as_f64() == 0.0 {
        return Err(Error::Singular);
    }
    q.conjugate()?.binary(BinaryOp::Div, length2)
}

impl Value {
    /// Returns the conjugate `(w, -x, -y, -z)` of a quaternion.
    pub fn conjugate(&self) -> Result<Value> {
        if self.form() != MathForm::Quaternion {
            return Err(Error::undefined("conjugate", &[self.type_name()]));
        }
        let mut conj = self.clone();
        for c in &mut conj.data[X..=Z] {
            *c = c.negate();
        }
        Ok(conj)
    }

    /// Creates a quaternion rotating by `radians` around `axis`.
    ///
    /// The axis does not need to be normalized. The quaternion is a `dquat` if `axis` is a `dvec3`,
    /// and a `quat` otherwise.
    ///
    /// ```
    /// # use glass_math::*;
    /// let q = Value::from_axis_angle(&vec3(0.0, 0.0, 2.0), std::f32::consts::FRAC_PI_2).unwrap();
    /// let v = (&q * vec3(1.0, 0.0, 0.0)).unwrap();
    /// assert_approx_eq!(v, vec3(0.0, 1.0, 0.0)).abs(1e-6);
    /// ```
    pub fn from_axis_angle(axis: &Value, radians: impl Into<Scalar>) -> Result<Value> {
        if axis.shape() != Shape::Vector(3) {
            return Err(Error::undefined("from_axis_angle", &[axis.type_name()]));
        }
        let axis = axis.normalize()?;
        let dtype = axis.dtype().to_float();
        let (sin, cos) = (radians.into().as_f64() * 0.5).sin_cos();

        let ty = axis.ty().registry().quaternion(dtype)?;
        let mut data = Buffer::new();
        data.push(Scalar::Double(cos));
        data.extend(axis.components().map(|c| Scalar::Double(c.as_f64() * sin)));
        Ok(Value::from_buffer(ty, data))
    }

    /// Creates a `quat` rotating by `radians` around the X axis.
    pub fn from_rotation_x(radians: f32) -> Value {
        let (sin, cos) = (radians * 0.5).sin_cos();
        quat(cos, sin, 0.0, 0.0)
    }

    /// Creates a `quat` rotating by `radians` around the Y axis.
    pub fn from_rotation_y(radians: f32) -> Value {
        let (sin, cos) = (radians * 0.5).sin_cos();
        quat(cos, 0.0, sin, 0.0)
    }

    /// Creates a `quat` rotating by `radians` around the Z axis.
    pub fn from_rotation_z(radians: f32) -> Value {
        let (sin, cos) = (radians * 0.5).sin_cos();
        quat(cos, 0.0, 0.0, sin)
    }
}

fn typed(dtype: DType, components: [Scalar; 4]) -> Value {
    Value::from_buffer(
        builtin(dtype, Shape::Quaternion),
        components.into_iter().collect(),
    )
}

/// Creates a `quat` from its real part `w` and imaginary parts `x`, `y`, `z`.
pub fn quat(w: f32, x: f32, y: f32, z: f32) -> Value {
    typed(DType::Float, [w, x, y, z].map(Scalar::Float))
}

/// Creates a `dquat` from its real part `w` and imaginary parts `x`, `y`, `z`.
pub fn dquat(w: f64, x: f64, y: f64, z: f64) -> Value {
    typed(DType::Double, [w, x, y, z].map(Scalar::Double))
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use crate::*;

    #[test]
    fn construct() {
        assert_eq!(construct!("quat").unwrap(), quat(1.0, 0.0, 0.0, 0.0));
        assert_eq!(
            construct!("quat", 0.5, vec3(1.0, 2.0, 3.0)).unwrap(),
            quat(0.5, 1.0, 2.0, 3.0)
        );
        assert_eq!(
            construct!("dquat", 1, 2, 3, 4).unwrap(),
            dquat(1.0, 2.0, 3.0, 4.0)
        );
        let q = quat(0.0, 1.0, 0.0, 0.0);
        assert_eq!(construct!("dquat", &q).unwrap(), dquat(0.0, 1.0, 0.0, 0.0));

        for bad in [
            construct!("quat", 1.0),
            construct!("quat", 1.0, 2.0, 3.0),
            construct!("quat", vec4(1.0, 0.0, 0.0, 0.0)),
            construct!("quat", 1.0, vec2(0.0, 0.0)),
        ] {
            assert!(matches!(bad, Err(Error::Arity { .. })), "{bad:?}");
        }
    }

    #[test]
    fn fields() {
        let mut q = quat(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q.attr("w").unwrap(), 1.0f32);
        assert_eq!(q.attr("z").unwrap(), 4.0f32);
        assert_eq!(q.attr("xyz").unwrap(), vec3(2.0, 3.0, 4.0));
        assert_eq!(q.attr("wx"), Err(Error::unknown_attribute("quat", "wx")));

        q.set_attr("w", 0).unwrap();
        q.set_attr("xyz", ivec3(7, 8, 9)).unwrap();
        assert_eq!(q, quat(0.0, 7.0, 8.0, 9.0));

        assert!(matches!(
            q.set_attr("xyz", vec2(1.0, 2.0)),
            Err(Error::TypeMismatch(_))
        ));
        assert!(matches!(q.set_attr("xyz", 1.0), Err(Error::TypeMismatch(_))));
        assert!(matches!(
            q.set_attr("x", vec2(1.0, 2.0)),
            Err(Error::TypeMismatch(_))
        ));
        assert_eq!(q, quat(0.0, 7.0, 8.0, 9.0));
    }

    #[test]
    fn conjugate_and_inverse() {
        let q = quat(1.0, 2.0, 3.0, 4.0);
        assert_eq!(q.conjugate().unwrap(), quat(1.0, -2.0, -3.0, -4.0));
        assert_eq!(q.length2().unwrap(), Scalar::Float(30.0));

        let id = (&q * q.inverse().unwrap()).unwrap();
        assert_approx_eq!(id, quat(1.0, 0.0, 0.0, 0.0)).abs(1e-6);

        assert_eq!(quat(0.0, 0.0, 0.0, 0.0).inverse(), Err(Error::Singular));
        assert!(vec3(1.0, 0.0, 0.0).conjugate().is_err());
    }

    #[test]
    fn rotations() {
        let x = vec3(1.0, 0.0, 0.0);
        let y = vec3(0.0, 1.0, 0.0);
        let z = vec3(0.0, 0.0, 1.0);

        let rz = Value::from_rotation_z(FRAC_PI_2);
        assert_approx_eq!((&rz * &x).unwrap(), y.clone()).abs(1e-6);
        let rx = Value::from_rotation_x(FRAC_PI_2);
        assert_approx_eq!((&rx * &y).unwrap(), z.clone()).abs(1e-6);
        let ry = Value::from_rotation_y(FRAC_PI_2);
        assert_approx_eq!((&ry * &z).unwrap(), x.clone()).abs(1e-6);

        let axis = Value::from_axis_angle(&x, FRAC_PI_2).unwrap();
        assert_approx_eq!(axis, rx).abs(1e-6);
        let d = Value::from_axis_angle(&dvec3(0.0, 3.0, 0.0), 1.0).unwrap();
        assert_eq!(d.type_name(), "dquat");
        assert!(Value::from_axis_angle(&vec2(1.0, 0.0), 1.0).is_err());
    }

    #[test]
    fn length() {
        let q = dquat(0.0, 3.0, 0.0, 4.0);
        assert_eq!(q.length().unwrap(), Scalar::Double(5.0));
        assert_approx_eq!(q.normalize().unwrap(), dquat(0.0, 0.6, 0.0, 0.8)).abs(1e-12);
    }
}
