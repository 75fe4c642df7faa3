//! Shader-style built-in functions.
//!
//! Every function accepts scalars and values (anything that converts into an [`Operand`]) and
//! applies per component, following the same promotion and broadcasting rules as the operators:
//! a scalar argument is broadcast against a value argument, two value arguments must have the same
//! shape.
//!
//! Functions that only make sense for real numbers (roots, exponentials, trigonometry, `mix`,
//! `smoothstep`, the geometric functions) produce `float` results for `bool`, `int` and `uint`
//! inputs, and `double` results for `double` inputs.
//!
//! ```
//! # use glass_math::*;
//! use glass_math::funcs;
//!
//! let v = funcs::clamp(vec3(-1.0, 0.5, 2.0), 0, 1).unwrap();
//! assert_eq!(v, vec3(0.0, 0.5, 1.0));
//! assert_eq!(funcs::sqrt(ivec2(4, 9)).unwrap(), vec2(2.0, 3.0));
//! ```

use tinyvec::ArrayVec;

use crate::{
    dtype::promote,
    error::{Error, Result},
    ops::{broadcast, elementwise},
    registry::{MathForm, Shape},
    BinaryOp, CompareOp, DType, Operand, Scalar, Value,
};

type Args = ArrayVec<[Scalar; 3]>;

/// Applies `f` to the components of `args`, producing a result of `dtype`.
///
/// Scalars are broadcast; all value arguments must have the same shape, which is also the shape of
/// the result.
fn componentwise(
    name: &str,
    args: &[&Operand],
    dtype: DType,
    f: impl Fn(&[Scalar]) -> Result<Scalar>,
) -> Result<Operand> {
    let mut template: Option<&Value> = None;
    for arg in args {
        if let Operand::Value(v) = arg {
            match template {
                Some(t) if t.shape() != v.shape() => {
                    let names = args.iter().map(|a| a.type_name()).collect::<Vec<_>>();
                    return Err(Error::undefined(name, &names));
                }
                Some(_) => {}
                None => template = Some(v),
            }
        }
    }

    let at = |i: usize| {
        args.iter()
            .map(|arg| broadcast(arg.components(), i))
            .collect::<Args>()
    };
    match template {
        None => Ok(Operand::Scalar(f(at(0).as_slice())?.cast(dtype))),
        Some(t) => {
            // There are no integral quaternions; such results are plain 4-vectors.
            let shape = match t.shape() {
                Shape::Quaternion if !dtype.is_float() => Shape::Vector(4),
                shape => shape,
            };
            let ty = t.ty().registry().get(dtype, shape)?;
            Value::try_from_fn(ty, |i| f(at(i).as_slice())).map(Operand::Value)
        }
    }
}

fn max_dtype(args: &[&Operand]) -> DType {
    args.iter()
        .map(|arg| arg.dtype())
        .max()
        .unwrap_or(DType::Float)
}

fn float_dtype(args: &[&Operand]) -> DType {
    max_dtype(args).to_float()
}

/// Applies a real-valued function of one argument.
fn real1(name: &str, x: impl Into<Operand>, f: impl Fn(f64) -> f64) -> Result<Operand> {
    let x = x.into();
    componentwise(name, &[&x], float_dtype(&[&x]), |c| {
        Ok(Scalar::Double(f(c[0].as_f64())))
    })
}

/// Applies a real-valued function of two arguments.
fn real2(
    name: &str,
    x: impl Into<Operand>,
    y: impl Into<Operand>,
    f: impl Fn(f64, f64) -> f64,
) -> Result<Operand> {
    let (x, y) = (x.into(), y.into());
    let args = [&x, &y];
    componentwise(name, &args, float_dtype(&args), |c| {
        Ok(Scalar::Double(f(c[0].as_f64(), c[1].as_f64())))
    })
}

/// Rounding functions leave integral dtypes untouched.
fn rounding(name: &str, x: impl Into<Operand>, f: impl Fn(f64) -> f64) -> Result<Operand> {
    let x = x.into();
    componentwise(name, &[&x], x.dtype(), |c| match c[0] {
        s @ (Scalar::Float(_) | Scalar::Double(_)) => Ok(Scalar::Double(f(s.as_f64()))),
        s => Ok(s),
    })
}

fn value<'a>(name: &str, x: &'a Operand) -> Result<&'a Value> {
    x.as_value()
        .ok_or_else(|| Error::undefined(name, &[x.type_name()]))
}

fn vector<'a>(name: &str, x: &'a Operand) -> Result<&'a Value> {
    match x {
        Operand::Value(v) if v.form() == MathForm::Vector => Ok(v),
        _ => Err(Error::undefined(name, &[x.type_name()])),
    }
}

fn pick(name: &str, x: impl Into<Operand>, y: impl Into<Operand>, op: CompareOp) -> Result<Operand> {
    let (x, y) = (x.into(), y.into());
    let args = [&x, &y];
    let dtype = max_dtype(&args);
    componentwise(name, &args, dtype, |c| {
        let (a, b) = (c[0].cast(dtype), c[1].cast(dtype));
        Ok(if b.compare(op, a) { b } else { a })
    })
}

// Common functions

pub fn abs(x: impl Into<Operand>) -> Result<Operand> {
    let x = x.into();
    componentwise("abs", &[&x], x.dtype(), |c| {
        Ok(match c[0] {
            Scalar::Int(i) => Scalar::Int(i.wrapping_abs()),
            Scalar::Float(f) => Scalar::Float(f.abs()),
            Scalar::Double(d) => Scalar::Double(d.abs()),
            s => s,
        })
    })
}

/// Returns -1, 0 or 1 depending on the sign of each component.
pub fn sign(x: impl Into<Operand>) -> Result<Operand> {
    let x = x.into();
    componentwise("sign", &[&x], x.dtype(), |c| {
        Ok(match c[0] {
            Scalar::Int(i) => Scalar::Int(i.signum()),
            Scalar::UInt(u) => Scalar::UInt(u.min(1)),
            Scalar::Float(f) if f == 0.0 => Scalar::Float(0.0),
            Scalar::Float(f) => Scalar::Float(f.signum()),
            Scalar::Double(d) if d == 0.0 => Scalar::Double(0.0),
            Scalar::Double(d) => Scalar::Double(d.signum()),
            s => s,
        })
    })
}

pub fn floor(x: impl Into<Operand>) -> Result<Operand> {
    rounding("floor", x, f64::floor)
}

pub fn ceil(x: impl Into<Operand>) -> Result<Operand> {
    rounding("ceil", x, f64::ceil)
}

pub fn trunc(x: impl Into<Operand>) -> Result<Operand> {
    rounding("trunc", x, f64::trunc)
}

/// Rounds half-way cases away from zero.
pub fn round(x: impl Into<Operand>) -> Result<Operand> {
    rounding("round", x, f64::round)
}

/// Rounds half-way cases to the nearest even integer.
pub fn round_even(x: impl Into<Operand>) -> Result<Operand> {
    rounding("round_even", x, f64::round_ties_even)
}

/// `x - floor(x)`; zero for integral dtypes.
pub fn fract(x: impl Into<Operand>) -> Result<Operand> {
    let x = x.into();
    componentwise("fract", &[&x], x.dtype(), |c| match c[0] {
        s @ (Scalar::Float(_) | Scalar::Double(_)) => {
            let v = s.as_f64();
            Ok(Scalar::Double(v - v.floor()))
        }
        s => Ok(s.dtype().zero()),
    })
}

/// `x - y * floor(x / y)`, which is the `%` operator.
pub fn modulo(x: impl Into<Operand>, y: impl Into<Operand>) -> Result<Operand> {
    x.into().binary(BinaryOp::Rem, &y.into())
}

pub fn min(x: impl Into<Operand>, y: impl Into<Operand>) -> Result<Operand> {
    pick("min", x, y, CompareOp::Lt)
}

pub fn max(x: impl Into<Operand>, y: impl Into<Operand>) -> Result<Operand> {
    pick("max", x, y, CompareOp::Gt)
}

/// `min(max(x, lo), hi)`.
pub fn clamp(
    x: impl Into<Operand>,
    lo: impl Into<Operand>,
    hi: impl Into<Operand>,
) -> Result<Operand> {
    let (x, lo, hi) = (x.into(), lo.into(), hi.into());
    let args = [&x, &lo, &hi];
    let dtype = max_dtype(&args);
    componentwise("clamp", &args, dtype, |c| {
        let [x, lo, hi] = [c[0], c[1], c[2]].map(|s| s.cast(dtype));
        let x = if x.compare(CompareOp::Lt, lo) { lo } else { x };
        Ok(if x.compare(CompareOp::Gt, hi) { hi } else { x })
    })
}

/// Linear interpolation `x * (1 - a) + y * a`.
///
/// If `a` is boolean, each component is selected from `y` where `a` is true and from `x`
/// otherwise.
pub fn mix(x: impl Into<Operand>, y: impl Into<Operand>, a: impl Into<Operand>) -> Result<Operand> {
    let (x, y, a) = (x.into(), y.into(), a.into());
    if a.dtype() == DType::Bool {
        let args = [&x, &y, &a];
        let dtype = max_dtype(&[&x, &y]);
        return componentwise("mix", &args, dtype, |c| {
            Ok(if c[2].as_bool() { c[1] } else { c[0] })
        });
    }

    let args = [&x, &y, &a];
    componentwise("mix", &args, float_dtype(&args), |c| {
        let [x, y, a] = [c[0], c[1], c[2]].map(Scalar::as_f64);
        Ok(Scalar::Double(x * (1.0 - a) + y * a))
    })
}

/// 0 where `x < edge`, 1 elsewhere.
pub fn step(edge: impl Into<Operand>, x: impl Into<Operand>) -> Result<Operand> {
    real2("step", edge, x, |edge, x| if x < edge { 0.0 } else { 1.0 })
}

/// Hermite interpolation between 0 and 1 as `x` moves from `edge0` to `edge1`.
pub fn smoothstep(
    edge0: impl Into<Operand>,
    edge1: impl Into<Operand>,
    x: impl Into<Operand>,
) -> Result<Operand> {
    let (e0, e1, x) = (edge0.into(), edge1.into(), x.into());
    let args = [&e0, &e1, &x];
    componentwise("smoothstep", &args, float_dtype(&args), |c| {
        let [e0, e1, x] = [c[0], c[1], c[2]].map(Scalar::as_f64);
        if x <= e0 {
            return Ok(Scalar::Double(0.0));
        }
        if x >= e1 {
            return Ok(Scalar::Double(1.0));
        }
        let t = (x - e0) / (e1 - e0);
        Ok(Scalar::Double(t * t * (3.0 - 2.0 * t)))
    })
}

// Exponential functions

pub fn sqrt(x: impl Into<Operand>) -> Result<Operand> {
    real1("sqrt", x, f64::sqrt)
}

pub fn inversesqrt(x: impl Into<Operand>) -> Result<Operand> {
    real1("inversesqrt", x, |x| x.sqrt().recip())
}

/// `x` raised to `y`, always computed in floating point.
pub fn pow(x: impl Into<Operand>, y: impl Into<Operand>) -> Result<Operand> {
    real2("pow", x, y, f64::powf)
}

pub fn exp(x: impl Into<Operand>) -> Result<Operand> {
    real1("exp", x, f64::exp)
}

pub fn exp2(x: impl Into<Operand>) -> Result<Operand> {
    real1("exp2", x, f64::exp2)
}

pub fn exp10(x: impl Into<Operand>) -> Result<Operand> {
    real1("exp10", x, |x| 10f64.powf(x))
}

pub fn log(x: impl Into<Operand>) -> Result<Operand> {
    real1("log", x, f64::ln)
}

pub fn log2(x: impl Into<Operand>) -> Result<Operand> {
    real1("log2", x, f64::log2)
}

pub fn log10(x: impl Into<Operand>) -> Result<Operand> {
    real1("log10", x, f64::log10)
}

// Trigonometry

pub fn radians(degrees: impl Into<Operand>) -> Result<Operand> {
    real1("radians", degrees, f64::to_radians)
}

pub fn degrees(radians: impl Into<Operand>) -> Result<Operand> {
    real1("degrees", radians, f64::to_degrees)
}

pub fn sin(x: impl Into<Operand>) -> Result<Operand> {
    real1("sin", x, f64::sin)
}

pub fn cos(x: impl Into<Operand>) -> Result<Operand> {
    real1("cos", x, f64::cos)
}

pub fn tan(x: impl Into<Operand>) -> Result<Operand> {
    real1("tan", x, f64::tan)
}

pub fn asin(x: impl Into<Operand>) -> Result<Operand> {
    real1("asin", x, f64::asin)
}

pub fn acos(x: impl Into<Operand>) -> Result<Operand> {
    real1("acos", x, f64::acos)
}

pub fn atan(x: impl Into<Operand>) -> Result<Operand> {
    real1("atan", x, f64::atan)
}

/// Two-argument arctangent of `y / x`, using the signs of both to pick the quadrant.
pub fn atan2(y: impl Into<Operand>, x: impl Into<Operand>) -> Result<Operand> {
    real2("atan2", y, x, f64::atan2)
}

pub fn sinh(x: impl Into<Operand>) -> Result<Operand> {
    real1("sinh", x, f64::sinh)
}

pub fn cosh(x: impl Into<Operand>) -> Result<Operand> {
    real1("cosh", x, f64::cosh)
}

pub fn tanh(x: impl Into<Operand>) -> Result<Operand> {
    real1("tanh", x, f64::tanh)
}

pub fn asinh(x: impl Into<Operand>) -> Result<Operand> {
    real1("asinh", x, f64::asinh)
}

pub fn acosh(x: impl Into<Operand>) -> Result<Operand> {
    real1("acosh", x, f64::acosh)
}

pub fn atanh(x: impl Into<Operand>) -> Result<Operand> {
    real1("atanh", x, f64::atanh)
}

// Geometric functions

/// Euclidean length; the absolute value for scalars.
pub fn length(x: impl Into<Operand>) -> Result<Scalar> {
    match x.into() {
        Operand::Scalar(s) => Ok(Scalar::Double(s.as_f64().abs()).cast(s.dtype().to_float())),
        Operand::Value(v) => v.length(),
    }
}

pub fn distance(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Scalar> {
    length(a.into().binary(BinaryOp::Sub, &b.into())?)
}

/// Dot product; the plain product for two scalars.
pub fn dot(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Scalar> {
    match (a.into(), b.into()) {
        (Operand::Scalar(a), Operand::Scalar(b)) => a.binary(BinaryOp::Mul, b),
        (Operand::Value(a), Operand::Value(b)) => a.dot(&b),
        (a, b) => Err(Error::undefined("dot", &[a.type_name(), b.type_name()])),
    }
}

pub fn cross(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Value> {
    let (a, b) = (a.into(), b.into());
    match (&a, &b) {
        (Operand::Value(a), Operand::Value(b)) => a.cross(b),
        _ => Err(Error::undefined("cross", &[a.type_name(), b.type_name()])),
    }
}

pub fn normalize(x: impl Into<Operand>) -> Result<Operand> {
    match x.into() {
        Operand::Scalar(s) => sign(Scalar::Double(s.as_f64()).cast(s.dtype().to_float())),
        Operand::Value(v) => v.normalize().map(Operand::Value),
    }
}

/// Collects two vectors of the same length as `f64` components, along with their float dtype.
fn real_vectors(name: &str, a: &Operand, b: &Operand) -> Result<(Vec<f64>, Vec<f64>, DType)> {
    let (va, vb) = (vector(name, a)?, vector(name, b)?);
    if va.shape() != vb.shape() {
        return Err(Error::undefined(name, &[va.type_name(), vb.type_name()]));
    }
    let dtype = va.dtype().max(vb.dtype()).to_float();
    let a = va.components().map(Scalar::as_f64).collect();
    let b = vb.components().map(Scalar::as_f64).collect();
    Ok((a, b, dtype))
}

fn real_vector(template: &Value, dtype: DType, data: impl IntoIterator<Item = f64>) -> Result<Value> {
    let ty = template.ty().with_dtype(dtype)?;
    Ok(Value::from_buffer(
        ty,
        data.into_iter().map(Scalar::Double).collect(),
    ))
}

/// Reflects the incident vector `i` about the surface normal `n`: `i - 2 * dot(n, i) * n`.
pub fn reflect(i: impl Into<Operand>, n: impl Into<Operand>) -> Result<Value> {
    let (i, n) = (i.into(), n.into());
    let (vi, vn, dtype) = real_vectors("reflect", &i, &n)?;
    let d: f64 = vi.iter().zip(&vn).map(|(a, b)| a * b).sum();
    let r = vi.iter().zip(&vn).map(|(i, n)| i - 2.0 * d * n);
    real_vector(vector("reflect", &i)?, dtype, r)
}

/// Refracts the incident vector `i` at a surface with normal `n` and ratio of indices of
/// refraction `eta`.
///
/// Returns a zero vector on total internal reflection.
pub fn refract(
    i: impl Into<Operand>,
    n: impl Into<Operand>,
    eta: impl Into<Scalar>,
) -> Result<Value> {
    let (i, n, eta) = (i.into(), n.into(), eta.into().as_f64());
    let (vi, vn, dtype) = real_vectors("refract", &i, &n)?;
    let d: f64 = vi.iter().zip(&vn).map(|(a, b)| a * b).sum();
    let k = 1.0 - eta * eta * (1.0 - d * d);
    let template = vector("refract", &i)?;
    if k < 0.0 {
        return real_vector(template, dtype, vi.iter().map(|_| 0.0));
    }
    let r = vi
        .iter()
        .zip(&vn)
        .map(|(i, n)| eta * i - (eta * d + k.sqrt()) * n);
    real_vector(template, dtype, r)
}

/// Returns `n` if `dot(nref, i) < 0`, and `-n` otherwise.
pub fn faceforward(
    n: impl Into<Operand>,
    i: impl Into<Operand>,
    nref: impl Into<Operand>,
) -> Result<Operand> {
    let n = n.into();
    let d = dot(nref, i)?;
    if d.is_negative() {
        Ok(n)
    } else {
        n.negate()
    }
}

// Matrix functions

pub fn transpose(m: impl Into<Operand>) -> Result<Value> {
    value("transpose", &m.into())?.transpose()
}

pub fn determinant(m: impl Into<Operand>) -> Result<Scalar> {
    value("determinant", &m.into())?.determinant()
}

pub fn trace(m: impl Into<Operand>) -> Result<Scalar> {
    value("trace", &m.into())?.trace()
}

/// Inverse of a square matrix or a quaternion.
pub fn inverse(m: impl Into<Operand>) -> Result<Value> {
    value("inverse", &m.into())?.inverse()
}

pub fn conjugate(q: impl Into<Operand>) -> Result<Value> {
    value("conjugate", &q.into())?.conjugate()
}

/// Multiplies two matrices component by component (as opposed to the matrix product `*`).
pub fn matrix_comp_mult(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Value> {
    let (a, b) = (a.into(), b.into());
    match (&a, &b) {
        (Operand::Value(ma), Operand::Value(mb))
            if ma.form() == MathForm::Matrix && ma.shape() == mb.shape() =>
        {
            elementwise(ma, BinaryOp::Mul, &b)
        }
        _ => Err(Error::undefined(
            "matrix_comp_mult",
            &[a.type_name(), b.type_name()],
        )),
    }
}

/// Treats `c` as a column vector and `r` as a row vector and computes their matrix product.
///
/// The result has `len(r)` columns and `len(c)` rows.
///
/// ```
/// # use glass_math::*;
/// let m = funcs::outer_product(ivec3(1, 2, 3), ivec2(1, 10)).unwrap();
/// assert_eq!(m.type_name(), "imat2x3");
/// assert_eq!(m.column(1).unwrap(), ivec3(10, 20, 30));
/// ```
pub fn outer_product(c: impl Into<Operand>, r: impl Into<Operand>) -> Result<Value> {
    let (c, r) = (c.into(), r.into());
    let (vc, vr) = (vector("outer_product", &c)?, vector("outer_product", &r)?);
    let (rows, cols) = (vc.len(), vr.len());
    let dtype = promote(BinaryOp::Mul, vc.dtype(), vr.dtype(), false);
    let ty = vc.ty().registry().get(dtype, Shape::Matrix { cols, rows })?;
    Value::try_from_fn(ty, |i| {
        vc.data[i % rows].binary(BinaryOp::Mul, vr.data[i / rows])
    })
}

// Vector relational functions

pub fn less_than(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    a.into().compare(CompareOp::Lt, &b.into())
}

pub fn less_than_equal(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    a.into().compare(CompareOp::Le, &b.into())
}

pub fn greater_than(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    a.into().compare(CompareOp::Gt, &b.into())
}

pub fn greater_than_equal(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    a.into().compare(CompareOp::Ge, &b.into())
}

/// Componentwise `==`; use the `==` operator to compare whole values.
pub fn equal(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    a.into().compare(CompareOp::Eq, &b.into())
}

pub fn not_equal(a: impl Into<Operand>, b: impl Into<Operand>) -> Result<Operand> {
    a.into().compare(CompareOp::Ne, &b.into())
}

/// Returns whether any component is true (non-zero).
pub fn any(x: impl Into<Operand>) -> bool {
    x.into().components().iter().any(|c| c.as_bool())
}

/// Returns whether all components are true (non-zero).
pub fn all(x: impl Into<Operand>) -> bool {
    x.into().components().iter().all(|c| c.as_bool())
}

/// Componentwise logical NOT, producing a boolean result.
pub fn not(x: impl Into<Operand>) -> Result<Operand> {
    let x = x.into();
    componentwise("not", &[&x], DType::Bool, |c| Ok(Scalar::Bool(!c[0].as_bool())))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::*;

    #[test]
    fn common() {
        assert_eq!(abs(ivec2(-3, 4)).unwrap(), ivec2(3, 4));
        assert_eq!(abs(-2.5).unwrap(), 2.5);
        assert_eq!(sign(vec3(-2.0, 0.0, 0.1)).unwrap(), vec3(-1.0, 0.0, 1.0));
        assert_eq!(sign(uvec2(0, 9)).unwrap(), uvec2(0, 1));
        assert_eq!(floor(vec2(-0.5, 1.5)).unwrap(), vec2(-1.0, 1.0));
        assert_eq!(ceil(vec2(-0.5, 1.5)).unwrap(), vec2(-0.0, 2.0));
        assert_eq!(trunc(dvec2(-1.7, 1.7)).unwrap(), dvec2(-1.0, 1.0));
        assert_eq!(round(vec2(0.5, -1.5)).unwrap(), vec2(1.0, -2.0));
        assert_eq!(round_even(vec2(0.5, 1.5)).unwrap(), vec2(0.0, 2.0));
        assert_eq!(floor(ivec2(3, -3)).unwrap(), ivec2(3, -3));
        assert_eq!(fract(vec2(1.25, -0.25)).unwrap(), vec2(0.25, 0.75));
        assert_eq!(fract(ivec2(5, 6)).unwrap(), ivec2(0, 0));
        assert_eq!(modulo(vec2(-1.0, 5.5), 2).unwrap(), vec2(1.0, 1.5));
    }

    #[test]
    fn min_max_clamp() {
        assert_eq!(min(ivec3(1, 5, 3), 2).unwrap(), ivec3(1, 2, 2));
        assert_eq!(max(2, ivec3(1, 5, 3)).unwrap(), ivec3(2, 5, 3));
        assert_eq!(max(vec2(1.0, 2.0), ivec2(2, 1)).unwrap(), vec2(2.0, 2.0));
        assert_eq!(min(3, 4.5).unwrap(), 3.0);
        assert_eq!(
            clamp(vec3(-1.0, 0.5, 2.0), vec3(0.0, 0.0, 0.0), 1).unwrap(),
            vec3(0.0, 0.5, 1.0)
        );
        assert!(min(vec2(1.0, 2.0), vec3(1.0, 2.0, 3.0)).is_err());
    }

    #[test]
    fn interpolation() {
        assert_eq!(mix(0, 10, 0.25).unwrap(), 2.5);
        assert_eq!(mix(0, 10, 0.25f32).unwrap(), 2.5f32);
        assert_eq!(
            mix(vec2(0.0, 0.0), vec2(2.0, 4.0), 0.5f32).unwrap(),
            vec2(1.0, 2.0)
        );
        assert_eq!(
            mix(ivec2(1, 2), ivec2(3, 4), bvec2(false, true)).unwrap(),
            ivec2(1, 4)
        );
        assert_eq!(step(0.5f32, vec3(0.0, 0.5, 1.0)).unwrap(), vec3(0.0, 1.0, 1.0));
        assert_eq!(step(0.5, vec2(0.0, 1.0)).unwrap(), dvec2(0.0, 1.0));
        assert_eq!(
            smoothstep(0, 1, vec3(-1.0, 0.5, 2.0)).unwrap(),
            vec3(0.0, 0.5, 1.0)
        );
    }

    #[test]
    fn smoothstep_with_equal_edges() {
        assert_eq!(smoothstep(1.0, 1.0, 1.0).unwrap(), 0.0);
        assert_eq!(smoothstep(1.0, 1.0, 0.5).unwrap(), 0.0);
        assert_eq!(smoothstep(1.0, 1.0, 2.0).unwrap(), 1.0);
        assert_eq!(
            smoothstep(2, 2, ivec3(1, 2, 3)).unwrap(),
            vec3(0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn transcendental_promotes() {
        assert_eq!(sqrt(ivec2(4, 9)).unwrap(), vec2(2.0, 3.0));
        assert_eq!(sqrt(dvec2(4.0, 9.0)).unwrap(), dvec2(2.0, 3.0));
        assert_eq!(sqrt(16).unwrap(), 4.0f32);
        assert_eq!(inversesqrt(4.0).unwrap(), 0.5);
        assert_eq!(pow(ivec2(2, 3), 2).unwrap(), vec2(4.0, 9.0));
        assert_eq!(exp2(uvec2(3, 0)).unwrap(), vec2(8.0, 1.0));
        assert_eq!(log2(8).unwrap(), 3.0f32);
        assert_approx_eq!(exp10(2.0).unwrap(), Operand::from(100.0)).abs(1e-9);
        assert_eq!(exp10(ivec2(0, 1)).unwrap(), vec2(1.0, 10.0));
        assert_eq!(exp10(dvec2(0.0, 3.0)).unwrap(), dvec2(1.0, 1000.0));
        assert_approx_eq!(log10(1000.0).unwrap(), Operand::from(3.0));
        assert_approx_eq!(exp(1.0).unwrap(), Operand::from(std::f64::consts::E));
        assert_approx_eq!(log(std::f64::consts::E).unwrap(), Operand::from(1.0));
    }

    #[test]
    fn trigonometry() {
        assert_approx_eq!(radians(180.0).unwrap(), Operand::from(PI));
        assert_approx_eq!(degrees(PI).unwrap(), Operand::from(180.0));
        let angles = dvec3(0.0, PI / 2.0, PI);
        assert_approx_eq!(sin(&angles).unwrap(), Operand::from(dvec3(0.0, 1.0, 0.0))).abs(1e-12);
        assert_approx_eq!(cos(&angles).unwrap(), Operand::from(dvec3(1.0, 0.0, -1.0))).abs(1e-12);
        assert_approx_eq!(tan(PI / 4.0).unwrap(), Operand::from(1.0)).abs(1e-12);
        assert_approx_eq!(asin(1.0).unwrap(), Operand::from(PI / 2.0));
        assert_approx_eq!(acos(1.0).unwrap(), Operand::from(0.0));
        assert_approx_eq!(atan(1.0).unwrap(), Operand::from(PI / 4.0));
        assert_approx_eq!(atan2(1.0, -1.0).unwrap(), Operand::from(3.0 * PI / 4.0));
        for x in [-0.5, 0.0, 0.25] {
            assert_approx_eq!(asinh(sinh(x).unwrap()).unwrap(), Operand::from(x)).abs(1e-12);
            assert_approx_eq!(atanh(tanh(x).unwrap()).unwrap(), Operand::from(x)).abs(1e-12);
        }
        assert_approx_eq!(acosh(cosh(2.0).unwrap()).unwrap(), Operand::from(2.0)).abs(1e-12);
    }

    #[test]
    fn geometric() {
        assert_eq!(length(vec2(3.0, 4.0)).unwrap(), Scalar::Float(5.0));
        assert_eq!(length(-2).unwrap(), Scalar::Float(2.0));
        assert_eq!(distance(ivec2(1, 1), ivec2(4, 5)).unwrap(), Scalar::Float(5.0));
        assert_eq!(dot(ivec2(1, 2), ivec2(3, 4)).unwrap(), Scalar::Int(11));
        assert_eq!(dot(2, 3.0).unwrap(), Scalar::Double(6.0));
        assert!(dot(2, ivec2(1, 2)).is_err());
        assert_eq!(
            cross(vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)).unwrap(),
            vec3(0.0, 0.0, 1.0)
        );
        assert_eq!(normalize(vec2(0.0, 5.0)).unwrap(), vec2(0.0, 1.0));
        assert_eq!(normalize(-3).unwrap(), -1.0f32);
    }

    #[test]
    fn reflect_refract() {
        let i = vec2(1.0, -1.0);
        let n = vec2(0.0, 1.0);
        assert_eq!(reflect(&i, &n).unwrap(), vec2(1.0, 1.0));

        // eta == 1 passes straight through.
        let straight = refract(&i, &n, 1.0f32).unwrap();
        assert_approx_eq!(straight, i.clone()).abs(1e-6);

        // Total internal reflection.
        let grazing = vec2(1.0, -0.1).normalize().unwrap();
        assert_eq!(refract(&grazing, &n, 1.5f32).unwrap(), vec2(0.0, 0.0));
        assert!(reflect(&i, vec3(0.0, 1.0, 0.0)).is_err());
    }

    #[test]
    fn faceforward_flips() {
        let n = vec3(0.0, 0.0, 1.0);
        let toward = vec3(0.0, 0.0, -1.0);
        assert_eq!(faceforward(&n, &toward, &n).unwrap(), n);
        assert_eq!(
            faceforward(&n, &n, &n).unwrap(),
            vec3(0.0, 0.0, -1.0)
        );
    }

    #[test]
    fn matrix_functions() {
        let m = mat2([1.0, 2.0], [3.0, 4.0]);
        assert_eq!(transpose(&m).unwrap(), mat2([1.0, 3.0], [2.0, 4.0]));
        assert_eq!(determinant(&m).unwrap(), Scalar::Float(-2.0));
        assert_eq!(trace(&m).unwrap(), Scalar::Float(5.0));
        assert_approx_eq!((&m * inverse(&m).unwrap()).unwrap(), construct!("mat2").unwrap()).abs(1e-6);
        assert_eq!(
            matrix_comp_mult(&m, &m).unwrap(),
            mat2([1.0, 4.0], [9.0, 16.0])
        );
        assert!(matrix_comp_mult(&m, vec2(1.0, 2.0)).is_err());
        assert_eq!(conjugate(quat(1.0, 1.0, 1.0, 1.0)).unwrap(), quat(1.0, -1.0, -1.0, -1.0));
        assert!(determinant(2.0).is_err());

        let outer = outer_product(vec2(1.0, 2.0), vec3(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(outer.type_name(), "mat3x2");
        assert_eq!(outer.column(2).unwrap(), vec2(3.0, 6.0));
    }

    #[test]
    fn relational() {
        let a = ivec3(1, 2, 3);
        let b = ivec3(3, 2, 1);
        assert_eq!(less_than(&a, &b).unwrap(), bvec3(true, false, false));
        assert_eq!(less_than_equal(&a, &b).unwrap(), bvec3(true, true, false));
        assert_eq!(greater_than(&a, &b).unwrap(), bvec3(false, false, true));
        assert_eq!(greater_than_equal(&a, &b).unwrap(), bvec3(false, true, true));
        assert_eq!(equal(&a, &b).unwrap(), bvec3(false, true, false));
        assert_eq!(not_equal(&a, &b).unwrap(), bvec3(true, false, true));

        assert!(any(bvec3(false, true, false)));
        assert!(!all(bvec3(false, true, false)));
        assert!(all(ivec2(1, -1)));
        assert_eq!(not(bvec2(true, false)).unwrap(), bvec2(false, true));
        assert_eq!(not(0).unwrap(), true);
    }

    #[test]
    fn boolean_results_of_quaternions() {
        let q = quat(1.0, 0.0, -2.0, 0.0);
        assert_eq!(not(&q).unwrap(), bvec4(false, true, false, true));
        assert_eq!(
            less_than(&q, 0.5).unwrap(),
            bvec4(false, true, true, true)
        );
        assert_eq!(sign(&q).unwrap(), quat(1.0, 0.0, -1.0, 0.0));
    }
}
