use crate::{
    dtype::promote,
    error::{Error, Result},
    ops::elementwise,
    registry::{MathForm, Shape},
    BinaryOp, Operand, Scalar, Value,
};

/// Binary operators with a quaternion on the left-hand side.
pub(crate) fn binary(lhs: &Value, op: BinaryOp, rhs: &Operand) -> Result<Value> {
    let rhs_value = match rhs {
        Operand::Scalar(_) => return elementwise(lhs, op, rhs),
        Operand::Value(v) => v,
    };

    match (op, rhs_value.form(), rhs_value.shape()) {
        (BinaryOp::Mul, MathForm::Quaternion, _) => hamilton(lhs, rhs_value),
        (BinaryOp::Mul, MathForm::Vector, Shape::Vector(3)) => rotate(lhs, rhs_value),
        (BinaryOp::Add | BinaryOp::Sub, MathForm::Quaternion, _) => elementwise(lhs, op, rhs),
        _ => Err(Error::operands(
            op.symbol(),
            lhs.type_name(),
            rhs_value.type_name(),
        )),
    }
}

fn wxyz(q: &Value) -> [f64; 4] {
    std::array::from_fn(|i| q.data[i].as_f64())
}

#[rustfmt::skip]
fn product([w1, x1, y1, z1]: [f64; 4], [w2, x2, y2, z2]: [f64; 4]) -> [f64; 4] {
    [
        w1 * w2 - x1 * x2 - y1 * y2 - z1 * z2,
        w1 * x2 + x1 * w2 + y1 * z2 - z1 * y2,
        w1 * y2 + y1 * w2 + z1 * x2 - x1 * z2,
        w1 * z2 + z1 * w2 + x1 * y2 - y1 * x2,
    ]
}

fn hamilton(lhs: &Value, rhs: &Value) -> Result<Value> {
    let dtype = promote(BinaryOp::Mul, lhs.dtype(), rhs.dtype(), false);
    let ty = lhs.ty.with_dtype(dtype)?;
    let q = product(wxyz(lhs), wxyz(rhs));
    Ok(Value::from_buffer(ty, q.into_iter().map(Scalar::Double).collect()))
}

/// Rotates a `vec3` by computing `q * (0, v) * conjugate(q) / |q|²`.
fn rotate(q: &Value, v: &Value) -> Result<Value> {
    let dtype = promote(BinaryOp::Mul, q.dtype(), v.dtype(), false);
    let ty = v.ty.registry().vector(dtype, 3)?;

    let q = wxyz(q);
    let [w, x, y, z] = q;
    let length2 = w * w + x * x + y * y + z * z;
    let pure = [0.0, v.data[0].as_f64(), v.data[1].as_f64(), v.data[2].as_f64()];
    let [_, rx, ry, rz] = product(product(q, pure), [w, -x, -y, -z]);

    Ok(Value::from_buffer(
        ty,
        [rx, ry, rz]
            .into_iter()
            .map(|c| Scalar::Double(c / length2))
            .collect(),
    ))
}
