use crate::{
    dtype::{apply, promote},
    error::{Error, Result},
    ops::elementwise,
    registry::{MathForm, Shape},
    BinaryOp, Operand, Value,
};

/// Binary operators with a matrix on the left-hand side.
///
/// `*` with a vector or matrix operand is the linear-algebra product; all other supported
/// combinations operate component-wise.
pub(crate) fn binary(lhs: &Value, op: BinaryOp, rhs: &Operand) -> Result<Value> {
    let rhs_value = match rhs {
        Operand::Scalar(_) => return elementwise(lhs, op, rhs),
        Operand::Value(v) => v,
    };

    match (op, rhs_value.form()) {
        (BinaryOp::Mul, MathForm::Vector | MathForm::Matrix) => product(lhs, rhs_value),
        (BinaryOp::Add | BinaryOp::Sub, MathForm::Matrix) => elementwise(lhs, op, rhs),
        _ => Err(Error::operands(
            op.symbol(),
            lhs.type_name(),
            rhs_value.type_name(),
        )),
    }
}

/// Computes `lhs * rhs`, where `rhs` is a vector (treated as a column) or a matrix.
fn product(lhs: &Value, rhs: &Value) -> Result<Value> {
    let (cols, rows) = lhs.matrix_dims("*")?;
    let (rhs_cols, rhs_rows) = match rhs.shape() {
        Shape::Vector(n) => (1, n),
        Shape::Matrix { cols, rows } => (cols, rows),
        _ => return Err(Error::operands("*", lhs.type_name(), rhs.type_name())),
    };
    if cols != rhs_rows {
        return Err(Error::operands("*", lhs.type_name(), rhs.type_name()));
    }

    let dtype = promote(BinaryOp::Mul, lhs.dtype(), rhs.dtype(), false);
    let shape = match rhs.form() {
        MathForm::Vector => Shape::Vector(rows),
        _ => Shape::Matrix {
            cols: rhs_cols,
            rows,
        },
    };
    let ty = lhs.ty.registry().get(dtype, shape)?;

    Value::try_from_fn(ty, |idx| {
        let (j, i) = (idx / rows, idx % rows);
        (0..cols).try_fold(dtype.zero(), |acc, k| {
            let a = lhs.data[k * rows + i];
            let b = rhs.data[j * rhs_rows + k];
            apply(BinaryOp::Add, acc, apply(BinaryOp::Mul, a, b, dtype)?, dtype)
        })
    })
}
