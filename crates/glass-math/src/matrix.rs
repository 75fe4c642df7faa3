//! Column-major matrices.
//!
//! A matrix with `C` columns and `R` rows stores its components column by column: flat index
//! `c * R + r` holds the component in column `c`, row `r`. Indexing a matrix with a single index
//! addresses a *column*, which is why [`Value::len`] of a matrix is its column count.

use tinyvec::ArrayVec;

use crate::{
    dtype::apply,
    error::{Error, Result},
    quat,
    registry::{builtin, ConcreteType, MathForm, Shape},
    value::Buffer,
    BinaryOp, DType, Operand, Scalar, Value,
};

mod ops;
mod view;

pub(crate) use ops::binary;
pub use view::ColumnMut;

/// Scratch space for determinant and inverse computations.
type Scratch = ArrayVec<[f64; 16]>;

/// Builds a matrix of type `ty` from constructor arguments.
///
/// The argument count is checked first:
///
/// 1. No arguments: the identity matrix (ones on the `min(cols, rows)` main diagonal).
/// 2. A single scalar: placed on the diagonal, all other components are zero.
/// 3. A single matrix of any shape: the overlapping top-left rectangle is copied over the identity
///    matrix.
/// 4. Anything else: the components of all scalar and vector arguments are written column by
///    column, and must fill the matrix exactly.
pub(crate) fn construct(ty: &'static ConcreteType, args: &[Operand]) -> Result<Value> {
    let Shape::Matrix { cols, rows } = ty.shape() else {
        return Err(Error::Configuration {
            dtype: ty.dtype(),
            shape: ty.shape(),
        });
    };

    let mut m = identity(ty, cols, rows);
    match args {
        [] => return Ok(m),
        [Operand::Scalar(s)] => {
            let s = s.cast(ty.dtype());
            for i in 0..cols.min(rows) {
                m.data[i * rows + i] = s;
            }
            return Ok(m);
        }
        [Operand::Value(src)] if src.form() == MathForm::Matrix => {
            let (src_cols, src_rows) = src.matrix_dims("mat")?;
            for c in 0..cols.min(src_cols) {
                for r in 0..rows.min(src_rows) {
                    m.data[c * rows + r] = src.data[c * src_rows + r].cast(ty.dtype());
                }
            }
            return Ok(m);
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
    if total != cols * rows {
        return Err(Error::arity(
            ty.name(),
            format!("expected {} components, got {total}", cols * rows),
        ));
    }

    let mut data = Buffer::new();
    for arg in args {
        data.extend_from_slice(arg.components());
    }
    Ok(Value::from_buffer(ty, data))
}

fn identity(ty: &'static ConcreteType, cols: usize, rows: usize) -> Value {
    let mut m = Value::zeroed(ty);
    for i in 0..cols.min(rows) {
        m.data[i * rows + i] = ty.dtype().one();
    }
    m
}

impl Value {
    /// Returns `(cols, rows)`, or an error naming `func` if `self` is not a matrix.
    pub(crate) fn matrix_dims(&self, func: &str) -> Result<(usize, usize)> {
        match self.shape() {
            Shape::Matrix { cols, rows } => Ok((cols, rows)),
            _ => Err(Error::undefined(func, &[self.type_name()])),
        }
    }

    fn square_dim(&self, func: &str) -> Result<usize> {
        match self.matrix_dims(func)? {
            (cols, rows) if cols == rows => Ok(cols),
            _ => Err(Error::undefined(func, &[self.type_name()])),
        }
    }

    /// Creates a matrix from a list of row vectors.
    ///
    /// All rows must be vectors of the same length. The matrix dtype is the highest-ranked dtype
    /// among the rows.
    ///
    /// ```
    /// # use glass_math::*;
    /// let m = Value::from_rows(&[ivec3(1, 2, 3), ivec3(4, 5, 6)]).unwrap();
    /// assert_eq!(m.type_name(), "imat3x2");
    /// assert_eq!(m[(2, 0)], Scalar::Int(3));
    /// assert_eq!(m.column(0).unwrap(), ivec2(1, 4));
    /// ```
    pub fn from_rows(rows: &[Value]) -> Result<Value> {
        let Some(first) = rows.first() else {
            return Err(Error::arity("from_rows", "no rows given"));
        };
        let cols = first.len();
        if let Some(row) = rows
            .iter()
            .find(|row| row.form() != MathForm::Vector || row.len() != cols)
        {
            return Err(Error::arity(
                "from_rows",
                format!("'{}' does not match row type '{}'", row.type_name(), first.type_name()),
            ));
        }

        let dtype = rows.iter().map(Value::dtype).max().unwrap_or(DType::Float);
        let ty = first.ty.registry().matrix(dtype, cols, rows.len())?;
        Value::try_from_fn(ty, |i| Ok(rows[i % rows.len()].data[i / rows.len()]))
    }

    /// Returns a copy of column `index`.
    pub fn column(&self, index: usize) -> Result<Value> {
        let (cols, rows) = self.matrix_dims("column")?;
        if index >= cols {
            return Err(Error::out_of_range(self.type_name(), index));
        }
        let ty = self.ty.registry().vector(self.dtype(), rows)?;
        let data = self.data[index * rows..(index + 1) * rows].iter().copied().collect();
        Ok(Value::from_buffer(ty, data))
    }

    /// Returns a write-through view of column `index`.
    ///
    /// ```
    /// # use glass_math::*;
    /// let mut m = construct!("mat2").unwrap();
    /// m.column_mut(1).unwrap().set_attr("x", 5.0).unwrap();
    /// assert_eq!(m[(1, 0)], Scalar::Float(5.0));
    /// ```
    pub fn column_mut(&mut self, index: usize) -> Result<ColumnMut<'_>> {
        let (cols, rows) = self.matrix_dims("column_mut")?;
        if index >= cols {
            return Err(Error::out_of_range(self.type_name(), index));
        }
        Ok(ColumnMut::new(self, index, rows))
    }

    /// Returns the component in column `col`, row `row`.
    pub fn get_at(&self, col: usize, row: usize) -> Result<Scalar> {
        let (cols, rows) = self.matrix_dims("get_at")?;
        if col >= cols || row >= rows {
            return Err(Error::out_of_range(self.type_name(), col * rows + row));
        }
        Ok(self.data[col * rows + row])
    }

    /// Overwrites the component in column `col`, row `row` and notifies the observer.
    pub fn set_at(&mut self, col: usize, row: usize, value: impl Into<Scalar>) -> Result<()> {
        let (cols, rows) = self.matrix_dims("set_at")?;
        if col >= cols || row >= rows {
            return Err(Error::out_of_range(self.type_name(), col * rows + row));
        }
        self.set_component(col * rows + row, value)
    }

    /// Returns the transpose of a matrix.
    pub fn transpose(&self) -> Result<Value> {
        let (cols, rows) = self.matrix_dims("transpose")?;
        let ty = self.ty.registry().matrix(self.dtype(), rows, cols)?;
        // Column `c` of the result is row `c` of `self`.
        Value::try_from_fn(ty, |i| Ok(self.data[(i % cols) * rows + i / cols]))
    }

    /// Computes the determinant of a square matrix.
    ///
    /// `float` and `double` matrices produce a result of their own dtype, all others an `int`.
    pub fn determinant(&self) -> Result<Scalar> {
        let n = self.square_dim("determinant")?;
        let det = determinant(&self.to_f64(), n);
        let dtype = match self.dtype() {
            dtype @ (DType::Float | DType::Double) => dtype,
            _ => DType::Int,
        };
        Ok(Scalar::Double(det).cast(dtype))
    }

    /// Inverts a square matrix or a quaternion.
    ///
    /// Inverted matrices are `double` if `self` is, and `float` otherwise. Quaternions are inverted
    /// by dividing their conjugate by their squared length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Singular`] if the determinant of the matrix is zero.
    pub fn inverse(&self) -> Result<Value> {
        if self.form() == MathForm::Quaternion {
            return quat::inverse(self);
        }

        let n = self.square_dim("inverse")?;
        let m = self.to_f64();
        let det = determinant(&m, n);
        if det == 0.0 {
            return Err(Error::Singular);
        }

        let ty = self.ty.with_dtype(self.dtype().to_float())?;
        Value::try_from_fn(ty, |i| {
            let (col, row) = (i / n, i % n);
            let sign = if (col + row) % 2 == 0 { 1.0 } else { -1.0 };
            let cofactor = sign * determinant(&minor(&m, n, row, col), n - 1);
            Ok(Scalar::Double(cofactor / det))
        })
    }

    /// Sums the main diagonal of a square matrix.
    pub fn trace(&self) -> Result<Scalar> {
        let n = self.square_dim("trace")?;
        let dtype = self.dtype().max(DType::Int);
        (0..n).try_fold(dtype.zero(), |acc, i| {
            apply(BinaryOp::Add, acc, self.data[i * n + i], dtype)
        })
    }

    fn to_f64(&self) -> Scratch {
        self.components().map(Scalar::as_f64).collect()
    }
}

/// Removes column `col` and row `row` from the `n`x`n` column-major matrix `m`.
fn minor(m: &[f64], n: usize, col: usize, row: usize) -> Scratch {
    (0..n)
        .filter(|&c| c != col)
        .flat_map(|c| {
            (0..n)
                .filter(move |&r| r != row)
                .map(move |r| m[c * n + r])
        })
        .collect()
}

/// Laplace expansion along the first column.
fn determinant(m: &[f64], n: usize) -> f64 {
    match n {
        0 => 1.0,
        1 => m[0],
        2 => m[0] * m[3] - m[2] * m[1],
        _ => (0..n)
            .map(|row| {
                let sign = if row % 2 == 0 { 1.0 } else { -1.0 };
                sign * m[row] * determinant(&minor(m, n, 0, row), n - 1)
            })
            .sum(),
    }
}

fn typed<const C: usize, const R: usize>(columns: [[f32; R]; C]) -> Value {
    let ty = builtin(DType::Float, Shape::Matrix { cols: C, rows: R });
    let data = columns.iter().flatten().map(|&c| Scalar::Float(c)).collect();
    Value::from_buffer(ty, data)
}

/// Creates a `mat2x2` from its columns.
pub fn mat2(c0: [f32; 2], c1: [f32; 2]) -> Value {
    typed([c0, c1])
}

/// Creates a `mat3x3` from its columns.
pub fn mat3(c0: [f32; 3], c1: [f32; 3], c2: [f32; 3]) -> Value {
    typed([c0, c1, c2])
}

/// Creates a `mat4x4` from its columns.
pub fn mat4(c0: [f32; 4], c1: [f32; 4], c2: [f32; 4], c3: [f32; 4]) -> Value {
    typed([c0, c1, c2, c3])
}

#[cfg(test)]
mod tests {
    use crate::*;

    #[test]
    fn identity() {
        let m = construct!("mat3").unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_eq!(m[(i, j)], Scalar::Float(expected));
            }
        }
    }

    #[test]
    fn rectangular_identity() {
        let m = construct!("imat3x2").unwrap();
        assert_eq!(m.column(0).unwrap(), ivec2(1, 0));
        assert_eq!(m.column(1).unwrap(), ivec2(0, 1));
        assert_eq!(m.column(2).unwrap(), ivec2(0, 0));
    }

    #[test]
    fn diagonal() {
        let m = construct!("dmat2x3", 2).unwrap();
        assert_eq!(m.column(0).unwrap(), dvec3(2.0, 0.0, 0.0));
        assert_eq!(m.column(1).unwrap(), dvec3(0.0, 2.0, 0.0));
    }

    #[test]
    fn resize() {
        let big = mat3([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
        let small = construct!("mat2", &big).unwrap();
        assert_eq!(small, mat2([1.0, 2.0], [4.0, 5.0]));

        let grown = construct!("mat4", &small).unwrap();
        assert_eq!(grown.column(1).unwrap(), vec4(4.0, 5.0, 0.0, 0.0));
        assert_eq!(grown.column(3).unwrap(), vec4(0.0, 0.0, 0.0, 1.0));

        let cast = construct!("imat3", &big).unwrap();
        assert_eq!(cast.column(2).unwrap(), ivec3(7, 8, 9));
    }

    #[test]
    fn flatten() {
        let m = construct!("mat2", vec2(1.0, 2.0), 3, 4).unwrap();
        assert_eq!(m, mat2([1.0, 2.0], [3.0, 4.0]));
        let m = construct!("mat2", vec4(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(m, mat2([1.0, 2.0], [3.0, 4.0]));

        assert!(matches!(
            construct!("mat2", 1, 2, 3),
            Err(Error::Arity { .. })
        ));
        assert!(matches!(
            construct!("mat2", vec3(1.0, 2.0, 3.0)),
            Err(Error::Arity { .. })
        ));
        assert!(matches!(
            construct!("mat2", quat(1.0, 0.0, 0.0, 0.0)),
            Err(Error::Arity { .. })
        ));
    }

    #[test]
    fn indexing() {
        let mut m = mat2([1.0, 2.0], [3.0, 4.0]);
        assert_eq!(m.get(1).unwrap(), vec2(3.0, 4.0));
        assert_eq!(m.get_at(1, 0).unwrap(), Scalar::Float(3.0));
        m.set_at(0, 1, 7).unwrap();
        assert_eq!(m[(0, 1)], Scalar::Float(7.0));
        m.set(1, vec2(8.0, 9.0)).unwrap();
        assert_eq!(m, mat2([1.0, 7.0], [8.0, 9.0]));

        assert!(matches!(m.column(2), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(m.get_at(0, 2), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(
            m.set(0, vec3(0.0, 0.0, 0.0)),
            Err(Error::TypeMismatch(_))
        ));
    }

    #[test]
    fn matrix_attributes_are_unknown() {
        let m = construct!("mat2").unwrap();
        assert_eq!(m.attr("xy"), Err(Error::unknown_attribute("mat2x2", "xy")));
    }

    #[test]
    fn transpose() {
        let m = Value::from_rows(&[vec3(1.0, 2.0, 3.0), vec3(4.0, 5.0, 6.0)]).unwrap();
        let t = m.transpose().unwrap();
        assert_eq!(t.type_name(), "mat2x3");
        assert_eq!(t, construct!("mat2x3", vec3(1.0, 2.0, 3.0), vec3(4.0, 5.0, 6.0)).unwrap());
        assert_eq!(t.transpose().unwrap(), m);
    }

    #[test]
    fn determinant() {
        assert_eq!(
            mat2([1.0, 3.0], [2.0, 4.0]).determinant().unwrap(),
            Scalar::Float(-2.0)
        );
        let m = construct!("imat3", ivec3(2, 0, 1), ivec3(1, 3, 2), ivec3(1, 1, 2)).unwrap();
        assert_eq!(m.determinant().unwrap(), Scalar::Int(6));
        let m = construct!("dmat4", 2).unwrap();
        assert_eq!(m.determinant().unwrap(), Scalar::Double(16.0));
        assert!(construct!("mat2x3").unwrap().determinant().is_err());
    }

    #[test]
    fn inverse() {
        let m = mat2([4.0, 2.0], [7.0, 6.0]);
        let inv = m.inverse().unwrap();
        let id = (&m * &inv).unwrap();
        assert_approx_eq!(id, construct!("mat2").unwrap()).abs(1e-6);

        let m = construct!(
            "imat4",
            ivec4(1, 0, 2, 0),
            ivec4(0, 1, 0, 3),
            ivec4(0, 0, 1, 0),
            ivec4(4, 0, 0, 1)
        )
        .unwrap();
        let inv = m.inverse().unwrap();
        assert_eq!(inv.type_name(), "mat4x4");
        let id = (&m * &inv).unwrap();
        assert_approx_eq!(id, construct!("mat4").unwrap()).abs(1e-5);

        assert_eq!(
            mat2([1.0, 2.0], [2.0, 4.0]).inverse(),
            Err(Error::Singular)
        );
    }

    #[test]
    fn trace() {
        let m = mat3([1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [5.0, 0.0, 3.0]);
        assert_eq!(m.trace().unwrap(), Scalar::Float(6.0));
        assert_eq!(construct!("umat4").unwrap().trace().unwrap(), Scalar::UInt(4));
    }
}
