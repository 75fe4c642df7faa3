use std::fmt;

use crate::{
    error::{Error, Result},
    value::setter_indices,
    BinaryOp, Operand, Scalar, Value,
};

/// A mutable view of one column of a matrix.
///
/// Reading through the view sees the current matrix components, and every write goes straight into
/// the matrix and notifies the matrix's observer. This is what makes `m[1].x = 5` style assignment
/// possible.
///
/// Created by [`Value::column_mut`].
pub struct ColumnMut<'a> {
    matrix: &'a mut Value,
    col: usize,
    rows: usize,
}

impl<'a> ColumnMut<'a> {
    pub(crate) fn new(matrix: &'a mut Value, col: usize, rows: usize) -> Self {
        Self { matrix, col, rows }
    }

    /// Returns the index of the viewed column.
    pub fn index(&self) -> usize {
        self.col
    }

    /// Returns the number of rows, which is the number of components in the column.
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    fn offset(&self) -> usize {
        self.col * self.rows
    }

    /// Reads the component in `row`.
    pub fn get(&self, row: usize) -> Result<Scalar> {
        if row >= self.rows {
            return Err(Error::out_of_range(self.matrix.type_name(), self.offset() + row));
        }
        Ok(self.matrix.data[self.offset() + row])
    }

    /// Overwrites the component in `row`.
    pub fn set(&mut self, row: usize, value: impl Into<Scalar>) -> Result<()> {
        if row >= self.rows {
            return Err(Error::out_of_range(self.matrix.type_name(), self.offset() + row));
        }
        self.matrix.set_component(self.offset() + row, value)
    }

    /// Copies the column into a standalone vector.
    pub fn to_value(&self) -> Value {
        match self.matrix.column(self.col) {
            Ok(column) => column,
            // `col` was bounds-checked when the view was created.
            Err(e) => unreachable!("{e}"),
        }
    }

    /// Reads a swizzle of the column.
    pub fn attr(&self, name: &str) -> Result<Operand> {
        self.to_value().attr(name)
    }

    /// Writes a swizzle of the column into the matrix.
    pub fn set_attr(&mut self, name: &str, value: impl Into<Operand>) -> Result<()> {
        let column_ty = self.to_value().ty();
        let offset = self.offset();
        let indices = setter_indices(column_ty, name)?
            .into_iter()
            .map(|i| offset + i)
            .collect::<Vec<_>>();
        self.matrix.scatter(name, &indices, &value.into())
    }

    /// Replaces the whole column with a scalar or a vector of matching length.
    pub fn assign(&mut self, value: impl Into<Operand>) -> Result<()> {
        let indices = (self.offset()..self.offset() + self.rows).collect::<Vec<_>>();
        let name = format!("[{}]", self.col);
        self.matrix.scatter(&name, &indices, &value.into())
    }

    /// Computes `column op= rhs` and writes the result back into the matrix.
    ///
    /// ```
    /// # use glass_math::*;
    /// let mut m = construct!("imat2").unwrap();
    /// m.column_mut(0).unwrap().compound(BinaryOp::Mul, 3).unwrap();
    /// assert_eq!(m.column(0).unwrap(), ivec2(3, 0));
    /// ```
    pub fn compound(&mut self, op: BinaryOp, rhs: impl Into<Operand>) -> Result<()> {
        let mut column = self.to_value();
        column.compound(op, rhs)?;
        self.assign(column)
    }
}

impl fmt::Display for ColumnMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_value(), f)
    }
}

impl fmt::Debug for ColumnMut<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnMut")
            .field("col", &self.col)
            .field("value", &self.to_value())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use crate::*;

    fn counted(m: &mut Value) -> Arc<AtomicUsize> {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        m.set_observer(move |_| {
            c.fetch_add(1, Ordering::Relaxed);
        });
        count
    }

    #[test]
    fn swizzle_write_through() {
        let mut m = construct!("mat3").unwrap();
        let count = counted(&mut m);

        m.column_mut(1).unwrap().set_attr("x", 5).unwrap();
        assert_eq!(m[(1, 0)], Scalar::Float(5.0));
        assert_eq!(count.load(Ordering::Relaxed), 1);

        m.column_mut(2).unwrap().set_attr("zy", vec2(7.0, 8.0)).unwrap();
        assert_eq!(m.column(2).unwrap(), vec3(0.0, 8.0, 7.0));
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn errors_leave_matrix_untouched() {
        let mut m = construct!("mat2").unwrap();
        let count = counted(&mut m);
        let before = m.clone();

        let mut col = m.column_mut(0).unwrap();
        assert_eq!(col.set_attr("xx", 1), Err(Error::read_only("vec2", "xx")));
        assert_eq!(col.set_attr("z", 1), Err(Error::unknown_attribute("vec2", "z")));
        assert!(col.set_attr("xy", vec3(1.0, 2.0, 3.0)).is_err());
        assert!(col.set(2, 1).is_err());
        assert!(col.assign(vec3(1.0, 2.0, 3.0)).is_err());

        assert_eq!(m, before);
        assert_eq!(count.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn read() {
        let mut m = mat2([1.0, 2.0], [3.0, 4.0]);
        let col = m.column_mut(1).unwrap();
        assert_eq!(col.index(), 1);
        assert_eq!(col.len(), 2);
        assert_eq!(col.get(1).unwrap(), Scalar::Float(4.0));
        assert_eq!(col.attr("yx").unwrap(), vec2(4.0, 3.0));
        assert_eq!(col.to_string(), "vec2(3, 4)");
    }

    #[test]
    fn assign_and_compound() {
        let mut m = construct!("mat2").unwrap();
        let count = counted(&mut m);

        m.set(0, vec2(2.0, 3.0)).unwrap();
        m.column_mut(1).unwrap().assign(9).unwrap();
        assert_eq!(m, mat2([2.0, 3.0], [9.0, 9.0]));

        m.column_mut(0).unwrap().compound(BinaryOp::Add, vec2(1.0, 1.0)).unwrap();
        assert_eq!(m.column(0).unwrap(), vec2(3.0, 4.0));
        assert_eq!(count.load(Ordering::Relaxed), 3);
    }
}
