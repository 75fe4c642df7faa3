//! The runtime value type shared by vectors, matrices and quaternions.

use std::{
    fmt,
    ops::{Bound, Index, Range, RangeBounds},
    slice,
};

use itertools::Itertools;
use tinyvec::ArrayVec;

use crate::{
    error::{Error, Result},
    matrix,
    ops::CompareOp,
    quat,
    registry::{ConcreteType, MathForm, Resolved, Shape, TypeRegistry},
    swizzle::MAX_SWIZZLE_LEN,
    traits::Component,
    vector, DType, Scalar,
};

/// Component storage; large enough for a 4x4 matrix.
pub(crate) type Buffer = ArrayVec<[Scalar; 16]>;

/// Change-notification callback invoked after a value has been mutated in place.
pub type Observer = Box<dyn FnMut(&Value) + Send>;

/// A vector, matrix or quaternion.
///
/// A value owns a fixed-size buffer of components of a single dtype, laid out in column-major
/// order for matrices and as `(w, x, y, z)` for quaternions. Its [`ConcreteType`] never changes
/// after construction: in-place operations cast their results back to the value's own dtype.
///
/// # Observers
///
/// A single callback can be registered with [`Value::set_observer`]. It is called synchronously,
/// exactly once, after every successful mutating operation (component and swizzle setters,
/// compound assignment, writes through a [`ColumnMut`][crate::ColumnMut]). The observer only gets
/// shared access to the value, so it cannot mutate it. Observers are not cloned along with the
/// value.
pub struct Value {
    pub(crate) ty: &'static ConcreteType,
    pub(crate) data: Buffer,
    observer: Option<Observer>,
}

impl Value {
    /// Constructs a value of type `ty` from a list of arguments.
    ///
    /// The accepted argument lists depend on the math form of `ty`:
    ///
    /// - vectors: nothing (all zero), a single scalar (broadcast), a single vector at least as long
    ///   as `ty` (truncated), or any list of scalars and vectors with exactly as many components as
    ///   `ty`.
    /// - matrices: nothing (identity), a single scalar (placed on the diagonal), a single matrix of
    ///   any shape (copied over an identity matrix), or a list of scalars and vectors filling the
    ///   matrix column by column.
    /// - quaternions: nothing (identity), a single quaternion, a scalar `w` and a 3-vector, or four
    ///   scalars `w, x, y, z`.
    ///
    /// Components are converted to the dtype of `ty` with [`Scalar::cast`].
    pub fn new(ty: &'static ConcreteType, args: &[Operand]) -> Result<Self> {
        match ty.form() {
            MathForm::Vector => vector::construct(ty, args),
            MathForm::Matrix => matrix::construct(ty, args),
            MathForm::Quaternion => quat::construct(ty, args),
            MathForm::Scalar => Err(Error::Configuration {
                dtype: ty.dtype(),
                shape: ty.shape(),
            }),
        }
    }

    /// Constructs a value from the canonical name of its type, using the global registry.
    ///
    /// This is what the [`construct!`][crate::construct] macro expands to.
    pub fn from_name(name: &str, args: &[Operand]) -> Result<Self> {
        match TypeRegistry::global().lookup(name)? {
            Resolved::Type(ty) => Self::new(ty, args),
            Resolved::Scalar(dtype) => Err(Error::Configuration {
                dtype,
                shape: Shape::Scalar,
            }),
        }
    }

    /// Creates a vector from a slice of components.
    ///
    /// ```
    /// # use glass_math::*;
    /// let v = Value::from_slice(&[1, 2, 3]).unwrap();
    /// assert_eq!(v.type_name(), "ivec3");
    /// ```
    pub fn from_slice<T: Component>(components: &[T]) -> Result<Self> {
        let ty = TypeRegistry::global().vector(T::DTYPE, components.len())?;
        Ok(Self::from_buffer(
            ty,
            components.iter().map(|&c| c.into()).collect(),
        ))
    }

    /// Creates a value whose components are all zero.
    pub fn zeroed(ty: &'static ConcreteType) -> Self {
        let zero = ty.dtype().zero();
        Self::from_buffer(ty, (0..ty.shape().product()).map(|_| zero).collect())
    }

    /// Wraps `data`, casting every component to the dtype of `ty`.
    pub(crate) fn from_buffer(ty: &'static ConcreteType, mut data: Buffer) -> Self {
        debug_assert_eq!(data.len(), ty.shape().product());
        let dtype = ty.dtype();
        for c in &mut data {
            *c = c.cast(dtype);
        }
        Self {
            ty,
            data,
            observer: None,
        }
    }

    /// Builds a value of type `ty` by computing each component from its flat index.
    pub(crate) fn try_from_fn(
        ty: &'static ConcreteType,
        f: impl FnMut(usize) -> Result<Scalar>,
    ) -> Result<Self> {
        let data = (0..ty.shape().product()).map(f).collect::<Result<Buffer>>()?;
        Ok(Self::from_buffer(ty, data))
    }

    #[inline]
    pub fn ty(&self) -> &'static ConcreteType {
        self.ty
    }

    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.ty.name()
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.ty.dtype()
    }

    #[inline]
    pub fn form(&self) -> MathForm {
        self.ty.form()
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.ty.shape()
    }

    /// Returns the number of elements produced by [`Value::iter`].
    ///
    /// This is the number of components for vectors and quaternions, and the number of columns for
    /// matrices.
    pub fn len(&self) -> usize {
        match self.shape() {
            Shape::Matrix { cols, .. } => cols,
            shape => shape.product(),
        }
    }

    /// Always `false`; values have at least 2 components.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the total number of components.
    #[inline]
    pub fn component_count(&self) -> usize {
        self.data.len()
    }

    /// Returns the components in storage order.
    #[inline]
    pub fn as_slice(&self) -> &[Scalar] {
        &self.data
    }

    /// Returns an iterator over all components in storage order (column-major for matrices).
    pub fn components(&self) -> impl ExactSizeIterator<Item = Scalar> + '_ {
        self.data.iter().copied()
    }

    /// Returns an iterator over the components of a vector or quaternion, or over the columns of a
    /// matrix.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            value: self,
            index: 0,
        }
    }

    /// Returns the component at flat index `index`.
    pub fn component(&self, index: usize) -> Result<Scalar> {
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| Error::out_of_range(self.type_name(), index))
    }

    /// Overwrites the component at flat index `index` and notifies the observer.
    pub fn set_component(&mut self, index: usize, value: impl Into<Scalar>) -> Result<()> {
        let dtype = self.dtype();
        let slot = self
            .data
            .get_mut(index)
            .ok_or_else(|| Error::out_of_range(self.ty.name(), index))?;
        *slot = value.into().cast(dtype);
        self.notify();
        Ok(())
    }

    /// Indexes the value like a shader would: vectors and quaternions yield a component, matrices
    /// yield a copy of a column.
    pub fn get(&self, index: usize) -> Result<Operand> {
        match self.form() {
            MathForm::Matrix => self.column(index).map(Operand::Value),
            _ => self.component(index).map(Operand::Scalar),
        }
    }

    /// Assigns to `self[index]`: a component of a vector or quaternion, or a whole matrix column.
    pub fn set(&mut self, index: usize, value: impl Into<Operand>) -> Result<()> {
        match (self.form(), value.into()) {
            (MathForm::Matrix, value) => self.column_mut(index)?.assign(value),
            (_, Operand::Scalar(s)) => self.set_component(index, s),
            (_, Operand::Value(v)) => Err(Error::TypeMismatch(format!(
                "cannot assign '{}' to a component of '{}'",
                v.type_name(),
                self.type_name()
            ))),
        }
    }

    /// Reads a range of vector components.
    ///
    /// A range of one component yields a scalar, longer ranges a vector of the same dtype.
    ///
    /// ```
    /// # use glass_math::*;
    /// let v = vec4(1.0, 2.0, 3.0, 4.0);
    /// assert_eq!(v.slice(1..3).unwrap(), vec2(2.0, 3.0));
    /// assert_eq!(v.slice(3..).unwrap(), 4.0f32);
    /// ```
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Result<Operand> {
        let range = self.slice_range("slice", range)?;
        self.gather(range)
    }

    /// Writes a range of vector components and notifies the observer once.
    ///
    /// The right-hand side is a scalar written to every component in the range, or a vector with
    /// as many components as the range.
    pub fn set_slice(
        &mut self,
        range: impl RangeBounds<usize>,
        value: impl Into<Operand>,
    ) -> Result<()> {
        let range = self.slice_range("set_slice", range)?;
        let name = format!("[{}..{}]", range.start, range.end);
        let indices = range.collect::<ArrayVec<[usize; MAX_SWIZZLE_LEN]>>();
        self.scatter(&name, &indices, &value.into())
    }

    fn slice_range(&self, func: &str, range: impl RangeBounds<usize>) -> Result<Range<usize>> {
        if self.form() != MathForm::Vector {
            return Err(Error::undefined(func, &[self.type_name()]));
        }
        let len = self.data.len();
        let start = match range.start_bound() {
            Bound::Included(&i) => i,
            Bound::Excluded(&i) => i.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&i) => i.saturating_add(1),
            Bound::Excluded(&i) => i,
            Bound::Unbounded => len,
        };
        if end > len {
            return Err(Error::out_of_range(self.type_name(), end - 1));
        }
        if start >= end {
            return Err(Error::TypeMismatch(format!(
                "empty slice {start}..{end} of '{}'",
                self.type_name()
            )));
        }
        Ok(start..end)
    }

    /// Converts the components to an array of Rust primitives.
    ///
    /// ```
    /// # use glass_math::*;
    /// let v = vec3(1.0, 2.5, -1.0);
    /// assert_eq!(v.to_array::<i32, 3>().unwrap(), [1, 2, -1]);
    /// ```
    pub fn to_array<T: Component, const N: usize>(&self) -> Result<[T; N]> {
        if N != self.data.len() {
            return Err(Error::TypeMismatch(format!(
                "cannot convert '{}' to an array of {N} components",
                self.type_name()
            )));
        }
        Ok(std::array::from_fn(|i| T::from_scalar(self.data[i])))
    }

    /// Reads a named field or swizzle.
    ///
    /// Vectors support swizzles over the `xyzw`, `rgba` and `stpq` alphabets; single-letter
    /// swizzles yield a scalar. Quaternions have the fields `w`, `x`, `y`, `z` and `xyz`.
    ///
    /// ```
    /// # use glass_math::*;
    /// let v = vec4(1.0, 2.0, 3.0, 4.0);
    /// assert_eq!(v.attr("zyx").unwrap(), vec3(3.0, 2.0, 1.0));
    /// assert_eq!(v.attr("a").unwrap(), 4.0f32);
    /// ```
    pub fn attr(&self, name: &str) -> Result<Operand> {
        let ty = self.ty;
        match self.form() {
            MathForm::Vector => match ty.swizzles().and_then(|t| t.getter(name)) {
                Some(swizzle) => self.gather(swizzle.indices()),
                None => Err(Error::unknown_attribute(ty.name(), name)),
            },
            MathForm::Quaternion => quat::attr(self, name),
            _ => Err(Error::unknown_attribute(ty.name(), name)),
        }
    }

    /// Writes a named field or swizzle and notifies the observer once.
    ///
    /// The right-hand side is either a scalar, which is written to every named component, or a
    /// vector with as many components as the swizzle names. Swizzles that name a component more
    /// than once are read-only.
    pub fn set_attr(&mut self, name: &str, value: impl Into<Operand>) -> Result<()> {
        let ty = self.ty;
        match self.form() {
            MathForm::Vector => {
                let indices = setter_indices(ty, name)?;
                self.scatter(name, &indices, &value.into())
            }
            MathForm::Quaternion => quat::set_attr(self, name, value.into()),
            _ => Err(Error::unknown_attribute(ty.name(), name)),
        }
    }

    /// Collects the components at `indices` into a scalar or a fresh vector of the same dtype.
    pub(crate) fn gather(&self, indices: impl Iterator<Item = usize>) -> Result<Operand> {
        let data = indices.map(|i| self.data[i]).collect::<Buffer>();
        if let [single] = data[..] {
            return Ok(Operand::Scalar(single));
        }
        let ty = self.ty.registry().vector(self.dtype(), data.len())?;
        Ok(Operand::Value(Value::from_buffer(ty, data)))
    }

    /// Writes `value` to the components at `indices`, then notifies the observer.
    ///
    /// Nothing is written if `value` has the wrong shape.
    pub(crate) fn scatter(&mut self, name: &str, indices: &[usize], value: &Operand) -> Result<()> {
        let dtype = self.dtype();
        match value {
            Operand::Scalar(s) => {
                for &i in indices {
                    self.data[i] = s.cast(dtype);
                }
            }
            Operand::Value(v) if v.form() == MathForm::Vector && v.len() == indices.len() => {
                for (&i, c) in indices.iter().zip(v.components()) {
                    self.data[i] = c.cast(dtype);
                }
            }
            Operand::Value(v) => {
                return Err(Error::TypeMismatch(format!(
                    "cannot assign '{}' to '{name}' of '{}' ({} components)",
                    v.type_name(),
                    self.type_name(),
                    indices.len()
                )))
            }
        }
        self.notify();
        Ok(())
    }

    /// Membership test.
    ///
    /// A scalar is contained if any component compares equal to it. A vector is contained in a
    /// matrix if it is equal to one of its columns.
    pub fn contains(&self, item: impl Into<Operand>) -> bool {
        match item.into() {
            Operand::Scalar(s) => self
                .components()
                .any(|c| c.compare(CompareOp::Eq, s)),
            Operand::Value(v) => self.iter().any(|elem| elem == v),
        }
    }

    /// Installs the change-notification callback, replacing any previous one.
    pub fn set_observer(&mut self, observer: impl FnMut(&Value) + Send + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Removes the change-notification callback.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    pub(crate) fn notify(&mut self) {
        if let Some(mut observer) = self.observer.take() {
            observer(self);
            self.observer = Some(observer);
        }
    }
}

/// Resolves a writable swizzle of the vector type `ty` to component indices.
pub(crate) fn setter_indices(
    ty: &ConcreteType,
    name: &str,
) -> Result<ArrayVec<[usize; MAX_SWIZZLE_LEN]>> {
    let table = ty.swizzles();
    match table.and_then(|t| t.setter(name)) {
        Some(swizzle) => Ok(swizzle.indices().collect()),
        None if table.and_then(|t| t.getter(name)).is_some() => {
            Err(Error::read_only(ty.name(), name))
        }
        None => Err(Error::unknown_attribute(ty.name(), name)),
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        Self {
            ty: self.ty,
            data: self.data.clone(),
            observer: None,
        }
    }
}

impl PartialEq for Value {
    /// Values are equal if they have the same concrete type and all components compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.data == other.data
    }
}

impl Index<usize> for Value {
    type Output = Scalar;

    /// Indexes the flat component buffer (column-major for matrices).
    fn index(&self, index: usize) -> &Scalar {
        &self.data[index]
    }
}

impl Index<(usize, usize)> for Value {
    type Output = Scalar;

    /// Indexes a matrix by `(column, row)`.
    ///
    /// # Panics
    ///
    /// Panics if `self` is not a matrix or the index is out of bounds.
    fn index(&self, (col, row): (usize, usize)) -> &Scalar {
        let Shape::Matrix { cols, rows } = self.shape() else {
            panic!("cannot index '{}' with (column, row)", self.type_name());
        };
        assert!(
            col < cols && row < rows,
            "index ({col}, {row}) out of range for '{}'",
            self.type_name()
        );
        &self.data[col * rows + row]
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_name())?;
        match self.shape() {
            Shape::Matrix { rows, .. } => {
                let prefix = self.dtype().prefix();
                for (i, column) in self.data.chunks(rows).enumerate() {
                    if i != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{prefix}vec{rows}({})", column.iter().format(", "))?;
                }
            }
            _ => write!(f, "{}", self.data.iter().format(", "))?,
        }
        f.write_str(")")
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<'a> IntoIterator for &'a Value {
    type Item = Operand;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator returned by [`Value::iter`].
pub struct Iter<'a> {
    value: &'a Value,
    index: usize,
}

impl Iterator for Iter<'_> {
    type Item = Operand;

    fn next(&mut self) -> Option<Operand> {
        let item = self.value.get(self.index).ok()?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.value.len() - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// A scalar or a value: anything that can appear as an operand, constructor argument or function
/// argument.
///
/// Results whose shape has a single component are always returned as [`Operand::Scalar`].
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Scalar(Scalar),
    Value(Value),
}

impl Operand {
    pub fn dtype(&self) -> DType {
        match self {
            Operand::Scalar(s) => s.dtype(),
            Operand::Value(v) => v.dtype(),
        }
    }

    pub fn shape(&self) -> Shape {
        match self {
            Operand::Scalar(_) => Shape::Scalar,
            Operand::Value(v) => v.shape(),
        }
    }

    pub fn form(&self) -> MathForm {
        self.shape().form()
    }

    /// The name of the operand's type (`float` for a `Scalar::Float`, `vec3` for a `vec3`, ...).
    pub fn type_name(&self) -> &'static str {
        match self {
            Operand::Scalar(s) => s.dtype().name(),
            Operand::Value(v) => v.type_name(),
        }
    }

    /// Returns the components; a scalar is its own single component.
    pub fn components(&self) -> &[Scalar] {
        match self {
            Operand::Scalar(s) => slice::from_ref(s),
            Operand::Value(v) => v.as_slice(),
        }
    }

    /// Returns whether any component is negative.
    pub fn has_negative(&self) -> bool {
        self.components().iter().any(|c| c.is_negative())
    }

    pub fn as_scalar(&self) -> Option<Scalar> {
        match self {
            Operand::Scalar(s) => Some(*s),
            Operand::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Operand::Scalar(_) => None,
            Operand::Value(v) => Some(v),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Scalar(s) => s.fmt(f),
            Operand::Value(v) => v.fmt(f),
        }
    }
}

impl From<Scalar> for Operand {
    fn from(s: Scalar) -> Self {
        Operand::Scalar(s)
    }
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Value(v)
    }
}

impl From<&Value> for Operand {
    fn from(v: &Value) -> Self {
        Operand::Value(v.clone())
    }
}

impl From<&Operand> for Operand {
    fn from(op: &Operand) -> Self {
        op.clone()
    }
}

impl TryFrom<Operand> for Value {
    type Error = Error;

    fn try_from(op: Operand) -> Result<Self> {
        match op {
            Operand::Value(v) => Ok(v),
            Operand::Scalar(s) => Err(Error::TypeMismatch(format!(
                "expected a vector, matrix or quaternion, got '{}'",
                s.dtype()
            ))),
        }
    }
}

impl TryFrom<Operand> for Scalar {
    type Error = Error;

    fn try_from(op: Operand) -> Result<Self> {
        match op {
            Operand::Scalar(s) => Ok(s),
            Operand::Value(v) => Err(Error::TypeMismatch(format!(
                "expected a scalar, got '{}'",
                v.type_name()
            ))),
        }
    }
}

impl PartialEq<Value> for Operand {
    fn eq(&self, other: &Value) -> bool {
        matches!(self, Operand::Value(v) if v == other)
    }
}

impl PartialEq<Scalar> for Operand {
    fn eq(&self, other: &Scalar) -> bool {
        matches!(self, Operand::Scalar(s) if s == other)
    }
}

macro_rules! primitive_operand {
    ($($t:ty),+) => {
        $(
            impl From<$t> for Operand {
                #[inline]
                fn from(value: $t) -> Self {
                    Operand::Scalar(value.into())
                }
            }

            impl PartialEq<$t> for Operand {
                fn eq(&self, other: &$t) -> bool {
                    *self == Scalar::from(*other)
                }
            }
        )+
    };
}
primitive_operand!(bool, i32, u32, f32, f64);

/// Constructs a value from the canonical name of its type and a list of arguments.
///
/// Each argument can be anything that converts into an [`Operand`]. Expands to a call to
/// [`Value::from_name`], so it evaluates to a `Result<Value>`.
///
/// ```
/// # use glass_math::*;
/// let xy = vec2(1.0, 2.0);
/// let v = construct!("vec4", &xy, 3, 4.0).unwrap();
/// assert_eq!(v, vec4(1.0, 2.0, 3.0, 4.0));
/// let m = construct!("mat3").unwrap();
/// assert_eq!(m[(1, 1)], Scalar::Float(1.0));
/// ```
#[macro_export]
macro_rules! construct {
    ($name:expr $(, $arg:expr)* $(,)?) => {
        $crate::Value::from_name($name, &[$($crate::Operand::from($arg)),*])
    };
}
