//! The canonical type registry.
//!
//! Every non-scalar value refers to a [`ConcreteType`] describing its dtype and shape. Types are
//! created lazily the first time they are needed and are then kept for the rest of the program's
//! lifetime (populate once, never evict). Operators resolve their result types through the
//! registry that owns their operands' types.
//!
//! The registry is the only shared mutable state in the crate. Lookups take a read lock; creating
//! a type takes the write lock and inserts it only if no other thread got there first, so
//! concurrent resolution of the same key always yields the same `&'static ConcreteType`.

use std::{
    collections::HashMap,
    fmt,
    sync::{OnceLock, PoisonError, RwLock},
};

use crate::{
    error::{Error, Result},
    swizzle::SwizzleTable,
    DType,
};

/// The mathematical form of a value, independent of its dtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MathForm {
    Scalar,
    Vector,
    Matrix,
    Quaternion,
}

/// The shape of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Scalar,
    Vector(usize),
    /// Column-major matrix with `cols` columns of `rows` components each.
    Matrix { cols: usize, rows: usize },
    Quaternion,
}

impl Shape {
    /// Total number of components.
    pub const fn product(self) -> usize {
        match self {
            Shape::Scalar => 1,
            Shape::Vector(n) => n,
            Shape::Matrix { cols, rows } => cols * rows,
            Shape::Quaternion => 4,
        }
    }

    pub const fn form(self) -> MathForm {
        match self {
            Shape::Scalar => MathForm::Scalar,
            Shape::Vector(_) => MathForm::Vector,
            Shape::Matrix { .. } => MathForm::Matrix,
            Shape::Quaternion => MathForm::Quaternion,
        }
    }
}

/// Result of resolving a `(dtype, shape)` pair.
///
/// Degenerate shapes (a single component) collapse to the plain scalar dtype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved {
    Scalar(DType),
    Type(&'static ConcreteType),
}

/// A canonical vector, matrix or quaternion type, such as `vec3` or `dmat4x2`.
pub struct ConcreteType {
    name: String,
    dtype: DType,
    shape: Shape,
    registry: &'static TypeRegistry,
    swizzles: OnceLock<SwizzleTable>,
}

impl ConcreteType {
    /// The canonical name of this type (`vec3`, `bmat2x4`, `dquat`, ...).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn form(&self) -> MathForm {
        self.shape.form()
    }

    /// The registry this type was created by.
    #[inline]
    pub fn registry(&self) -> &'static TypeRegistry {
        self.registry
    }

    /// Returns the swizzle table of a vector type, generating it on first use.
    ///
    /// Returns [`None`] for matrices and quaternions.
    pub fn swizzles(&self) -> Option<&SwizzleTable> {
        match self.shape {
            Shape::Vector(n) => Some(self.swizzles.get_or_init(|| SwizzleTable::new(n))),
            _ => None,
        }
    }

    /// Resolves the type with the same shape but a different dtype.
    pub fn with_dtype(&self, dtype: DType) -> Result<&'static ConcreteType> {
        self.registry.get(dtype, self.shape)
    }

    /// Resolves the type with the same dtype but a different shape.
    pub fn with_shape(&self, shape: Shape) -> Result<Resolved> {
        self.registry.resolve(self.dtype, shape)
    }
}

impl PartialEq for ConcreteType {
    fn eq(&self, other: &Self) -> bool {
        self.dtype == other.dtype && self.shape == other.shape
    }
}

impl fmt::Debug for ConcreteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConcreteType")
            .field("name", &self.name)
            .field("dtype", &self.dtype)
            .field("shape", &self.shape)
            .finish()
    }
}

/// Cache of canonical types, keyed by dtype and shape (the shape determines the [`MathForm`]).
pub struct TypeRegistry {
    types: RwLock<HashMap<(DType, Shape), &'static ConcreteType>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates an empty registry.
    ///
    /// Types are resolved through `&'static self`, so a private registry has to be leaked (or be
    /// stored in a `static`) before it can be used. Most code wants [`TypeRegistry::global`].
    pub fn new() -> Self {
        Self {
            types: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the process-wide registry used by all constructors that don't take an explicit type.
    pub fn global() -> &'static TypeRegistry {
        static GLOBAL: OnceLock<TypeRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TypeRegistry::new)
    }

    /// Resolves the canonical type for `dtype` and `shape`.
    ///
    /// Shapes with a single component resolve to [`Resolved::Scalar`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if no canonical type exists for the combination, for
    /// example a vector of length 5 or an integer quaternion.
    pub fn resolve(&'static self, dtype: DType, shape: Shape) -> Result<Resolved> {
        if shape.product() == 1 {
            return Ok(Resolved::Scalar(dtype));
        }
        self.get(dtype, shape).map(Resolved::Type)
    }

    /// Like [`TypeRegistry::resolve`], but fails instead of collapsing single-component shapes.
    pub fn get(&'static self, dtype: DType, shape: Shape) -> Result<&'static ConcreteType> {
        let key = (dtype, shape);
        if let Some(ty) = self.read_types().get(&key) {
            return Ok(*ty);
        }

        let name = canonical_name(dtype, shape).ok_or(Error::Configuration { dtype, shape })?;
        let mut types = self.types.write().unwrap_or_else(PoisonError::into_inner);
        let ty = *types.entry(key).or_insert_with(|| {
            log::debug!("registering canonical type `{name}` ({dtype:?}, {shape:?})");
            &*Box::leak(Box::new(ConcreteType {
                name,
                dtype,
                shape,
                registry: self,
                swizzles: OnceLock::new(),
            }))
        });
        Ok(ty)
    }

    pub fn vector(&'static self, dtype: DType, len: usize) -> Result<&'static ConcreteType> {
        self.get(dtype, Shape::Vector(len))
    }

    pub fn matrix(
        &'static self,
        dtype: DType,
        cols: usize,
        rows: usize,
    ) -> Result<&'static ConcreteType> {
        self.get(dtype, Shape::Matrix { cols, rows })
    }

    pub fn quaternion(&'static self, dtype: DType) -> Result<&'static ConcreteType> {
        self.get(dtype, Shape::Quaternion)
    }

    /// Resolves a type by its canonical name.
    ///
    /// Accepts the plain scalar names (`bool`, `int`, `uint`, `float`, `double`), every canonical
    /// vector, matrix and quaternion name, and the `matN` shorthand for `matNxN`.
    ///
    /// ```
    /// # use glass_math::*;
    /// let reg = TypeRegistry::global();
    /// let Resolved::Type(ty) = reg.lookup("dmat3").unwrap() else { panic!() };
    /// assert_eq!(ty.name(), "dmat3x3");
    /// assert_eq!(ty.shape(), Shape::Matrix { cols: 3, rows: 3 });
    /// ```
    pub fn lookup(&'static self, name: &str) -> Result<Resolved> {
        if let Some(dtype) = DType::ALL.into_iter().find(|d| d.name() == name) {
            return Ok(Resolved::Scalar(dtype));
        }

        let unknown = || Error::UnknownTypeName(name.to_string());
        let (dtype, rest) = match name.as_bytes().first() {
            Some(b'b') => (DType::Bool, &name[1..]),
            Some(b'i') => (DType::Int, &name[1..]),
            Some(b'u') => (DType::UInt, &name[1..]),
            Some(b'd') => (DType::Double, &name[1..]),
            _ => (DType::Float, name),
        };

        let dim = |s: &str| match s.as_bytes() {
            [d @ b'0'..=b'9'] => Some(usize::from(d - b'0')),
            _ => None,
        };
        let shape = if rest == "quat" {
            Shape::Quaternion
        } else if let Some(n) = rest.strip_prefix("vec") {
            Shape::Vector(dim(n).ok_or_else(unknown)?)
        } else if let Some(dims) = rest.strip_prefix("mat") {
            match dims.split_once('x') {
                Some((c, r)) => Shape::Matrix {
                    cols: dim(c).ok_or_else(unknown)?,
                    rows: dim(r).ok_or_else(unknown)?,
                },
                None => {
                    let n = dim(dims).ok_or_else(unknown)?;
                    Shape::Matrix { cols: n, rows: n }
                }
            }
        } else {
            return Err(unknown());
        };

        self.get(dtype, shape).map(Resolved::Type)
    }

    /// Number of canonical types created so far.
    pub fn len(&self) -> usize {
        self.read_types().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_types(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<(DType, Shape), &'static ConcreteType>> {
        self.types.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Resolves a type through the global registry that is known to exist.
pub(crate) fn builtin(dtype: DType, shape: Shape) -> &'static ConcreteType {
    match TypeRegistry::global().get(dtype, shape) {
        Ok(ty) => ty,
        Err(e) => unreachable!("{e}"),
    }
}

fn canonical_name(dtype: DType, shape: Shape) -> Option<String> {
    let dim = |n: usize| (2..=4).contains(&n);
    let prefix = dtype.prefix();
    match shape {
        Shape::Vector(n) if dim(n) => Some(format!("{prefix}vec{n}")),
        Shape::Matrix { cols, rows } if dim(cols) && dim(rows) => {
            Some(format!("{prefix}mat{cols}x{rows}"))
        }
        Shape::Quaternion if dtype.is_float() => Some(format!("{prefix}quat")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private() -> &'static TypeRegistry {
        Box::leak(Box::new(TypeRegistry::new()))
    }

    #[test]
    fn names() {
        let reg = private();
        assert_eq!(reg.vector(DType::Float, 3).unwrap().name(), "vec3");
        assert_eq!(reg.vector(DType::Bool, 2).unwrap().name(), "bvec2");
        assert_eq!(reg.matrix(DType::UInt, 4, 2).unwrap().name(), "umat4x2");
        assert_eq!(reg.matrix(DType::Int, 3, 3).unwrap().name(), "imat3x3");
        assert_eq!(reg.quaternion(DType::Double).unwrap().name(), "dquat");
    }

    #[test]
    fn memoized() {
        let reg = private();
        assert!(reg.is_empty());
        let a = reg.vector(DType::Int, 4).unwrap();
        let b = reg.vector(DType::Int, 4).unwrap();
        assert!(std::ptr::eq(a, b));
        assert_eq!(reg.len(), 1);
        assert!(std::ptr::eq(a.registry(), reg));
    }

    #[test]
    fn degenerate_shapes_collapse() {
        let reg = private();
        assert_eq!(
            reg.resolve(DType::UInt, Shape::Vector(1)).unwrap(),
            Resolved::Scalar(DType::UInt)
        );
        assert_eq!(
            reg.resolve(DType::Double, Shape::Matrix { cols: 1, rows: 1 }).unwrap(),
            Resolved::Scalar(DType::Double)
        );
        assert_eq!(
            reg.resolve(DType::Bool, Shape::Scalar).unwrap(),
            Resolved::Scalar(DType::Bool)
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn unsupported_shapes() {
        let reg = private();
        assert!(matches!(
            reg.vector(DType::Float, 5),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            reg.resolve(DType::Float, Shape::Matrix { cols: 1, rows: 3 }),
            Err(Error::Configuration { .. })
        ));
        assert!(matches!(
            reg.quaternion(DType::Int),
            Err(Error::Configuration { .. })
        ));
    }

    #[test]
    fn lookup() {
        let reg = private();
        let ty = |name: &str| match reg.lookup(name).unwrap() {
            Resolved::Type(ty) => (ty.dtype(), ty.shape()),
            Resolved::Scalar(d) => (d, Shape::Scalar),
        };
        assert_eq!(ty("vec3"), (DType::Float, Shape::Vector(3)));
        assert_eq!(ty("bvec4"), (DType::Bool, Shape::Vector(4)));
        assert_eq!(ty("mat3"), (DType::Float, Shape::Matrix { cols: 3, rows: 3 }));
        assert_eq!(ty("dmat4x2"), (DType::Double, Shape::Matrix { cols: 4, rows: 2 }));
        assert_eq!(ty("quat"), (DType::Float, Shape::Quaternion));
        assert_eq!(ty("uint"), (DType::UInt, Shape::Scalar));

        assert_eq!(
            reg.lookup("vector3"),
            Err(Error::UnknownTypeName("vector3".into()))
        );
        assert!(matches!(reg.lookup("vec9"), Err(Error::Configuration { .. })));
        assert!(matches!(reg.lookup("iquat"), Err(Error::Configuration { .. })));
    }

    #[test]
    fn concurrent_resolution() {
        let reg = private();
        let handles = (0..8)
            .map(|_| {
                std::thread::spawn(move || {
                    reg.matrix(DType::Float, 4, 4).unwrap() as *const ConcreteType as usize
                })
            })
            .collect::<Vec<_>>();
        let ptrs = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>();
        assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(reg.len(), 1);
    }
}
