//! Shader-style vectors, matrices and quaternions with runtime types.
//!
//! This library models the built-in numeric types of a shading language (`vec3`, `imat2x4`,
//! `dquat`, ...) as ordinary Rust values. Every [`Value`] carries its [`ConcreteType`], which is
//! a combination of a [`DType`] (the component type) and a [`Shape`]. Concrete types are created
//! on demand by a memoizing [`TypeRegistry`], so the full family of 80 or so types does not need to
//! be spelled out as Rust types.
//!
//! # Overview
//!
//! - Values are constructed either through typed helpers like [`vec3`] and [`mat2`], or by name
//!   with the [`construct!`] macro, which accepts the same argument lists a shader constructor
//!   would (`construct!("vec4", xy, 0.0, 1.0)`).
//! - Vector components are accessed with swizzles over the `xyzw`, `rgba` and `stpq` alphabets via
//!   [`Value::attr`] and [`Value::set_attr`].
//! - Arithmetic operators (`+`, `-`, `*`, `/`, `%`) are implemented for values and return
//!   [`Result`]s, since whether an operation is defined depends on runtime shapes. Mixed dtypes are
//!   promoted along the ladder `bool < int < uint < float < double` (see [`promote`]).
//! - Matrices multiply as matrices, and quaternions multiply with the Hamilton product and rotate
//!   `vec3`s. Everything else operates component-wise, with scalars broadcast.
//! - In-place operations ([`Value::compound`], setters) keep the type of the value and notify an
//!   optional observer exactly once per mutation.
//! - [`funcs`] contains the usual shader built-in functions (`clamp`, `mix`, `normalize`, ...).
//!
//! ```
//! use glass_math::*;
//!
//! let v = construct!("vec3", 1, 2, 3).unwrap();
//! let w = (&v + vec3(4.0, 5.0, 6.0)).unwrap();
//! assert_eq!(w.to_string(), "vec3(5, 7, 9)");
//!
//! let mut p = vec4(1.0, 2.0, 3.0, 4.0);
//! p.set_attr("xy", p.attr("yx").unwrap()).unwrap();
//! assert_eq!(p, vec4(2.0, 1.0, 3.0, 4.0));
//! ```
//!
//! # Configuration
//!
//! See [`config`] for the environment variables that are read.

use log::LevelFilter;

pub mod approx;
pub mod config;
mod dtype;
mod error;
pub mod funcs;
mod matrix;
mod ops;
mod quat;
mod registry;
mod swizzle;
mod traits;
mod value;
mod vector;

pub use dtype::{promote, DType, Scalar};
pub use error::{Error, Result};
pub use matrix::{mat2, mat3, mat4, ColumnMut};
pub use ops::{is_homogeneous, BinaryOp, CompareOp};
pub use quat::{dquat, quat};
pub use registry::{ConcreteType, MathForm, Resolved, Shape, TypeRegistry};
pub use swizzle::{Swizzle, SwizzleTable, ALPHABETS, MAX_SWIZZLE_LEN};
pub use traits::Component;
pub use value::{Iter, Observer, Operand, Value};
pub use vector::{
    bvec2, bvec3, bvec4, dvec2, dvec3, dvec4, ivec2, ivec3, ivec4, uvec2, uvec3, uvec4, vec2,
    vec3, vec4,
};

/// Initializes logging to *stderr*.
///
/// `calling_crate` logs at *info* level, so a program's own progress messages are visible. This
/// library only reports warnings by default, since it logs every registered type and generated
/// swizzle table at *debug* and *trace* level. Everything else is limited to *warn*. `RUST_LOG`
/// overrides all of these (`RUST_LOG=glass_math=debug` shows type registration). Timestamps are
/// omitted.
///
/// Prefer the [`init_logger!`] macro, which passes the calling crate's name. Calling this more
/// than once has no effect.
pub fn init_logger(calling_crate: &'static str) {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .filter(Some(env!("CARGO_CRATE_NAME")), LevelFilter::Warn)
        .filter(Some(calling_crate), LevelFilter::Info)
        .format_timestamp(None)
        .parse_default_env()
        .try_init()
        .ok();
}

/// Initializes logging for the calling crate and this library.
#[macro_export]
macro_rules! init_logger {
    () => {
        $crate::init_logger(env!("CARGO_CRATE_NAME"))
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_logger_twice() {
        crate::init_logger!();
        crate::init_logger!();
        log::info!("logger initialized");
        assert!(log::max_level() >= log::LevelFilter::Warn);
    }
}
