//! Environment-based configuration.
//!
//! - `GLASS_MATH_PRECISION`: number of decimals (`0` to `17`) to print for `float` and `double`
//!   components. When unset, components are printed with the shortest representation that
//!   round-trips.

use std::{
    env::{self, VarError},
    process,
};

use once_cell::sync::Lazy;

const MAX_PRECISION: usize = 17;

static PRECISION: Lazy<Option<usize>> = Lazy::new(|| match env::var("GLASS_MATH_PRECISION") {
    Ok(v) => match v.trim().parse::<usize>() {
        Ok(prec) if prec <= MAX_PRECISION => Some(prec),
        _ => {
            eprintln!("invalid value set for `GLASS_MATH_PRECISION` variable: '{v}'; exiting");
            process::exit(1);
        }
    },
    Err(VarError::NotPresent) => None,
    Err(VarError::NotUnicode(s)) => {
        eprintln!(
            "invalid value set for `GLASS_MATH_PRECISION` variable: {}; exiting",
            s.to_string_lossy()
        );
        process::exit(1);
    }
});

/// Returns the configured display precision for floating-point components, if any.
pub fn precision() -> Option<usize> {
    *PRECISION
}
