//! Approximate equality.
//!
//! Floating-point results of matrix inversion, rotations or long chains of arithmetic rarely match
//! a hand-written expectation bit for bit. This module provides the [`ApproxEq`] trait and the
//! [`assert_approx_eq!`][crate::assert_approx_eq] and [`assert_approx_ne!`][crate::assert_approx_ne]
//! macros for comparing them with a tolerance.
//!
//! Tolerances are always given as [`f64`], regardless of the dtype of the compared values.

mod impls;

use std::{fmt, panic::Location};

/// Default tolerance for absolute comparisons.
pub const DEFAULT_ABS_TOLERANCE: f64 = f32::EPSILON as f64;

/// Default tolerance for relative comparisons.
pub const DEFAULT_REL_TOLERANCE: f64 = f32::EPSILON as f64;

/// Types that can be compared for *approximate equality*.
///
/// Values made of several components are equal if they have the same type and every pair of
/// components is equal.
///
/// For the subtleties of comparing floating-point numbers, see:
/// <https://randomascii.wordpress.com/2012/02/25/comparing-floating-point-numbers-2012-edition/>
pub trait ApproxEq<Rhs: ?Sized = Self> {
    /// Equal if the absolute difference is at most `tolerance`.
    fn abs_diff_eq(&self, other: &Rhs, tolerance: f64) -> bool;

    /// Equal if the absolute difference is at most `tolerance` times the larger magnitude.
    fn rel_diff_eq(&self, other: &Rhs, tolerance: f64) -> bool;

    /// Equal if at most `ulps` representable numbers lie between the two values.
    ///
    /// `NaN` is never equal to anything, `-0.0` equals `+0.0`, and otherwise values of opposing
    /// sign are never equal.
    fn ulps_diff_eq(&self, other: &Rhs, ulps: u32) -> bool;
}

/// Assertion guard returned by [`assert_approx_eq!`][crate::assert_approx_eq] and
/// [`assert_approx_ne!`][crate::assert_approx_ne].
///
/// The assertion is checked when the guard is dropped. Before that, [`Asserter::abs`],
/// [`Asserter::rel`] and [`Asserter::ulps`] select which comparisons to run; the values are equal
/// if *any* selected comparison says so. Without a selection, an absolute comparison with
/// [`DEFAULT_ABS_TOLERANCE`] and a relative one with [`DEFAULT_REL_TOLERANCE`] are used.
pub struct Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    left: &'a T,
    right: &'a T,
    kind: AssertionKind,
    location: &'static Location<'static>,
    msg: Option<fmt::Arguments<'a>>,
    abs: Option<f64>,
    rel: Option<f64>,
    ulps: Option<u32>,
}

impl<'a, T> Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    #[doc(hidden)]
    #[track_caller]
    pub fn new(
        left: &'a T,
        right: &'a T,
        kind: AssertionKind,
        msg: Option<fmt::Arguments<'a>>,
    ) -> Self {
        Self {
            left,
            right,
            kind,
            location: Location::caller(),
            msg,
            abs: None,
            rel: None,
            ulps: None,
        }
    }

    /// Compares the absolute difference against `abs`.
    ///
    /// Works well for values close to zero, including values of opposing sign.
    pub fn abs(&mut self, abs: f64) -> &mut Self {
        self.abs = Some(abs);
        self
    }

    /// Compares the absolute difference against `rel` times the larger magnitude.
    ///
    /// A poor fit near zero: any non-zero number only equals `0.0` with `rel >= 1.0`.
    pub fn rel(&mut self, rel: f64) -> &mut Self {
        self.rel = Some(rel);
        self
    }

    /// Counts the [*units in the last place*] between the values.
    ///
    /// [*units in the last place*]: https://en.wikipedia.org/wiki/Unit_in_the_last_place
    pub fn ulps(&mut self, ulps: u32) -> &mut Self {
        self.ulps = Some(ulps);
        self
    }

    fn equal(&self) -> bool {
        let (left, right) = (self.left, self.right);
        self.abs.map_or(false, |abs| left.abs_diff_eq(right, abs))
            || self.rel.map_or(false, |rel| left.rel_diff_eq(right, rel))
            || self.ulps.map_or(false, |ulps| left.ulps_diff_eq(right, ulps))
    }
}

impl<'a, T> Drop for Asserter<'a, T>
where
    T: ApproxEq + fmt::Debug,
{
    fn drop(&mut self) {
        if self.abs.is_none() && self.rel.is_none() && self.ulps.is_none() {
            self.abs = Some(DEFAULT_ABS_TOLERANCE);
            self.rel = Some(DEFAULT_REL_TOLERANCE);
        }

        let expected = self.kind == AssertionKind::Eq;
        if self.equal() != expected {
            assert_failed(self.left, self.right, self.kind, self.location, self.msg);
        }
    }
}

fn assert_failed(
    left: &dyn fmt::Debug,
    right: &dyn fmt::Debug,
    kind: AssertionKind,
    location: &Location<'_>,
    msg: Option<fmt::Arguments<'_>>,
) -> ! {
    let op = match kind {
        AssertionKind::Eq => "==",
        AssertionKind::Ne => "!=",
    };
    // `#[track_caller]` has no effect on `drop`, so the location captured in `new` is printed.
    let msg = msg.map(|args| format!(": {args}")).unwrap_or_default();
    panic!("assertion `left {op} right` failed at {location}{msg}\n  left: {left:?}\n right: {right:?}")
}

#[doc(hidden)]
#[derive(Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AssertionKind {
    Eq,
    Ne,
}

/// Asserts that two expressions are approximately equal (using [`ApproxEq`]).
///
/// Works like [`assert_eq!`], but returns an [`Asserter`] that selects the comparison and its
/// tolerance.
///
/// ```
/// # use glass_math::*;
/// let one = (0..10).fold(0.0, |acc, _| acc + 0.1);
/// assert_approx_eq!(one, 1.0);
/// assert_approx_eq!(100.0, 99.0).abs(1.0);
/// assert_approx_eq!(100.0, 99.0).rel(0.01);
///
/// let v = (vec3(0.1, 0.2, 0.3) * 3).unwrap();
/// assert_approx_eq!(v, vec3(0.3, 0.6, 0.9)).abs(1e-6);
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Eq,
            ::core::option::Option::None,
        )
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Eq,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}

/// Asserts that two expressions are *not* approximately equal (using [`ApproxEq`]).
///
/// ```
/// # use glass_math::*;
/// assert_approx_ne!(100.0, 99.0).abs(0.5);
/// assert_approx_ne!(1.0, 1.0 + 2.0 * f64::EPSILON).ulps(1);
/// // Values of different types are never equal.
/// assert_approx_ne!(vec2(1.0, 2.0), dvec2(1.0, 2.0)).abs(1.0);
/// ```
#[macro_export]
macro_rules! assert_approx_ne {
    ($lhs:expr, $rhs:expr $(,)?) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::None,
        )
    };
    ($lhs:expr, $rhs:expr, $($arg:tt)+) => {
        $crate::approx::Asserter::new(
            &$lhs,
            &$rhs,
            $crate::approx::AssertionKind::Ne,
            ::core::option::Option::Some(::core::format_args!($($arg)+)),
        )
    };
}
