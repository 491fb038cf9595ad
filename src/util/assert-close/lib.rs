/* ************************************************************************ **
** This file is part of jdftx-plugin, and is licensed under EITHER the MIT  **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of jdftx-plugin is provided under this permissive  **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */

//! Approximate equality for the float data that comes out of unit conversions.
//!
//! Values written through `{:18.10}` or scaled by bohr/hartree factors never
//! compare exactly, so tests use `assert_close!` with explicit tolerances:
//!
//! ```
//! # #[macro_use] extern crate jdftx_assert_close;
//! # fn main() {
//! assert_close!(abs=1e-9, 10.0 * 27.2113966413, 272.113966413);
//! assert_close!(rel=1e-12, [1.0, 2.0], [1.0, 2.0]);
//! # }
//! ```

#[macro_use]
extern crate failure;
use std::fmt;

pub const DEFAULT_NONZERO_TOL: f64 = 1e-9;

#[macro_export]
macro_rules! assert_close {
    ($($t:tt)*) => {
        $crate::assert_close_impl!{@parsing [$($t)*] [[@rel $crate::DEFAULT_NONZERO_TOL] [@abs 0.0]]}
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! assert_close_impl {
    (@parsing [rel=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@rel $tol]]);
    };
    (@parsing [abs=$tol:expr, $($rest:tt)*] [$($assignment:tt)*]) => {
        $crate::assert_close_impl!(@parsing [$($rest)*] [$($assignment)* [@abs $tol]]);
    };
    (@parsing [$a:expr, $b:expr $(,)*] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt "not nearly equal!"])
    };
    (@parsing [$a:expr, $b:expr, $($fmt:tt)+] $assignments:tt) => {
        $crate::assert_close_impl!(@expand $assignments [@comp $a, $b] [@fmt $($fmt)+])
    };
    (@expand [$([@$which:ident $tol:expr])*] [@comp $a:expr, $b:expr] [@fmt $($fmt:tt)+]) => {
        #[allow(unused_mut)]
        #[allow(unused_assignments)]
        {
            let a = $a;
            let b = $b;
            let mut tol = $crate::Tolerances { abs: 0.0, rel: 0.0 };
            $( tol.$which = $tol; )*

            if let Err(e) = $crate::CheckClose::check_close(&a, &b, tol) {
                panic!(
                    "{} (tolerances: rel={}, abs={})\n left: {:?}\nright: {:?}\n{}",
                    format!($($fmt)+), tol.rel, tol.abs, a, b, e,
                );
            }
        }
    };
}

/// Absolute and relative tolerance. A pair passes if it is within *either*.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Tolerances {
    pub abs: f64,
    pub rel: f64,
}

impl Tolerances {
    /// Same semantics as Python's `math.isclose`.
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        assert!(self.rel >= 0.0);
        assert!(self.abs >= 0.0);

        // infinities of the same sign
        if a == b { return true; }
        if a.is_infinite() || b.is_infinite() { return false; }

        (a - b).abs() <= self.abs.max(self.rel * a.abs()).max(self.rel * b.abs())
    }
}

#[derive(Debug, Fail)]
pub struct CheckCloseError {
    pub values: (f64, f64),
    pub index: Vec<usize>,
    pub tol: Tolerances,
}

impl fmt::Display for CheckCloseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (left, right) = self.values;
        write!(f, "failed at index {:?}:\n  left: {:?}\n right: {:?}\n   tol: {:?}",
            self.index, left, right, self.tol)
    }
}

impl CheckCloseError {
    fn at(mut self, i: usize) -> Self {
        self.index.insert(0, i);
        self
    }
}

pub trait CheckClose<Rhs: ?Sized = Self> {
    /// Test that all values of self and other are close.
    fn check_close(&self, other: &Rhs, tol: Tolerances) -> Result<(), CheckCloseError>;
}

impl CheckClose for f64 {
    fn check_close(&self, other: &f64, tol: Tolerances) -> Result<(), CheckCloseError> {
        match tol.is_close(*self, *other) {
            true => Ok(()),
            false => Err(CheckCloseError { values: (*self, *other), index: vec![], tol }),
        }
    }
}

impl<'a, T: ?Sized + CheckClose> CheckClose for &'a T {
    fn check_close(&self, other: &Self, tol: Tolerances) -> Result<(), CheckCloseError>
    { CheckClose::check_close(*self, *other, tol) }
}

impl<T: CheckClose> CheckClose for [T] {
    fn check_close(&self, other: &[T], tol: Tolerances) -> Result<(), CheckCloseError> {
        assert_eq!(self.len(), other.len(), "length mismatch in check_close");
        for (i, (a, b)) in self.iter().zip(other).enumerate() {
            a.check_close(b, tol).map_err(|e| e.at(i))?;
        }
        Ok(())
    }
}

impl<T: CheckClose> CheckClose for Vec<T> {
    fn check_close(&self, other: &Vec<T>, tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(&other[..], tol) }
}

impl<T: CheckClose, const N: usize> CheckClose for [T; N] {
    fn check_close(&self, other: &[T; N], tol: Tolerances) -> Result<(), CheckCloseError>
    { self[..].check_close(&other[..], tol) }
}
