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

use std::sync::Arc;

use crate::util::{self, M33, V3};
use jdftx_assert_close::{CheckClose, CheckCloseError, Tolerances};

/// Defines a vector basis for periodic boundary conditions in three dimensions.
///
/// A `Lattice` is what you multiply "fractional" data against to produce
/// "cartesian" data. The units are whatever the matrix was built in; in
/// this workspace that is angstrom unless a function says otherwise.
#[derive(Debug, Clone)]
pub struct Lattice {
    matrix: Arc<M33>,
    inverse: Arc<M33>,
}

// Manual impl that doesn't compare the inverse.
impl PartialEq<Lattice> for Lattice {
    fn eq(&self, other: &Lattice) -> bool {
        // deconstruct to get errors when new fields are added
        let Lattice { ref matrix, inverse: _ } = *self;
        matrix == &other.matrix
    }
}

impl Lattice {
    /// Create a lattice from a matrix where the rows are lattice vectors.
    #[inline]
    pub fn new(matrix: &M33) -> Self {
        let inverse = Arc::new(util::inv(matrix));
        let matrix = Arc::new(*matrix);
        Self { matrix, inverse }
    }

    /// Get the reciprocal lattice, **including** the factor of 2 PI.
    ///
    /// This is the convention used when specifying k-point densities
    /// in inverse angstrom.
    pub fn reciprocal_2pi(&self) -> Self {
        let two_pi = 2.0 * std::f64::consts::PI;
        let mut m = util::transpose(&self.inverse);
        for row in &mut m {
            for x in row {
                *x *= two_pi;
            }
        }
        Lattice::new(&m)
    }

    /// Matrix where lattice vectors are rows.
    #[inline]
    pub fn matrix(&self) -> &M33
    { &self.matrix }

    /// Get the (precomputed) inverse of the matrix where lattice vectors are rows.
    #[inline]
    pub fn inverse_matrix(&self) -> &M33
    { &self.inverse }

    #[inline]
    pub fn vectors(&self) -> &[V3; 3]
    { &self.matrix }

    pub fn norms(&self) -> [f64; 3] {
        let v = self.vectors();
        [util::norm(&v[0]), util::norm(&v[1]), util::norm(&v[2])]
    }

    /// Get the (positive) volume of the lattice cell.
    pub fn volume(&self) -> f64
    { util::det(self.matrix()).abs() }

    /// Multiply every element of the matrix by a constant.
    ///
    /// Used for changing length units.
    pub fn scaled(&self, factor: f64) -> Lattice {
        let mut m = *self.matrix();
        for row in &mut m {
            for x in row {
                *x *= factor;
            }
        }
        Lattice::new(&m)
    }

    /// Convert fractional coordinates to cartesian.
    pub fn fracs_to_carts(&self, fracs: &[V3]) -> Vec<V3>
    { util::dot_n3_33(fracs, self.matrix()) }

    /// Convert cartesian coordinates to fractional.
    pub fn carts_to_fracs(&self, carts: &[V3]) -> Vec<V3>
    { util::dot_n3_33(carts, self.inverse_matrix()) }
}

/// Helper constructors
impl Lattice {
    /// The identity lattice.
    #[inline]
    pub fn eye() -> Self { Self::cubic(1.0) }

    /// A cubic lattice ((a, a, a), (90, 90, 90))
    #[inline]
    pub fn cubic(a: f64) -> Self { Self::orthorhombic(a, a, a) }

    /// An orthorhombic lattice ((a, b, c), (90, 90, 90))
    #[inline]
    pub fn orthorhombic(a: f64, b: f64, c: f64) -> Self
    { Self::new(&[[a, 0., 0.], [0., b, 0.], [0., 0., c]]) }

    /// The FCC primitive cell with conventional lattice constant `a`.
    pub fn fcc(a: f64) -> Self {
        let h = a / 2.0;
        Self::new(&[[h, h, 0.0], [h, 0.0, h], [0.0, h, h]])
    }
}

/// Defaults to the identity matrix.
impl Default for Lattice {
    #[inline]
    fn default() -> Lattice { Lattice::eye() }
}

impl<'a> From<&'a M33> for Lattice {
    #[inline(always)]
    fn from(m: &'a M33) -> Self
    { Lattice::new(m) }
}

impl CheckClose for Lattice {
    fn check_close(&self, other: &Lattice, tol: Tolerances) -> Result<(), CheckCloseError>
    { self.matrix().check_close(other.matrix(), tol) }
}

// Only the matrix goes over the wire; the inverse is recomputed.
#[cfg(feature = "serde")]
mod serde_impls {
    use super::*;
    use serde::{Serialize, Serializer, Deserialize, Deserializer};

    impl Serialize for Lattice {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error>
        { self.matrix().serialize(serializer) }
    }

    impl<'de> Deserialize<'de> for Lattice {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error>
        { M33::deserialize(deserializer).map(|m| Lattice::new(&m)) }
    }
}
