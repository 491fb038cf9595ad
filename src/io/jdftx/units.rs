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

//! Unit conversions between what the user supplies and what JDFTx speaks.
//!
//! JDFTx works in atomic units (bohr, hartree). Inputs and outputs of this
//! crate are in angstrom and eV.

pub const ANGSTROM_TO_BOHR: f64 = 1.8897259886;
pub const BOHR_TO_ANGSTROM: f64 = 0.529177249;

pub const HARTREE_TO_EV: f64 = 27.2113966413;

pub fn angstrom_to_bohr(x: f64) -> f64 { x * ANGSTROM_TO_BOHR }
pub fn bohr_to_angstrom(x: f64) -> f64 { x * BOHR_TO_ANGSTROM }
pub fn hartree_to_ev(x: f64) -> f64 { x * HARTREE_TO_EV }

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn length_roundtrip() {
        for &x in &[0.0, 1.0, 2.715, -13.0, 1e-5, 4.2e3] {
            assert_close!(rel=1e-9, abs=1e-15, angstrom_to_bohr(bohr_to_angstrom(x)), x);
            assert_close!(rel=1e-9, abs=1e-15, bohr_to_angstrom(angstrom_to_bohr(x)), x);
        }
    }

    #[test]
    fn hartree() {
        assert_close!(rel=1e-15, hartree_to_ev(10.0), 272.113966413);
    }
}
