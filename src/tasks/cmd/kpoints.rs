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

//! Choosing the k-point mesh before an input file is written.

use crate::exit_code::ExitCode;

use jdftx_io::KpointSpec;
use jdftx_structure::Lattice;
use jdftx_tasks_config as cfg;

use itertools::Itertools;

/// Tolerance for deciding that all cell vectors have the same length.
const SYMMETRIC_CELL_TOL: f64 = 1e-5;

/// A mesh whose k-points are no further apart than `distance` (in 1/angstrom,
/// including the factor of 2 pi) along each reciprocal lattice vector.
///
/// With `force_parity`, odd counts are rounded up to even. A cell whose
/// vectors all have the same length always gets an isotropic mesh.
pub fn kpoints_from_distance(lattice: &Lattice, distance: f64, force_parity: bool) -> KpointSpec {
    let recip_norms = lattice.reciprocal_2pi().norms();

    let mut mesh = [0u32; 3];
    for (n, &norm) in mesh.iter_mut().zip(&recip_norms) {
        // round first so that e.g. 4.000000001 does not become 5
        let exact = round_to_decimals(norm / distance, 5);
        *n = f64::max(1.0, exact.ceil()) as u32;
        if force_parity {
            *n += *n % 2;
        }
    }

    let lengths = lattice.norms();
    let is_symmetric_cell = lengths.iter().all(|&x| (x - lengths[0]).abs() < SYMMETRIC_CELL_TOL);
    let is_symmetric_mesh = mesh.iter().all(|&n| n == mesh[0]);
    if is_symmetric_cell && !is_symmetric_mesh {
        let max = mesh.iter().cloned().max().unwrap_or(1);
        debug!("cell vectors have equal lengths; making mesh {} isotropic", mesh.iter().join("x"));
        mesh = [max; 3];
    }

    KpointSpec::mesh(mesh)
}

fn round_to_decimals(x: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (x * scale).round() / scale
}

/// Pick the k-points for a run from the settings.
///
/// An explicit mesh or list wins over a distance.
pub fn resolve_kpoints(kpoints: &cfg::Kpoints, lattice: &Lattice) -> Result<KpointSpec, ExitCode> {
    if let Some(mesh) = kpoints.mesh {
        return Ok(KpointSpec::Mesh { mesh, offset: kpoints.offset });
    }
    if let Some(points) = &kpoints.list {
        return Ok(KpointSpec::List { points: points.clone(), weights: None });
    }
    match kpoints.distance {
        Some(distance) => {
            let spec = kpoints_from_distance(lattice, distance, kpoints.force_parity);
            if let Some((mesh, _)) = spec.as_mesh() {
                info!("k-point mesh from distance {}: {}", distance, mesh.iter().join(" "));
            }
            Ok(spec)
        },
        None => Err(ExitCode::ERROR_INVALID_INPUT_KPOINTS),
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    fn mesh_of(spec: KpointSpec) -> [u32; 3] {
        spec.as_mesh().expect("not a mesh").0
    }

    #[test]
    fn silicon() {
        let lattice = Lattice::fcc(5.43);
        assert_eq!(mesh_of(kpoints_from_distance(&lattice, 0.15, false)), [14, 14, 14]);
        assert_eq!(mesh_of(kpoints_from_distance(&lattice, 0.15, true)), [14, 14, 14]);
        assert_eq!(mesh_of(kpoints_from_distance(&lattice, 0.3, false)), [7, 7, 7]);
        assert_eq!(mesh_of(kpoints_from_distance(&lattice, 0.3, true)), [8, 8, 8]);
    }

    #[test]
    fn orthorhombic() {
        let lattice = Lattice::orthorhombic(3.0, 4.0, 5.0);
        assert_eq!(mesh_of(kpoints_from_distance(&lattice, 0.5, false)), [5, 4, 3]);
        assert_eq!(mesh_of(kpoints_from_distance(&lattice, 0.5, true)), [6, 4, 4]);
        assert_eq!(mesh_of(kpoints_from_distance(&lattice, 100.0, false)), [1, 1, 1]);
    }

    #[test]
    fn equal_lengths_give_isotropic_mesh() {
        let s = f64::sqrt(3.0) / 2.0;
        let lattice = Lattice::new(&[[1.0, 0.0, 0.0], [0.5, s, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!(mesh_of(kpoints_from_distance(&lattice, 1.0, false)), [8, 8, 8]);
    }

    #[test]
    fn resolution_order() {
        let lattice = Lattice::fcc(5.43);

        let settings = cfg::Kpoints { mesh: Some([2, 2, 2]), distance: Some(0.15), ..Default::default() };
        assert_eq!(resolve_kpoints(&settings, &lattice), Ok(KpointSpec::mesh([2, 2, 2])));

        let settings = cfg::Kpoints { distance: Some(0.15), ..Default::default() };
        assert_eq!(resolve_kpoints(&settings, &lattice), Ok(KpointSpec::mesh([14, 14, 14])));

        let settings = cfg::Kpoints { list: Some(vec![[0.0; 3]]), ..Default::default() };
        assert_eq!(resolve_kpoints(&settings, &lattice).map(|k| k.as_mesh()), Ok(None));

        let settings = cfg::Kpoints::default();
        assert_eq!(resolve_kpoints(&settings, &lattice), Err(ExitCode::ERROR_INVALID_INPUT_KPOINTS));
    }
}
