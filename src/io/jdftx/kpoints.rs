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

use jdftx_structure::Lattice;
use jdftx_structure::mat::V3;

/// K-points as supplied to the encoder.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KpointSpec {
    /// A Monkhorst-Pack style folding with a fractional offset.
    Mesh {
        mesh: [u32; 3],
        #[serde(default)]
        offset: [f64; 3],
    },
    /// An explicit list of fractional points, e.g. a band path.
    ///
    /// JDFTx input files written by this crate cannot express these.
    List {
        points: Vec<V3>,
        weights: Option<Vec<f64>>,
    },
}

impl KpointSpec {
    pub fn mesh(mesh: [u32; 3]) -> Self
    { KpointSpec::Mesh { mesh, offset: [0.0; 3] } }

    /// The mesh and offset, if this spec is a mesh.
    pub fn as_mesh(&self) -> Option<([u32; 3], [f64; 3])> {
        match *self {
            KpointSpec::Mesh { mesh, offset } => Some((mesh, offset)),
            KpointSpec::List { .. } => None,
        }
    }
}

/// K-points read back from a run, in fractional coordinates of `cell`'s
/// reciprocal lattice.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize)]
pub struct KpointSet {
    pub cell: Lattice,
    pub points: Vec<V3>,
    pub weights: Vec<f64>,
}

impl KpointSet {
    pub fn len(&self) -> usize { self.points.len() }
    pub fn is_empty(&self) -> bool { self.points.is_empty() }

    /// Sum of the weights. JDFTx normalizes these to 1 (or 2 without spin).
    pub fn total_weight(&self) -> f64 { self.weights.iter().sum() }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn yaml_forms() {
        let spec: KpointSpec = serde_yaml::from_str("mesh: { mesh: [4, 4, 2] }").unwrap();
        assert_eq!(spec.as_mesh(), Some(([4, 4, 2], [0.0; 3])));

        let spec: KpointSpec = serde_yaml::from_str("mesh: { mesh: [1, 1, 1], offset: [0.5, 0.5, 0.5] }").unwrap();
        assert_eq!(spec.as_mesh(), Some(([1, 1, 1], [0.5; 3])));

        let spec: KpointSpec = serde_yaml::from_str("list: { points: [[0, 0, 0], [0.5, 0, 0]] }").unwrap();
        assert_eq!(spec.as_mesh(), None);
    }
}
