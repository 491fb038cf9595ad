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

use crate::OutputParsingError;
use super::stdout::StdoutSummary;

use jdftx_structure::Structure;
use jdftx_structure::mat::{M33, V3};

use std::collections::BTreeMap;

/// Frames of a run.
///
/// `cells` and `positions` always have one entry per step id. The named
/// `arrays` are whatever else the transcript recorded per step, and are
/// not required to have that length.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize)]
pub struct Trajectory {
    pub stepids: Vec<usize>,
    pub cells: Vec<M33>,
    pub positions: Vec<Vec<V3>>,
    pub symbols: Vec<String>,
    pub arrays: BTreeMap<String, Vec<f64>>,
}

impl Trajectory {
    pub fn num_frames(&self) -> usize { self.stepids.len() }
}

/// Combine the frames of the transcript with the final structure.
///
/// Without relaxation frames, the trajectory has a single frame equal to
/// the final structure.
pub(crate) fn build_trajectory(
    summary: &StdoutSummary,
    structure: &Structure,
    file: &str,
) -> Result<Trajectory, OutputParsingError> {
    let cells = match summary.cells.is_empty() {
        true => vec![structure.cell()],
        false => summary.cells.clone(),
    };
    let positions = match summary.positions.is_empty() {
        true => vec![structure.to_carts()],
        false => summary.positions.clone(),
    };
    if cells.len() != positions.len() {
        return Err(OutputParsingError::new(file, format!(
            "found {} lattice frames but {} position frames", cells.len(), positions.len(),
        )));
    }

    let symbols = structure.site_kind_names().into_iter().map(|s| s.to_string()).collect();
    let stepids = (0..positions.len()).collect();
    Ok(Trajectory { stepids, cells, positions, symbols, arrays: summary.energies.clone() })
}
