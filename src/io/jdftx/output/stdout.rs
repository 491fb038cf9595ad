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

//! The stdout transcript of a JDFTx run.
//!
//! Each electronic minimization starts with a banner. Between banners, a
//! step may print its energy components, and a lattice or ionic relaxation
//! step also prints the current cell and ionic positions:
//!
//! ```text
//! # Lattice vectors:
//! R =
//! [      10.2612            0            0  ]
//! [            0      10.2612            0  ]
//! [            0            0      10.2612  ]
//!
//! # Ionic positions in lattice coordinates:
//! ion Si   0.000000000000000   0.000000000000000   0.000000000000000 1
//! ion Si   0.250000000000000   0.250000000000000   0.250000000000000 1
//! ```

use crate::OutputParsingError;
use crate::units::BOHR_TO_ANGSTROM;
use super::energy::energy_from_line;

use jdftx_structure::mat::{self, M33, V3};

use std::collections::BTreeMap;

pub const SUCCESS_MARKER: &str = "Done!";
pub const STEP_BANNER: &str = "-------- Electronic minimization -----------";

const ENERGY_HEADER: &str = "# Energy components:";
const LATTICE_HEADER: &str = "# Lattice vectors:";
const POSITIONS_HEADER: &str = "# Ionic positions in lattice coordinates:";

/// Everything collected from one transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StdoutSummary {
    /// Whether the run reached its end.
    pub success: bool,
    pub num_steps: usize,
    /// One value per printed energy block, per component.
    pub energies: BTreeMap<String, Vec<f64>>,
    /// Angstrom. One per frame of `positions`.
    pub cells: Vec<M33>,
    /// Cartesian angstrom. Only relaxation steps contribute a frame.
    pub positions: Vec<Vec<V3>>,
}

/// What was seen in a single step.
#[derive(Debug, Default)]
struct StepScan {
    /// Set once a lattice block is seen; this is what marks a relaxation step.
    lattice: Option<M33>,
    fracs: Option<Vec<V3>>,
}

impl StepScan {
    fn is_relax_step(&self) -> bool { self.lattice.is_some() }
}

pub(crate) fn parse_stdout(text: &str, file: &str) -> Result<StdoutSummary, OutputParsingError> {
    let mut out = StdoutSummary::default();
    out.success = text.lines().any(|line| line.contains(SUCCESS_MARKER));

    for (step_index, step) in text.split(STEP_BANNER).skip(1).enumerate() {
        let lines = step.split('\n').collect::<Vec<_>>();
        let mut scan = StepScan::default();

        for (i, &line) in lines.iter().enumerate() {
            if line.contains(ENERGY_HEADER) {
                for &line in lines[i..].iter().take_while(|l| !l.trim().is_empty()) {
                    if let Some((key, value)) = energy_from_line(line, file)? {
                        out.energies.entry(key.to_string()).or_insert_with(Vec::new).push(value);
                    }
                }
            }

            if line.contains(LATTICE_HEADER) {
                scan.lattice = Some(read_lattice_block(&lines, i, file)?);
            }

            if line.contains(POSITIONS_HEADER) {
                let fracs = lines[i + 1..].iter()
                    .take_while(|l| !l.trim().is_empty())
                    .map(|l| read_position_line(l, file))
                    .collect::<Result<Vec<_>, _>>()?;
                scan.fracs = Some(fracs);
            }
        }

        if scan.is_relax_step() {
            match (scan.lattice, scan.fracs) {
                (Some(cell), Some(fracs)) => {
                    out.positions.push(mat::dot_n3_33(&fracs, &cell));
                    out.cells.push(cell);
                },
                _ => warn!("step {} of '{}' printed a lattice but no ionic positions", step_index, file),
            }
        } else if scan.fracs.is_some() {
            trace!("step {} of '{}' has ionic positions but no lattice; no frame recorded", step_index, file);
        }
        out.num_steps += 1;
    }

    info!(
        "'{}': {} electronic minimizations, {} relaxation frames, {}",
        file, out.num_steps, out.positions.len(),
        if out.success { "finished" } else { "did not finish" },
    );
    Ok(out)
}

/// The three rows that follow the header and the `R =` line, in angstrom.
fn read_lattice_block(lines: &[&str], header: usize, file: &str) -> Result<M33, OutputParsingError> {
    let mut cell = [[0.0; 3]; 3];
    for (k, row) in cell.iter_mut().enumerate() {
        let line = match lines.get(header + 2 + k) {
            Some(line) => line,
            None => return Err(OutputParsingError::new(file, "lattice vectors are cut off")),
        };
        let v = read_floats(line, 1, file)?;
        for (x, y) in row.iter_mut().zip(&v) {
            *x = y * BOHR_TO_ANGSTROM;
        }
    }
    Ok(cell)
}

/// Fractional coordinates from an `ion` line.
fn read_position_line(line: &str, file: &str) -> Result<V3, OutputParsingError>
{ read_floats(line, 2, file) }

/// Three floats, starting at whitespace-separated field `start`.
pub(crate) fn read_floats(line: &str, start: usize, file: &str) -> Result<V3, OutputParsingError> {
    let words = line.split_whitespace().skip(start).take(3).collect::<Vec<_>>();
    if words.len() < 3 {
        return Err(OutputParsingError::new(file, format!("expected three numbers in {:?}", line)));
    }
    let mut out = [0.0; 3];
    for (x, word) in out.iter_mut().zip(words) {
        *x = word.parse().map_err(|_| {
            OutputParsingError::new(file, format!("could not parse {:?} in {:?}", word, line))
        })?;
    }
    Ok(out)
}
