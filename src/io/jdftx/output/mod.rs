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

//! Reading the files retrieved from a JDFTx run.
//!
//! A missing or unreadable file is not an error here. Each one is recorded
//! as a [`Signal`] and the affected piece falls back to something sensible,
//! so that a failed run still yields whatever it managed to print. Text that
//! is present but malformed is an error.

mod energy;
mod stdout;
mod dumps;
mod trajectory;

pub use self::energy::{ENERGY_LABELS, ENERGY_UNITS, UNITS_SUFFIX};
pub use self::stdout::{SUCCESS_MARKER, STEP_BANNER};
pub use self::trajectory::Trajectory;

use crate::FailResult;
use crate::kpoints::KpointSet;
use crate::retrieved::{Retrieved, read_text};

use jdftx_structure::Structure;

use std::collections::BTreeMap;

/// Something that went wrong while reading a retrieved file.
#[derive(Debug, Fail, Clone, PartialEq, Eq)]
#[derive(Serialize)]
pub enum Signal {
    #[fail(display = "retrieved files do not include '{}'", _0)]
    Missing(String),
    #[fail(display = "could not read '{}'", _0)]
    ReadError(String),
    #[fail(display = "the stdout transcript does not report that the run finished")]
    UnexpectedFailure,
}

/// A flat output parameter.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize)]
#[serde(untagged)]
pub enum OutputValue {
    Float(f64),
    Int(i64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecodeOptions {
    /// Name of the stdout transcript.
    pub output_filename: String,
    /// Stem of the end-of-run dumps.
    pub prefix: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            output_filename: "aiida.out".into(),
            prefix: "aiida".into(),
        }
    }
}

impl DecodeOptions {
    pub fn dump_filename(&self, var: &str) -> String
    { format!("{}.{}", self.prefix, var) }
}

#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize)]
pub struct Decoded {
    pub parameters: BTreeMap<String, OutputValue>,
    /// Either read from the dumps, or the input structure.
    pub structure: Structure,
    /// Whether `structure` was read from the dumps.
    pub structure_is_new: bool,
    pub trajectory: Trajectory,
    pub kpoints: Option<KpointSet>,
    /// In the order they were raised.
    pub signals: Vec<Signal>,
    /// Whether the transcript reports that the run finished.
    pub success: bool,
}

impl Decoded {
    /// The signal that determines the outcome of the whole decode.
    pub fn last_signal(&self) -> Option<&Signal> { self.signals.last() }
}

/// Read everything available from the retrieved files of a run.
///
/// `input_structure` stands in for the final structure when the dumps
/// cannot be read.
pub fn decode(
    retrieved: &dyn Retrieved,
    input_structure: &Structure,
    options: &DecodeOptions,
) -> FailResult<Decoded> {
    let mut signals = vec![];

    let stdout_file = &options.output_filename;
    let summary = match read_text(retrieved, stdout_file) {
        Ok(text) => {
            let summary = stdout::parse_stdout(&text, stdout_file)?;
            if !summary.success {
                warn!("'{}' does not contain '{}'", stdout_file, SUCCESS_MARKER);
                signals.push(Signal::UnexpectedFailure);
            }
            summary
        },
        Err(signal) => {
            signals.push(signal);
            Default::default()
        },
    };

    let mut parameters = BTreeMap::new();
    if summary.num_steps > 0 || summary.success {
        parameters.insert(
            "number_of_electronic_minimizations".to_string(),
            OutputValue::Int(summary.num_steps as i64),
        );
    }

    let ecomponents_file = options.dump_filename("Ecomponents");
    match read_text(retrieved, &ecomponents_file) {
        Ok(text) => parameters.extend(energy::parse_ecomponents(&text, &ecomponents_file)?),
        Err(signal) => signals.push(signal),
    }

    let lattice_file = options.dump_filename("lattice");
    let ionpos_file = options.dump_filename("ionpos");
    let dumped_texts = read_text(retrieved, &lattice_file)
        .and_then(|lattice| Ok((lattice, read_text(retrieved, &ionpos_file)?)));
    let (structure, structure_is_new) = match dumped_texts {
        Ok((lattice, ionpos)) => {
            let structure = dumps::parse_final_structure(&lattice, &lattice_file, &ionpos, &ionpos_file)?;
            (structure, true)
        },
        Err(signal) => {
            signals.push(signal);
            warn!("using the input structure as the final structure");
            (input_structure.clone(), false)
        },
    };

    let trajectory = trajectory::build_trajectory(&summary, &structure, stdout_file)?;

    let kpts_file = options.dump_filename("kPts");
    let kpoints = match read_text(retrieved, &kpts_file) {
        Ok(text) => Some(dumps::parse_kpoints(&text, &kpts_file, structure.lattice())?),
        Err(signal) => {
            signals.push(signal);
            None
        },
    };

    Ok(Decoded {
        parameters, structure, structure_is_new, trajectory, kpoints, signals,
        success: summary.success,
    })
}
