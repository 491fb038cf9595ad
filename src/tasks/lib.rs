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

//! Runs JDFTx jobs on top of `jdftx-io`.
//!
//! The library half binds the encoder and decoder to a job directory: it turns
//! user settings into an input file plus a list of files to stage, and turns
//! the retrieved files of a finished run into outputs and an exit code.
//! The `entry_points` are what the binaries in the root package call.

#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[macro_use] extern crate serde_derive;
#[macro_use] extern crate jdftx_clap;

pub type FailResult<T> = Result<T, failure::Error>;

mod ui {
    pub mod logging;
    pub mod cfg_merging;
    pub mod cli_deserialize;
}

pub mod exit_code;
pub mod cmd;
pub mod entry_points;

pub use crate::exit_code::ExitCode;
pub use crate::cmd::{CalcJobInputs, CalcInfo, CodeInfo, ParsedOutputs, ParseOutcome};
pub use crate::cmd::{prepare_for_submission, stage_local_copies, parse, kpoints_from_distance, resolve_kpoints};
