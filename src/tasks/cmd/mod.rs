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

//! Binding the encoder and decoder to a job directory.

pub mod kpoints;
pub mod calc_job;
pub mod parser;

pub use self::kpoints::{kpoints_from_distance, resolve_kpoints};
pub use self::calc_job::{CalcJobInputs, CalcInfo, CodeInfo, prepare_for_submission, stage_local_copies};
pub use self::parser::{ParsedOutputs, ParseOutcome, parse};
