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

//! Translation between structured inputs and the text files of JDFTx.
//!
//! * [`input::encode`] renders a structure, pseudopotentials, a k-point mesh and
//!   a parameter tree into the text of a JDFTx input file.
//! * [`output::decode`] reads the stdout transcript and the end-of-run dump
//!   files back into energies, a trajectory, a final structure and k-points.
//!
//! Both are pure functions of their inputs. Staging files and writing the
//! input file to disk is the caller's job.

#[macro_use] extern crate log;
#[macro_use] extern crate failure;
#[macro_use] extern crate serde_derive;
#[cfg(test)]
#[macro_use] extern crate jdftx_assert_close;
#[cfg(test)]
#[macro_use] extern crate pretty_assertions;

pub type FailResult<T> = Result<T, failure::Error>;

/// The caller supplied an input that cannot be written as a JDFTx input file.
///
/// Raised before any text is produced.
#[derive(Debug, Fail, Clone, PartialEq)]
#[fail(display = "invalid input: {}", message)]
pub struct InputValidationError {
    pub message: String,
}

impl InputValidationError {
    pub fn new(message: impl Into<String>) -> Self
    { InputValidationError { message: message.into() } }
}

/// Text in an output file matched a known layout but its contents were unusable.
#[derive(Debug, Fail, Clone, PartialEq)]
#[fail(display = "error while parsing '{}': {}", file, message)]
pub struct OutputParsingError {
    pub file: String,
    pub message: String,
}

impl OutputParsingError {
    pub(crate) fn new(file: &str, message: impl Into<String>) -> Self
    { OutputParsingError { file: file.to_string(), message: message.into() } }
}

macro_rules! validation_bail {
    ($($arg:tt)+) => {
        return Err(crate::InputValidationError::new(format!($($arg)+)))
    };
}

pub mod units;
pub mod params;
pub mod kpoints;
pub mod input;
pub mod retrieved;
pub mod output;

pub use crate::params::{Parameters, ParamValue};
pub use crate::kpoints::{KpointSpec, KpointSet};
pub use crate::input::{encode, Encoded, EncodeOptions, LocalCopy, Pseudopotential};
pub use crate::retrieved::{Retrieved, RetrievedDir, RetrievedMap};
pub use crate::output::{decode, DecodeOptions, Decoded, Signal, Trajectory, OutputValue};
