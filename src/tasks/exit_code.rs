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

//! Numbered outcomes of a calculation, as reported to whatever runs it.

use jdftx_io::Signal;

use std::fmt;

/// A non-zero outcome. Each one has a fixed status, label and message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(Serialize)]
pub struct ExitCode {
    pub status: u32,
    pub label: &'static str,
    pub message: &'static str,
}

impl ExitCode {
    pub const ERROR_OUTPUT_STDOUT_MISSING: ExitCode = ExitCode {
        status: 200,
        label: "ERROR_OUTPUT_STDOUT_MISSING",
        message: "The retrieved folder did not contain the required stdout output file.",
    };

    pub const ERROR_OUTPUT_STDOUT_READ: ExitCode = ExitCode {
        status: 201,
        label: "ERROR_OUTPUT_STDOUT_READ",
        message: "The stdout output file could not be read.",
    };

    pub const ERROR_UNEXPECTED_PARSER_EXCEPTION: ExitCode = ExitCode {
        status: 202,
        label: "ERROR_UNEXPECTED_PARSER_EXCEPTION",
        message: "The parser raised an unexpected exception.",
    };

    /// Raised before submission, so it shares a status with the parser code above.
    pub const ERROR_INVALID_INPUT_KPOINTS: ExitCode = ExitCode {
        status: 202,
        label: "ERROR_INVALID_INPUT_KPOINTS",
        message: "Neither the `kpoints` nor the `kpoints_distance` input was specified.",
    };

    pub fn from_signal(signal: &Signal) -> ExitCode {
        match signal {
            Signal::Missing(_) => ExitCode::ERROR_OUTPUT_STDOUT_MISSING,
            Signal::ReadError(_) => ExitCode::ERROR_OUTPUT_STDOUT_READ,
            Signal::UnexpectedFailure => ExitCode::ERROR_UNEXPECTED_PARSER_EXCEPTION,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { write!(f, "[{}] {}: {}", self.status, self.label, self.message) }
}

impl failure::Fail for ExitCode {}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn signals() {
        assert_eq!(ExitCode::from_signal(&Signal::Missing("aiida.kPts".into())).status, 200);
        assert_eq!(ExitCode::from_signal(&Signal::ReadError("aiida.out".into())).status, 201);
        assert_eq!(ExitCode::from_signal(&Signal::UnexpectedFailure).status, 202);
    }

    #[test]
    fn display() {
        assert_eq!(
            ExitCode::ERROR_OUTPUT_STDOUT_READ.to_string(),
            "[201] ERROR_OUTPUT_STDOUT_READ: The stdout output file could not be read.",
        );
    }
}
