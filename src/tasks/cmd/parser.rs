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

//! Turning the files retrieved from a run into outputs and an exit code.

use crate::FailResult;
use crate::exit_code::ExitCode;

use jdftx_io::{DecodeOptions, KpointSet, OutputValue, Retrieved, Trajectory};
use jdftx_structure::Structure;
use jdftx_tasks_config as cfg;

use std::collections::BTreeMap;

/// The outputs of a run. Absent pieces had nothing new to report.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize)]
pub struct ParsedOutputs {
    pub output_parameters: BTreeMap<String, OutputValue>,
    /// Only present when read from the dumps.
    pub output_structure: Option<Structure>,
    pub output_kpoints: Option<KpointSet>,
    pub output_trajectory: Trajectory,
}

#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize)]
pub struct ParseOutcome {
    pub outputs: ParsedOutputs,
    /// Determined by the last problem encountered, if any.
    pub exit_code: Option<ExitCode>,
}

pub fn decode_options(options: &cfg::Options) -> DecodeOptions {
    DecodeOptions {
        output_filename: options.output_filename.clone(),
        prefix: options.prefix.clone(),
    }
}

/// Parse the retrieved files of a run started from `input_structure`.
///
/// Missing or unreadable files do not make this fail; they produce an
/// exit code alongside whatever outputs could still be read.
pub fn parse(
    retrieved: &dyn Retrieved,
    input_structure: &Structure,
    options: &cfg::Options,
) -> FailResult<ParseOutcome> {
    let decoded = jdftx_io::decode(retrieved, input_structure, &decode_options(options))?;

    for signal in &decoded.signals {
        debug!("raised while parsing: {}", signal);
    }
    let exit_code = decoded.last_signal().map(ExitCode::from_signal);

    trace!("trajectory has {} frames", decoded.trajectory.num_frames());
    let outputs = ParsedOutputs {
        output_parameters: decoded.parameters,
        output_structure: match decoded.structure_is_new {
            true => Some(decoded.structure),
            false => None,
        },
        output_kpoints: decoded.kpoints,
        output_trajectory: decoded.trajectory,
    };
    Ok(ParseOutcome { outputs, exit_code })
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use jdftx_io::RetrievedMap;
    use jdftx_io::output::STEP_BANNER;
    use jdftx_structure::Lattice;

    fn input_structure() -> Structure {
        let mut structure = Structure::new(Lattice::cubic(5.0));
        structure.append_atom([0.0; 3], "Si", None).unwrap();
        structure
    }

    fn stdout(done: bool) -> String {
        format!("\
Initialization completed successfully at t[s]:      0.41
{}
# Energy components:
   Eewald =       -8.3978
       EH =        0.5758
     Etot =       -7.8220

{}", STEP_BANNER, if done { "Done!\n" } else { "" })
    }

    #[test]
    fn missing_stdout() {
        let outcome = parse(&RetrievedMap::new(), &input_structure(), &Default::default()).unwrap();
        assert_eq!(outcome.exit_code, Some(ExitCode::ERROR_OUTPUT_STDOUT_MISSING));
        assert!(outcome.outputs.output_parameters.is_empty());
        assert_eq!(outcome.outputs.output_structure, None);
        assert_eq!(outcome.outputs.output_kpoints, None);
    }

    #[test]
    fn unfinished_run() {
        let mut map = RetrievedMap::new();
        map.insert("aiida.out", stdout(false));
        map.insert("aiida.Ecomponents", "Etot = -7.8\n");
        map.insert("aiida.lattice", "lattice \\\n 9.44863 0 0 \\\n 0 9.44863 0 \\\n 0 0 9.44863\n");
        map.insert("aiida.ionpos", "# Ionic positions in cartesian coordinates:\nion Si 0 0 0 1\n");
        map.insert("aiida.kPts", "[0 0 0] 1.0\n");

        let outcome = parse(&map, &input_structure(), &Default::default()).unwrap();
        assert_eq!(outcome.exit_code, Some(ExitCode::ERROR_UNEXPECTED_PARSER_EXCEPTION));
        assert!(outcome.outputs.output_structure.is_some());
        assert!(outcome.outputs.output_kpoints.is_some());
    }

    #[test]
    fn clean_run() {
        let mut map = RetrievedMap::new();
        map.insert("run.log", stdout(true));
        map.insert("aiida.Ecomponents", "Etot = -7.8\n");
        map.insert("aiida.lattice", "lattice \\\n 9.44863 0 0 \\\n 0 9.44863 0 \\\n 0 0 9.44863\n");
        map.insert("aiida.ionpos", "# Ionic positions in cartesian coordinates:\nion Si 0 0 0 1\n");
        map.insert("aiida.kPts", "[0 0 0] 1.0\n");

        let options = cfg::Options { output_filename: "run.log".into(), ..Default::default() };
        let outcome = parse(&map, &input_structure(), &options).unwrap();
        assert_eq!(outcome.exit_code, None);

        let outputs = &outcome.outputs;
        assert_eq!(outputs.output_parameters["number_of_electronic_minimizations"], OutputValue::Int(1));
        assert_eq!(outputs.output_trajectory.num_frames(), 1);
        assert_eq!(outputs.output_structure.as_ref().map(|s| s.num_atoms()), Some(1));
    }
}
