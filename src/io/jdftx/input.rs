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

//! Writing JDFTx input files.
//!
//! The file is a sequence of blocks, each followed by a blank line:
//!
//! ```text
//! lattice \
//!       10.2612...       0.0000...       0.0000... \
//!        ...
//!
//! ion-species ./pseudo/Si.upf
//!
//! coords-type cartesian
//! ion Si         0.0000...  0.0000...  0.0000... 1 1 1
//!
//! kpoint-folding 4 4 4
//! kpoint  0.0  0.0  0.0  1.0
//!
//! elec-cutoff                    20 100
//!
//! dump-name aiida.$VAR
//! dump End ElecDensity Kpoints Ecomponents Lattice IonicPositions
//! ```

use crate::InputValidationError;
use crate::units::ANGSTROM_TO_BOHR;
use crate::kpoints::KpointSpec;
use crate::params::{Parameters, ParamValue};

use jdftx_structure::{Structure, Lattice};
use jdftx_structure::mat::V3;

use std::collections::BTreeMap;
use std::fmt;

/// A pseudopotential file known to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Pseudopotential {
    /// Opaque identity of the file contents (a uuid, or a path on disk).
    pub source: String,
    /// Name the file should have inside the pseudo subfolder.
    pub filename: String,
}

/// A file the caller must place next to the input file before running.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(Serialize, Deserialize)]
pub struct LocalCopy {
    pub source: String,
    pub filename: String,
    /// Relative to the directory holding the input file.
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodeOptions {
    /// Per site, whether each cartesian axis is held fixed.
    pub fixed_coords: Option<Vec<[bool; 3]>>,
    pub pseudo_subfolder: String,
    /// Stem of the files dumped at the end of the run.
    pub prefix: String,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            fixed_coords: None,
            pseudo_subfolder: "./pseudo/".into(),
            prefix: "aiida".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Encoded {
    pub text: String,
    pub local_copy_list: Vec<LocalCopy>,
}

/// Render the input file.
///
/// Structure lengths are in angstrom. `pseudos` is keyed by kind name.
/// Nothing is touched on disk.
pub fn encode(
    structure: &Structure,
    pseudos: &BTreeMap<String, Pseudopotential>,
    kpoints: &KpointSpec,
    parameters: &Parameters,
    options: &EncodeOptions,
) -> Result<Encoded, InputValidationError> {
    let lattice = LatticeBlock(structure.lattice());
    let (species, local_copy_list) = species_block(structure, pseudos, &options.pseudo_subfolder)?;
    let positions = positions_block(structure, options.fixed_coords.as_ref().map(|v| &v[..]))?;
    let kpoints = kpoint_block(kpoints)?;
    let control = ControlBlock(parameters);
    let dump = DumpBlock(&options.prefix);

    let text = format!(
        "{}\n{}\n{}\n{}\n{}\n{}\n",
        lattice, species, positions, kpoints, control, dump,
    );
    Ok(Encoded { text, local_copy_list })
}

//--------------------------------------------------------------------------------------

struct LatticeBlock<'a>(&'a Lattice);

impl<'a> fmt::Display for LatticeBlock<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "lattice \\ ")?;
        for v in self.0.vectors() {
            let [x, y, z] = to_bohr(v);
            writeln!(f, "{:18.10} {:18.10} {:18.10} \\ ", x, y, z)?;
        }
        Ok(())
    }
}

fn to_bohr(v: &V3) -> V3 {
    [v[0] * ANGSTROM_TO_BOHR, v[1] * ANGSTROM_TO_BOHR, v[2] * ANGSTROM_TO_BOHR]
}

fn join_subfolder(subfolder: &str, filename: &str) -> String {
    match subfolder.ends_with('/') {
        true => format!("{}{}", subfolder, filename),
        false => format!("{}/{}", subfolder, filename),
    }
}

fn species_block(
    structure: &Structure,
    pseudos: &BTreeMap<String, Pseudopotential>,
    subfolder: &str,
) -> Result<(String, Vec<LocalCopy>), InputValidationError> {
    let mut text = String::new();
    let mut copies: Vec<LocalCopy> = vec![];

    for kind in structure.kinds() {
        if kind.is_alloy() || kind.has_vacancies() {
            validation_bail!(
                "Kind '{}' is an alloy or has vacancies. \
                 This is not allowed for jdftx input structures.",
                kind.name(),
            );
        }

        let pseudo = match pseudos.get(kind.name()) {
            Some(pseudo) => pseudo,
            None => validation_bail!("no pseudopotential was given for kind '{}'", kind.name()),
        };

        let existing = copies.iter().find(|c| c.source == pseudo.source).map(|c| c.destination.clone());
        let destination = match existing {
            Some(destination) => {
                debug!("kind '{}' shares pseudopotential '{}'", kind.name(), destination);
                destination
            },
            None => {
                if let Some(clash) = copies.iter().find(|c| c.filename == pseudo.filename) {
                    validation_bail!(
                        "pseudopotentials '{}' and '{}' would both be staged as '{}'",
                        clash.source, pseudo.source, pseudo.filename,
                    );
                }
                let destination = join_subfolder(subfolder, &pseudo.filename);
                debug!("staging pseudopotential '{}' as '{}'", pseudo.source, destination);
                copies.push(LocalCopy {
                    source: pseudo.source.clone(),
                    filename: pseudo.filename.clone(),
                    destination: destination.clone(),
                });
                destination
            },
        };
        text += &format!("ion-species {}\n", destination);
    }
    Ok((text, copies))
}

fn positions_block(
    structure: &Structure,
    fixed_coords: Option<&[[bool; 3]]>,
) -> Result<String, InputValidationError> {
    if let Some(fixed) = fixed_coords {
        if fixed.len() != structure.num_atoms() {
            validation_bail!(
                "Input structure contains {} sites, but fixed_coords has length {}",
                structure.num_atoms(), fixed.len(),
            );
        }
    }

    let mut text = String::from("coords-type cartesian\n");
    for (i, site) in structure.sites().iter().enumerate() {
        let [x, y, z] = to_bohr(&site.position);
        let fixed = fixed_coords.map_or([false; 3], |f| f[i]);
        // JDFTx wants 1 for a coordinate that may move
        let [fx, fy, fz] = [!fixed[0] as u8, !fixed[1] as u8, !fixed[2] as u8];
        text += &format!(
            "ion {:<6} {:18.10} {:18.10} {:18.10} {} {} {}\n",
            site.kind_name, x, y, z, fx, fy, fz,
        );
    }
    Ok(text)
}

fn kpoint_block(kpoints: &KpointSpec) -> Result<String, InputValidationError> {
    let (mesh, offset) = match kpoints.as_mesh() {
        Some(x) => x,
        None => validation_bail!("No valid kpoints have been found (an explicit mesh is required)"),
    };
    Ok(format!(
        "kpoint-folding {} {} {}\nkpoint {:4.1} {:4.1} {:4.1}  1.0\n",
        mesh[0], mesh[1], mesh[2], offset[0], offset[1], offset[2],
    ))
}

struct ControlBlock<'a>(&'a Parameters);

impl<'a> fmt::Display for ControlBlock<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in self.0.iter() {
            match value {
                ParamValue::Scalar(s) => writeln!(f, "{:<30} {}", key, s)?,
                ParamValue::Block(items) => {
                    writeln!(f, "{:<30} \\ ", key)?;
                    for (subkey, s) in items {
                        writeln!(f, "    {:<30} {} \\ ", subkey, s)?;
                    }
                },
            }
        }
        Ok(())
    }
}

struct DumpBlock<'a>(&'a str);

impl<'a> fmt::Display for DumpBlock<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "dump-name {}.$VAR", self.0)?;
        writeln!(f, "dump End ElecDensity Kpoints Ecomponents Lattice IonicPositions")
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;
    use jdftx_structure::Kind;

    fn pseudo(source: &str, filename: &str) -> Pseudopotential
    { Pseudopotential { source: source.into(), filename: filename.into() } }

    fn silicon() -> Structure {
        let mut structure = Structure::new(Lattice::cubic(2.0));
        structure.append_atom([0.0, 0.0, 0.0], "Si", None).unwrap();
        structure.append_atom([0.5, 0.5, 0.5], "Si", None).unwrap();
        structure
    }

    fn si_pseudos() -> BTreeMap<String, Pseudopotential> {
        vec![("Si".to_string(), pseudo("uuid-si", "Si.upf"))].into_iter().collect()
    }

    fn encode_default(structure: &Structure, pseudos: &BTreeMap<String, Pseudopotential>) -> Result<Encoded, InputValidationError> {
        encode(structure, pseudos, &KpointSpec::mesh([2, 2, 2]), &Parameters::new(), &EncodeOptions::default())
    }

    #[test]
    fn full_file() {
        let mut params = Parameters::new();
        params.insert("elec-cutoff", "20 100");
        params.insert_block("lattice-minimize", vec![("nIterations", 10)]);

        let encoded = encode(
            &silicon(), &si_pseudos(), &KpointSpec::mesh([4, 4, 4]), &params, &EncodeOptions::default(),
        ).unwrap();

        let expected = concat!(
            "lattice \\ \n",
            "      3.7794519772       0.0000000000       0.0000000000 \\ \n",
            "      0.0000000000       3.7794519772       0.0000000000 \\ \n",
            "      0.0000000000       0.0000000000       3.7794519772 \\ \n",
            "\n",
            "ion-species ./pseudo/Si.upf\n",
            "\n",
            "coords-type cartesian\n",
            "ion Si           0.0000000000       0.0000000000       0.0000000000 1 1 1\n",
            "ion Si           0.9448629943       0.9448629943       0.9448629943 1 1 1\n",
            "\n",
            "kpoint-folding 4 4 4\n",
            "kpoint  0.0  0.0  0.0  1.0\n",
            "\n",
            "elec-cutoff                    20 100\n",
            "lattice-minimize               \\ \n",
            "    nIterations                    10 \\ \n",
            "\n",
            "dump-name aiida.$VAR\n",
            "dump End ElecDensity Kpoints Ecomponents Lattice IonicPositions\n",
            "\n",
        );
        assert_eq!(encoded.text, expected);
        assert_eq!(encoded.local_copy_list, vec![LocalCopy {
            source: "uuid-si".into(),
            filename: "Si.upf".into(),
            destination: "./pseudo/Si.upf".into(),
        }]);
    }

    #[test]
    fn every_axis_free_without_fixed_coords() {
        let text = encode_default(&silicon(), &si_pseudos()).unwrap().text;
        let ion_lines = text.lines().filter(|l| l.starts_with("ion ")).collect::<Vec<_>>();
        assert_eq!(ion_lines.len(), 2);
        for line in ion_lines {
            assert!(line.ends_with(" 1 1 1"), "{:?}", line);
        }
    }

    #[test]
    fn fixed_flags_are_inverted() {
        let options = EncodeOptions {
            fixed_coords: Some(vec![[true, true, true], [false, true, false]]),
            ..Default::default()
        };
        let text = encode(&silicon(), &si_pseudos(), &KpointSpec::mesh([1, 1, 1]), &Parameters::new(), &options)
            .unwrap().text;
        let ion_lines = text.lines().filter(|l| l.starts_with("ion ")).collect::<Vec<_>>();
        assert!(ion_lines[0].ends_with(" 0 0 0"));
        assert!(ion_lines[1].ends_with(" 1 0 1"));
    }

    #[test]
    fn fixed_coords_wrong_length() {
        let options = EncodeOptions {
            fixed_coords: Some(vec![[true; 3]]),
            ..Default::default()
        };
        let err = encode(&silicon(), &si_pseudos(), &KpointSpec::mesh([1, 1, 1]), &Parameters::new(), &options)
            .unwrap_err();
        assert!(err.message.contains("contains 2 sites"), "{}", err);
    }

    #[test]
    fn shared_source_is_copied_once() {
        let mut structure = Structure::new(Lattice::cubic(3.0));
        structure.append_atom([0.0; 3], "Si", Some("Si1")).unwrap();
        structure.append_atom([1.5; 3], "Si", Some("Si2")).unwrap();
        let pseudos = vec![
            ("Si1".to_string(), pseudo("uuid-si", "Si.upf")),
            ("Si2".to_string(), pseudo("uuid-si", "Si.upf")),
        ].into_iter().collect();

        let encoded = encode_default(&structure, &pseudos).unwrap();
        assert_eq!(encoded.local_copy_list.len(), 1);
        let species = encoded.text.lines().filter(|l| l.starts_with("ion-species")).collect::<Vec<_>>();
        assert_eq!(species, vec!["ion-species ./pseudo/Si.upf"; 2]);
    }

    #[test]
    fn distinct_sources_same_filename() {
        let mut structure = Structure::new(Lattice::cubic(3.0));
        structure.append_atom([0.0; 3], "Si", Some("Si1")).unwrap();
        structure.append_atom([1.5; 3], "Si", Some("Si2")).unwrap();
        let pseudos = vec![
            ("Si1".to_string(), pseudo("uuid-a", "Si.upf")),
            ("Si2".to_string(), pseudo("uuid-b", "Si.upf")),
        ].into_iter().collect();

        assert!(encode_default(&structure, &pseudos).is_err());
    }

    #[test]
    fn missing_pseudo() {
        let err = encode_default(&silicon(), &BTreeMap::new()).unwrap_err();
        assert!(err.message.contains("'Si'"));
    }

    #[test]
    fn alloys_and_vacancies() {
        let lattice = Lattice::cubic(3.0);
        let site = jdftx_structure::Site { kind_name: "X".into(), position: [0.0; 3] };
        let pseudos = vec![("X".to_string(), pseudo("x", "X.upf"))].into_iter().collect();

        let alloy = Kind::new("X", vec!["Si".into(), "Ge".into()], vec![0.5, 0.5]).unwrap();
        let structure = Structure::from_parts(lattice.clone(), vec![alloy], vec![site.clone()]).unwrap();
        assert!(encode_default(&structure, &pseudos).is_err());

        let vacancy = Kind::new("X", vec!["Si".into()], vec![0.9]).unwrap();
        let structure = Structure::from_parts(lattice, vec![vacancy], vec![site]).unwrap();
        assert!(encode_default(&structure, &pseudos).is_err());
    }

    #[test]
    fn explicit_list_is_rejected() {
        let kpoints = KpointSpec::List { points: vec![[0.0; 3]], weights: None };
        let result = encode(&silicon(), &si_pseudos(), &kpoints, &Parameters::new(), &EncodeOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn prefix_and_subfolder() {
        let options = EncodeOptions {
            pseudo_subfolder: "pp".into(),
            prefix: "run".into(),
            ..Default::default()
        };
        let encoded = encode(&silicon(), &si_pseudos(), &KpointSpec::mesh([1, 1, 1]), &Parameters::new(), &options)
            .unwrap();
        assert!(encoded.text.contains("ion-species pp/Si.upf\n"));
        assert!(encoded.text.contains("dump-name run.$VAR\n"));
        assert_eq!(encoded.local_copy_list[0].destination, "pp/Si.upf");
    }
}
