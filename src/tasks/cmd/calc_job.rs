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

//! Preparing a directory from which JDFTx can be run.

use crate::FailResult;
use crate::cmd::kpoints::resolve_kpoints;

use jdftx_fs_util as fsx;
use jdftx_io::{EncodeOptions, KpointSpec, LocalCopy, Parameters, Pseudopotential};
use jdftx_structure::{Kind, Lattice, Site, Structure};
use jdftx_tasks_config::{self as cfg, ValidatedSettings};

use std::collections::BTreeMap;
use std::path::Path;

/// Everything needed to write an input file, in library types.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcJobInputs {
    pub structure: Structure,
    pub pseudos: BTreeMap<String, Pseudopotential>,
    pub kpoints: KpointSpec,
    pub parameters: Parameters,
    pub fixed_coords: Option<Vec<[bool; 3]>>,
    pub options: cfg::Options,
}

/// How to invoke the code.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize)]
pub struct CodeInfo {
    pub cmdline_params: Vec<String>,
    pub withmpi: bool,
}

/// What a scheduler needs to know to run the job and collect its results.
#[derive(Debug, Clone, PartialEq)]
#[derive(Serialize)]
pub struct CalcInfo {
    pub codes_info: Vec<CodeInfo>,
    /// Files the scheduler must copy into the folder before running.
    pub local_copy_list: Vec<LocalCopy>,
    /// Files to bring back after the run, relative to the folder.
    pub retrieve_list: Vec<String>,
}

impl CalcJobInputs {
    pub fn from_settings(validated: &ValidatedSettings) -> FailResult<Self> {
        let settings = &validated.settings;
        let structure = structure_from_settings(&settings.structure)?;
        let kpoints = resolve_kpoints(&settings.kpoints, structure.lattice())?;

        let mut pseudos = BTreeMap::new();
        for (kind, pseudo) in &settings.pseudos {
            pseudos.insert(kind.clone(), pseudopotential_from_settings(pseudo)?);
        }

        Ok(CalcJobInputs {
            structure, pseudos, kpoints,
            parameters: settings.parameters.clone(),
            fixed_coords: validated.fixed_coords.clone(),
            options: settings.options.clone(),
        })
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            fixed_coords: self.fixed_coords.clone(),
            pseudo_subfolder: self.options.pseudo_subfolder.clone(),
            prefix: self.options.prefix.clone(),
        }
    }
}

pub(crate) fn structure_from_settings(settings: &cfg::StructureSettings) -> FailResult<Structure> {
    let lattice = Lattice::new(&settings.cell);
    match &settings.kinds {
        None => {
            let mut structure = Structure::new(lattice);
            for site in &settings.sites {
                structure.append_atom(site.position, &site.symbol, site.kind.as_ref().map(|s| &s[..]))?;
            }
            Ok(structure)
        },
        Some(kinds) => {
            let kinds = kinds.iter()
                .map(|k| Kind::new(k.name.clone(), k.symbols.clone(), k.weights.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            let sites = settings.sites.iter()
                .map(|site| Site {
                    kind_name: site.kind.clone().unwrap_or_else(|| site.symbol.clone()),
                    position: site.position,
                })
                .collect();
            Structure::from_parts(lattice, kinds, sites)
        },
    }
}

fn pseudopotential_from_settings(pseudo: &cfg::Pseudo) -> FailResult<Pseudopotential> {
    let filename = match &pseudo.filename {
        Some(filename) => filename.clone(),
        None => match pseudo.path.file_name().and_then(|s| s.to_str()) {
            Some(name) => name.to_string(),
            None => bail!("cannot take a file name from pseudopotential path '{}'", pseudo.path.display()),
        },
    };
    Ok(Pseudopotential { source: pseudo.path.display().to_string(), filename })
}

/// Write the input file into `folder` and describe how to run it.
///
/// The pseudo subfolder is created empty; see [`stage_local_copies`].
pub fn prepare_for_submission(inputs: &CalcJobInputs, folder: &Path) -> FailResult<CalcInfo> {
    let options = &inputs.options;

    let encoded = jdftx_io::encode(
        &inputs.structure,
        &inputs.pseudos,
        &inputs.kpoints,
        &inputs.parameters,
        &inputs.encode_options(),
    )?;

    fsx::create_dir_all(folder.join(&options.pseudo_subfolder))?;
    fsx::write(folder.join(&options.input_filename), &encoded.text)?;
    info!("wrote '{}' ({} sites, {} pseudopotentials)",
        options.input_filename, inputs.structure.num_atoms(), encoded.local_copy_list.len());

    let code = CodeInfo {
        cmdline_params: vec![
            "-i".into(), options.input_filename.clone(),
            "-o".into(), options.output_filename.clone(),
        ],
        withmpi: options.withmpi,
    };

    let mut retrieve_list = vec![options.output_filename.clone()];
    for var in &["kPts", "Ecomponents", "lattice", "ionpos"] {
        retrieve_list.push(format!("{}.{}", options.prefix, var));
    }

    Ok(CalcInfo {
        codes_info: vec![code],
        local_copy_list: encoded.local_copy_list,
        retrieve_list,
    })
}

/// Copy each file of a local copy list to its destination under `folder`.
pub fn stage_local_copies(copies: &[LocalCopy], folder: &Path) -> FailResult<()> {
    for copy in copies {
        let dest = folder.join(&copy.destination);
        debug!("copying '{}' to '{}'", copy.source, dest.display());
        if let Some(parent) = dest.parent() {
            fsx::create_dir_all(parent)?;
        }
        fsx::copy(&copy.source, &dest)?;
    }
    Ok(())
}
