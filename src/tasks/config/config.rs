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

// NOTE: Please make sure to use the YamlRead trait when deserializing these types!

use jdftx_io::Parameters;

use std::collections::BTreeMap;
use std::path::PathBuf;

pub type V3 = [f64; 3];

/// Root settings object, as written by the user.
///
/// Call `validate` before handing this to anything else.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub structure: StructureSettings,

    /// Pseudopotential file for each kind name.
    pub pseudos: BTreeMap<String, Pseudo>,

    #[serde(default)]
    pub kpoints: Kpoints,

    /// Commands for the control block, in order.
    #[serde(default)]
    pub parameters: Parameters,

    #[serde(default)]
    pub settings: CalcSettings,

    #[serde(default)]
    pub options: Options,
}

/// Lengths in angstrom.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct StructureSettings {
    /// Rows are lattice vectors.
    pub cell: [V3; 3],

    /// Cartesian.
    pub sites: Vec<SiteSettings>,

    /// Only needed for kinds that are not a single element, or to give
    /// one element several kinds with explicit weights.
    #[serde(default)]
    pub kinds: Option<Vec<KindSettings>>,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct SiteSettings {
    pub symbol: String,
    /// Defaults to the symbol.
    #[serde(default)]
    pub kind: Option<String>,
    pub position: V3,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct KindSettings {
    pub name: String,
    pub symbols: Vec<String>,
    pub weights: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Pseudo {
    pub path: PathBuf,
    /// Name inside the pseudo subfolder. Defaults to the file name of `path`.
    #[serde(default)]
    pub filename: Option<String>,
}

/// At most one of `mesh`, `list` and `distance` is used, in that order.
#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Kpoints {
    #[serde(default)]
    pub mesh: Option<[u32; 3]>,

    #[serde(default)]
    pub offset: V3,

    /// Explicit fractional k-points. JDFTx input files can't express these,
    /// so they are rejected when the input is written.
    #[serde(default)]
    pub list: Option<Vec<V3>>,

    /// Minimum distance between k-points in 1/angstrom, including the 2 pi.
    #[serde(default)]
    pub distance: Option<f64>,

    /// With `distance`, round odd mesh counts up to even.
    #[serde(default)]
    pub force_parity: bool,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "kebab-case")]
pub struct CalcSettings {
    /// Per site, either one bool for all axes or a list of three.
    /// `true` means the coordinate is held fixed.
    ///
    /// Left untyped here so that bad entries can be reported by index.
    #[serde(default)]
    #[serde(alias = "fixed_coords")]
    pub fixed_coords: Option<serde_yaml::Value>,
}

#[derive(Serialize, Deserialize)]
#[derive(Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Options {
    #[serde(default = "_options__input_filename")]
    pub input_filename: String,
    #[serde(default = "_options__output_filename")]
    pub output_filename: String,
    #[serde(default = "_options__withmpi")]
    pub withmpi: bool,
    /// Stem of the files JDFTx dumps at the end of the run.
    #[serde(default = "_options__prefix")]
    pub prefix: String,
    #[serde(default = "_options__pseudo_subfolder")]
    pub pseudo_subfolder: String,
}
fn _options__input_filename() -> String { "aiida.in".into() }
fn _options__output_filename() -> String { "aiida.out".into() }
fn _options__withmpi() -> bool { true }
fn _options__prefix() -> String { "aiida".into() }
fn _options__pseudo_subfolder() -> String { "./pseudo/".into() }

impl Default for Options {
    fn default() -> Self {
        Options {
            input_filename: _options__input_filename(),
            output_filename: _options__output_filename(),
            withmpi: _options__withmpi(),
            prefix: _options__prefix(),
            pseudo_subfolder: _options__pseudo_subfolder(),
        }
    }
}
