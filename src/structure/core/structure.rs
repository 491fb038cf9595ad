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

use crate::{FailResult, Lattice, Coords, Kind};
use crate::util::V3;

/// One atomic site. The position is cartesian, in angstrom.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub struct Site {
    pub kind_name: String,
    pub position: V3,
}

/// A periodic structure: a lattice, an ordered list of kinds, and an ordered
/// list of sites referring to those kinds by name.
///
/// Invariants:
/// * kind names are unique
/// * every site names a kind that exists
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Structure {
    lattice: Lattice,
    kinds: Vec<Kind>,
    sites: Vec<Site>,
}

impl Structure {
    /// A structure with no sites yet.
    pub fn new(lattice: Lattice) -> Self
    { Structure { lattice, kinds: vec![], sites: vec![] } }

    /// Construct from parts, validating that kinds and sites agree.
    pub fn from_parts(lattice: Lattice, kinds: Vec<Kind>, sites: Vec<Site>) -> FailResult<Self> {
        for (i, kind) in kinds.iter().enumerate() {
            ensure!(
                kinds[..i].iter().all(|k| k.name() != kind.name()),
                "kind name '{}' appears more than once", kind.name(),
            );
        }
        for site in &sites {
            ensure!(
                kinds.iter().any(|k| k.name() == site.kind_name),
                "site refers to undefined kind '{}'", site.kind_name,
            );
        }
        Ok(Structure { lattice, kinds, sites })
    }

    /// Append a site of a single-element kind.
    ///
    /// The kind is named `name` (or `symbol` if `None`), and is created if it
    /// does not exist yet. Fails if a kind by that name exists with different
    /// symbols.
    pub fn append_atom(&mut self, position: V3, symbol: &str, name: Option<&str>) -> FailResult<()> {
        let name = name.unwrap_or(symbol);
        match self.kinds.iter().find(|k| k.name() == name) {
            Some(kind) => ensure!(
                kind.symbols() == [symbol] && !kind.has_vacancies(),
                "kind '{}' already exists with different composition", name,
            ),
            None => {
                trace!("new kind '{}' ({})", name, symbol);
                self.kinds.push(Kind::single(name, symbol));
            },
        }
        self.sites.push(Site { kind_name: name.to_string(), position });
        Ok(())
    }

    pub fn num_atoms(&self) -> usize { self.sites.len() }
    pub fn lattice(&self) -> &Lattice { &self.lattice }
    pub fn kinds(&self) -> &[Kind] { &self.kinds }
    pub fn sites(&self) -> &[Site] { &self.sites }

    pub fn kind(&self, name: &str) -> Option<&Kind>
    { self.kinds.iter().find(|k| k.name() == name) }

    /// The cell matrix, rows are lattice vectors.
    pub fn cell(&self) -> [V3; 3] { *self.lattice.matrix() }

    pub fn to_carts(&self) -> Vec<V3>
    { self.sites.iter().map(|s| s.position).collect() }

    pub fn to_fracs(&self) -> Vec<V3>
    { self.coords().into_fracs(&self.lattice) }

    pub fn coords(&self) -> Coords
    { Coords::Carts(self.to_carts()) }

    /// Kind name of each site.
    pub fn site_kind_names(&self) -> Vec<&str>
    { self.sites.iter().map(|s| &s.kind_name[..]).collect() }
}
