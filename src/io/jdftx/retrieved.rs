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

use crate::FailResult;
use crate::output::Signal;

use jdftx_fs_util as fsx;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The files brought back from a finished run.
pub trait Retrieved {
    fn object_names(&self) -> FailResult<Vec<String>>;

    fn object_content(&self, name: &str) -> FailResult<Vec<u8>>;
}

/// Retrieved files held in memory.
#[derive(Debug, Clone, Default)]
pub struct RetrievedMap(pub BTreeMap<String, Vec<u8>>);

impl RetrievedMap {
    pub fn new() -> Self { Default::default() }

    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> &mut Self
    { self.0.insert(name.into(), content.into()); self }
}

impl Retrieved for RetrievedMap {
    fn object_names(&self) -> FailResult<Vec<String>>
    { Ok(self.0.keys().cloned().collect()) }

    fn object_content(&self, name: &str) -> FailResult<Vec<u8>> {
        match self.0.get(name) {
            Some(content) => Ok(content.clone()),
            None => bail!("no object named '{}'", name),
        }
    }
}

/// Retrieved files as plain files in a directory.
#[derive(Debug, Clone)]
pub struct RetrievedDir(PathBuf);

impl RetrievedDir {
    pub fn new(dir: impl AsRef<Path>) -> Self
    { RetrievedDir(dir.as_ref().to_owned()) }

    pub fn path(&self) -> &Path { &self.0 }
}

impl Retrieved for RetrievedDir {
    fn object_names(&self) -> FailResult<Vec<String>>
    { Ok(fsx::file_names(&self.0)?) }

    fn object_content(&self, name: &str) -> FailResult<Vec<u8>>
    { Ok(fsx::read(self.0.join(name))?) }
}

/// Read a retrieved file as text, reporting why it could not be.
pub(crate) fn read_text(retrieved: &dyn Retrieved, name: &str) -> Result<String, Signal> {
    let names = match retrieved.object_names() {
        Ok(names) => names,
        Err(e) => {
            warn!("could not list retrieved files: {}", e);
            return Err(Signal::ReadError(name.to_string()));
        },
    };
    if !names.iter().any(|n| n == name) {
        warn!("retrieved files do not include '{}'", name);
        return Err(Signal::Missing(name.to_string()));
    }

    let bytes = match retrieved.object_content(name) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("could not read '{}': {}", name, e);
            return Err(Signal::ReadError(name.to_string()));
        },
    };
    String::from_utf8(bytes).map_err(|_| {
        warn!("'{}' is not valid UTF-8", name);
        Signal::ReadError(name.to_string())
    })
}
