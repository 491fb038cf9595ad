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

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

pub fn manifest_dir() -> &'static Path
{ Path::new(env!("CARGO_MANIFEST_DIR")) }

pub fn resource(name: &str) -> PathBuf
{ manifest_dir().join("tests/resources").join(name) }

/// One of the binaries of this package, run from the package root.
pub fn cargo_binary(path: &str) -> Command {
    let mut command = Command::new(path);
    command.current_dir(manifest_dir());
    command
}
