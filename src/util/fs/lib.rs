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

use std::path::{Path, PathBuf};
use std::fs::{self, File};
use std::io::{self, BufReader};

#[macro_use]
extern crate log;

/// An IO error that remembers what we were doing and where.
#[derive(Debug, thiserror::Error)]
#[error("{action}: '{path}'")]
pub struct Error {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: io::Error,
}

impl Error {
    pub fn path(&self) -> &Path { &self.path }
    pub fn io_error(&self) -> &io::Error { &self.source }
    pub fn kind(&self) -> io::ErrorKind { self.source.kind() }
}

pub type Result<T> = std::result::Result<T, Error>;

trait ResultExt<T> {
    fn context(self, action: &'static str, path: &Path) -> Result<T>;
}

impl<T> ResultExt<T> for io::Result<T> {
    fn context(self, action: &'static str, path: &Path) -> Result<T> {
        self.map_err(|source| Error { action, path: path.to_owned(), source })
    }
}

/// Wrapper around `File::open` that adds context.
pub fn open<P: AsRef<Path>>(path: P) -> Result<File>
{
    let path = path.as_ref();
    File::open(path).context("while opening file", path)
}

/// Wrapper around `File::open` that adds context and makes a `BufReader`.
pub fn open_text<P: AsRef<Path>>(path: P) -> Result<BufReader<File>>
{ open(path).map(BufReader::new) }

/// Wrapper around `fs::read` that adds context.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Vec<u8>>
{
    let path = path.as_ref();
    fs::read(path).context("could not read file", path)
}

/// Wrapper around `fs::read_to_string` that adds context.
pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String>
{
    let path = path.as_ref();
    fs::read_to_string(path).context("could not read file", path)
}

/// Wrapper around `File::create` that adds context.
pub fn create<P: AsRef<Path>>(path: P) -> Result<File>
{
    let path = path.as_ref();
    File::create(path).context("could not create file", path)
}

/// Wrapper around `fs::write` that adds context.
pub fn write<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()>
{
    let path = path.as_ref();
    fs::write(path, contents).context("could not write file", path)
}

/// Wrapper around `std::fs::copy` that adds context.
///
/// The reported path is the destination.
pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(src: P, dest: Q) -> Result<()>
{
    let (src, dest) = (src.as_ref(), dest.as_ref());
    trace!("copying '{}' to '{}'", src.display(), dest.display());
    fs::copy(src, dest)
        .map(|_| ()) // number of bytes; don't care
        .context("could not copy a file to", dest)
}

/// Wrapper around `std::fs::create_dir_all` that adds context.
pub fn create_dir_all<P: AsRef<Path>>(dir: P) -> Result<()>
{
    let dir = dir.as_ref();
    fs::create_dir_all(dir).context("could not create directory", dir)
}

/// Wrapper around `std::fs::read_dir` that collects the plain file names.
///
/// Subdirectories and names that are not valid UTF-8 are skipped.
pub fn file_names<P: AsRef<Path>>(dir: P) -> Result<Vec<String>>
{
    let dir = dir.as_ref();
    let mut out = vec![];
    for entry in fs::read_dir(dir).context("could not list directory", dir)? {
        let entry = entry.context("could not list directory", dir)?;
        let is_file = entry.file_type().context("could not stat entry in", dir)?.is_file();
        if let (true, Some(name)) = (is_file, entry.file_name().to_str()) {
            out.push(name.to_string());
        }
    }
    out.sort();
    Ok(out)
}

/// Simulates `rm -rf`.
///
/// Properties:
/// * Deletes files and folders alike.
/// * Does not require the path or its ancestors to exist.
/// * **Does** fail if other problems occur (e.g. insufficient permissions).
/// * Does **not** follow symbolic links.
pub fn rm_rf<P: AsRef<Path>>(path: P) -> Result<()>
{
    let path = path.as_ref();
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e).context("could not delete", path),
    };

    let result = match meta.is_dir() {
        true => fs::remove_dir_all(path),
        false => fs::remove_file(path),
    };
    result.context("could not delete", path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_carry_the_path() {
        let tmp = tempdir::TempDir::new("jdftx-fs").unwrap();
        let missing = tmp.path().join("aiida.kPts");

        let err = read_to_string(&missing).unwrap_err();
        assert_eq!(err.path(), missing.as_path());
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("aiida.kPts"));
    }

    #[test]
    fn file_names_skips_directories() {
        let tmp = tempdir::TempDir::new("jdftx-fs").unwrap();
        write(tmp.path().join("aiida.out"), "Done!\n").unwrap();
        write(tmp.path().join("aiida.ionpos"), "").unwrap();
        create_dir_all(tmp.path().join("pseudo")).unwrap();

        assert_eq!(file_names(tmp.path()).unwrap(), vec!["aiida.ionpos", "aiida.out"]);
    }

    #[test]
    fn rm_rf_is_idempotent() {
        let tmp = tempdir::TempDir::new("jdftx-fs").unwrap();
        let dir = tmp.path().join("calc");
        create_dir_all(dir.join("pseudo")).unwrap();
        write(dir.join("pseudo/Si.upf"), "<UPF/>").unwrap();

        rm_rf(&dir).unwrap();
        assert!(!dir.exists());
        rm_rf(&dir).unwrap();
    }
}
