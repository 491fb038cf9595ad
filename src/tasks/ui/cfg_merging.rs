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

use jdftx_fs_util::open;
use jdftx_tasks_config::YamlRead;

use serde_yaml::{Value, Mapping};
use std::path::{Path, PathBuf};

/// A list of config yamls that can be merged into a single effective config.
///
/// Can be serialized to a file that shows all of the configs in detail.
#[derive(Serialize)]
#[derive(Debug, Clone)]
pub struct ConfigSources(Vec<Config>);

// entry in config-sources.yaml
#[derive(Serialize)]
#[derive(Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Config {
    source: ConfigSource,
    yaml: Value,
}

#[derive(Serialize)]
#[derive(Debug, Clone)]
#[serde(rename_all = "kebab-case")]
enum ConfigSource {
    File(PathBuf),
    Argument,
}

impl Config {
    /// May do path resolution and file IO
    pub(crate) fn resolve_from_arg(s: &str) -> FailResult<Config>
    { resolve_from_arg::resolve_from_arg(s) }
}

mod resolve_from_arg {
    use super::*;

    pub(crate) fn resolve_from_arg(s: &str) -> FailResult<Config> {
        // no mechanism is provided for escaping a path containing ':'.
        match s.find(':') {
            Some(colon) => lit_from_arg(&s[..colon], &s[colon + 1..]),
            None => read_file_from_arg(s),
        }
    }

    fn lit_from_arg(path: &str, literal: &str) -> FailResult<Config> {
        let path = match path {
            "" => vec![],
            path => path.split('.').collect(),
        };
        let value = YamlRead::from_reader(literal.as_bytes())?;
        let yaml = make_nested_mapping(&path, value);
        let source = ConfigSource::Argument;

        Ok(Config { yaml, source })
    }

    // May do path resolution and file IO
    fn read_file_from_arg(path: &str) -> FailResult<Config> {
        let path: &Path = path.as_ref();

        let path = path.canonicalize()
            .map_err(|e| format_err!("{}: {}", path.display(), e))?;
        let file = open(&path)?;

        let yaml = YamlRead::from_reader(file)?;
        let source = ConfigSource::File(path);
        Ok(Config { yaml, source })
    }

    fn make_nested_mapping(path: &[&str], mut value: Value) -> Value {
        for &key in path.iter().rev() {
            let mut mapping = Mapping::new();
            mapping.insert(Value::String(key.into()), value);
            value = Value::Mapping(mapping);
        }
        value
    }

    #[cfg(test)]
    #[deny(unused)]
    mod tests {
        use super::*;

        macro_rules! m { ($($arg:tt)*) => { Value::Mapping(vec![$($arg)*].into_iter().collect()) }; }
        macro_rules! s { ($($arg:tt)*) => { Value::Sequence(vec![$($arg)*]) }; }

        #[test]
        fn literal_args() {
            let expected = m!{ ("hello".into(), m!{ ("how-are-you".into(), s![42.into()]) }) };
            assert_eq!(expected, Config::resolve_from_arg(":{hello: {how-are-you: [42]}}").unwrap().yaml);
            assert_eq!(expected, Config::resolve_from_arg(": {hello: {how-are-you: [42]}}").unwrap().yaml);
            assert_eq!(expected, Config::resolve_from_arg("hello:{how-are-you: [42]}").unwrap().yaml);
            assert_eq!(expected, Config::resolve_from_arg("hello: {how-are-you: [42]}").unwrap().yaml);
            assert_eq!(expected, Config::resolve_from_arg("hello.how-are-you: [42]").unwrap().yaml);
        }

        #[test]
        fn file_args() {
            let dir = tempdir::TempDir::new("jdftx-cfg").unwrap();
            let path = dir.path().join("settings.yaml");
            jdftx_fs_util::write(&path, "kpoints: {mesh: [2, 2, 2]}").unwrap();

            let config = Config::resolve_from_arg(path.to_str().unwrap()).unwrap();
            assert_eq!(config.yaml, m!{ ("kpoints".into(), m!{ ("mesh".into(), s![2.into(), 2.into(), 2.into()]) }) });
            assert!(Config::resolve_from_arg(dir.path().join("missing.yaml").to_str().unwrap()).is_err());
        }
    }
}

impl ConfigSources {
    /// Construct from values given to --config.
    ///
    /// # Notice
    /// Relative paths will be resolved immediately, and possibly
    /// even opened, read, and parsed as yaml.
    pub fn resolve_from_args<As>(args: As) -> FailResult<Self>
    where
        As: IntoIterator,
        As::Item: AsRef<str>,
    {
        let mut out = vec![];
        for arg in args {
            out.push(Config::resolve_from_arg(arg.as_ref())?);
        }
        Ok(ConfigSources(out))
    }

    pub fn into_effective_yaml(self) -> Value {
        let empty = Value::Mapping(Default::default());
        self.0.into_iter()
            .fold(empty, |a, b| dumb_config_merge(a, b.yaml))
    }
}

/// A simplistic config-merging function which operates directly on the yaml representation,
/// independent of what is being deserialized.
///
/// Given two mappings, it takes the union of their keys and recursively merges their intersection.
/// Given any other two values, it prefers 'b'.
///
/// Note this means that `kpoints: {mesh: ...}` in one config and `kpoints: {distance: ...}`
/// in a later one leaves both set, and the mesh wins.
fn dumb_config_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Mapping(mut a), Value::Mapping(b)) => {
            for (key, b_value) in b {
                let value = match a.remove(&key) {
                    None => b_value,
                    Some(a_value) => dumb_config_merge(a_value, b_value),
                };
                a.insert(key, value);
            }
            Value::Mapping(a)
        },
        (_, b) => b,
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value { serde_yaml::from_str(s).unwrap() }

    #[test]
    fn later_sources_win() {
        let sources = ConfigSources::resolve_from_args(vec![
            ":{options: {prefix: a, withmpi: false}, kpoints: {mesh: [1, 1, 1]}}",
            "options.prefix: b",
            "kpoints:{mesh: [2, 2, 2]}",
        ]).unwrap();

        // overridden keys move to the end of their mapping
        assert_eq!(
            sources.into_effective_yaml(),
            yaml("{options: {withmpi: false, prefix: b}, kpoints: {mesh: [2, 2, 2]}}"),
        );
    }
}
