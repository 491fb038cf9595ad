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

//! The free-form parameter tree written to the control block of an input file.
//!
//! Order matters to JDFTx for a few commands, so the tree keeps insertion
//! order, and deserialization keeps document order.

use std::fmt;
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer, SerializeMap};

/// One value in the parameter tree.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Rendered verbatim after the key.
    Scalar(String),
    /// Rendered as a continued block of `subkey value` lines.
    Block(Vec<(String, String)>),
}

/// Insertion-ordered mapping from JDFTx command names to values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Parameters(Vec<(String, ParamValue)>);

impl Parameters {
    pub fn new() -> Self { Parameters(vec![]) }

    /// Append a scalar command. A later insert of the same key replaces the
    /// value but keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self
    { self.insert_value(key.into(), ParamValue::Scalar(value.to_string())) }

    /// Append a block command.
    pub fn insert_block<K, V, I>(&mut self, key: impl Into<String>, items: I) -> &mut Self
    where
        I: IntoIterator<Item=(K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let items = items.into_iter().map(|(k, v)| (k.into(), v.to_string())).collect();
        self.insert_value(key.into(), ParamValue::Block(items))
    }

    fn insert_value(&mut self, key: String, value: ParamValue) -> &mut Self {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue>
    { self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v) }

    pub fn iter(&self) -> impl Iterator<Item=(&str, &ParamValue)>
    { self.0.iter().map(|(k, v)| (&k[..], v)) }

    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

//--------------------------------------------------------------------------------------
// serialization
//
// Everything goes out as strings, so that a dumped config reads back into
// the same tree.

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Scalar(s) => serializer.serialize_str(s),
            ParamValue::Block(items) => {
                let mut map = serializer.serialize_map(Some(items.len()))?;
                for (k, v) in items {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            },
        }
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

//--------------------------------------------------------------------------------------
// deserialization
//
// Scalars of any type become their display form. A sequence of scalars is
// joined by spaces (e.g. `elec-cutoff: [20, 100]` is `elec-cutoff 20 100`).
// A mapping becomes a block, whose values must themselves be scalars or
// sequences of scalars.

fn render_float(x: f64) -> String { format!("{:?}", x) }

/// A scalar or a flat sequence of scalars, rendered to text.
struct Words(String);

struct WordsVisitor { allow_seq: bool }

impl<'de> Visitor<'de> for WordsVisitor {
    type Value = Words;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.allow_seq {
            true => write!(f, "a scalar or a sequence of scalars"),
            false => write!(f, "a scalar"),
        }
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Words, E> { Ok(Words(v.to_string())) }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Words, E> { Ok(Words(v.to_string())) }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Words, E> { Ok(Words(v.to_string())) }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Words, E> { Ok(Words(render_float(v))) }
    fn visit_str<E: de::Error>(self, v: &str) -> Result<Words, E> { Ok(Words(v.to_string())) }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Words, A::Error> {
        if !self.allow_seq {
            return Err(de::Error::invalid_type(de::Unexpected::Seq, &self));
        }
        let mut words = vec![];
        while let Some(Scalar(Words(w))) = seq.next_element()? {
            words.push(w);
        }
        Ok(Words(words.join(" ")))
    }
}

/// Newtype that only accepts scalars.
struct Scalar(Words);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Scalar, D::Error>
    { d.deserialize_any(WordsVisitor { allow_seq: false }).map(Scalar) }
}

impl<'de> Deserialize<'de> for Words {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Words, D::Error>
    { d.deserialize_any(WordsVisitor { allow_seq: true }) }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = ParamValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    { write!(f, "a scalar, a sequence of scalars, or a mapping of those") }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<ParamValue, E> { Ok(ParamValue::Scalar(v.to_string())) }
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<ParamValue, E> { Ok(ParamValue::Scalar(v.to_string())) }
    fn visit_u64<E: de::Error>(self, v: u64) -> Result<ParamValue, E> { Ok(ParamValue::Scalar(v.to_string())) }
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<ParamValue, E> { Ok(ParamValue::Scalar(render_float(v))) }
    fn visit_str<E: de::Error>(self, v: &str) -> Result<ParamValue, E> { Ok(ParamValue::Scalar(v.to_string())) }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<ParamValue, A::Error> {
        let Words(w) = WordsVisitor { allow_seq: true }.visit_seq(seq)?;
        Ok(ParamValue::Scalar(w))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ParamValue, A::Error> {
        let mut items = vec![];
        while let Some((key, Words(value))) = map.next_entry::<String, Words>()? {
            items.push((key, value));
        }
        Ok(ParamValue::Block(items))
    }
}

impl<'de> Deserialize<'de> for ParamValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<ParamValue, D::Error>
    { d.deserialize_any(ValueVisitor) }
}

impl<'de> Deserialize<'de> for Parameters {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Parameters, D::Error> {
        struct ParametersVisitor;

        impl<'de> Visitor<'de> for ParametersVisitor {
            type Value = Parameters;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
            { write!(f, "a mapping of JDFTx commands") }

            fn visit_unit<E: de::Error>(self) -> Result<Parameters, E>
            { Ok(Parameters::new()) }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Parameters, A::Error> {
                let mut out = Parameters::new();
                while let Some((key, value)) = map.next_entry::<String, ParamValue>()? {
                    if out.get(&key).is_some() {
                        return Err(de::Error::custom(format!("duplicate command '{}'", key)));
                    }
                    out.insert_value(key, value);
                }
                Ok(out)
            }
        }

        d.deserialize_any(ParametersVisitor)
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn yaml_keeps_document_order() {
        let params: Parameters = serde_yaml::from_str("
elec-cutoff: 20 100
lattice-minimize:
  nIterations: 10
  energyDiffThreshold: 1.0e-6
electronic-SCF: ''
elec-smearing: [Fermi, 0.01]
spintype: no-spin
").unwrap();

        let keys = params.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["elec-cutoff", "lattice-minimize", "electronic-SCF", "elec-smearing", "spintype"]);
        assert_eq!(params.get("elec-smearing"), Some(&ParamValue::Scalar("Fermi 0.01".into())));
        assert_eq!(params.get("lattice-minimize"), Some(&ParamValue::Block(vec![
            ("nIterations".into(), "10".into()),
            ("energyDiffThreshold".into(), "1e-6".into()),
        ])));
    }

    #[test]
    fn json_keeps_order() {
        let mut params = Parameters::new();
        params.insert("spintype", "no-spin");
        params.insert_block("electronic-minimize", vec![("nIterations", 100), ("energyDiffThreshold", 1)]);
        params.insert("elec-cutoff", 20);

        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(json, r#"{"spintype":"no-spin","electronic-minimize":{"nIterations":"100","energyDiffThreshold":"1"},"elec-cutoff":"20"}"#);
    }

    #[test]
    fn nesting_too_deep() {
        let result = serde_yaml::from_str::<Parameters>("
ionic-minimize:
  nIterations:
    oops: 3
");
        assert!(result.is_err());
    }

    #[test]
    fn null_is_empty() {
        let params: Parameters = serde_yaml::from_str("~").unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut params = Parameters::new();
        params.insert("elec-cutoff", 20).insert("kpoint-folding", "2 2 2");
        params.insert_block("lattice-minimize", vec![("nIterations", 0)]);
        params.insert("elec-cutoff", "30 120");

        let keys = params.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(keys, vec!["elec-cutoff", "kpoint-folding", "lattice-minimize"]);
        assert_eq!(params.get("elec-cutoff"), Some(&ParamValue::Scalar("30 120".into())));
    }
}
