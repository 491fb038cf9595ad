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

//! Energy components, as printed by JDFTx in both the stdout transcript
//! and the `.Ecomponents` dump.
//!
//! ```text
//!    Eewald =       -8.3978003161889318
//!        EH =        0.5696148227451149
//!      Eloc =       -2.4003512541580211
//!       Enl =        1.5918811823022993
//!       Exc =       -4.4082617099548787
//!  Exc_core =        0.0506036221286826
//!        KE =        3.2125869298963015
//! -------------------------------------
//!      Etot =       -9.7817267332294331
//! ```

use crate::OutputParsingError;
use crate::units::HARTREE_TO_EV;
use super::OutputValue;

use std::collections::BTreeMap;

/// JDFTx label, and the key it is stored under.
///
/// Labels must match the whole trimmed text before `=`. A substring match
/// would let the `Exc_core` line also fill `energy_xc`.
pub const ENERGY_LABELS: &[(&str, &str)] = &[
    ("Eewald", "energy_ewald"),
    ("EH", "energy_hartree"),
    ("Eloc", "energy_local"),
    ("Enl", "energy_nonlocal"),
    ("Exc", "energy_xc"),
    ("Exc_core", "energy_xc_core"),
    ("KE", "energy_kinetic"),
    ("Etot", "energy_total"),
];

pub const UNITS_SUFFIX: &str = "_units";
pub const ENERGY_UNITS: &str = "eV";

/// Look for a known energy component on one line.
///
/// Lines without `=`, or whose label is not in the table, give `None`.
/// A known label with an unreadable value is an error. The value is in eV.
pub(crate) fn energy_from_line(line: &str, file: &str) -> Result<Option<(&'static str, f64)>, OutputParsingError> {
    let mut parts = line.splitn(2, '=');
    let label = parts.next().unwrap_or("").trim();
    let value = match parts.next() {
        Some(value) => value.trim(),
        None => return Ok(None),
    };

    let key = match ENERGY_LABELS.iter().find(|&&(l, _)| l == label) {
        Some(&(_, key)) => key,
        None => return Ok(None),
    };
    match value.parse::<f64>() {
        Ok(x) => Ok(Some((key, x * HARTREE_TO_EV))),
        Err(_) => Err(OutputParsingError::new(file, format!("Error while parsing energy: {:?}", line))),
    }
}

/// Read the `.Ecomponents` dump into flat output parameters.
pub(crate) fn parse_ecomponents(text: &str, file: &str) -> Result<BTreeMap<String, OutputValue>, OutputParsingError> {
    let mut out = BTreeMap::new();
    for line in text.lines() {
        if let Some((key, value)) = energy_from_line(line, file)? {
            out.insert(key.to_string(), OutputValue::Float(value));
            out.insert(format!("{}{}", key, UNITS_SUFFIX), OutputValue::Text(ENERGY_UNITS.into()));
        }
    }
    trace!("read {} energy components from '{}'", out.len() / 2, file);
    Ok(out)
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn labels_match_exactly() {
        let (key, value) = energy_from_line("  Exc_core =        0.5", "x").unwrap().unwrap();
        assert_eq!(key, "energy_xc_core");
        assert_close!(value, 0.5 * HARTREE_TO_EV);

        let (key, _) = energy_from_line("       Exc =       -4.4", "x").unwrap().unwrap();
        assert_eq!(key, "energy_xc");

        assert_eq!(energy_from_line("# Energy components:", "x").unwrap(), None);
        assert_eq!(energy_from_line("-------------------------------------", "x").unwrap(), None);
        assert_eq!(energy_from_line("         F =  -7.5", "x").unwrap(), None);
    }

    #[test]
    fn bad_value_is_fatal() {
        let err = energy_from_line("     Etot =  nope", "aiida.Ecomponents").unwrap_err();
        assert_eq!(err.file, "aiida.Ecomponents");
    }

    #[test]
    fn ecomponents_file() {
        let text = "\
   Eewald =       -8.0
       EH =        0.5
     Eloc =       -2.0
      Enl =        1.5
      Exc =       -4.0
 Exc_core =        0.25
       KE =        3.0
-------------------------------------
     Etot =       -10.0
";
        let params = parse_ecomponents(text, "aiida.Ecomponents").unwrap();
        assert_eq!(params.len(), 16);
        match params["energy_total"] {
            OutputValue::Float(x) => { assert_close!(x, -10.0 * 27.2113966413); },
            ref other => panic!("{:?}", other),
        }
        assert_eq!(params["energy_xc_core_units"], OutputValue::Text("eV".into()));
    }
}
