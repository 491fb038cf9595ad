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

//! Post-processing that occurs after config merging.

use crate::config::*;

use jdftx_io::InputValidationError;
use serde_yaml::Value;

/// Settings whose loosely-typed parts have been checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSettings {
    pub settings: Settings,
    /// One row per site; `true` holds that cartesian axis fixed.
    pub fixed_coords: Option<Vec<[bool; 3]>>,
}

impl Settings {
    pub fn validate(self) -> Result<ValidatedSettings, InputValidationError> {
        let fixed_coords = match &self.settings.fixed_coords {
            None | Some(Value::Null) => None,
            Some(value) => Some(parse_fixed_coords(value)?),
        };
        if let Some(kinds) = &self.structure.kinds {
            for site in &self.structure.sites {
                let name = site.kind.as_ref().unwrap_or(&site.symbol);
                if !kinds.iter().any(|k| &k.name == name) {
                    return Err(InputValidationError::new(format!(
                        "site refers to kind '{}', which is not in structure.kinds", name,
                    )));
                }
            }
        }
        Ok(ValidatedSettings { settings: self, fixed_coords })
    }
}

fn parse_fixed_coords(value: &Value) -> Result<Vec<[bool; 3]>, InputValidationError> {
    let rows = match value {
        Value::Sequence(rows) => rows,
        _ => return Err(InputValidationError::new("fixed_coords must be a list with one entry per site")),
    };

    rows.iter().enumerate().map(|(i, row)| {
        let bad_row = || InputValidationError::new(format!("fixed_coords({}) has non-boolean elements", i + 1));
        match row {
            Value::Bool(b) => Ok([*b; 3]),
            Value::Sequence(axes) if axes.len() == 3 => {
                let mut out = [false; 3];
                for (x, axis) in out.iter_mut().zip(axes) {
                    *x = axis.as_bool().ok_or_else(bad_row)?;
                }
                Ok(out)
            },
            _ => Err(bad_row()),
        }
    }).collect()
}
