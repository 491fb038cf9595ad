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

/// Tolerance on the sum of weights of a kind.
pub(crate) const WEIGHT_SUM_TOL: f64 = 1e-6;

/// A named atomic species.
///
/// One element may appear under several kinds (e.g. `Fe1`, `Fe2` for two
/// magnetic sublattices). A kind may also describe a partially occupied or
/// mixed site, through several symbols whose weights sum to at most one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Kind {
    name: String,
    symbols: Vec<String>,
    weights: Vec<f64>,
}

#[derive(Debug, Fail, Clone, PartialEq)]
pub enum KindError {
    #[fail(display = "kind '{}' has no symbols", _0)]
    NoSymbols(String),
    #[fail(display = "kind '{}' has {} symbols but {} weights", _0, _1, _2)]
    WeightCount(String, usize, usize),
    #[fail(display = "kind '{}' has weights outside of (0, 1] or summing above 1: {:?}", _0, _1)]
    BadWeights(String, Vec<f64>),
}

impl Kind {
    /// A kind that is fully occupied by a single element.
    pub fn single(name: impl Into<String>, symbol: impl Into<String>) -> Kind {
        Kind {
            name: name.into(),
            symbols: vec![symbol.into()],
            weights: vec![1.0],
        }
    }

    pub fn new(
        name: impl Into<String>,
        symbols: Vec<String>,
        weights: Vec<f64>,
    ) -> Result<Kind, KindError> {
        let name = name.into();
        if symbols.is_empty() {
            return Err(KindError::NoSymbols(name));
        }
        if symbols.len() != weights.len() {
            return Err(KindError::WeightCount(name, symbols.len(), weights.len()));
        }

        let sum = weights.iter().sum::<f64>();
        let each_ok = weights.iter().all(|&w| 0.0 < w && w <= 1.0);
        if !each_ok || sum > 1.0 + WEIGHT_SUM_TOL {
            return Err(KindError::BadWeights(name, weights));
        }
        Ok(Kind { name, symbols, weights })
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn symbols(&self) -> &[String] { &self.symbols }
    pub fn weights(&self) -> &[f64] { &self.weights }

    /// More than one element shares the site.
    pub fn is_alloy(&self) -> bool { self.symbols.len() > 1 }

    /// The weights sum to less than one.
    pub fn has_vacancies(&self) -> bool {
        let sum = self.weights.iter().sum::<f64>();
        sum < 1.0 - WEIGHT_SUM_TOL
    }
}

#[cfg(test)]
#[deny(unused)]
mod tests {
    use super::*;

    #[test]
    fn alloy_and_vacancy() {
        let si = Kind::single("Si", "Si");
        assert!(!si.is_alloy());
        assert!(!si.has_vacancies());

        let mixed = Kind::new("SiGe", vec!["Si".into(), "Ge".into()], vec![0.5, 0.5]).unwrap();
        assert!(mixed.is_alloy());
        assert!(!mixed.has_vacancies());

        let holey = Kind::new("Si", vec!["Si".into()], vec![0.9]).unwrap();
        assert!(!holey.is_alloy());
        assert!(holey.has_vacancies());
    }

    #[test]
    fn bad_kinds() {
        assert_eq!(Kind::new("X", vec![], vec![]), Err(KindError::NoSymbols("X".into())));
        assert_eq!(
            Kind::new("X", vec!["Si".into()], vec![0.5, 0.5]),
            Err(KindError::WeightCount("X".into(), 1, 2)),
        );
        assert!(Kind::new("X", vec!["Si".into(), "Ge".into()], vec![0.7, 0.7]).is_err());
    }
}
