use std::str::FromStr;

use itertools::Itertools;
use serde_derive::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{EvaporationError, Result};

/// Parameterization of the wind function f(u) = a_u + b_u * u
#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    EnumString,
    EnumIter,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WindFunction {
    /// Penman (1948)
    #[default]
    Penman1948,
    /// Penman (1956)
    Penman1956,
    /// Linacre (1993)
    Linacre1993,
}

impl WindFunction {
    /// (a_u, b_u)
    pub fn coefficients(&self) -> (f64, f64) {
        match self {
            WindFunction::Penman1948 => (1.0, 0.536),
            WindFunction::Penman1956 => (0.5, 0.536),
            WindFunction::Linacre1993 => (0.0, 0.54),
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        WindFunction::from_str(name).map_err(|_| EvaporationError::InvalidParameter {
            name: "wind function",
            value: name.to_owned(),
            options: WindFunction::iter().join(", "),
        })
    }
}

/// configuration structure for model config
/// `wind_function` is None when the model runs without wind data
#[derive(Debug, Clone, PartialEq)]
pub struct PenmanModelConfig {
    wind_function: Option<WindFunction>,
}

impl PenmanModelConfig {
    pub fn with_wind(wind_function: WindFunction) -> Self {
        PenmanModelConfig {
            wind_function: Some(wind_function),
        }
    }

    pub fn without_wind() -> Self {
        PenmanModelConfig {
            wind_function: None,
        }
    }

    /// The selector is only parsed when wind data will be used, otherwise it is ignored.
    pub fn new(wind_function_str: &str, use_wind: bool) -> Result<Self> {
        if !use_wind {
            return Ok(Self::without_wind());
        }
        WindFunction::parse(wind_function_str).map(Self::with_wind)
    }

    pub fn wind_function(&self) -> Option<WindFunction> {
        self.wind_function
    }

    pub fn use_wind(&self) -> bool {
        self.wind_function.is_some()
    }
}

impl Default for PenmanModelConfig {
    fn default() -> Self {
        Self::with_wind(WindFunction::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wind_function_names() {
        assert_eq!(WindFunction::parse("penman1948"), Ok(WindFunction::Penman1948));
        assert_eq!(WindFunction::parse("penman1956"), Ok(WindFunction::Penman1956));
        assert_eq!(WindFunction::parse("linacre1993"), Ok(WindFunction::Linacre1993));
        assert_eq!(WindFunction::Linacre1993.to_string(), "linacre1993");
        assert_eq!(WindFunction::default(), WindFunction::Penman1948);
    }

    #[test]
    fn unknown_wind_function_is_rejected() {
        let err = WindFunction::parse("foo").expect_err("foo is not a wind function");
        assert_eq!(
            err,
            EvaporationError::InvalidParameter {
                name: "wind function",
                value: "foo".into(),
                options: "penman1948, penman1956, linacre1993".into(),
            }
        );
        assert!(err.to_string().contains("'foo'"));
    }

    #[test]
    fn coefficients_table() {
        assert_eq!(WindFunction::Penman1948.coefficients(), (1.0, 0.536));
        assert_eq!(WindFunction::Penman1956.coefficients(), (0.5, 0.536));
        assert_eq!(WindFunction::Linacre1993.coefficients(), (0.0, 0.54));
    }

    #[test]
    fn selector_is_ignored_without_wind() {
        let config = PenmanModelConfig::new("foo", false).expect("selector is not parsed");
        assert!(!config.use_wind());
        assert_eq!(config.wind_function(), None);

        assert!(PenmanModelConfig::new("foo", true).is_err());

        let config = PenmanModelConfig::new("penman1956", true).expect("valid selector");
        assert_eq!(config.wind_function(), Some(WindFunction::Penman1956));
    }
}
