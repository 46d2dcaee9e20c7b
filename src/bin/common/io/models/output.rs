use std::str::FromStr;

use ndarray::Array1;
use penman::{
    constants::NODATAVAL,
    models::output::{Output, OutputVariableName},
};
use serde_derive::{Deserialize, Serialize};
use strum::{EnumProperty, IntoEnumIterator};
use strum_macros::{Display, EnumString};

use crate::common::helpers::AppError;

pub const DEFAULT_PRECISION: i32 = 3;

#[derive(Debug, Default, PartialEq, Eq, Copy, Clone, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputVariable {
    internal_name: OutputVariableName,
    name: String,
    #[serde(default = "default_precision")]
    precision: i32,
}

fn default_precision() -> i32 {
    DEFAULT_PRECISION
}

impl OutputVariable {
    pub fn new(internal_name: OutputVariableName, name: &str, precision: i32) -> Self {
        Self {
            internal_name,
            name: name.to_string(),
            precision,
        }
    }

    /// Parse a `internal_name[:name[:precision]]` definition
    pub fn from_definition(definition: &str) -> Result<Self, AppError> {
        let parts = definition.split(':').map(str::trim).collect::<Vec<&str>>();
        let internal_name = OutputVariableName::from_str(parts[0])
            .map_err(|_| format!("Invalid Variable Name {}", parts[0]))?;
        let name = parts
            .get(1)
            .filter(|name| !name.is_empty())
            .map_or_else(|| internal_name.to_string(), |name| name.to_string());
        let precision = match parts.get(2) {
            Some(precision) => precision
                .parse::<i32>()
                .map_err(|_| format!("Invalid precision {precision}"))?,
            None => DEFAULT_PRECISION,
        };
        if parts.len() > 3 {
            return Err(format!("Invalid variable definition {definition}").into());
        }
        Ok(Self::new(internal_name, &name, precision))
    }

    /// Every output variable under its own name
    pub fn all() -> Vec<Self> {
        OutputVariableName::iter()
            .map(|v| Self::new(v, &v.to_string(), DEFAULT_PRECISION))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn long_name(&self) -> &'static str {
        self.internal_name.get_str("long_name").unwrap_or("")
    }

    pub fn units(&self) -> &'static str {
        self.internal_name.get_str("units").unwrap_or("")
    }

    /// Values rounded to the variable precision, no-data values are kept as they are
    pub fn get_values(&self, output: &Output) -> Array1<f64> {
        let cutval = f64::powi(10.0, self.precision);
        output.get(&self.internal_name).mapv(|v| {
            if v == NODATAVAL {
                v
            } else {
                (v * cutval).round() / cutval
            }
        })
    }
}

/// Site and model description written along with the series
#[derive(Debug, Clone, Serialize)]
pub struct OutputMetadata {
    pub station: String,
    pub latitude: f64,
    pub elevation: f64,
    pub albedo: f64,
    /// None when the equation without wind was used
    pub wind_function: Option<String>,
}
