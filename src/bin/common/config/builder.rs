use serde_derive::{Deserialize, Serialize};
use serde_yaml;
use std::fs::File;
use std::io::BufRead;
use std::io::Read;
use std::str::FromStr;
use std::{collections::HashMap, io};

use penman::modules::penman::constants::{DEFAULT_ALBEDO, DEFAULT_ELEVATION};

use crate::common::helpers::{parse_flag, AppError};
use crate::common::io::models::output::{OutputFormat, OutputVariable};
use crate::common::io::readers::text::DEFAULT_DATETIME_FORMAT;

use super::models::PenmanConfig;

pub type ConfigMap = HashMap<String, Vec<String>>;

const STATION_KEY: &str = "STATION";
const LATITUDE_KEY: &str = "LATITUDE";
const ELEVATION_KEY: &str = "ELEVATION";
const ALBEDO_KEY: &str = "ALBEDO";
const WIND_FUNCTION_KEY: &str = "WIND_FUNCTION";
const USE_WIND_KEY: &str = "USE_WIND";
const DATETIME_FORMAT_KEY: &str = "DATETIME_FORMAT";
const OUTPUT_KEY: &str = "OUTPUT";
const VARIABLES_KEY: &str = "VARIABLE";

trait ConfigMapExt {
    /// Get the first value of a key in the config map
    fn first(&self, key: &str) -> Option<String>;
    fn all(&self, key: &str) -> Option<Vec<String>>;
    fn parse_f64(&self, key: &str) -> Result<Option<f64>, AppError>;
}

impl ConfigMapExt for ConfigMap {
    fn first(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|values| values.first().cloned())
    }

    fn all(&self, key: &str) -> Option<Vec<String>> {
        self.get(key).cloned()
    }

    fn parse_f64(&self, key: &str) -> Result<Option<f64>, AppError> {
        self.first(key)
            .map(|value| {
                value
                    .parse::<f64>()
                    .map_err(|_| AppError::from(format!("Invalid value for {key}: {value}")))
            })
            .transpose()
    }
}

fn parse_config<R: BufRead>(reader: R, file_name: &str) -> Result<ConfigMap, AppError> {
    let mut config_map: ConfigMap = ConfigMap::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|error| format!("error line: {i} \n {error}"))?;
        let line = line.trim();

        if line.starts_with('%') || line.starts_with('#') || line.is_empty() {
            // skip comments and empty lines
            continue;
        }
        let (key, value) = line
            .split_once('=')
            .ok_or(format!("error parsing config file {file_name} at line {}.", i + 1))?;

        config_map
            .entry(key.trim().to_string())
            .or_default()
            .push(value.trim().to_string());
    }
    Ok(config_map)
}

pub fn read_config(file_name: impl Into<String>) -> Result<ConfigMap, AppError> {
    let file_name = file_name.into();
    let file =
        File::open(&file_name).map_err(|error| format!("error opening config file: {error}"))?;
    parse_config(io::BufReader::new(file), &file_name)
}

fn default_elevation() -> f64 {
    DEFAULT_ELEVATION
}

fn default_albedo() -> f64 {
    DEFAULT_ALBEDO
}

fn default_wind_function() -> String {
    "penman1948".into()
}

fn default_use_wind() -> bool {
    true
}

fn default_datetime_format() -> String {
    DEFAULT_DATETIME_FORMAT.into()
}

fn default_variables() -> Vec<OutputVariable> {
    OutputVariable::all()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    pub path: String,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default = "default_variables")]
    pub variables: Vec<OutputVariable>,
}

impl OutputConfig {
    /// Parse a `format:path` definition
    fn from_definition(definition: &str) -> Result<Self, AppError> {
        let (format, path) = definition
            .split_once(':')
            .ok_or(format!("Invalid output definition {definition}"))?;
        let format = OutputFormat::from_str(format.trim())
            .map_err(|_| format!("Invalid output format {format}"))?;
        Ok(OutputConfig {
            path: path.trim().into(),
            format,
            variables: default_variables(),
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PenmanConfigBuilder {
    #[serde(default)]
    pub station: Option<String>,
    /// site latitude [decimal degrees]
    pub latitude: f64,
    /// site elevation [m]
    #[serde(default = "default_elevation")]
    pub elevation: f64,
    #[serde(default = "default_albedo")]
    pub albedo: f64,
    #[serde(default = "default_wind_function")]
    pub wind_function: String,
    #[serde(default = "default_use_wind")]
    pub use_wind: bool,
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,
    pub output: OutputConfig,
}

impl PenmanConfigBuilder {
    pub fn from_file(config_file: &str) -> Result<Self, AppError> {
        // Check the file extension to determine which method to use
        if config_file.ends_with(".yaml") || config_file.ends_with(".yml") {
            Self::from_yaml(config_file)
        } else if config_file.ends_with(".txt") {
            Self::from_txt_file(config_file)
        } else {
            Err(AppError::from(format!(
                "Unsupported config file format: {}",
                config_file
            )))
        }
    }

    pub fn from_yaml(config_file: &str) -> Result<Self, AppError> {
        let mut file = File::open(config_file)
            .map_err(|err| format!("Cannot open config file {}: {}", config_file, err))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|err| format!("Cannot read config file {}: {}", config_file, err))?;

        Self::from_yaml_str(&contents)
            .map_err(|err| format!("Cannot parse config file {}: {}", config_file, err).into())
    }

    fn from_yaml_str(contents: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(contents)
    }

    fn from_txt_file(config_file: &str) -> Result<Self, AppError> {
        let config_map = read_config(config_file)?;
        Self::from_config_map(&config_map)
    }

    fn from_config_map(config_map: &ConfigMap) -> Result<Self, AppError> {
        let latitude = config_map
            .parse_f64(LATITUDE_KEY)?
            .ok_or(format!("Error: {LATITUDE_KEY} not found in config"))?;

        let elevation = config_map
            .parse_f64(ELEVATION_KEY)?
            .unwrap_or(DEFAULT_ELEVATION);

        let albedo = config_map.parse_f64(ALBEDO_KEY)?.unwrap_or(DEFAULT_ALBEDO);

        let wind_function = config_map
            .first(WIND_FUNCTION_KEY)
            .unwrap_or_else(default_wind_function);

        let use_wind = match config_map.first(USE_WIND_KEY) {
            Some(value) => parse_flag(&value),
            None => true,
        };

        let datetime_format = config_map
            .first(DATETIME_FORMAT_KEY)
            .unwrap_or_else(default_datetime_format);

        let output_def = config_map
            .first(OUTPUT_KEY)
            .ok_or(format!("KEY {OUTPUT_KEY} not found"))?;
        let mut output = OutputConfig::from_definition(&output_def)?;

        if let Some(variables_defs) = config_map.all(VARIABLES_KEY) {
            output.variables = variables_defs
                .iter()
                .map(|def| OutputVariable::from_definition(def))
                .collect::<Result<Vec<_>, _>>()?;
        }

        Ok(PenmanConfigBuilder {
            station: config_map.first(STATION_KEY),
            latitude,
            elevation,
            albedo,
            wind_function,
            use_wind,
            datetime_format,
            output,
        })
    }

    pub fn build(&self) -> Result<PenmanConfig, AppError> {
        PenmanConfig::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penman::models::output::OutputVariableName;

    #[test]
    fn text_config_with_defaults() {
        let text = "\
            # station of the Soreq valley\n\
            LATITUDE=31.96\n\
            \n\
            % output\n\
            OUTPUT=json:/tmp/soreq.json\n";
        let config_map = parse_config(text.as_bytes(), "test.txt").expect("should parse");
        let builder = PenmanConfigBuilder::from_config_map(&config_map).expect("should build");

        assert_eq!(builder.latitude, 31.96);
        assert_eq!(builder.elevation, 0.0);
        assert_eq!(builder.albedo, 0.08);
        assert_eq!(builder.wind_function, "penman1948");
        assert!(builder.use_wind);
        assert_eq!(builder.datetime_format, "%d/%m/%Y %H:%M");
        assert_eq!(builder.station, None);
        assert_eq!(builder.output.format, OutputFormat::Json);
        assert_eq!(builder.output.path, "/tmp/soreq.json");
        assert_eq!(builder.output.variables, OutputVariable::all());
    }

    #[test]
    fn text_config_full() {
        let text = "\
            STATION=Soreq\n\
            LATITUDE = -33.9\n\
            ELEVATION=30\n\
            ALBEDO=0.23\n\
            WIND_FUNCTION=linacre1993\n\
            USE_WIND=false\n\
            DATETIME_FORMAT=%Y-%m-%dT%H:%M\n\
            OUTPUT=csv:out.csv\n\
            VARIABLE=evaporation:e:2\n\
            VARIABLE=temperature\n";
        let config_map = parse_config(text.as_bytes(), "test.txt").expect("should parse");
        let builder = PenmanConfigBuilder::from_config_map(&config_map).expect("should build");

        assert_eq!(builder.station.as_deref(), Some("Soreq"));
        assert_eq!(builder.latitude, -33.9);
        assert_eq!(builder.elevation, 30.0);
        assert_eq!(builder.albedo, 0.23);
        assert_eq!(builder.wind_function, "linacre1993");
        assert!(!builder.use_wind);
        assert_eq!(builder.datetime_format, "%Y-%m-%dT%H:%M");
        assert_eq!(
            builder.output.variables,
            vec![
                OutputVariable::new(OutputVariableName::evaporation, "e", 2),
                OutputVariable::new(OutputVariableName::temperature, "temperature", 3),
            ]
        );
    }

    #[test]
    fn mandatory_keys() {
        let config_map = parse_config("OUTPUT=csv:out.csv\n".as_bytes(), "t").expect("parse");
        assert!(PenmanConfigBuilder::from_config_map(&config_map).is_err());

        let config_map = parse_config("LATITUDE=10\n".as_bytes(), "t").expect("parse");
        assert!(PenmanConfigBuilder::from_config_map(&config_map).is_err());

        let config_map =
            parse_config("LATITUDE=north\nOUTPUT=csv:o\n".as_bytes(), "t").expect("parse");
        assert!(PenmanConfigBuilder::from_config_map(&config_map).is_err());

        let config_map =
            parse_config("LATITUDE=10\nOUTPUT=png:o\n".as_bytes(), "t").expect("parse");
        assert!(PenmanConfigBuilder::from_config_map(&config_map).is_err());
    }

    #[test]
    fn lines_without_separator_are_rejected() {
        assert!(parse_config("LATITUDE 31.96\n".as_bytes(), "t").is_err());
    }

    #[test]
    fn yaml_config() {
        let yaml = "
station: Soreq
latitude: 31.96
elevation: 30
wind_function: penman1956
output:
  path: out.csv
  variables:
    - internal_name: evaporation
      name: e
";
        let builder = PenmanConfigBuilder::from_yaml_str(yaml).expect("should parse");
        assert_eq!(builder.elevation, 30.0);
        assert_eq!(builder.albedo, 0.08);
        assert_eq!(builder.wind_function, "penman1956");
        assert_eq!(builder.output.format, OutputFormat::Csv);
        assert_eq!(
            builder.output.variables,
            vec![OutputVariable::new(OutputVariableName::evaporation, "e", 3)]
        );
    }
}
