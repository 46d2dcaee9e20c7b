use chrono::{NaiveDate, NaiveDateTime};
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::{EvaporationError, Result};

/// Format accepted for dates given as text
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Observation represents a single sub-daily record of a weather station.
/// Missing values are stored as NaN, as they come out of the reader.
#[derive(Debug, Clone)]
pub struct Observation {
    pub time: NaiveDateTime,
    /// air temperature [°C]
    pub temperature: f64,
    /// global radiation [W m^-2]
    pub global_radiation: f64,
    /// precipitation [mm]
    pub precipitation: f64,
    /// relative humidity [%]
    pub relative_humidity: f64,
    /// wind speed at 2 m [m s^-1]
    pub wind_speed: f64,
}

impl Observation {
    /// An observation at `time` with every variable missing
    pub fn empty(time: NaiveDateTime) -> Self {
        Self {
            time,
            temperature: f64::NAN,
            global_radiation: f64::NAN,
            precipitation: f64::NAN,
            relative_humidity: f64::NAN,
            wind_speed: f64::NAN,
        }
    }

    pub fn value(&self, variable: ObservationVariableName) -> f64 {
        use ObservationVariableName::*;
        match variable {
            Temperature => self.temperature,
            GlobalRadiation => self.global_radiation,
            Precipitation => self.precipitation,
            RelativeHumidity => self.relative_humidity,
            WindSpeed => self.wind_speed,
        }
    }

    pub fn value_mut(&mut self, variable: ObservationVariableName) -> &mut f64 {
        use ObservationVariableName::*;
        match variable {
            Temperature => &mut self.temperature,
            GlobalRadiation => &mut self.global_radiation,
            Precipitation => &mut self.precipitation,
            RelativeHumidity => &mut self.relative_humidity,
            WindSpeed => &mut self.wind_speed,
        }
    }
}

/// One calendar day of aggregated weather, the input of the evaporation engine
#[derive(Debug, Clone, PartialEq)]
pub struct DailyWeather {
    pub date: NaiveDate,
    /// mean air temperature [°C]
    pub temperature: f64,
    /// daily solar radiation [MJ m^-2 day^-1]
    pub global_radiation: f64,
    /// cumulated precipitation [mm]
    pub precipitation: f64,
    /// mean relative humidity [%]
    pub relative_humidity: f64,
    /// mean wind speed at 2 m [m s^-1], None when the station has no wind sensor
    pub wind_speed: Option<f64>,
}

impl DailyWeather {
    /// true if every variable needed by the evaporation formula is available,
    /// wind speed is only required when `use_wind` is set
    pub fn is_complete(&self, use_wind: bool) -> bool {
        self.temperature.is_finite()
            && self.global_radiation.is_finite()
            && self.relative_humidity.is_finite()
            && (!use_wind || self.wind_speed.map_or(true, f64::is_finite))
    }
}

/// Columns of a station observation file
#[derive(
    Debug, PartialEq, Eq, Hash, Copy, Clone, EnumString, EnumIter, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ObservationVariableName {
    /// Air temperature [°C]
    Temperature,
    /// Global radiation [W m^-2]
    GlobalRadiation,
    /// Precipitation [mm]
    Precipitation,
    /// Relative humidity [%]
    RelativeHumidity,
    /// Wind speed at 2 m [m s^-1]
    WindSpeed,
}

/// Date of an evaporation computation, either structured or as `YYYY-MM-DD` text.
/// It is resolved once, when the computation starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaporationDate {
    Text(String),
    Date(NaiveDate),
}

impl EvaporationDate {
    pub fn resolve(&self) -> Result<NaiveDate> {
        match self {
            EvaporationDate::Text(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
                .map_err(|_| EvaporationError::Format(text.clone())),
            EvaporationDate::Date(date) => Ok(*date),
        }
    }
}

impl From<NaiveDate> for EvaporationDate {
    fn from(date: NaiveDate) -> Self {
        EvaporationDate::Date(date)
    }
}

impl From<NaiveDateTime> for EvaporationDate {
    fn from(time: NaiveDateTime) -> Self {
        EvaporationDate::Date(time.date())
    }
}

impl From<&str> for EvaporationDate {
    fn from(text: &str) -> Self {
        EvaporationDate::Text(text.to_owned())
    }
}

impl From<String> for EvaporationDate {
    fn from(text: String) -> Self {
        EvaporationDate::Text(text)
    }
}
