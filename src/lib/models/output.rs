use chrono::NaiveDate;
use ndarray::Array1;
use ndarray_stats::QuantileExt;
use rayon::prelude::*;
use serde_derive::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumProperty, EnumString};

use crate::{constants::NODATAVAL, models::input::DailyWeather};

/// One output row. Missing values are stored as NODATAVAL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputElement {
    pub date: NaiveDate,
    /// Potential evaporation [mm day^-1]
    pub evaporation: f64,

    // ----------------- INPUTS ---------------//
    /// Mean temperature [°C]
    pub temperature: f64,
    /// Mean relative humidity [%]
    pub humidity: f64,
    /// Mean wind speed [m s^-1]
    pub wind_speed: f64,
    /// Global radiation [MJ m^-2 day^-1]
    pub global_radiation: f64,
    /// Cumulated precipitation [mm]
    pub precipitation: f64,
}

fn or_nodata(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        NODATAVAL
    }
}

impl OutputElement {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            evaporation: NODATAVAL,
            temperature: NODATAVAL,
            humidity: NODATAVAL,
            wind_speed: NODATAVAL,
            global_radiation: NODATAVAL,
            precipitation: NODATAVAL,
        }
    }
}

impl From<&DailyWeather> for OutputElement {
    fn from(day: &DailyWeather) -> Self {
        Self {
            temperature: or_nodata(day.temperature),
            humidity: or_nodata(day.relative_humidity),
            wind_speed: day.wind_speed.map_or(NODATAVAL, or_nodata),
            global_radiation: or_nodata(day.global_radiation),
            precipitation: or_nodata(day.precipitation),
            ..OutputElement::new(day.date)
        }
    }
}

#[allow(non_camel_case_types)]
#[derive(
    Debug,
    PartialEq,
    Eq,
    Hash,
    Copy,
    Clone,
    EnumString,
    EnumIter,
    EnumProperty,
    Display,
    Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum OutputVariableName {
    /// Potential Evaporation
    #[strum(props(long_name = "Penman Potential Evaporation", units = "mm/day"))]
    evaporation,

    /// Input Temperature
    #[strum(props(long_name = "Mean Temperature", units = "°C"))]
    temperature,

    /// Input Relative Humidity
    #[strum(props(long_name = "Mean Relative Humidity", units = "%"))]
    humidity,

    /// Input Wind Speed
    #[strum(props(long_name = "Mean Wind Speed", units = "m/s"))]
    windSpeed,

    /// Input Global Radiation
    #[strum(props(long_name = "Global Radiation", units = "MJ/m²/day"))]
    globalRadiation,

    /// Input Precipitation
    #[strum(props(long_name = "Precipitation", units = "mm"))]
    precipitation,
}

/// Statistics of the evaporation series over the valid days
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutputSummary {
    pub days: usize,
    pub valid_days: usize,
    /// mean evaporation [mm day^-1]
    pub mean: Option<f64>,
    /// maximum evaporation [mm day^-1]
    pub max: Option<f64>,
}

pub struct Output {
    pub data: Array1<OutputElement>,
}

impl Output {
    pub fn new(data: Array1<OutputElement>) -> Self {
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.data.iter().map(|o| o.date).collect()
    }

    pub fn get_array(&self, func: fn(&OutputElement) -> f64) -> Array1<f64> {
        let vec = self.data.par_iter().map(func).collect::<Vec<_>>();
        Array1::from_vec(vec)
    }

    pub fn get(&self, variable: &OutputVariableName) -> Array1<f64> {
        use OutputVariableName::*;
        match variable {
            evaporation => self.get_array(|o| o.evaporation),

            // Input variables
            temperature => self.get_array(|o| o.temperature),
            humidity => self.get_array(|o| o.humidity),
            windSpeed => self.get_array(|o| o.wind_speed),
            globalRadiation => self.get_array(|o| o.global_radiation),
            precipitation => self.get_array(|o| o.precipitation),
        }
    }

    pub fn summary(&self) -> OutputSummary {
        let valid = self
            .data
            .iter()
            .map(|o| o.evaporation)
            .filter(|e| *e != NODATAVAL)
            .collect::<Array1<f64>>();

        OutputSummary {
            days: self.len(),
            valid_days: valid.len(),
            mean: valid.mean(),
            max: valid.max().ok().copied(),
        }
    }
}
