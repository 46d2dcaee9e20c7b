use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

/// Boundary between the tropical and the temperate formula for Ra [rad]
pub const TROPIC_LATITUDE: f64 = 23.5 * PI / 180.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClimateZone {
    Tropical,
    Temperate,
}

/// The temperate zone starts strictly above the tropic boundary
pub fn climate_zone(latitude_rad: f64) -> ClimateZone {
    if latitude_rad.abs() > TROPIC_LATITUDE {
        ClimateZone::Temperate
    } else {
        ClimateZone::Tropical
    }
}

pub fn daylight_hours(
    latitude_rad: f64, // latitude [rad]
    month: u32,        // calendar month [1-12]
) -> f64 {
    // [h]
    // Empirical fit of Valiantzas (2006), Eq. 34.
    // NOTE: latitude enters in radians without any further scaling
    4.0 * latitude_rad * (0.53 * month as f64 - 1.65).sin() + 12.0
}

pub fn extraterrestrial_radiation(
    latitude_rad: f64,   // latitude [rad]
    daylight_hours: f64, // daylight hours [h]
) -> f64 {
    // [MJ m^-2 day^-1]
    // Valiantzas (2006), Eq. 35
    let n = daylight_hours;
    match climate_zone(latitude_rad) {
        ClimateZone::Temperate => 3.0 * n * (0.131 * n - 0.95 * latitude_rad).sin(),
        ClimateZone::Tropical => 118.0 * n.powi(2) * (0.131 * n - 0.2 * latitude_rad).sin(),
    }
}

/// Extraterrestrial radiation and daylight hours for the month of `date`.
/// Returns (Ra [MJ m^-2 day^-1], N [h]).
pub fn radiation_geometry(latitude_rad: f64, date: &NaiveDate) -> (f64, f64) {
    let n = daylight_hours(latitude_rad, date.month());
    let ra = extraterrestrial_radiation(latitude_rad, n);
    (ra, n)
}
