pub use crate::constants::NODATAVAL;

// SITE DEFAULTS
pub const DEFAULT_ELEVATION: f64 = 0.0; // [m]
pub const DEFAULT_ALBEDO: f64 = 0.08; // open water [-]

// SHARED TERMS
pub const TEMPERATURE_OFFSET: f64 = 9.5; // [°C], lowest admissible mean temperature is its opposite
pub const HUMIDITY_TEMPERATURE_OFFSET: f64 = 20.0; // [°C]
pub const RADIATION_RATIO_COEFF: f64 = 2.4;
// elevation correction (Eq. 36)
pub const ELEVATION_COEFF: f64 = 0.00012; // [mm day^-1 m^-1]

// WITH WIND DATA (Eq. 32)
pub const WIND_RADIATION_COEFF: f64 = 0.051;
pub const WIND_AERODYNAMIC_COEFF: f64 = 0.052;
pub const WIND_FUNCTION_OFFSET: f64 = 0.38;

// WITHOUT WIND DATA (Eq. 33)
pub const NO_WIND_RADIATION_COEFF: f64 = 0.047;
pub const NO_WIND_AERODYNAMIC_COEFF: f64 = 0.09;
