//! Daily potential evaporation from routine weather data.
//!
//! The core is [`modules::penman`], an implementation of the simplified Penman
//! equations of Valiantzas (2006), with and without wind data. The
//! [`modules::aggregation`] module turns sub-daily station observations into
//! the daily records the engine consumes.
//!
//! Valiantzas, J.D. (2006). Simplified versions for the Penman evaporation
//! equation using routine weather data. Journal of Hydrology, 331(3-4), 690-702.

pub mod constants;
pub mod error;
pub mod models;
pub mod modules;
pub mod version;
