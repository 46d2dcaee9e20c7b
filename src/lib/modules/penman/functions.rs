use crate::{
    error::{EvaporationError, Result},
    models::{input::DailyWeather, output::OutputElement},
};

use super::{
    config::{PenmanModelConfig, WindFunction},
    constants::*,
    models::{EvaporationTerms, PenmanEvaporation, SiteProperties},
};

// square root of the shifted temperature, the formula is not defined below -9.5 °C
fn temperature_root(t_mean: f64) -> Result<f64> {
    let shifted = t_mean + TEMPERATURE_OFFSET;
    if shifted < 0.0 {
        return Err(EvaporationError::NumericDomain(format!(
            "mean temperature {t_mean} °C is below -{TEMPERATURE_OFFSET} °C"
        )));
    }
    Ok(shifted.sqrt())
}

fn radiation_ratio_term(
    rs: f64, // solar radiation [MJ m^-2 day^-1]
    ra: f64, // extraterrestrial radiation [MJ m^-2 day^-1]
) -> Result<f64> {
    if ra == 0.0 {
        return Err(EvaporationError::NumericDomain(
            "extraterrestrial radiation is zero".into(),
        ));
    }
    Ok(RADIATION_RATIO_COEFF * (rs / ra).powi(2))
}

pub fn elevation_correction(
    elevation: f64, // elevation [m]
) -> f64 {
    // [mm day^-1], Eq. 36
    ELEVATION_COEFF * elevation
}

// Simplified Penman equation with wind data, Valiantzas (2006) Eq. 32
pub fn terms_with_wind(
    props: &SiteProperties,
    ra: f64,      // extraterrestrial radiation [MJ m^-2 day^-1]
    t_mean: f64,  // mean temperature [°C]
    rh_mean: f64, // mean relative humidity [%]
    rs: f64,      // solar radiation [MJ m^-2 day^-1]
    u: f64,       // wind speed at 2 m [m s^-1]
    wind_function: WindFunction,
) -> Result<(f64, f64, f64)> {
    let (a_u, b_u) = wind_function.coefficients();
    let term1 = WIND_RADIATION_COEFF * (1.0 - props.albedo) * rs * temperature_root(t_mean)?;
    let term2 = radiation_ratio_term(rs, ra)?;
    let term3 = WIND_AERODYNAMIC_COEFF
        * (t_mean + HUMIDITY_TEMPERATURE_OFFSET)
        * (1.0 - rh_mean / 100.0)
        * (a_u - WIND_FUNCTION_OFFSET + b_u * u);
    Ok((term1, term2, term3))
}

// Simplified Penman equation without wind data, Valiantzas (2006) Eq. 33
// NOTE: it is not the limit of Eq. 32 for u = 0, the coefficients differ
pub fn terms_without_wind(
    ra: f64,      // extraterrestrial radiation [MJ m^-2 day^-1]
    t_mean: f64,  // mean temperature [°C]
    rh_mean: f64, // mean relative humidity [%]
    rs: f64,      // solar radiation [MJ m^-2 day^-1]
) -> Result<(f64, f64, f64)> {
    let term1 = NO_WIND_RADIATION_COEFF * rs * temperature_root(t_mean)?;
    let term2 = radiation_ratio_term(rs, ra)?;
    let term3 = NO_WIND_AERODYNAMIC_COEFF
        * (t_mean + HUMIDITY_TEMPERATURE_OFFSET)
        * (1.0 - rh_mean / 100.0);
    Ok((term1, term2, term3))
}

#[allow(clippy::too_many_arguments)]
pub fn evaporation_terms(
    props: &SiteProperties,
    ra: f64,
    n: f64,
    t_mean: f64,
    rh_mean: f64,
    rs: f64,
    u: Option<f64>,
    wind_function: WindFunction,
) -> Result<EvaporationTerms> {
    let (term1, term2, term3) = match u {
        Some(u) => terms_with_wind(props, ra, t_mean, rh_mean, rs, u, wind_function)?,
        None => terms_without_wind(ra, t_mean, rh_mean, rs)?,
    };
    Ok(EvaporationTerms {
        ra,
        n,
        term1,
        term2,
        term3,
        elevation_correction: elevation_correction(props.elevation),
    })
}

/// Compute the output row of a day.
/// Incomplete days are not evaluated and keep the no-data evaporation.
pub fn get_output_fn(
    engine: &PenmanEvaporation,
    day: &DailyWeather,
    config: &PenmanModelConfig,
) -> (OutputElement, Option<Result<f64>>) {
    let mut output = OutputElement::from(day);
    if !day.is_complete(config.use_wind()) {
        return (output, None);
    }
    let result = engine.daily_weather_evaporation(day, config);
    if let Ok(evaporation) = result {
        output.evaporation = evaporation;
    }
    (output, Some(result))
}
