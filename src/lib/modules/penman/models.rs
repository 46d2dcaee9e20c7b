use chrono::NaiveDate;
use ndarray::{Array1, Zip};

use crate::{
    error::{EvaporationError, Result},
    models::{
        input::{DailyWeather, EvaporationDate},
        output::Output,
    },
    modules::functions::radiation_geometry,
};

use super::{
    config::{PenmanModelConfig, WindFunction},
    constants::*,
    functions::{evaporation_terms, get_output_fn},
};

/// Simplified Penman evaporation
/// Source: Valiantzas, J.D. (2006). Simplified versions for the Penman evaporation equation
/// using routine weather data. Journal of Hydrology, 331(3-4), 690-702.

// SITE PROPERTIES
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SiteProperties {
    pub latitude_rad: f64, // latitude [rad]
    pub elevation: f64,    // elevation above sea level [m]
    pub albedo: f64,       // surface albedo [-], 0.08 open water, 0.23-0.25 grass
}

impl SiteProperties {
    /// Site constants are stored as given, none of them is validated
    pub fn new(latitude_deg: f64, elevation: f64, albedo: f64) -> Self {
        Self {
            latitude_rad: latitude_deg.to_radians(),
            elevation,
            albedo,
        }
    }
}

/// The additive terms of the simplified Penman equation for one day
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaporationTerms {
    pub ra: f64,                   // extraterrestrial radiation [MJ m^-2 day^-1]
    pub n: f64,                    // daylight hours [h]
    pub term1: f64,                // radiation term [mm day^-1]
    pub term2: f64,                // radiation ratio term [mm day^-1]
    pub term3: f64,                // aerodynamic term [mm day^-1]
    pub elevation_correction: f64, // [mm day^-1]
}

impl EvaporationTerms {
    /// evaporation before clamping, it can be negative
    pub fn raw(&self) -> f64 {
        self.term1 - self.term2 + self.term3 + self.elevation_correction
    }

    /// potential evaporation [mm day^-1], never negative
    pub fn evaporation(&self) -> f64 {
        f64::max(0.0, self.raw())
    }
}

/// Evaporation engine for one site. Immutable once built, it can be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct PenmanEvaporation {
    props: SiteProperties,
}

impl PenmanEvaporation {
    pub fn new(latitude_deg: f64, elevation: f64, albedo: f64) -> Self {
        Self {
            props: SiteProperties::new(latitude_deg, elevation, albedo),
        }
    }

    /// Engine at sea level over open water
    pub fn at_latitude(latitude_deg: f64) -> Self {
        Self::new(latitude_deg, DEFAULT_ELEVATION, DEFAULT_ALBEDO)
    }

    pub fn properties(&self) -> &SiteProperties {
        &self.props
    }

    /// (Ra [MJ m^-2 day^-1], N [h]) for the month of `date`
    pub fn radiation_geometry(&self, date: impl Into<EvaporationDate>) -> Result<(f64, f64)> {
        let date = date.into().resolve()?;
        Ok(radiation_geometry(self.props.latitude_rad, &date))
    }

    pub fn evaporation_terms(
        &self,
        date: impl Into<EvaporationDate>,
        t_mean: f64,
        rh_mean: f64,
        rs: f64,
        u: Option<f64>,
        wind_function: WindFunction,
    ) -> Result<EvaporationTerms> {
        let (ra, n) = self.radiation_geometry(date)?;
        evaporation_terms(&self.props, ra, n, t_mean, rh_mean, rs, u, wind_function)
    }

    /// Daily potential evaporation [mm day^-1].
    /// With `u` the wind-aware equation is used, otherwise `wind_function` is ignored.
    pub fn daily_evaporation(
        &self,
        date: impl Into<EvaporationDate>,
        t_mean: f64,  // mean temperature [°C]
        rh_mean: f64, // mean relative humidity [%]
        rs: f64,      // solar radiation [MJ m^-2 day^-1]
        u: Option<f64>, // wind speed at 2 m [m s^-1]
        wind_function: WindFunction,
    ) -> Result<f64> {
        self.evaporation_terms(date, t_mean, rh_mean, rs, u, wind_function)
            .map(|terms| terms.evaporation())
    }

    /// Same as [`Self::daily_evaporation`] with the wind function given by name.
    /// The name is only checked when `u` is given.
    pub fn daily_evaporation_named(
        &self,
        date: impl Into<EvaporationDate>,
        t_mean: f64,
        rh_mean: f64,
        rs: f64,
        u: Option<f64>,
        wind_function: &str,
    ) -> Result<f64> {
        let date = date.into().resolve()?;
        let wind_function = match u {
            Some(_) => WindFunction::parse(wind_function)?,
            None => WindFunction::default(),
        };
        self.daily_evaporation(date, t_mean, rh_mean, rs, u, wind_function)
    }

    /// Evaporation of an aggregated day; wind is used only if both the config and the day have it
    pub fn daily_weather_evaporation(
        &self,
        day: &DailyWeather,
        config: &PenmanModelConfig,
    ) -> Result<f64> {
        let (u, wind_function) = match config.wind_function() {
            Some(wind_function) => (day.wind_speed, wind_function),
            None => (None, WindFunction::default()),
        };
        self.daily_evaporation(
            day.date,
            day.temperature,
            day.relative_humidity,
            day.global_radiation,
            u,
            wind_function,
        )
    }

    /// Evaporation of every day, computed in parallel and returned in input order
    pub fn evaporation_series(
        &self,
        days: &Array1<DailyWeather>,
        config: &PenmanModelConfig,
    ) -> Array1<Result<f64>> {
        Zip::from(days).par_map_collect(|day| self.daily_weather_evaporation(day, config))
    }

    /// Output rows for the whole series, with the failed days and their errors.
    /// Failed and incomplete days keep the no-data evaporation.
    pub fn get_output(
        &self,
        days: &Array1<DailyWeather>,
        config: &PenmanModelConfig,
    ) -> (Output, Vec<(NaiveDate, EvaporationError)>) {
        let results = Zip::from(days).par_map_collect(|day| get_output_fn(self, day, config));

        let mut failures = Vec::new();
        let data = results
            .iter()
            .map(|(element, result)| {
                if let Some(Err(err)) = result {
                    failures.push((element.date, err.clone()));
                }
                element.clone()
            })
            .collect::<Array1<_>>();
        (Output::new(data), failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use crate::models::output::OutputVariableName;

    fn reference_site() -> PenmanEvaporation {
        PenmanEvaporation::new(31.96, 30.0, 0.08)
    }

    fn day(date: (i32, u32, u32), t: f64, rh: f64, rs: f64, u: Option<f64>) -> DailyWeather {
        DailyWeather {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date"),
            temperature: t,
            global_radiation: rs,
            precipitation: 0.0,
            relative_humidity: rh,
            wind_speed: u,
        }
    }

    #[test]
    fn construction_stores_site_constants() {
        let engine = reference_site();
        let props = engine.properties();
        assert_eq!(props.latitude_rad, 31.96_f64.to_radians());
        assert_eq!(props.elevation, 30.0);
        assert_eq!(props.albedo, 0.08);

        let engine = PenmanEvaporation::at_latitude(-12.0);
        assert_eq!(engine.properties().elevation, 0.0);
        assert_eq!(engine.properties().albedo, 0.08);
    }

    #[test]
    fn reference_scenario_with_wind() {
        let e = reference_site()
            .daily_evaporation("2025-07-15", 28.0, 45.0, 22.0, Some(2.5), WindFunction::Penman1948)
            .expect("valid inputs");
        assert_relative_eq!(e, 8.303124287970107, max_relative = 1e-9);
    }

    #[test]
    fn reference_scenario_other_wind_functions() {
        let engine = reference_site();
        let e = engine
            .daily_evaporation("2025-07-15", 28.0, 45.0, 22.0, Some(2.5), WindFunction::Penman1956)
            .expect("valid inputs");
        assert_relative_eq!(e, 7.616724287970106, max_relative = 1e-9);
        let e = engine
            .daily_evaporation("2025-07-15", 28.0, 45.0, 22.0, Some(2.5), WindFunction::Linacre1993)
            .expect("valid inputs");
        assert_relative_eq!(e, 6.9440522879701065, max_relative = 1e-9);
    }

    #[test]
    fn reference_scenario_without_wind() {
        let engine = reference_site();
        let e = engine
            .daily_evaporation("2025-07-15", 28.0, 45.0, 22.0, None, WindFunction::Penman1948)
            .expect("valid inputs");
        assert_relative_eq!(e, 7.999214042838354, max_relative = 1e-9);
        // the wind function plays no role without wind
        let e2 = engine
            .daily_evaporation("2025-07-15", 28.0, 45.0, 22.0, None, WindFunction::Linacre1993)
            .expect("valid inputs");
        assert_eq!(e.to_bits(), e2.to_bits());
    }

    #[test]
    fn southern_hemisphere_grass() {
        let engine = PenmanEvaporation::new(-33.9, 0.0, 0.23);
        let (ra, n) = engine.radiation_geometry("2025-01-10").expect("valid date");
        assert_relative_eq!(ra, 28.220027647087107, max_relative = 1e-9);
        assert_relative_eq!(n, 14.130237532264756, max_relative = 1e-9);
        let e = engine
            .daily_evaporation("2025-01-10", 22.0, 60.0, 25.0, Some(3.0), WindFunction::Penman1948)
            .expect("valid inputs");
        assert_relative_eq!(e, 5.572892322878799, max_relative = 1e-9);
    }

    #[test]
    fn winter_day() {
        let engine = reference_site();
        let e = engine
            .daily_evaporation("2025-01-15", 2.0, 95.0, 3.0, Some(0.5), WindFunction::Penman1948)
            .expect("valid inputs");
        assert_relative_eq!(e, 0.48302990822846037, max_relative = 1e-9);
        let e = engine
            .daily_evaporation("2025-01-15", 2.0, 95.0, 3.0, None, WindFunction::Penman1948)
            .expect("valid inputs");
        assert_relative_eq!(e, 0.5320501878264355, max_relative = 1e-9);
    }

    #[test]
    fn negative_evaporation_is_clamped() {
        let engine = reference_site();
        let terms = engine
            .evaporation_terms("2025-01-15", -5.0, 98.0, 30.0, Some(0.0), WindFunction::Penman1948)
            .expect("valid inputs");
        assert!(terms.raw() < 0.0);
        assert_eq!(terms.evaporation(), 0.0);
        let e = engine
            .daily_evaporation("2025-01-15", -5.0, 98.0, 30.0, Some(0.0), WindFunction::Penman1948)
            .expect("valid inputs");
        assert_eq!(e, 0.0);
    }

    #[test]
    fn results_are_never_negative() {
        let engine = PenmanEvaporation::new(50.0, 0.0, 0.25);
        for month in 1..=12 {
            let date = NaiveDate::from_ymd_opt(2024, month, 1).expect("valid date");
            for t in [-9.5, -2.0, 5.0, 15.0, 30.0, 45.0] {
                for rh in [0.0, 50.0, 100.0] {
                    for rs in [0.0, 5.0, 30.0] {
                        for u in [None, Some(0.0), Some(8.0)] {
                            let e = engine
                                .daily_evaporation(date, t, rh, rs, u, WindFunction::Linacre1993)
                                .expect("valid inputs");
                            assert!(e >= 0.0);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn repeated_calls_are_identical() {
        let engine = reference_site();
        let first = engine
            .daily_evaporation("2025-07-15", 28.0, 45.0, 22.0, Some(2.5), WindFunction::Penman1948)
            .expect("valid inputs");
        for _ in 0..10 {
            let again = engine
                .daily_evaporation("2025-07-15", 28.0, 45.0, 22.0, Some(2.5), WindFunction::Penman1948)
                .expect("valid inputs");
            assert_eq!(first.to_bits(), again.to_bits());
        }
    }

    #[test]
    fn penman_1948_and_1956_differ_by_half_wind_offset() {
        let engine = reference_site();
        let (t, rh) = (28.0, 45.0);
        let e48 = engine
            .evaporation_terms("2025-07-15", t, rh, 22.0, Some(2.5), WindFunction::Penman1948)
            .expect("valid inputs")
            .raw();
        let e56 = engine
            .evaporation_terms("2025-07-15", t, rh, 22.0, Some(2.5), WindFunction::Penman1956)
            .expect("valid inputs")
            .raw();
        let expected = 0.052 * (t + 20.0) * (1.0 - rh / 100.0) * 0.5;
        assert_relative_eq!(e48 - e56, expected, epsilon = 1e-12);
    }

    #[test]
    fn calm_wind_is_not_the_no_wind_equation() {
        let engine = reference_site();
        let calm = engine
            .evaporation_terms("2025-07-15", 28.0, 45.0, 22.0, Some(0.0), WindFunction::Penman1948)
            .expect("valid inputs");
        let no_wind = engine
            .evaporation_terms("2025-07-15", 28.0, 45.0, 22.0, None, WindFunction::Penman1948)
            .expect("valid inputs");
        assert_eq!(calm.term2, no_wind.term2);
        assert_ne!(calm.term1, no_wind.term1);
        assert_ne!(calm.term3, no_wind.term3);
        assert_ne!(calm.raw(), no_wind.raw());
    }

    #[test]
    fn elevation_correction_is_linear() {
        let low = PenmanEvaporation::new(31.96, 100.0, 0.08);
        let high = PenmanEvaporation::new(31.96, 200.0, 0.08);
        let sea = PenmanEvaporation::new(31.96, 0.0, 0.08);
        let terms = |engine: &PenmanEvaporation| {
            engine
                .evaporation_terms("2025-04-02", 18.0, 60.0, 17.0, Some(1.5), WindFunction::Penman1948)
                .expect("valid inputs")
        };
        let (low, high, sea) = (terms(&low), terms(&high), terms(&sea));
        assert_eq!(high.elevation_correction, 2.0 * low.elevation_correction);
        assert_eq!(sea.elevation_correction, 0.0);
        let low_contribution = low.raw() - sea.raw();
        let high_contribution = high.raw() - sea.raw();
        assert_relative_eq!(high_contribution, 2.0 * low_contribution, epsilon = 1e-12);
    }

    #[test]
    fn zero_radiation_is_allowed() {
        let e = reference_site()
            .evaporation_terms("2025-07-15", 20.0, 50.0, 0.0, None, WindFunction::Penman1948)
            .expect("valid inputs");
        assert_eq!(e.term1, 0.0);
        assert_eq!(e.term2, 0.0);
    }

    #[test]
    fn malformed_date_is_a_format_error() {
        let result = reference_site().daily_evaporation(
            "15-07-2025",
            28.0,
            45.0,
            22.0,
            Some(2.5),
            WindFunction::Penman1948,
        );
        assert_eq!(result, Err(EvaporationError::Format("15-07-2025".into())));
    }

    #[test]
    fn unknown_wind_function_is_an_invalid_parameter() {
        let engine = reference_site();
        let result =
            engine.daily_evaporation_named("2025-07-15", 28.0, 45.0, 22.0, Some(2.5), "foo");
        assert!(matches!(result, Err(EvaporationError::InvalidParameter { .. })));

        // without wind the selector is never looked at
        let result = engine.daily_evaporation_named("2025-07-15", 28.0, 45.0, 22.0, None, "foo");
        assert_relative_eq!(
            result.expect("selector ignored"),
            7.999214042838354,
            max_relative = 1e-9
        );

        let result =
            engine.daily_evaporation_named("2025-07-15", 28.0, 45.0, 22.0, Some(2.5), "penman1948");
        assert_relative_eq!(
            result.expect("valid selector"),
            8.303124287970107,
            max_relative = 1e-9
        );
    }

    #[test]
    fn extreme_cold_is_a_numeric_domain_error() {
        let engine = reference_site();
        for u in [Some(2.0), None] {
            let result =
                engine.daily_evaporation("2025-01-15", -10.0, 80.0, 5.0, u, WindFunction::Penman1948);
            assert!(matches!(result, Err(EvaporationError::NumericDomain(_))));
        }
        // the lower bound itself is admissible
        assert!(engine
            .daily_evaporation("2025-01-15", -9.5, 80.0, 5.0, None, WindFunction::Penman1948)
            .is_ok());
    }

    #[test]
    fn zero_extraterrestrial_radiation_is_a_numeric_domain_error() {
        let props = SiteProperties::new(0.0, 0.0, 0.08);
        let result = evaporation_terms(&props, 0.0, 12.0, 20.0, 50.0, 10.0, None, WindFunction::Penman1948);
        assert!(matches!(result, Err(EvaporationError::NumericDomain(_))));
    }

    #[test]
    fn engine_is_shared_between_threads() {
        let engine = std::sync::Arc::new(reference_site());
        let handles = (0..4)
            .map(|_| {
                let engine = engine.clone();
                std::thread::spawn(move || {
                    engine
                        .daily_evaporation("2025-07-15", 28.0, 45.0, 22.0, Some(2.5), WindFunction::Penman1948)
                        .expect("valid inputs")
                })
            })
            .collect::<Vec<_>>();
        for handle in handles {
            let e = handle.join().expect("thread should not panic");
            assert_relative_eq!(e, 8.303124287970107, max_relative = 1e-9);
        }
    }

    #[test]
    fn series_keeps_input_order() {
        let engine = reference_site();
        let days = Array1::from_vec(vec![
            day((2025, 7, 15), 28.0, 45.0, 22.0, Some(2.5)),
            day((2025, 7, 16), -12.0, 45.0, 22.0, Some(2.5)),
            day((2025, 7, 17), 28.0, 45.0, 22.0, None),
        ]);
        let results = engine.evaporation_series(&days, &PenmanModelConfig::default());
        assert_relative_eq!(
            *results[0].as_ref().expect("valid day"),
            8.303124287970107,
            max_relative = 1e-9
        );
        assert!(matches!(results[1], Err(EvaporationError::NumericDomain(_))));
        assert_relative_eq!(
            *results[2].as_ref().expect("valid day"),
            7.999214042838354,
            max_relative = 1e-9
        );

        // wind data is dropped when the model runs without wind
        let results = engine.evaporation_series(&days, &PenmanModelConfig::without_wind());
        assert_relative_eq!(
            *results[0].as_ref().expect("valid day"),
            7.999214042838354,
            max_relative = 1e-9
        );
    }

    #[test]
    fn output_marks_failed_and_incomplete_days() {
        let engine = reference_site();
        let days = Array1::from_vec(vec![
            day((2025, 7, 15), 28.0, 45.0, 22.0, Some(2.5)),
            day((2025, 7, 16), -12.0, 45.0, 22.0, Some(2.5)),
            day((2025, 7, 17), f64::NAN, f64::NAN, f64::NAN, Some(f64::NAN)),
        ]);
        let (output, failures) = engine.get_output(&days, &PenmanModelConfig::default());

        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, NaiveDate::from_ymd_opt(2025, 7, 16).expect("valid date"));

        let evaporation = output
            .get(&OutputVariableName::evaporation)
            .to_vec();
        assert_relative_eq!(evaporation[0], 8.303124287970107, max_relative = 1e-9);
        assert_eq!(evaporation[1], NODATAVAL);
        assert_eq!(evaporation[2], NODATAVAL);

        let summary = output.summary();
        assert_eq!(summary.days, 3);
        assert_eq!(summary.valid_days, 1);
    }
}
