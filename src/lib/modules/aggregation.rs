use std::collections::HashMap;

use chrono::NaiveDate;
use itertools::{Itertools, MinMaxResult};
use ndarray::Array1;

use crate::{
    constants::RADIATION_CONVERSION,
    models::input::{DailyWeather, Observation, ObservationVariableName},
};

use ObservationVariableName::*;

// mean of the available values, NaN if there are none
fn daily_mean(observations: &[&Observation], variable: ObservationVariableName) -> f64 {
    let (sum, count) = observations
        .iter()
        .map(|o| o.value(variable))
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

// sum of the available values, 0 if there are none
fn daily_sum(observations: &[&Observation], variable: ObservationVariableName) -> f64 {
    observations
        .iter()
        .map(|o| o.value(variable))
        .filter(|v| !v.is_nan())
        .sum()
}

fn aggregate_day(date: NaiveDate, observations: &[&Observation], with_wind: bool) -> DailyWeather {
    DailyWeather {
        date,
        temperature: daily_mean(observations, Temperature),
        global_radiation: daily_mean(observations, GlobalRadiation) * RADIATION_CONVERSION,
        precipitation: daily_sum(observations, Precipitation),
        relative_humidity: daily_mean(observations, RelativeHumidity),
        wind_speed: with_wind.then(|| daily_mean(observations, WindSpeed)),
    }
}

/// Resample sub-daily observations to calendar days.
///
/// Every day between the first and the last observed day is returned, in order,
/// including the days without observations. Temperature, radiation, humidity and
/// wind are averaged, precipitation is summed and the mean radiation is converted
/// from W m^-2 to MJ m^-2 day^-1. Set `with_wind` to false when the station has
/// no wind sensor: the days will then carry no wind speed at all.
pub fn aggregate_daily(observations: &[Observation], with_wind: bool) -> Array1<DailyWeather> {
    let by_day: HashMap<NaiveDate, Vec<&Observation>> = observations
        .iter()
        .into_group_map_by(|o| o.time.date());

    let (first, last) = match by_day.keys().minmax() {
        MinMaxResult::NoElements => return Array1::from_vec(vec![]),
        MinMaxResult::OneElement(day) => (*day, *day),
        MinMaxResult::MinMax(first, last) => (*first, *last),
    };

    first
        .iter_days()
        .take_while(|day| *day <= last)
        .map(|day| {
            let observations = by_day.get(&day).map(Vec::as_slice).unwrap_or(&[]);
            aggregate_day(day, observations, with_wind)
        })
        .collect()
}
