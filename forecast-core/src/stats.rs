//! Extremum queries over the leading window of a forecast.

use std::fmt;

use thiserror::Error;

use crate::{
    feels_like::feels_like,
    model::{ForecastPeriod, Limit, Measure, Query},
    time::utc_stamp,
};

#[derive(Error, Debug, PartialEq)]
pub enum StatsError {
    #[error("window of {requested} periods requested but only {available} available")]
    WindowOutOfRange { requested: usize, available: usize },

    #[error("unreadable wind speed {0:?}")]
    WindSpeed(String),

    #[error("unreadable start time {0:?}")]
    StartTime(String),
}

/// Where in the window the extremum occurs and its raw (°F, %, mph) value.
#[derive(Debug, Clone, PartialEq)]
pub struct Extremum<'a> {
    pub start_time: &'a str,
    pub value: f64,
}

/// One formatted answer, e.g. `2023-01-05T14:00:00Z 72.0000%`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub timestamp: String,
    pub value: f64,
    pub percent: bool,
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.4}", self.timestamp, self.value)?;
        if self.percent {
            f.write_str("%")?;
        }
        Ok(())
    }
}

fn raw_value(period: &ForecastPeriod, measure: Measure) -> Result<f64, StatsError> {
    let wind = || {
        period
            .wind_mph()
            .ok_or_else(|| StatsError::WindSpeed(period.wind_speed.clone()))
    };

    Ok(match measure {
        Measure::AirTemperature(_) => period.temperature,
        Measure::FeelsLike(_) => {
            feels_like(period.temperature, period.relative_humidity, wind()?)
        }
        Measure::Humidity => period.relative_humidity,
        Measure::Wind => wind()?,
        Measure::Precipitation => period.probability_of_precipitation,
    })
}

/// Scans the first `length` periods. Only a strictly better value replaces
/// the running extremum, so ties keep the earliest period.
pub fn extremum(
    periods: &[ForecastPeriod],
    measure: Measure,
    length: usize,
    limit: Limit,
) -> Result<Extremum<'_>, StatsError> {
    let out_of_range = StatsError::WindowOutOfRange {
        requested: length,
        available: periods.len(),
    };
    let (first, rest) = periods
        .get(..length)
        .and_then(<[_]>::split_first)
        .ok_or(out_of_range)?;

    let mut best = Extremum {
        start_time: &first.start_time,
        value: raw_value(first, measure)?,
    };

    for period in rest {
        let value = raw_value(period, measure)?;
        if limit.beats(value, best.value) {
            best = Extremum {
                start_time: &period.start_time,
                value,
            };
        }
    }

    Ok(best)
}

pub fn evaluate(periods: &[ForecastPeriod], query: &Query) -> Result<QueryResult, StatsError> {
    let found = extremum(periods, query.measure, query.length, query.limit)?;
    let timestamp =
        utc_stamp(found.start_time).ok_or_else(|| StatsError::StartTime(found.start_time.into()))?;

    let (value, percent) = match query.measure {
        Measure::AirTemperature(scale) | Measure::FeelsLike(scale) => {
            (scale.convert(found.value), false)
        }
        Measure::Humidity | Measure::Precipitation => (found.value, true),
        Measure::Wind => (found.value, false),
    };

    Ok(QueryResult {
        timestamp,
        value,
        percent,
    })
}
