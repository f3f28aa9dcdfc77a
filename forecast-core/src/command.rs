//! The line-oriented command input:
//!
//! ```text
//! TARGET NOMINATIM Bren Events Center, Irvine, CA
//! WEATHER NWS
//! TEMPERATURE AIR F 12 MAX
//! HUMIDITY 24 MIN
//! NO MORE QUERIES
//! REVERSE NOMINATIM
//! ```

use std::{io::BufRead, path::PathBuf, str::FromStr};

use crate::{
    error::CommandError,
    model::{Limit, Measure, Query, Scale},
};

const END_OF_QUERIES: &str = "NO MORE QUERIES";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSpec {
    File(PathBuf),
    Nominatim(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherSpec {
    File(PathBuf),
    Nws,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReverseSpec {
    File(PathBuf),
    Nominatim,
}

/// Everything a run needs, parsed from the command input.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub target: TargetSpec,
    pub weather: WeatherSpec,
    pub queries: Vec<Query>,
    pub reverse: ReverseSpec,
}

fn unrecognized(expected: &'static str, line: &str) -> CommandError {
    CommandError::Unrecognized {
        expected,
        line: line.to_string(),
    }
}

impl FromStr for TargetSpec {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if let Some(path) = line.strip_prefix("TARGET FILE ") {
            Ok(TargetSpec::File(PathBuf::from(path)))
        } else if let Some(text) = line.strip_prefix("TARGET NOMINATIM ") {
            Ok(TargetSpec::Nominatim(text.to_string()))
        } else {
            Err(unrecognized("TARGET", line))
        }
    }
}

impl FromStr for WeatherSpec {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if let Some(path) = line.strip_prefix("WEATHER FILE ") {
            Ok(WeatherSpec::File(PathBuf::from(path)))
        } else if line == "WEATHER NWS" {
            Ok(WeatherSpec::Nws)
        } else {
            Err(unrecognized("WEATHER", line))
        }
    }
}

impl FromStr for ReverseSpec {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        if let Some(path) = line.strip_prefix("REVERSE FILE ") {
            Ok(ReverseSpec::File(PathBuf::from(path)))
        } else if line == "REVERSE NOMINATIM" {
            Ok(ReverseSpec::Nominatim)
        } else {
            Err(unrecognized("REVERSE", line))
        }
    }
}

impl FromStr for Query {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();

        let scale = |word: &str| match word {
            "C" => Ok(Scale::Celsius),
            "F" => Ok(Scale::Fahrenheit),
            _ => Err(unrecognized("query", line)),
        };
        let length = |word: &str| match word.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(CommandError::BadNumber {
                value: word.to_string(),
                line: line.to_string(),
            }),
        };
        let limit = |word: &str| match word {
            "MAX" => Ok(Limit::Max),
            "MIN" => Ok(Limit::Min),
            _ => Err(unrecognized("query", line)),
        };

        let (measure, n, l) = match words[..] {
            ["TEMPERATURE", "AIR", s, n, l] => (Measure::AirTemperature(scale(s)?), n, l),
            ["TEMPERATURE", "FEELS", s, n, l] => (Measure::FeelsLike(scale(s)?), n, l),
            ["HUMIDITY", n, l] => (Measure::Humidity, n, l),
            ["WIND", n, l] => (Measure::Wind, n, l),
            ["PRECIPITATION", n, l] => (Measure::Precipitation, n, l),
            _ => return Err(unrecognized("query", line)),
        };

        Ok(Query {
            measure,
            length: length(n)?,
            limit: limit(l)?,
        })
    }
}

impl Session {
    /// Reads exactly one session; anything after the REVERSE line is left unread.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, CommandError> {
        let mut lines = reader.lines();
        let mut next_line = |what: &'static str| -> Result<String, CommandError> {
            let line = lines.next().ok_or(CommandError::UnexpectedEnd(what))??;
            Ok(line.trim_end_matches(['\r', '\n']).to_string())
        };

        let target: TargetSpec = next_line("TARGET")?.parse()?;
        let weather: WeatherSpec = next_line("WEATHER")?.parse()?;

        let mut queries: Vec<Query> = Vec::new();
        loop {
            let line = next_line(END_OF_QUERIES)?;
            if line == END_OF_QUERIES {
                break;
            }
            queries.push(line.parse()?);
        }

        let reverse: ReverseSpec = next_line("REVERSE")?.parse()?;

        Ok(Session {
            target,
            weather,
            queries,
            reverse,
        })
    }
}

impl FromStr for Session {
    type Err = CommandError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Session::read_from(input.as_bytes())
    }
}
