//! Core library for the `forecast` CLI.
//!
//! This crate defines:
//! - The line-oriented command input and its parsing
//! - Target, weather and reverse-geocoding providers (remote and file-backed)
//! - Forecast statistics: extrema, feels-like temperature, grid cell centroid
//! - The orchestrator that turns a parsed session into output lines
//!
//! It is used by `forecast-cli`, but can also be reused by other binaries or services.

pub mod command;
pub mod config;
pub mod error;
pub mod feels_like;
pub mod model;
pub mod orchestrator;
pub mod polygon;
pub mod provider;
pub mod stats;
pub mod time;

pub use command::{ReverseSpec, Session, TargetSpec, WeatherSpec};
pub use config::{Config, Endpoints};
pub use error::{CommandError, ErrorKind, ErrorReport, QueryError};
pub use model::{Coordinates, Forecast, ForecastPeriod, Limit, Measure, Query, Scale};
pub use orchestrator::{Outcome, run};
pub use provider::{ReverseProvider, TargetProvider, WeatherProvider};
