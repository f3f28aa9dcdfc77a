//! Local JSON files standing in for the remote services.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    error::QueryError,
    model::{Coordinates, Forecast},
    provider::{ReverseProvider, TargetProvider, WeatherProvider, nws::HourlyResponse, read_json},
};

/// A saved Nominatim `format=json` search result: `[{"lat": "..", "lon": ".."}]`.
#[derive(Debug, Clone)]
pub struct TargetFile {
    path: PathBuf,
}

impl TargetFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// A saved NWS hourly forecast document.
#[derive(Debug, Clone)]
pub struct WeatherFile {
    path: PathBuf,
}

impl WeatherFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// A saved Nominatim reverse lookup: `{"display_name": ".."}`.
#[derive(Debug, Clone)]
pub struct ReverseFile {
    path: PathBuf,
}

impl ReverseFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

/// Nominatim serializes coordinates as strings in its JSON output.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Degrees {
    Number(f64),
    Text(String),
}

impl Degrees {
    fn value(&self) -> Option<f64> {
        match self {
            Degrees::Number(v) => Some(*v),
            Degrees::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Place {
    lat: Degrees,
    lon: Degrees,
}

#[derive(Debug, Deserialize)]
struct ReversePlace {
    display_name: String,
}

#[async_trait]
impl TargetProvider for TargetFile {
    async fn coordinates(&self) -> Result<Coordinates, QueryError> {
        let subject = self.path.display().to_string();
        let places: Vec<Place> = read_json(&self.path)?;

        let place = places
            .first()
            .ok_or_else(|| QueryError::format(subject.as_str(), "no places listed"))?;

        match (place.lat.value(), place.lon.value()) {
            (Some(latitude), Some(longitude)) => Ok(Coordinates::new(latitude, longitude)),
            _ => Err(QueryError::format(subject, "lat/lon are not numbers")),
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherFile {
    async fn forecast(&self, _at: Coordinates) -> Result<Forecast, QueryError> {
        let parsed: HourlyResponse = read_json(&self.path)?;
        parsed.into_forecast(&self.path.display().to_string())
    }
}

#[async_trait]
impl ReverseProvider for ReverseFile {
    async fn display_name(&self, _at: Coordinates) -> Result<String, QueryError> {
        let place: ReversePlace = read_json(&self.path)?;
        Ok(place.display_name)
    }
}
