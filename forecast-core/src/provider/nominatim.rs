use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::info;

use crate::{
    error::QueryError,
    model::Coordinates,
    provider::{ReverseProvider, TargetProvider, endpoint, fetch_json},
};

pub const FORWARD_ATTRIBUTION: &str = "**Forward geocoding data from OpenStreetMap";
pub const REVERSE_ATTRIBUTION: &str = "**Reverse geocoding data from OpenStreetMap";

/// Forward geocoding of a free-text place description. Failures name the
/// search text, not the request URL.
#[derive(Debug, Clone)]
pub struct NominatimSearch {
    http: Client,
    url: Url,
    query: String,
}

impl NominatimSearch {
    pub fn new(http: Client, base_url: &str, query: String) -> Result<Self, QueryError> {
        let mut url = endpoint(base_url, "search")?;
        url.query_pairs_mut()
            .append_pair("q", &query)
            .append_pair("format", "geojson");
        Ok(Self { http, url, query })
    }
}

/// Reverse geocoding of a point to its display name.
#[derive(Debug, Clone)]
pub struct NominatimReverse {
    http: Client,
    url: Url,
}

impl NominatimReverse {
    pub fn new(http: Client, base_url: &str) -> Result<Self, QueryError> {
        Ok(Self {
            http,
            url: endpoint(base_url, "reverse")?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection<F> {
    features: Vec<F>,
}

#[derive(Debug, Deserialize)]
struct PointFeature {
    geometry: PointGeometry,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    /// `[longitude, latitude]`
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct PlaceFeature {
    properties: PlaceProperties,
}

#[derive(Debug, Deserialize)]
struct PlaceProperties {
    display_name: String,
}

#[async_trait]
impl TargetProvider for NominatimSearch {
    async fn coordinates(&self) -> Result<Coordinates, QueryError> {
        let parsed: FeatureCollection<PointFeature> =
            fetch_json(&self.http, self.url.clone(), &self.query).await?;

        let [longitude, latitude] = parsed
            .features
            .first()
            .map(|f| f.geometry.coordinates)
            .ok_or_else(|| QueryError::format(self.query.as_str(), "no matching features"))?;

        info!(latitude, longitude, "geocoded target");
        Ok(Coordinates::new(latitude, longitude))
    }

    fn attribution(&self) -> Option<&'static str> {
        Some(FORWARD_ATTRIBUTION)
    }
}

#[async_trait]
impl ReverseProvider for NominatimReverse {
    async fn display_name(&self, at: Coordinates) -> Result<String, QueryError> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("lat", &at.latitude.to_string())
            .append_pair("lon", &at.longitude.to_string())
            .append_pair("format", "geojson");
        let subject = url.to_string();

        let parsed: FeatureCollection<PlaceFeature> = fetch_json(&self.http, url, &subject).await?;

        parsed
            .features
            .into_iter()
            .next()
            .map(|f| f.properties.display_name)
            .ok_or_else(|| QueryError::format(subject, "no features in reverse lookup"))
    }

    fn attribution(&self) -> Option<&'static str> {
        Some(REVERSE_ATTRIBUTION)
    }
}
