use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    error::QueryError,
    model::{Coordinates, Forecast, ForecastPeriod, PolygonRing},
    provider::{WeatherProvider, endpoint, fetch_json},
};

pub const ATTRIBUTION: &str =
    "**Real-time weather data from National Weather Service, United States Department of Commerce";

/// api.weather.gov: grid point lookup followed by the hourly forecast.
#[derive(Debug, Clone)]
pub struct NwsForecast {
    http: Client,
    base_url: String,
}

impl NwsForecast {
    pub fn new(http: Client, base_url: &str) -> Result<Self, QueryError> {
        // Reject a malformed base URL before any request.
        endpoint(base_url, "points")?;
        Ok(Self {
            http,
            base_url: base_url.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct PointResponse {
    properties: PointProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointProperties {
    forecast_hourly: String,
}

/// Hourly forecast document. Weather files share this shape.
#[derive(Debug, Deserialize)]
pub(crate) struct HourlyResponse {
    properties: HourlyProperties,
    geometry: PolygonGeometry,
}

#[derive(Debug, Deserialize)]
struct HourlyProperties {
    periods: Vec<ForecastPeriod>,
}

#[derive(Debug, Deserialize)]
struct PolygonGeometry {
    coordinates: Vec<PolygonRing>,
}

impl HourlyResponse {
    /// Periods plus the outer ring of the grid cell polygon.
    pub(crate) fn into_forecast(self, subject: &str) -> Result<Forecast, QueryError> {
        let ring = self
            .geometry
            .coordinates
            .into_iter()
            .next()
            .ok_or_else(|| QueryError::format(subject, "polygon has no rings"))?;

        Ok(Forecast {
            periods: self.properties.periods,
            ring,
            source: subject.to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for NwsForecast {
    async fn forecast(&self, at: Coordinates) -> Result<Forecast, QueryError> {
        let points = endpoint(
            &self.base_url,
            &format!("points/{},{}", at.latitude, at.longitude),
        )?;
        let subject = points.to_string();
        let point: PointResponse = fetch_json(&self.http, points, &subject).await?;

        let hourly_url = point.properties.forecast_hourly;
        debug!(url = %hourly_url, "resolved hourly forecast");
        let hourly = Url::parse(&hourly_url).map_err(|e| QueryError::format(hourly_url.as_str(), e))?;

        let parsed: HourlyResponse = fetch_json(&self.http, hourly, &hourly_url).await?;
        let forecast = parsed.into_forecast(&hourly_url)?;

        info!(periods = forecast.periods.len(), "fetched hourly forecast");
        Ok(forecast)
    }

    fn attribution(&self) -> Option<&'static str> {
        Some(ATTRIBUTION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn hourly_body() -> serde_json::Value {
        serde_json::json!({
            "type": "Feature",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[
                    [-117.0, 34.0], [-116.9, 34.0], [-116.9, 34.1], [-117.0, 34.1], [-117.0, 34.0]
                ]]
            },
            "properties": {
                "periods": [
                    {
                        "number": 1,
                        "startTime": "2023-01-05T14:00:00-08:00",
                        "temperature": 58,
                        "temperatureUnit": "F",
                        "probabilityOfPrecipitation": {"unitCode": "wmoUnit:percent", "value": 3},
                        "relativeHumidity": {"unitCode": "wmoUnit:percent", "value": 64},
                        "windSpeed": "6 mph",
                        "windDirection": "W"
                    }
                ]
            }
        })
    }

    #[tokio::test]
    async fn follows_forecast_hourly_link() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/points/34,-117"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": {
                    "forecastHourly": format!("{}/gridpoints/SGX/57,99/forecast/hourly", mock_server.uri())
                }
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/SGX/57,99/forecast/hourly"))
            .respond_with(ResponseTemplate::new(200).set_body_json(hourly_body()))
            .mount(&mock_server)
            .await;

        let nws = NwsForecast::new(Client::new(), &mock_server.uri()).unwrap();
        let forecast = nws.forecast(Coordinates::new(34.0, -117.0)).await.unwrap();

        assert_eq!(forecast.periods.len(), 1);
        assert_eq!(forecast.periods[0].relative_humidity, 64.0);
        assert_eq!(forecast.ring.len(), 5);
        assert_eq!(forecast.ring[1], [-116.9, 34.0]);
        assert!(forecast.source.ends_with("/gridpoints/SGX/57,99/forecast/hourly"));
    }

    #[tokio::test]
    async fn point_outside_coverage_is_not_ok() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/points/51.5,-0.12"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let nws = NwsForecast::new(Client::new(), &mock_server.uri()).unwrap();
        let err = nws.forecast(Coordinates::new(51.5, -0.12)).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::NotOk);
        assert_eq!(
            err.subject(),
            format!("404 {}/points/51.5,-0.12", mock_server.uri())
        );
    }

    #[tokio::test]
    async fn hourly_failure_names_the_hourly_url() {
        let mock_server = MockServer::start().await;
        let hourly = format!("{}/gridpoints/SGX/1,1/forecast/hourly", mock_server.uri());

        Mock::given(method("GET"))
            .and(path("/points/34,-117"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "properties": { "forecastHourly": hourly.as_str() }
            })))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/gridpoints/SGX/1,1/forecast/hourly"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let nws = NwsForecast::new(Client::new(), &mock_server.uri()).unwrap();
        let err = nws.forecast(Coordinates::new(34.0, -117.0)).await.unwrap_err();
        assert_eq!(err.subject(), format!("503 {hourly}"));
    }

    #[test]
    fn ring_is_required() {
        let parsed: HourlyResponse = serde_json::from_value(serde_json::json!({
            "geometry": {"coordinates": []},
            "properties": {"periods": []}
        }))
        .unwrap();
        let err = parsed.into_forecast("weather.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
