use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// `TARGET 33.6846/N 117.8265/W`
    pub fn target_line(&self) -> String {
        let lat = if self.latitude < 0.0 { 'S' } else { 'N' };
        let lon = if self.longitude < 0.0 { 'W' } else { 'E' };
        format!(
            "TARGET {}/{lat} {}/{lon}",
            plain_degrees(self.latitude.abs()),
            plain_degrees(self.longitude.abs()),
        )
    }
}

// Shortest round-trip decimal, never in exponent form, always with a
// fractional part: 34 -> "34.0", 1e-5 -> "0.00001".
fn plain_degrees(value: f64) -> String {
    let digits = value.to_string();
    if digits.contains('.') {
        digits
    } else {
        format!("{digits}.0")
    }
}

/// One hourly forecast record, in the shape served by api.weather.gov.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub start_time: String,
    pub temperature: f64,
    #[serde(deserialize_with = "measured")]
    pub relative_humidity: f64,
    pub wind_speed: String,
    #[serde(deserialize_with = "measured")]
    pub probability_of_precipitation: f64,
}

impl ForecastPeriod {
    /// Leading number of `"10 mph"`.
    pub fn wind_mph(&self) -> Option<f64> {
        self.wind_speed.split_whitespace().next()?.parse().ok()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Measured {
    Bare(f64),
    Wrapped { value: Option<f64> },
}

fn measured<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(match Measured::deserialize(deserializer)? {
        Measured::Bare(v) => v,
        Measured::Wrapped { value } => value.unwrap_or(0.0),
    })
}

/// `[longitude, latitude]` vertices; the ring may repeat its first vertex.
pub type PolygonRing = Vec<[f64; 2]>;

#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub periods: Vec<ForecastPeriod>,
    pub ring: PolygonRing,
    /// File path or URL the forecast was read from.
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Celsius,
    Fahrenheit,
}

impl Scale {
    pub fn convert(&self, fahrenheit: f64) -> f64 {
        match self {
            Scale::Celsius => (fahrenheit - 32.0) * 5.0 / 9.0,
            Scale::Fahrenheit => fahrenheit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Max,
    Min,
}

impl Limit {
    /// Whether `candidate` strictly beats `current`.
    pub fn beats(&self, candidate: f64, current: f64) -> bool {
        match self {
            Limit::Max => candidate > current,
            Limit::Min => candidate < current,
        }
    }
}

/// The per-period value a query scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    AirTemperature(Scale),
    FeelsLike(Scale),
    Humidity,
    Wind,
    Precipitation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub measure: Measure,
    /// Number of leading periods to scan.
    pub length: usize,
    pub limit: Limit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_line_uses_hemispheres() {
        assert_eq!(
            Coordinates::new(34.0, -117.0).target_line(),
            "TARGET 34.0/N 117.0/W"
        );
        assert_eq!(
            Coordinates::new(-33.8688, 151.2093).target_line(),
            "TARGET 33.8688/S 151.2093/E"
        );
    }

    #[test]
    fn target_line_never_uses_exponents() {
        assert_eq!(
            Coordinates::new(0.00001, -0.00005).target_line(),
            "TARGET 0.00001/N 0.00005/W"
        );
        assert_eq!(
            Coordinates::new(1e-7, 123456789.0).target_line(),
            "TARGET 0.0000001/N 123456789.0/E"
        );
    }

    #[test]
    fn period_accepts_wrapped_measures() {
        let period: ForecastPeriod = serde_json::from_value(serde_json::json!({
            "startTime": "2023-01-05T14:00:00-08:00",
            "temperature": 61,
            "relativeHumidity": { "unitCode": "wmoUnit:percent", "value": 72 },
            "windSpeed": "7 mph",
            "probabilityOfPrecipitation": { "unitCode": "wmoUnit:percent", "value": null }
        }))
        .unwrap();

        assert_eq!(period.relative_humidity, 72.0);
        assert_eq!(period.probability_of_precipitation, 0.0);
        assert_eq!(period.wind_mph(), Some(7.0));
    }

    #[test]
    fn period_accepts_bare_measures() {
        let period: ForecastPeriod = serde_json::from_value(serde_json::json!({
            "startTime": "2023-01-05T14:00:00-08:00",
            "temperature": 61.5,
            "relativeHumidity": 40,
            "windSpeed": "12 mph",
            "probabilityOfPrecipitation": 15
        }))
        .unwrap();

        assert_eq!(period.temperature, 61.5);
        assert_eq!(period.relative_humidity, 40.0);
        assert_eq!(period.probability_of_precipitation, 15.0);
    }

    #[test]
    fn celsius_conversion_of_freezing_is_zero() {
        assert_eq!(Scale::Celsius.convert(32.0), 0.0);
        assert_eq!(Scale::Fahrenheit.convert(32.0), 32.0);
    }
}
