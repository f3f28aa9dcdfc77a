use std::{fmt::Debug, fs, io, path::Path};

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{
    Config,
    command::{ReverseSpec, TargetSpec, WeatherSpec},
    error::QueryError,
    model::{Coordinates, Forecast},
    provider::{
        file::{ReverseFile, TargetFile, WeatherFile},
        nominatim::{NominatimReverse, NominatimSearch},
        nws::NwsForecast,
    },
};

pub mod file;
pub mod nominatim;
pub mod nws;

/// Resolves the location the forecast is wanted for.
#[async_trait]
pub trait TargetProvider: Send + Sync + Debug {
    async fn coordinates(&self) -> Result<Coordinates, QueryError>;

    /// Credit line printed after the results when this provider was used.
    fn attribution(&self) -> Option<&'static str> {
        None
    }
}

/// Supplies hourly periods and the grid cell polygon for a location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn forecast(&self, at: Coordinates) -> Result<Forecast, QueryError>;

    fn attribution(&self) -> Option<&'static str> {
        None
    }
}

/// Names the place at a set of coordinates.
#[async_trait]
pub trait ReverseProvider: Send + Sync + Debug {
    async fn display_name(&self, at: Coordinates) -> Result<String, QueryError>;

    fn attribution(&self) -> Option<&'static str> {
        None
    }
}

/// HTTP client shared by every remote provider of a run.
pub fn http_client(config: &Config) -> Result<Client, QueryError> {
    Client::builder()
        .user_agent(config.user_agent())
        .build()
        .map_err(QueryError::Client)
}

/// The run's HTTP client, built on first use so file-only runs never need one.
#[derive(Debug)]
pub struct SharedClient<'a> {
    config: &'a Config,
    client: Option<Client>,
}

impl<'a> SharedClient<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config, client: None }
    }

    pub fn get(&mut self) -> Result<Client, QueryError> {
        if let Some(client) = &self.client {
            return Ok(client.clone());
        }
        let client = http_client(self.config)?;
        debug!("built http client");
        self.client = Some(client.clone());
        Ok(client)
    }

    pub fn is_built(&self) -> bool {
        self.client.is_some()
    }
}

pub fn target_provider(
    spec: &TargetSpec,
    http: &mut SharedClient<'_>,
) -> Result<Box<dyn TargetProvider>, QueryError> {
    let boxed: Box<dyn TargetProvider> = match spec {
        TargetSpec::File(path) => Box::new(TargetFile::new(path.clone())),
        TargetSpec::Nominatim(query) => Box::new(NominatimSearch::new(
            http.get()?,
            &http.config.endpoints.nominatim,
            query.clone(),
        )?),
    };
    debug!(provider = ?boxed, "selected target provider");
    Ok(boxed)
}

pub fn weather_provider(
    spec: &WeatherSpec,
    http: &mut SharedClient<'_>,
) -> Result<Box<dyn WeatherProvider>, QueryError> {
    let boxed: Box<dyn WeatherProvider> = match spec {
        WeatherSpec::File(path) => Box::new(WeatherFile::new(path.clone())),
        WeatherSpec::Nws => Box::new(NwsForecast::new(http.get()?, &http.config.endpoints.nws)?),
    };
    debug!(provider = ?boxed, "selected weather provider");
    Ok(boxed)
}

pub fn reverse_provider(
    spec: &ReverseSpec,
    http: &mut SharedClient<'_>,
) -> Result<Box<dyn ReverseProvider>, QueryError> {
    let boxed: Box<dyn ReverseProvider> = match spec {
        ReverseSpec::File(path) => Box::new(ReverseFile::new(path.clone())),
        ReverseSpec::Nominatim => Box::new(NominatimReverse::new(
            http.get()?,
            &http.config.endpoints.nominatim,
        )?),
    };
    debug!(provider = ?boxed, "selected reverse provider");
    Ok(boxed)
}

/// Joins `path` onto a configured base URL, keeping any path prefix the base has.
pub(crate) fn endpoint(base: &str, path: &str) -> Result<Url, QueryError> {
    let joined = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse(&joined).map_err(|e| QueryError::format(joined, e))
}

/// GET `url` and decode the body as JSON. Failures are reported against
/// `subject`: the search term when there is one, otherwise the URL.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    http: &Client,
    url: Url,
    subject: &str,
) -> Result<T, QueryError> {
    debug!(%url, "GET");

    let res = http.get(url).send().await.map_err(|source| QueryError::Network {
        subject: subject.to_string(),
        source,
    })?;

    let status = res.status();
    if !status.is_success() {
        return Err(QueryError::NotOk {
            status: status.as_u16(),
            subject: subject.to_string(),
        });
    }

    let body = res.text().await.map_err(|source| QueryError::Network {
        subject: subject.to_string(),
        source,
    })?;

    serde_json::from_str(&body).map_err(|e| QueryError::format(subject, e))
}

/// Read a local file and decode it as JSON.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, QueryError> {
    let subject = path.display().to_string();
    debug!(path = %subject, "reading");

    let contents = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::InvalidData => QueryError::format(subject.clone(), &source),
        _ => QueryError::Missing {
            path: subject.clone(),
            source,
        },
    })?;

    serde_json::from_str(&contents).map_err(|e| QueryError::format(subject, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn endpoint_keeps_base_prefix() {
        let url = endpoint("http://127.0.0.1:9000/nominatim/", "/search").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:9000/nominatim/search");
    }

    #[test]
    fn endpoint_rejects_garbage_base() {
        let err = endpoint("not a url", "search").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn providers_follow_the_command_tag() {
        let cfg = Config::default();
        let mut http = SharedClient::new(&cfg);

        let target = target_provider(&TargetSpec::Nominatim("Irvine, CA".into()), &mut http).unwrap();
        assert!(target.attribution().is_some());

        let target = target_provider(&TargetSpec::File("t.json".into()), &mut http).unwrap();
        assert!(target.attribution().is_none());

        let weather = weather_provider(&WeatherSpec::Nws, &mut http).unwrap();
        assert!(weather.attribution().is_some());

        let reverse = reverse_provider(&ReverseSpec::File("r.json".into()), &mut http).unwrap();
        assert!(reverse.attribution().is_none());
    }

    #[test]
    fn file_providers_never_build_a_client() {
        let cfg = Config {
            contact: Some("bad\ncontact".into()),
            ..Config::default()
        };
        let mut http = SharedClient::new(&cfg);

        target_provider(&TargetSpec::File("t.json".into()), &mut http).unwrap();
        weather_provider(&WeatherSpec::File("w.json".into()), &mut http).unwrap();
        reverse_provider(&ReverseSpec::File("r.json".into()), &mut http).unwrap();
        assert!(!http.is_built());

        let err = weather_provider(&WeatherSpec::Nws, &mut http).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn read_json_reports_missing_file() {
        let err = read_json::<serde_json::Value>(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Missing);
        assert_eq!(err.subject(), "/definitely/not/here.json");
    }
}
