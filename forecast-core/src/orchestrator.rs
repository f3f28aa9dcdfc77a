//! Runs one parsed [`Session`] end to end.

use std::time::Duration;

use tracing::{debug, warn};

use crate::{
    Config,
    command::{ReverseSpec, Session, TargetSpec},
    error::{ErrorReport, QueryError},
    polygon::centroid,
    provider::{SharedClient, reverse_provider, target_provider, weather_provider},
    stats::evaluate,
};

/// Nominatim's usage policy allows one request per second.
pub const NOMINATIM_PAUSE: Duration = Duration::from_secs(1);

/// What a run prints: its result lines, or a failure report.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(Vec<String>),
    Failed(ErrorReport),
}

impl Outcome {
    pub fn lines(&self) -> Vec<String> {
        match self {
            Outcome::Success(lines) => lines.clone(),
            Outcome::Failed(report) => report.lines(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

/// Resolves the target, loads the forecast, answers every query and names
/// the grid cell. The first failure discards everything gathered so far.
pub async fn run(session: &Session, config: &Config) -> Outcome {
    match execute(session, config).await {
        Ok(lines) => Outcome::Success(lines),
        Err(err) => {
            warn!(error = %err, "run failed");
            Outcome::Failed(ErrorReport::from(&err))
        }
    }
}

async fn execute(session: &Session, config: &Config) -> Result<Vec<String>, QueryError> {
    let mut http = SharedClient::new(config);
    let mut lines = Vec::new();

    let target = target_provider(&session.target, &mut http)?;
    let at = target.coordinates().await?;
    lines.push(at.target_line());

    let weather = weather_provider(&session.weather, &mut http)?;
    let forecast = weather.forecast(at).await?;
    let center = centroid(&forecast.ring)
        .ok_or_else(|| QueryError::format(forecast.source.as_str(), "empty polygon ring"))?;
    debug!(
        latitude = center.latitude,
        longitude = center.longitude,
        "grid cell centroid"
    );

    for query in &session.queries {
        let result = evaluate(&forecast.periods, query)
            .map_err(|e| QueryError::format(forecast.source.as_str(), e))?;
        lines.push(result.to_string());
    }

    let reverse = reverse_provider(&session.reverse, &mut http)?;
    if matches!(session.target, TargetSpec::Nominatim(_))
        && matches!(session.reverse, ReverseSpec::Nominatim)
    {
        debug!(pause = ?NOMINATIM_PAUSE, "pausing before reverse lookup");
        tokio::time::sleep(NOMINATIM_PAUSE).await;
    }
    let name = reverse.display_name(center).await?;
    lines.insert(1, name);

    lines.extend(
        [
            target.attribution(),
            reverse.attribution(),
            weather.attribution(),
        ]
        .into_iter()
        .flatten()
        .map(str::to_string),
    );

    Ok(lines)
}
