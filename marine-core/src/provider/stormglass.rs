use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::{
    config::StormGlassConfig,
    error::StormGlassError,
    http::{HttpRequest, HttpRequester},
    model::{Coordinate, ForecastPoint, ForecastVariable, RawForecastHour, RawForecastResponse, value_for},
    provider::{CANONICAL_SOURCE, ForecastProvider, Source},
};

/// Client for the StormGlass `/weather/point` endpoint.
///
/// Holds no state between calls besides its settings and the injected requester, so
/// concurrent `fetch_points` calls are independent. Exactly one request is made per call.
#[derive(Debug, Clone)]
pub struct StormGlass<R> {
    config: StormGlassConfig,
    requester: R,
}

impl<R: HttpRequester> StormGlass<R> {
    pub fn new(config: StormGlassConfig, requester: R) -> Self {
        Self { config, requester }
    }

    /// Fetch and normalize the hourly forecast for a coordinate.
    #[instrument(skip(self), level = "debug")]
    pub async fn fetch_points(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<ForecastPoint>, StormGlassError> {
        let request = self.point_request(latitude, longitude);
        debug!(url = %request.url, "requesting StormGlass point forecast");

        let body = self.requester.get_json(&request).await.map_err(|err| {
            let err = StormGlassError::from(err);
            warn!(error = %err, "StormGlass request failed");
            err
        })?;

        let raw: RawForecastResponse = serde_json::from_value(body).map_err(|err| {
            let err = StormGlassError::request(err);
            warn!(error = %err, "StormGlass returned an unexpected payload");
            err
        })?;

        Ok(normalize_response(raw, CANONICAL_SOURCE))
    }

    fn point_request(&self, latitude: f64, longitude: f64) -> HttpRequest {
        let url = format!("{}/weather/point", self.config.api_url.trim_end_matches('/'));

        HttpRequest::get(url)
            .query("lat", latitude)
            .query("lng", longitude)
            .query("params", ForecastVariable::params())
            .query("source", CANONICAL_SOURCE)
            .header("Authorization", self.config.api_token.as_str())
    }
}

#[async_trait]
impl<R: HttpRequester> ForecastProvider for StormGlass<R> {
    async fn fetch_forecast(&self, at: Coordinate) -> Result<Vec<ForecastPoint>, StormGlassError> {
        self.fetch_points(at.latitude, at.longitude).await
    }
}

/// Keep the complete hours, in order, projected onto `source`.
///
/// Entries that fail to decode are dropped like any other incomplete hour.
pub fn normalize_response(raw: RawForecastResponse, source: Source) -> Vec<ForecastPoint> {
    let total = raw.hours.len();

    let points: Vec<ForecastPoint> = raw
        .hours
        .into_iter()
        .filter_map(RawForecastHour::decode)
        .filter_map(|hour| project(&hour, source))
        .collect();

    if points.len() < total {
        debug!(dropped = total - points.len(), kept = points.len(), "dropped incomplete forecast hours");
    }

    points
}

fn is_truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

/// Project an hour onto `source`. An hour is usable only if it has a timestamp and a
/// truthy `source` value for every tracked variable; zero counts as missing.
fn project(hour: &RawForecastHour, source: Source) -> Option<ForecastPoint> {
    let time = hour.time.as_deref().filter(|time| !time.is_empty())?;
    let value = |variable| value_for(hour, variable, source).filter(|v| is_truthy(*v));

    Some(ForecastPoint {
        time: time.to_string(),
        wave_height: value(ForecastVariable::WaveHeight)?,
        wave_direction: value(ForecastVariable::WaveDirection)?,
        swell_height: value(ForecastVariable::SwellHeight)?,
        swell_direction: value(ForecastVariable::SwellDirection)?,
        swell_period: value(ForecastVariable::SwellPeriod)?,
        wind_speed: value(ForecastVariable::WindSpeed)?,
        wind_direction: value(ForecastVariable::WindDirection)?,
    })
}
