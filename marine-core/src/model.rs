use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::provider::Source;

/// A point on the globe. Passed through to the provider as given.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// One variable at one hour, keyed by provider name (`noaa`, `sg`, ...).
///
/// Values stay untyped so an odd reading from one provider never poisons the others.
pub type SourceValues = HashMap<String, Value>;

/// One hourly bundle as returned by `/weather/point`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawForecastHour {
    pub time: Option<String>,
    pub wave_height: Option<SourceValues>,
    pub wave_direction: Option<SourceValues>,
    pub swell_height: Option<SourceValues>,
    pub swell_direction: Option<SourceValues>,
    pub swell_period: Option<SourceValues>,
    pub wind_speed: Option<SourceValues>,
    pub wind_direction: Option<SourceValues>,
}

impl RawForecastHour {
    /// Decode one entry of `hours`. Entries of the wrong shape yield `None`.
    pub fn decode(entry: Value) -> Option<Self> {
        serde_json::from_value(entry).ok()
    }
}

/// Body of `/weather/point`. Hours are decoded one at a time during normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecastResponse {
    #[serde(default)]
    pub hours: Vec<Value>,
}

/// The variables requested from StormGlass for every hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastVariable {
    SwellDirection,
    SwellHeight,
    SwellPeriod,
    WaveDirection,
    WaveHeight,
    WindDirection,
    WindSpeed,
}

impl ForecastVariable {
    /// Name used both in the `params` query and as the response key.
    pub fn as_str(&self) -> &'static str {
        match self {
            ForecastVariable::SwellDirection => "swellDirection",
            ForecastVariable::SwellHeight => "swellHeight",
            ForecastVariable::SwellPeriod => "swellPeriod",
            ForecastVariable::WaveDirection => "waveDirection",
            ForecastVariable::WaveHeight => "waveHeight",
            ForecastVariable::WindDirection => "windDirection",
            ForecastVariable::WindSpeed => "windSpeed",
        }
    }

    pub const fn all() -> &'static [ForecastVariable] {
        &[
            ForecastVariable::SwellDirection,
            ForecastVariable::SwellHeight,
            ForecastVariable::SwellPeriod,
            ForecastVariable::WaveDirection,
            ForecastVariable::WaveHeight,
            ForecastVariable::WindDirection,
            ForecastVariable::WindSpeed,
        ]
    }

    /// Comma-separated list for the `params` query parameter.
    pub fn params() -> String {
        Self::all().iter().map(|v| v.as_str()).collect::<Vec<_>>().join(",")
    }

    pub fn values_in<'a>(&self, hour: &'a RawForecastHour) -> Option<&'a SourceValues> {
        match self {
            ForecastVariable::SwellDirection => hour.swell_direction.as_ref(),
            ForecastVariable::SwellHeight => hour.swell_height.as_ref(),
            ForecastVariable::SwellPeriod => hour.swell_period.as_ref(),
            ForecastVariable::WaveDirection => hour.wave_direction.as_ref(),
            ForecastVariable::WaveHeight => hour.wave_height.as_ref(),
            ForecastVariable::WindDirection => hour.wind_direction.as_ref(),
            ForecastVariable::WindSpeed => hour.wind_speed.as_ref(),
        }
    }
}

impl std::fmt::Display for ForecastVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reading of `variable` reported by `source` for this hour, if any.
pub fn value_for(hour: &RawForecastHour, variable: ForecastVariable, source: Source) -> Option<f64> {
    variable.values_in(hour)?.get(source.as_str())?.as_f64()
}

/// Normalized forecast for one hour, all values taken from a single source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub time: String,
    pub wave_height: f64,
    pub wave_direction: f64,
    pub swell_height: f64,
    pub swell_direction: f64,
    pub swell_period: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
}

impl ForecastPoint {
    /// `time` parsed as RFC 3339. The stored string is never rewritten.
    pub fn parsed_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.time).ok()
    }
}
