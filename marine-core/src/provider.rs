use crate::{
    Config, Coordinate, ForecastPoint, http::ReqwestRequester, provider::stormglass::StormGlass,
    StormGlassError,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod stormglass;

/// Upstream models StormGlass aggregates in its responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Noaa,
    Sg,
    Icon,
    Dwd,
    Meteo,
    Meto,
    Fcoo,
    Fmi,
    Yr,
    Smhi,
}

/// Every output field is read from this source.
pub const CANONICAL_SOURCE: Source = Source::Noaa;

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Noaa => "noaa",
            Source::Sg => "sg",
            Source::Icon => "icon",
            Source::Dwd => "dwd",
            Source::Meteo => "meteo",
            Source::Meto => "meto",
            Source::Fcoo => "fcoo",
            Source::Fmi => "fmi",
            Source::Yr => "yr",
            Source::Smhi => "smhi",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, at: Coordinate) -> Result<Vec<ForecastPoint>, StormGlassError>;
}

/// Construct the reqwest-backed StormGlass client from config.
pub fn stormglass_from_config(config: &Config) -> anyhow::Result<StormGlass<ReqwestRequester>> {
    let settings = config.stormglass()?.clone();
    Ok(StormGlass::new(settings, ReqwestRequester::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_ids_match_response_keys() {
        assert_eq!(Source::Noaa.as_str(), "noaa");
        assert_eq!(Source::Sg.to_string(), "sg");
    }

    #[test]
    fn canonical_source_is_noaa() {
        assert_eq!(CANONICAL_SOURCE.to_string(), "noaa");
    }

    #[test]
    fn stormglass_from_config_errors_when_unconfigured() {
        let cfg = Config::default();
        let err = stormglass_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No StormGlass API token configured"));
        assert!(msg.contains("Hint: run `marine configure`"));
    }

    #[test]
    fn stormglass_from_config_works_when_configured() {
        let mut cfg = Config::default();
        cfg.set_api_token("KEY".to_string());

        let client = stormglass_from_config(&cfg);
        assert!(client.is_ok());
    }
}
