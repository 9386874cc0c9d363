use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use marine_core::{
    Config, Coordinate, ForecastPoint, ForecastProvider, StormGlassError, config::DEFAULT_API_URL,
    provider::stormglass_from_config,
};
use tracing::{info, warn};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "marine", version, about = "Marine forecast CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the StormGlass API token and base URL.
    Configure,

    /// Show the hourly marine forecast for a coordinate.
    Forecast {
        /// Latitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in decimal degrees.
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Print the points as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Forecast { lat, lng, json } => forecast(Coordinate::new(lat, lng), json).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let current_url = config
        .stormglass
        .as_ref()
        .map(|sg| sg.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    let token = Password::new("StormGlass API token:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API token")?;

    let api_url = Text::new("StormGlass API base URL:")
        .with_default(&current_url)
        .prompt()
        .context("Failed to read API base URL")?;

    config.set_api_token(token.trim().to_string());
    config.set_api_url(api_url.trim().to_string());
    config.save()?;

    info!(path = %Config::config_file_path()?.display(), "saved configuration");
    println!("Configuration saved.");

    Ok(())
}

async fn forecast(at: Coordinate, json: bool) -> Result<()> {
    let config = Config::load()?;
    let provider = stormglass_from_config(&config)?;

    let points = provider.fetch_forecast(at).await.map_err(explain_failure)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else if points.is_empty() {
        println!("No complete forecast hours for {}, {}.", at.latitude, at.longitude);
    } else {
        print!("{}", render_table(&points));
    }

    Ok(())
}

/// Attach a hint to failures the user can act on.
fn explain_failure(err: StormGlassError) -> anyhow::Error {
    if err.is_rate_limited() {
        warn!(status = ?err.status(), "StormGlass quota exhausted");
        return anyhow::Error::new(err).context(
            "StormGlass rate limit reached.\n\
             Hint: the free plan allows a fixed number of requests per day; try again later.",
        );
    }

    err.into()
}

fn render_table(points: &[ForecastPoint]) -> String {
    let mut out = format!(
        "{:<17} {:>7} {:>7} {:>7} {:>7} {:>7} {:>8} {:>7}\n",
        "time (UTC)", "wave m", "wave°", "swell m", "swell°", "swell s", "wind m/s", "wind°"
    );

    for point in points {
        // Fall back to the raw string when the provider sends something other than RFC 3339.
        let time = point
            .parsed_time()
            .map(|t| t.naive_utc().format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| point.time.clone());

        out.push_str(&format!(
            "{:<17} {:>7.2} {:>7.0} {:>7.2} {:>7.0} {:>7.1} {:>8.1} {:>7.0}\n",
            time,
            point.wave_height,
            point.wave_direction,
            point.swell_height,
            point.swell_direction,
            point.swell_period,
            point.wind_speed,
            point.wind_direction,
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: &str) -> ForecastPoint {
        ForecastPoint {
            time: time.to_string(),
            wave_height: 1.5,
            wave_direction: 231.38,
            swell_height: 0.21,
            swell_direction: 64.26,
            swell_period: 3.89,
            wind_speed: 10.5,
            wind_direction: 299.45,
        }
    }

    #[test]
    fn parses_forecast_with_negative_latitude() {
        let cli = Cli::try_parse_from(["marine", "forecast", "--lat", "-33.79", "--lng", "151.28"])
            .expect("args should parse");

        match cli.command {
            Command::Forecast { lat, lng, json } => {
                assert_eq!(lat, -33.79);
                assert_eq!(lng, 151.28);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn forecast_requires_coordinates() {
        assert!(Cli::try_parse_from(["marine", "forecast", "--lat", "1.0"]).is_err());
    }

    #[test]
    fn table_has_header_and_one_row_per_point() {
        let table = render_table(&[
            point("2021-01-01T00:00:00+00:00"),
            point("2021-01-01T03:00:00+02:00"),
        ]);

        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("time (UTC)"));
        assert!(lines[1].starts_with("2021-01-01 00:00"));
        assert!(lines[2].starts_with("2021-01-01 01:00"));
        assert!(lines[1].contains("1.50"));
    }

    #[test]
    fn table_columns_line_up_with_header() {
        let table = render_table(&[point("2021-01-01T00:00:00+00:00")]);

        let widths: Vec<_> = table.lines().map(|line| line.chars().count()).collect();
        assert_eq!(widths[0], widths[1]);

        let header = table.lines().next().unwrap();
        let row = table.lines().nth(1).unwrap();
        // The header has multi-byte degree signs, the row is plain ASCII.
        let wind_start = header[..header.find("wind m/s").unwrap()].chars().count();
        let wind_end = wind_start + "wind m/s".len();
        assert_eq!(&row[wind_end - 4..wind_end], "10.5");
    }

    #[test]
    fn rate_limit_failure_carries_hint() {
        let err = StormGlassError::from(marine_core::HttpError::Status {
            status: 429,
            body: serde_json::json!({ "errors": ["Rate limit exceeded"] }),
        });

        let err = explain_failure(err);
        let chain = format!("{err:#}");
        assert!(chain.contains("StormGlass rate limit reached"));
        assert!(chain.contains("Rate limit exceeded"));
    }

    #[test]
    fn other_failures_pass_through() {
        let err = StormGlassError::from(marine_core::HttpError::Status {
            status: 500,
            body: serde_json::json!("boom"),
        });

        let err = explain_failure(err);
        assert!(!format!("{err:#}").contains("rate limit"));
        assert!(err.to_string().contains("Code: 500"));
    }

    #[test]
    fn table_keeps_unparseable_time_verbatim() {
        let table = render_table(&[point("tomorrow")]);
        assert!(table.lines().nth(1).unwrap().starts_with("tomorrow"));
    }
}
