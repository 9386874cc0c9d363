use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

/// Base URL of the public StormGlass v2 API.
pub const DEFAULT_API_URL: &str = "https://api.stormglass.io/v2";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// Connection settings for the StormGlass API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StormGlassConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    pub api_token: String,
}

impl StormGlassConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self { api_url: default_api_url(), api_token: api_token.into() }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Example TOML:
    /// [stormglass]
    /// api_url = "https://api.stormglass.io/v2"
    /// api_token = "..."
    pub stormglass: Option<StormGlassConfig>,
}

impl Config {
    /// StormGlass settings, or a hinted error when nothing was configured yet.
    pub fn stormglass(&self) -> Result<&StormGlassConfig> {
        self.stormglass.as_ref().ok_or_else(|| {
            anyhow!(
                "No StormGlass API token configured.\n\
                 Hint: run `marine configure` and enter your API token."
            )
        })
    }

    pub fn is_configured(&self) -> bool {
        self.stormglass.as_ref().is_some_and(|sg| !sg.api_token.is_empty())
    }

    /// Set/replace the API token, keeping any previously configured base URL.
    pub fn set_api_token(&mut self, api_token: String) {
        match self.stormglass.as_mut() {
            Some(sg) => sg.api_token = api_token,
            None => self.stormglass = Some(StormGlassConfig::new(api_token)),
        }
    }

    /// Override the base URL. Has no effect until a token is configured.
    pub fn set_api_url(&mut self, api_url: String) {
        if let Some(sg) = self.stormglass.as_mut() {
            sg.api_url = api_url;
        }
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "marine-forecast", "marine-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
