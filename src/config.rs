//! Application settings loaded from `config/*.yaml`, `.env` and `IMMO__*`
//! environment variables.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_RADIUS_M: u32 = 5000;
pub const DEFAULT_USER_AGENT: &str = "immo-search/0.1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

/// Which search backend the binary talks to
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Http,
    Memory,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderKind {
    #[default]
    Nominatim,
    Mapbox,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeocoderConfig {
    pub provider: GeocoderKind,
    pub nominatim_url: String,
    pub mapbox_url: String,
    pub mapbox_token: Option<String>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            provider: GeocoderKind::Nominatim,
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            mapbox_url: "https://api.mapbox.com".to_string(),
            mapbox_token: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub default_page_size: u32,
    pub default_radius_m: u32,
    pub backend: BackendKind,
    pub geocoder: GeocoderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_page_size: 10,
            default_radius_m: DEFAULT_RADIUS_M,
            backend: BackendKind::Http,
            geocoder: GeocoderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load settings for the profile named by `APP_ENV` (defaults to `local`).
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "local".into());

        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(config::Environment::with_prefix("IMMO").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parse settings from a YAML document, layered over the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// HTTP client shared by every remote call
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        use anyhow::Context;

        reqwest::Client::builder()
            .timeout(self.request_timeout())
            .user_agent(self.user_agent.clone())
            .build()
            .context("Failed to create HTTP client")
    }
}
