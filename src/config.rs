//! Runtime configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Public Nominatim search endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";

/// Settings for the reverse-geocoding lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocoderConfig {
    /// Search endpoint accepting `q`, `format=json`, and `limit`.
    pub endpoint: String,
    /// Nominatim's usage policy requires an identifying agent.
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEOCODER_URL.to_string(),
            user_agent: concat!("rush-store/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// Seed document to load; the bundled demo seed when unset.
    pub seed_path: Option<PathBuf>,
    pub geocoder: GeocoderConfig,
    /// Emit JSON log lines instead of the human-readable format.
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = GeocoderConfig::default();

        let timeout = match lookup("RUSH_GEOCODER_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    key: "RUSH_GEOCODER_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => defaults.timeout,
        };

        let log_json = match lookup("RUSH_LOG_JSON").as_deref().map(str::trim) {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "RUSH_LOG_JSON",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            seed_path: lookup("RUSH_SEED_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            geocoder: GeocoderConfig {
                endpoint: lookup("RUSH_GEOCODER_URL").unwrap_or(defaults.endpoint),
                user_agent: lookup("RUSH_GEOCODER_USER_AGENT").unwrap_or(defaults.user_agent),
                timeout,
            },
            log_json,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}
