//! Application configuration with layered loading.
//!
//! Configuration is loaded with figment from, in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. TOML config file (if LISTINGS_CONFIG_FILE set)
//! 3. Environment variables (LISTINGS_*)

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::gazetteer::Gazetteer;

mod validation;

pub use validation::ConfigError;

/// Which geocoding collaborator resolves coordinates for distance buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocoderKind {
    /// Offline lookup against the gazetteer's town coordinates.
    #[default]
    Gazetteer,
    /// Nominatim-compatible HTTP search endpoint.
    Nominatim,
    /// No geocoding; every distance bucket is "Unknown".
    Disabled,
}

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding backend.
    ///
    /// Set via LISTINGS_GEOCODER environment variable.
    #[serde(default)]
    pub geocoder: GeocoderKind,

    /// Search endpoint for the Nominatim geocoder.
    ///
    /// Set via LISTINGS_GEOCODER_URL environment variable.
    #[serde(default = "default_geocoder_url")]
    pub geocoder_url: String,

    /// Geocoding request timeout in milliseconds.
    ///
    /// Set via LISTINGS_GEOCODE_TIMEOUT_MS environment variable.
    #[serde(default = "default_geocode_timeout_ms")]
    pub geocode_timeout_ms: u64,

    /// User-Agent sent with geocoding requests.
    ///
    /// Set via LISTINGS_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Reference point distance buckets are measured from.
    ///
    /// Set via LISTINGS_REFERENCE_POINT environment variable.
    #[serde(default = "default_reference_point")]
    pub reference_point: String,

    /// TOML file replacing the built-in gazetteer.
    ///
    /// Set via LISTINGS_GAZETTEER_FILE environment variable.
    #[serde(default)]
    pub gazetteer_file: Option<PathBuf>,

    /// Emit logs as JSON lines instead of human-readable text.
    ///
    /// Set via LISTINGS_LOG_JSON environment variable.
    #[serde(default)]
    pub log_json: bool,
}

fn default_geocoder_url() -> String {
    "https://nominatim.openstreetmap.org/search".into()
}

fn default_geocode_timeout_ms() -> u64 {
    10_000
}

fn default_user_agent() -> String {
    "new-england-listings/0.1".into()
}

fn default_reference_point() -> String {
    "Portland, ME".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            geocoder: GeocoderKind::default(),
            geocoder_url: default_geocoder_url(),
            geocode_timeout_ms: default_geocode_timeout_ms(),
            user_agent: default_user_agent(),
            reference_point: default_reference_point(),
            gazetteer_file: None,
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Geocode timeout as Duration for use with reqwest.
    pub fn geocode_timeout(&self) -> Duration {
        Duration::from_millis(self.geocode_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LISTINGS_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("LISTINGS_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Build the gazetteer this configuration names and check the reference point exists in it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Gazetteer` if the gazetteer file cannot be loaded or
    /// does not define `reference_point`.
    pub fn gazetteer(&self) -> Result<Gazetteer, Error> {
        let gazetteer = match &self.gazetteer_file {
            Some(path) => Gazetteer::load(path)?,
            None => Gazetteer::new_england(),
        };
        gazetteer.require_reference_point(&self.reference_point)?;
        Ok(gazetteer)
    }
}
