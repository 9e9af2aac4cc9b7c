//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::{AppConfig, GeocoderKind};
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `geocode_timeout_ms` is less than 100ms or exceeds 60 seconds
    /// - `user_agent` or `reference_point` is empty
    ///
    /// Returns `ConfigError::Missing` if the Nominatim geocoder is selected
    /// without a `geocoder_url`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.geocode_timeout_ms < 100 {
            return Err(ConfigError::Invalid {
                field: "geocode_timeout_ms".into(),
                reason: "must be at least 100ms".into(),
            });
        }
        if self.geocode_timeout_ms > 60_000 {
            return Err(ConfigError::Invalid {
                field: "geocode_timeout_ms".into(),
                reason: "must not exceed 60 seconds (60000ms)".into(),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.reference_point.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "reference_point".into(), reason: "must not be empty".into() });
        }

        if self.geocoder == GeocoderKind::Nominatim && self.geocoder_url.trim().is_empty() {
            return Err(ConfigError::Missing {
                field: "geocoder_url".into(),
                hint: "Set LISTINGS_GEOCODER_URL or choose LISTINGS_GEOCODER=gazetteer".into(),
            });
        }

        if self.geocoder == GeocoderKind::Disabled {
            tracing::warn!("Geocoding is disabled; every distance bucket will be Unknown");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { geocode_timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "geocode_timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { geocode_timeout_ms: 60_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "geocode_timeout_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: "  ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_empty_reference_point() {
        let config = AppConfig { reference_point: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "reference_point"));
    }

    #[test]
    fn test_validate_nominatim_requires_url() {
        let config = AppConfig { geocoder: GeocoderKind::Nominatim, geocoder_url: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Missing { field, .. }) if field == "geocoder_url"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { geocode_timeout_ms: 100, ..Default::default() };
        assert!(config.validate().is_ok());
        let config = AppConfig { geocode_timeout_ms: 60_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}
