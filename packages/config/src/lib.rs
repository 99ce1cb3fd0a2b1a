#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Configuration for the phone-safe lookup pipeline.
//!
//! Defaults live in `config/default.toml` and are embedded at compile
//! time. [`Settings::load`] layers, in order:
//!
//! 1. the embedded defaults, or the file named by `PHONE_SAFE_CONFIG`
//!    when that variable is set;
//! 2. `POSTCODES_API_URL`, `POLICE_API_URL` and
//!    `PHONE_SAFE_HTTP_TIMEOUT_SECS` overrides.

use std::path::Path;
use std::time::Duration;

use phone_safe_crime_models::CrimeCategory;
use phone_safe_risk_models::{ReferenceArea, RiskScheme};
use serde::Deserialize;

const DEFAULT_TOML: &str = include_str!("../config/default.toml");

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The TOML was malformed or missing fields.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override held an unusable value.
    #[error("Invalid value for {var}: {message}")]
    Env {
        /// Environment variable name.
        var: &'static str,
        /// What was wrong with it.
        message: String,
    },
}

/// Complete configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Postcode geocoder.
    pub postcodes: ServiceConfig,
    /// Street-level crime API.
    pub police: PoliceConfig,
    /// Shared HTTP client settings.
    pub http: HttpConfig,
    /// Area every risk ratio is relative to.
    pub reference_area: ReferenceArea,
    /// Risk banding.
    #[serde(default)]
    pub risk: RiskConfig,
}

/// An upstream HTTP service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Human-readable name.
    pub name: String,
    /// API base URL, without a trailing slash.
    pub base_url: String,
}

/// The police.uk service and the crime category to query.
#[derive(Debug, Clone, Deserialize)]
pub struct PoliceConfig {
    /// Human-readable name.
    pub name: String,
    /// API base URL (e.g. `"https://data.police.uk/api"`).
    pub base_url: String,
    /// Category slug to fetch.
    #[serde(default)]
    pub category: CrimeCategory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl HttpConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub scheme: RiskScheme,
}

const fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("phone-safe/", env!("CARGO_PKG_VERSION")).to_string()
}

impl Settings {
    /// Parses settings from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed and
    /// [`ConfigError::Env`] if the timeout is zero.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::de::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Returns the embedded defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the embedded TOML is malformed.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_TOML)
    }

    /// Reads settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Loads settings from the embedded defaults or `PHONE_SAFE_CONFIG`,
    /// then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config cannot be read or parsed, or an
    /// override is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = match std::env::var("PHONE_SAFE_CONFIG") {
            Ok(path) if !path.is_empty() => {
                log::info!("Loading config from {path}");
                Self::from_file(Path::new(&path))?
            }
            _ => Self::defaults()?,
        };
        settings.apply_overrides(|var| std::env::var(var).ok())?;
        Ok(settings)
    }

    /// Applies overrides from `lookup`, which maps a variable name to its
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] if an override is invalid.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("POSTCODES_API_URL").filter(|v| !v.is_empty()) {
            log::debug!("POSTCODES_API_URL override: {url}");
            self.postcodes.base_url = url;
        }
        if let Some(url) = lookup("POLICE_API_URL").filter(|v| !v.is_empty()) {
            log::debug!("POLICE_API_URL override: {url}");
            self.police.base_url = url;
        }
        if let Some(secs) = lookup("PHONE_SAFE_HTTP_TIMEOUT_SECS") {
            self.http.timeout_secs = secs.trim().parse().map_err(|e| ConfigError::Env {
                var: "PHONE_SAFE_HTTP_TIMEOUT_SECS",
                message: format!("{secs:?}: {e}"),
            })?;
        }
        self.validate()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.http.timeout_secs == 0 {
            return Err(ConfigError::Env {
                var: "PHONE_SAFE_HTTP_TIMEOUT_SECS",
                message: "timeout must be at least one second".to_string(),
            });
        }
        Ok(())
    }
}
