//! Console configuration (defaults, JSON, environment overrides).

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use civicdesk_auth::RouteGuard;
use civicdesk_observability::LogFormat;

use crate::notify::NotificationTimings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Runtime settings for the console shell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the (future) backend API.
    pub api_base_url: String,
    /// Login entry point; unauthenticated navigation lands here.
    pub login_path: String,
    /// Default landing location for authenticated users.
    pub landing_path: String,
    /// How long a notification stays before its exit starts.
    pub notification_display_ms: u64,
    /// Length of the exit window before a notification is deleted.
    pub notification_exit_ms: u64,
    pub log_format: LogFormat,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            login_path: "/login".to_string(),
            landing_path: "/".to_string(),
            notification_display_ms: 3000,
            notification_exit_ms: 250,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ConsoleConfig {
    /// Defaults overlaid with `CIVICDESK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each known key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("CIVICDESK_API_URL") {
            config.api_base_url = url;
        }
        if let Some(value) = lookup("CIVICDESK_TOAST_MS") {
            config.notification_display_ms = parse_millis("CIVICDESK_TOAST_MS", value)?;
        }
        if let Some(value) = lookup("CIVICDESK_TOAST_EXIT_MS") {
            config.notification_exit_ms = parse_millis("CIVICDESK_TOAST_EXIT_MS", value)?;
        }
        if let Some(value) = lookup("CIVICDESK_LOG_FORMAT") {
            config.log_format = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "CIVICDESK_LOG_FORMAT",
                value,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.notification_display_ms == 0 {
            return Err(ConfigError::Invalid(
                "notification_display_ms must be greater than zero".to_string(),
            ));
        }
        let paths = [
            ("login_path", &self.login_path),
            ("landing_path", &self.landing_path),
        ];
        for (name, path) in paths {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid(format!("{name} must start with '/'")));
            }
        }
        if self.login_path == self.landing_path {
            return Err(ConfigError::Invalid(
                "login_path and landing_path must differ".to_string(),
            ));
        }
        Ok(())
    }

    pub fn notification_timings(&self) -> NotificationTimings {
        NotificationTimings {
            display: Duration::from_millis(self.notification_display_ms),
            exit: Duration::from_millis(self.notification_exit_ms),
        }
    }

    pub fn route_guard(&self) -> RouteGuard {
        RouteGuard::new(self.login_path.clone(), self.landing_path.clone())
    }
}

fn parse_millis(key: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}
