//! Application configuration loaded from environment variables.

use serde::Deserialize;
use strum::{Display, EnumString};

/// Deployment mode. Governs whether internal error details reach callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    /// Local development (default).
    Development,
    /// Production-like deployment; error details are hidden.
    Production,
    /// Automated test runs.
    Test,
}

impl Environment {
    /// Whether detailed internal error messages may be returned to callers.
    pub fn exposes_error_details(&self) -> bool {
        !matches!(self, Environment::Production)
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment mode.
    #[serde(default = "default_app_env")]
    pub app_env: Environment,

    /// Allowed CORS origins, comma separated, or `*`.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: String,

    /// Value of the `X-API-Version` response header.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    // === Observability ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Log output format.
    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Install the Prometheus recorder and expose `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_app_env() -> Environment {
    Environment::Development
}

fn default_cors_origins() -> String {
    "*".to_string()
}

fn default_api_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            app_env: default_app_env(),
            cors_origins: default_cors_origins(),
            api_version: default_api_version(),
            rust_log: default_log_level(),
            log_format: default_log_format(),
            metrics_enabled: default_true(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("HOST must not be empty".to_string());
        }

        if self.port == 0 {
            return Err("PORT must be between 1 and 65535".to_string());
        }

        if self.api_version.trim().is_empty() {
            return Err("API_VERSION must not be empty".to_string());
        }

        if self.allowed_origins().is_empty() {
            return Err("CORS_ORIGINS must list at least one origin or '*'".to_string());
        }

        Ok(())
    }

    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configured CORS origins. A single `*` means any origin.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Whether any origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins().iter().any(|o| o == "*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn default_values_are_sensible() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.app_env, Environment::Development);
        assert!(config.allows_any_origin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_zero_port() {
        let config = Config {
            port: 0,
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_origin_list() {
        let config = Config {
            cors_origins: " , ".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn origins_are_split_and_trimmed() {
        let config = Config {
            cors_origins: "http://a.test, http://b.test".to_string(),
            ..Config::default()
        };

        assert_eq!(
            config.allowed_origins(),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn environment_parses_case_insensitively() {
        assert_eq!(
            Environment::from_str("PRODUCTION").unwrap(),
            Environment::Production
        );
        assert_eq!(Environment::Production.to_string(), "production");
        assert!(!Environment::Production.exposes_error_details());
        assert!(Environment::Test.exposes_error_details());
    }
}
