//! Configuration management for gatecheck.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "gatecheck";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `GATECHECK_`, with `__`
///    separating the section from the key: `GATECHECK_BACKEND__BASE_URL`)
/// 2. TOML config file at `~/.config/gatecheck/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend endpoint configuration.
    pub backend: BackendConfig,
    /// Submission behaviour configuration.
    pub submit: SubmitConfig,
}

/// Backend-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the inspection backend.
    pub base_url: String,
    /// Path of the submission endpoint, relative to the base URL.
    pub submit_path: String,
    /// Path of the record-listing endpoint, relative to the base URL.
    pub records_path: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Submission-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmitConfig {
    /// Navigation target after a successful submission.
    pub success_target: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            submit_path: "/inspection/securitySave".to_string(),
            records_path: "/admins/viewForm".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            success_target: "scanner".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            // Split on a double underscore so multi-word leaf keys like
            // `base_url` survive: GATECHECK_BACKEND__BASE_URL.
            .merge(Env::prefixed("GATECHECK_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.backend.base_url.is_empty() {
            return Err(Error::ConfigValidation {
                message: "backend.base_url must not be empty".to_string(),
            });
        }

        if !self.backend.base_url.starts_with("http://")
            && !self.backend.base_url.starts_with("https://")
        {
            return Err(Error::ConfigValidation {
                message: format!(
                    "backend.base_url must start with http:// or https://, got '{}'",
                    self.backend.base_url
                ),
            });
        }

        if self.backend.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "backend.timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.submit.success_target.is_empty() {
            return Err(Error::ConfigValidation {
                message: "submit.success_target must not be empty".to_string(),
            });
        }

        Ok(())
    }

    /// Full URL of the submission endpoint.
    #[must_use]
    pub fn submit_url(&self) -> String {
        format!(
            "{}{}",
            self.backend.base_url.trim_end_matches('/'),
            self.backend.submit_path
        )
    }

    /// Full URL of the record-listing endpoint.
    #[must_use]
    pub fn records_url(&self) -> String {
        format!(
            "{}{}",
            self.backend.base_url.trim_end_matches('/'),
            self.backend.records_path
        )
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.submit_path, "/inspection/securitySave");
        assert_eq!(config.backend.records_path, "/admins/viewForm");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.submit.success_target, "scanner");
    }

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_base_url() {
        let mut config = Config::default();
        config.backend.base_url = String::new();

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base_url"));
    }

    #[test]
    fn test_validate_non_http_base_url() {
        let mut config = Config::default();
        config.backend.base_url = "ftp://example.com".to_string();

        let result = config.validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.backend.timeout_secs = 0;

        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_validate_empty_success_target() {
        let mut config = Config::default();
        config.submit.success_target = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_submit_url_joins_cleanly() {
        let mut config = Config::default();
        config.backend.base_url = "https://fleet.example.com/".to_string();
        assert_eq!(
            config.submit_url(),
            "https://fleet.example.com/inspection/securitySave"
        );
        assert_eq!(
            config.records_url(),
            "https://fleet.example.com/admins/viewForm"
        );
    }

    #[test]
    fn test_timeout_duration() {
        let config = Config::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("gatecheck"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults).
        // Jailed so concurrent tests cannot leak GATECHECK_ variables in.
        figment::Jail::expect_with(|_| {
            let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
            assert!(result.is_ok());
            assert_eq!(result.unwrap(), Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_override_lands() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("GATECHECK_BACKEND__BASE_URL", "https://env.example.com");
            jail.set_env("GATECHECK_BACKEND__TIMEOUT_SECS", "5");
            jail.set_env("GATECHECK_SUBMIT__SUCCESS_TARGET", "dashboard");

            let config =
                Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
            assert_eq!(config.backend.base_url, "https://env.example.com");
            assert_eq!(config.backend.timeout_secs, 5);
            assert_eq!(config.submit.success_target, "dashboard");
            // Untouched keys keep their defaults.
            assert_eq!(config.backend.submit_path, "/inspection/securitySave");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_config_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    [backend]
                    base_url = "https://file.example.com"
                    timeout_secs = 10
                "#,
            )?;
            jail.set_env("GATECHECK_BACKEND__BASE_URL", "https://env.example.com");

            let config = Config::load_from(Some(PathBuf::from("config.toml"))).unwrap();
            assert_eq!(config.backend.base_url, "https://env.example.com");
            // Keys the environment does not name still come from the file.
            assert_eq!(config.backend.timeout_secs, 10);
            Ok(())
        });
    }

    #[test]
    fn test_config_serialize() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("base_url"));
        assert!(json.contains("success_target"));
    }

    #[test]
    fn test_backend_config_deserialize() {
        let json = r#"{"base_url": "https://fleet.example.com", "timeout_secs": 5}"#;
        let backend: BackendConfig = serde_json::from_str(json).unwrap();
        assert_eq!(backend.base_url, "https://fleet.example.com");
        assert_eq!(backend.timeout_secs, 5);
        // Unspecified fields fall back to defaults.
        assert_eq!(backend.submit_path, "/inspection/securitySave");
    }

    #[test]
    fn test_config_clone_and_debug() {
        let config = Config::default();
        let cloned = config.clone();
        assert_eq!(config, cloned);
        assert!(format!("{config:?}").contains("Config"));
    }
}
