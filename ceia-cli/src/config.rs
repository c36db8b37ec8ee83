//! Configuration file for the command line.
//!
//! All default values live exclusively in `config.default.toml`.
//! This module embeds that file at compile-time, parses it once,
//! and lets callers layer their own TOML and the environment on top.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use url::Url;

/// Embedded copy of the default configuration (single source of truth for defaults)
pub const DEFAULT_CONFIG: &str = include_str!("config.default.toml");

/// Example configuration file
pub const SAMPLE_CONFIG: &str = include_str!("../config.sample.toml");

/// Overrides `session.secret_key`.
pub const SECRET_KEY_ENV: &str = "CEIA_SECRET_KEY";
/// Overrides `api.base_url`.
pub const API_URL_ENV: &str = "CEIA_API_URL";

/// Error that can occur when reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigReadError {
    /// The file did not exist or could not be read.
    #[error("config file not found: {0}")]
    ConfigFileNotFound(#[from] std::io::Error),
    /// The TOML was syntactically invalid.
    #[error("config file is not valid TOML: {0}")]
    ConfigFileNotValid(#[from] toml::de::Error),
    /// Failed to merge defaults with overrides.
    #[error("failed to merge embedded and user TOML: {0}")]
    ConfigMergeError(String),
    /// An environment override could not be applied.
    #[error("invalid value in {name}: {reason}")]
    InvalidEnv { name: &'static str, reason: String },
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiToml {
    pub base_url: Url,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct SessionToml {
    pub secret_key: Option<String>,
    pub storage_path: Option<PathBuf>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingToml {
    pub level: String,
    #[serde(default)]
    pub module_levels: Vec<String>,
}

/// The command line's configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigToml {
    /// Where the REST API lives.
    pub api: ApiToml,
    /// Session encryption and persistence.
    #[serde(default)]
    pub session: SessionToml,
    /// Log filter. `level = "off"` disables logging.
    pub logging: Option<LoggingToml>,
}

impl Default for ConfigToml {
    fn default() -> Self {
        ConfigToml::from_str(DEFAULT_CONFIG).expect("Embedded config.default.toml must be valid")
    }
}

impl ConfigToml {
    /// Read and parse a configuration file, overlaying it on top of the embedded defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigReadError> {
        let raw = fs::read_to_string(path)?;
        Self::from_str_with_defaults(&raw)
    }

    /// Parse a raw TOML string, overlaying it on top of the embedded defaults.
    pub fn from_str_with_defaults(raw: &str) -> Result<Self, ConfigReadError> {
        let default_val: toml::Value = DEFAULT_CONFIG
            .parse()
            .expect("embedded defaults invalid TOML");
        let user_val: toml::Value = raw.parse()?;

        let merged_val = serde_toml_merge::merge(default_val, user_val)
            .map_err(|e| ConfigReadError::ConfigMergeError(e.to_string()))?;

        Ok(merged_val.try_into()?)
    }

    /// Load `path` when given, else the per-user config file when it exists,
    /// else the defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigReadError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|path| path.exists()) {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|name| std::env::var(name).ok())?;

        Ok(config)
    }

    /// Apply `CEIA_SECRET_KEY` and `CEIA_API_URL` as returned by `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigReadError> {
        if let Some(secret) = lookup(SECRET_KEY_ENV).filter(|s| !s.is_empty()) {
            self.session.secret_key = Some(secret);
        }

        if let Some(url) = lookup(API_URL_ENV).filter(|s| !s.is_empty()) {
            self.api.base_url = Url::parse(&url).map_err(|e| ConfigReadError::InvalidEnv {
                name: API_URL_ENV,
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }

    /// The shared session secret. Running without one is an error.
    pub fn secret_key(&self) -> anyhow::Result<&str> {
        match self.session.secret_key.as_deref() {
            Some(secret) if !secret.is_empty() => Ok(secret),
            _ => anyhow::bail!(
                "No session secret configured; set session.secret_key or {SECRET_KEY_ENV}"
            ),
        }
    }

    /// File the session namespace is persisted in.
    pub fn storage_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.session.storage_path {
            return Ok(path.clone());
        }

        dirs::data_local_dir()
            .map(|dir| dir.join("ceia").join("storage.json"))
            .ok_or_else(|| anyhow::anyhow!("No local data directory; set session.storage_path"))
    }

    /// `api.request_timeout_ms` as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.api.request_timeout_ms)
    }

    /// Render the embedded sample config but comment out every value,
    /// producing a handy template for end-users.
    pub fn sample_string() -> String {
        SAMPLE_CONFIG
            .lines()
            .map(|line| {
                let trimmed = line.trim_start();
                let is_comment = trimmed.starts_with('#');
                if !is_comment && !trimmed.is_empty() && !trimmed.starts_with('[') {
                    format!("# {line}")
                } else {
                    line.to_string()
                }
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl FromStr for ConfigToml {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

/// `<config dir>/ceia/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ceia").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let c = ConfigToml::default();

        assert_eq!(c.api.base_url.as_str(), "http://localhost:3000/");
        assert_eq!(c.request_timeout(), Duration::from_secs(30));
        assert_eq!(c.session, SessionToml::default());
        assert_eq!(c.logging.unwrap().level, "warn");
    }

    #[test]
    fn user_values_override_defaults() {
        let c = ConfigToml::from_str_with_defaults(
            r#"
            [api]
            base_url = "https://ceia.example.org/api/"

            [session]
            secret_key = "s3cr3t"
            "#,
        )
        .unwrap();

        assert_eq!(c.api.base_url.as_str(), "https://ceia.example.org/api/");
        assert_eq!(c.api.request_timeout_ms, 30000);
        assert_eq!(c.secret_key().unwrap(), "s3cr3t");
        assert_eq!(
            c.logging.unwrap().module_levels,
            ["ceia_sdk=info", "ceia=info"]
        );
    }

    #[test]
    fn empty_file_is_the_defaults() {
        assert_eq!(
            ConfigToml::from_str_with_defaults("").unwrap(),
            ConfigToml::default()
        );
    }

    #[test]
    fn invalid_files_are_rejected() {
        assert!(matches!(
            ConfigToml::from_str_with_defaults("[api"),
            Err(ConfigReadError::ConfigFileNotValid(_))
        ));
        assert!(ConfigToml::from_str_with_defaults("[api]\nbase_url = \"not a url\"").is_err());
        assert!(matches!(
            ConfigToml::from_file("/definitely/not/here.toml"),
            Err(ConfigReadError::ConfigFileNotFound(_))
        ));
    }

    #[test]
    fn reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nstorage_path = \"/tmp/ceia.json\"\n").unwrap();

        let c = ConfigToml::from_file(&path).unwrap();

        assert_eq!(c.storage_path().unwrap(), PathBuf::from("/tmp/ceia.json"));
    }

    #[test]
    fn environment_wins() {
        let mut c = ConfigToml::from_str_with_defaults("[session]\nsecret_key = \"file\"").unwrap();

        c.apply_env(env(&[
            (SECRET_KEY_ENV, "env"),
            (API_URL_ENV, "https://env.example.org/"),
        ]))
        .unwrap();

        assert_eq!(c.secret_key().unwrap(), "env");
        assert_eq!(c.api.base_url.as_str(), "https://env.example.org/");
    }

    #[test]
    fn empty_environment_values_are_ignored() {
        let mut c = ConfigToml::from_str_with_defaults("[session]\nsecret_key = \"file\"").unwrap();

        c.apply_env(env(&[(SECRET_KEY_ENV, "")])).unwrap();

        assert_eq!(c.secret_key().unwrap(), "file");
    }

    #[test]
    fn invalid_environment_url() {
        let mut c = ConfigToml::default();

        assert!(matches!(
            c.apply_env(env(&[(API_URL_ENV, "nope")])),
            Err(ConfigReadError::InvalidEnv { .. })
        ));
    }

    #[test]
    fn logging_can_be_turned_off() {
        let c = ConfigToml::from_str_with_defaults("[logging]\nlevel = \"off\"").unwrap();
        let logging = c.logging.unwrap();

        assert_eq!(logging.level, "off");
        assert_eq!(logging.module_levels, ["ceia_sdk=info", "ceia=info"]);
        assert_eq!(
            crate::logging::env_filter(&logging, None).unwrap().to_string(),
            "off"
        );
    }

    #[test]
    fn missing_secret_is_an_error() {
        let c = ConfigToml::default();
        assert!(c.secret_key().is_err());

        let c = ConfigToml::from_str_with_defaults("[session]\nsecret_key = \"\"").unwrap();
        assert!(c.secret_key().is_err());
    }

    #[test]
    fn sample_config_is_valid() {
        let c = ConfigToml::from_str_with_defaults(SAMPLE_CONFIG).unwrap();
        assert_eq!(c.api.request_timeout_ms, 10000);

        let commented = ConfigToml::sample_string();
        assert!(commented.contains("# base_url"));
        assert_eq!(
            ConfigToml::from_str_with_defaults(&commented).unwrap(),
            ConfigToml::default()
        );
    }
}
