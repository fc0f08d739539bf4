//! Fixture defaults loaded from TOML and the environment.
//!
//! Values are layered: built-in defaults, then a TOML document, then
//! environment variables.
//!
//! ```toml
//! default_method = "POST"
//! default_url = "http://localhost:8080/api/v2/test"
//!
//! [default_headers]
//! x-token = "secret"
//! ```
//!
//! Environment variables use the format `PREFIX__KEY`, with headers nested one
//! level further:
//!
//! - `STAGEHAND__DEFAULT_METHOD=PUT`
//! - `STAGEHAND__DEFAULT_URL=http://localhost/api`
//! - `STAGEHAND__DEFAULT_HEADERS__X_TOKEN=secret` sets header `x-token`

use crate::builder::DEFAULT_URL;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default environment variable prefix.
pub const ENV_PREFIX: &str = "STAGEHAND";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("failed to read configuration file: {path}")]
    Io {
        /// Path to the file.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("failed to parse TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Defaults applied by [`ContextBuilder::with_config`](crate::ContextBuilder::with_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    /// Request method.
    pub default_method: String,
    /// Target URL.
    pub default_url: String,
    /// Headers set on every request.
    pub default_headers: IndexMap<String, String>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self {
            default_method: "GET".to_string(),
            default_url: DEFAULT_URL.to_string(),
            default_headers: IndexMap::new(),
        }
    }
}

impl FixtureConfig {
    /// Parses a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads and parses a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded fixture configuration");
        Ok(config)
    }

    /// Applies overrides from the process environment.
    pub fn with_env_prefix(self, prefix: &str) -> Self {
        self.apply_env_overrides(prefix, env::vars())
    }

    /// Applies overrides from `vars`, ignoring keys without the prefix or
    /// that name no known setting.
    pub fn apply_env_overrides<I, K, V>(mut self, prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let prefix = format!("{}__", prefix.to_uppercase());
        for (key, value) in vars {
            let Some(key) = key.as_ref().strip_prefix(&prefix) else {
                continue;
            };
            match key {
                "DEFAULT_METHOD" => self.default_method = value.into(),
                "DEFAULT_URL" => self.default_url = value.into(),
                _ => {
                    if let Some(header) = key.strip_prefix("DEFAULT_HEADERS__") {
                        let name = header.to_lowercase().replace('_', "-");
                        self.default_headers.insert(name, value.into());
                    } else {
                        tracing::debug!(key, "ignoring unknown fixture environment variable");
                    }
                }
            }
        }
        self
    }
}
