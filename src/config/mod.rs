use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::generator::nanobanana::{DEFAULT_ENDPOINT, DEFAULT_MODEL, DEFAULT_SIZE};
use crate::watermark;

/// Errors raised while loading the application configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("environment variable '{0}' is referenced but not set")]
    MissingEnvVar(String),

    #[error("invalid substitution pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Top-level application configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub watermark: watermark::Config,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_size")]
    pub width: u32,
    #[serde(default = "default_size")]
    pub height: u32,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_size() -> u32 {
    DEFAULT_SIZE
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            model: default_model(),
            width: default_size(),
            height: default_size(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    /// Parse YAML after replacing every `${VAR_NAME}` with the value of that
    /// environment variable.
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, ConfigError> {
        let substituted = substitute_env_vars(yaml)?;
        Ok(serde_yaml::from_str(&substituted)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_with_env(&yaml)
    }
}

fn substitute_env_vars(yaml: &str) -> Result<String, ConfigError> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;

    // Resolve every referenced variable up front so a missing one fails fast
    let mut values = HashMap::new();
    for caps in re.captures_iter(yaml) {
        let name = caps[1].to_string();
        if values.contains_key(&name) {
            continue;
        }
        let value =
            std::env::var(&name).map_err(|_| ConfigError::MissingEnvVar(name.clone()))?;
        values.insert(name, value);
    }

    let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
        values.get(&caps[1]).cloned().unwrap_or_default()
    });
    Ok(substituted.into_owned())
}
