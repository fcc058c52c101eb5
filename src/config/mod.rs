//! Configuration loading
//!
//! Config files are JSON5. The path comes from the caller, then
//! `WA_ACTIONS_CONFIG_PATH`, then `<config dir>/carapace/carapace.json5`.

mod types;

pub use types::{
    ActionGate, ChannelsConfig, Config, LoggingConfig, WhatsAppActionConfig,
    WhatsAppActionKind, WhatsAppChannelConfig,
};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV: &str = "WA_ACTIONS_CONFIG_PATH";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    Parse { path: String, message: String },
}

/// Where the config path came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named by the caller or the environment; must exist
    Explicit(PathBuf),
    /// Platform default; may be absent
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(p) | Self::Default(p) => p,
        }
    }
}

/// Platform default config path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("carapace").join("carapace.json5"))
}

/// Resolve the config location from an explicit path and the env override.
pub fn resolve_config_source(
    explicit: Option<&Path>,
    env_override: Option<PathBuf>,
) -> Option<ConfigSource> {
    if let Some(path) = explicit {
        return Some(ConfigSource::Explicit(path.to_path_buf()));
    }
    if let Some(path) = env_override.filter(|p| !p.as_os_str().is_empty()) {
        return Some(ConfigSource::Explicit(path));
    }
    default_config_path().map(ConfigSource::Default)
}

/// Parse a JSON5 config document
pub fn parse_config(raw: &str, origin: &str) -> Result<Config, ConfigError> {
    json5::from_str::<Config>(raw).map_err(|e| ConfigError::Parse {
        path: origin.to_string(),
        message: e.to_string(),
    })
}

/// Load a config file that must exist
pub fn load_config_from_path(path: &Path) -> Result<Config, ConfigError> {
    let display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(display.clone())
        } else {
            ConfigError::Io {
                path: display.clone(),
                source,
            }
        }
    })?;
    parse_config(&raw, &display)
}

/// Load from a resolved source. A missing default file yields the default config.
pub fn load_config_from_source(source: Option<&ConfigSource>) -> Result<Config, ConfigError> {
    match source {
        Some(ConfigSource::Explicit(path)) => load_config_from_path(path),
        Some(ConfigSource::Default(path)) => {
            if path.exists() {
                load_config_from_path(path)
            } else {
                Ok(Config::default())
            }
        }
        None => Ok(Config::default()),
    }
}

/// Resolve and load the configuration
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    let env_override = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
    let source = resolve_config_source(explicit, env_override);
    load_config_from_source(source.as_ref())
}
