//! Quire configuration.
//!
//! Loaded from `<config dir>/quire/config.toml` (or `--config` /
//! `QUIRE_CONFIG`); every field has a default, so a missing file is fine.
//! Command-line flags override file values via [`Settings::resolve`].

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use quire_auth::{AuthError, FileTokenStore};
use quire_client::DEFAULT_BASE_URL;
use quire_core::ConfigManager;
use quire_core::util::paths::expand_tilde;

use crate::cli::Cli;

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct QuireConfig {
    /// Notes API settings.
    pub api: ApiConfig,
    /// Local session settings.
    pub session: SessionConfig,
    /// Logging settings.
    pub log: LogConfig,
}

/// `[api]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root URL of the notes API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

/// `[session]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the bearer token is kept; defaults to `~/.quire/token.json`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_file: Option<String>,
}

/// `[log]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default level filter when neither `-v` nor `RUST_LOG` is given.
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl ConfigManager for QuireConfig {
    fn project_name() -> &'static str {
        "quire"
    }
}

/// Effective settings after applying command-line overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Notes API root.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Explicit token file, if any.
    pub token_file: Option<PathBuf>,
    /// Default log level.
    pub log_level: String,
}

impl Settings {
    /// Merge the loaded config with flags (flags win).
    pub fn resolve(config: &QuireConfig, cli: &Cli) -> Self {
        let token_file = cli.token_file.clone().or_else(|| {
            config
                .session
                .token_file
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(expand_tilde)
        });
        Self {
            base_url: cli
                .api_url
                .clone()
                .unwrap_or_else(|| config.api.base_url.clone()),
            timeout: Duration::from_secs(config.api.timeout_secs.max(1)),
            token_file,
            log_level: config.log.level.clone(),
        }
    }

    /// The token store these settings point at.
    pub fn token_store(&self) -> Result<FileTokenStore, AuthError> {
        match &self.token_file {
            Some(path) => Ok(FileTokenStore::with_path(path.clone())),
            None => FileTokenStore::new(),
        }
    }
}
