//! Configuration management trait.
//!
//! Implemented by the application's config struct so the generic
//! `config` subcommand handlers can resolve, load, and render it.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::util::paths::expand_tilde;
use crate::{Error, Result};

/// A TOML-backed configuration type.
pub trait ConfigManager: Serialize + DeserializeOwned + Default {
    /// Short project name; used for the config directory and env prefix.
    fn project_name() -> &'static str;

    /// Environment variable that may point at a config file.
    fn config_env_var() -> String {
        format!("{}_CONFIG", env_prefix(Self::project_name()))
    }

    /// `<platform config dir>/<project>/config.toml`.
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(Self::project_name()).join("config.toml"))
    }

    /// Resolve the config file path.
    ///
    /// Checks in order:
    /// 1. The explicit path, if given
    /// 2. The `{PROJECT}_CONFIG` environment variable
    /// 3. [`ConfigManager::default_config_path`]
    fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
        if let Some(p) = explicit {
            return Some(expand_tilde(p));
        }
        if let Ok(p) = std::env::var(Self::config_env_var()) {
            if !p.is_empty() {
                return Some(expand_tilde(&p));
            }
        }
        Self::default_config_path()
    }

    /// Load the configuration, falling back to defaults if no file exists.
    fn load(explicit: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(explicit) {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load the configuration from a specific file.
    fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))
    }

    /// Render the configuration as pretty TOML.
    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    /// Flatten the configuration into `PROJECT_SECTION_KEY=value` pairs.
    fn to_env_vars(&self) -> Result<Vec<(String, String)>> {
        let value = toml::Value::try_from(self).map_err(|e| Error::config(e.to_string()))?;
        let mut vars = Vec::new();
        flatten_env(&env_prefix(Self::project_name()), &value, &mut vars);
        Ok(vars)
    }
}

/// "my-app" → "MY_APP"
pub fn env_prefix(project_name: &str) -> String {
    project_name.to_uppercase().replace(['-', ' '], "_")
}

fn flatten_env(prefix: &str, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let name = format!("{prefix}_{}", env_prefix(key));
                flatten_env(&name, child, out);
            }
        }
        toml::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        toml::Value::Array(items) => {
            let joined = items
                .iter()
                .map(|v| match v {
                    toml::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(",");
            out.push((prefix.to_string(), joined));
        }
        other => out.push((prefix.to_string(), other.to_string())),
    }
}
