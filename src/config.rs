//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/wikipath/wikipath.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `WIKIPATH_*` prefix
//!
//! CLI flags are applied on top by the caller.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::infrastructure::memory::DEFAULT_MAX_HOPS;

/// Unified configuration for wikipath.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Graph document loaded by the in-memory oracle
    pub graph_file: Option<PathBuf>,
    /// Hop ceiling for path queries
    pub max_hops: u32,
    /// Page size for `paths` when no limit is given
    pub default_limit: i64,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            graph_file: None,
            max_hops: DEFAULT_MAX_HOPS,
            default_limit: 5,
            pretty: true,
        }
    }
}

/// Raw settings for intermediate parsing (Option to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub graph_file: Option<PathBuf>,
    pub max_hops: Option<u32>,
    pub default_limit: Option<i64>,
    pub pretty: Option<bool>,
}

/// Get the XDG config directory for wikipath.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "wikipath").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("wikipath.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; unexpandable input is returned as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            graph_file: overlay
                .graph_file
                .clone()
                .or_else(|| self.graph_file.clone()),
            max_hops: overlay.max_hops.unwrap_or(self.max_hops),
            default_limit: overlay.default_limit.unwrap_or(self.default_limit),
            pretty: overlay.pretty.unwrap_or(self.pretty),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        if let Some(graph_file) = &self.graph_file {
            let expanded = expand_env_vars(graph_file.to_string_lossy().as_ref());
            self.graph_file = Some(PathBuf::from(expanded));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(path) = config_file {
            let raw = load_raw_settings(path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply WIKIPATH_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("WIKIPATH")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("graph_file") {
            settings.graph_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_int("max_hops") {
            settings.max_hops = u32::try_from(val).map_err(|_| ApplicationError::Config {
                message: format!("WIKIPATH_MAX_HOPS out of range: {val}"),
            })?;
        }
        if let Ok(val) = config.get_int("default_limit") {
            settings.default_limit = val;
        }
        if let Ok(val) = config.get_bool("pretty") {
            settings.pretty = val;
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# wikipath configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/wikipath/wikipath.toml
#   File:   --config <file>
#   Env:    WIKIPATH_* environment variables
#   Flags:  --graph, --max-hops

# JSON graph document: {"nodes": [{"id", "title", "type"}], "links": [{"source", "target"}]}
# graph_file = "~/data/wikigraph.json"

# Longest path considered, in hops
# max_hops = 100

# Paths per page for `wikipath paths` when --limit is omitted
# default_limit = 5

# Pretty-print JSON output
# pretty = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
