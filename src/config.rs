//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/captree/captree.toml`
//! 3. Local config: `<dir>/.captree.toml`
//! 4. Environment variables: `CAPTREE_*` prefix (`__` separates nested keys)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;

/// How leaves and empty states are presented.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show build-assigned node ids next to names
    pub show_node_ids: bool,
    /// Shown when no branch is selected
    pub select_message: String,
    /// Shown when the selected branch has no matching leaves
    pub no_match_message: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_node_ids: true,
            select_message: "Select a navigation item.".into(),
            no_match_message: "No matching capabilities found.".into(),
        }
    }
}

/// Raw display config for intermediate parsing (`None` = not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayConfig {
    pub show_node_ids: Option<bool>,
    pub select_message: Option<String>,
    pub no_match_message: Option<String>,
}

impl DisplayConfig {
    /// Merge overlay config onto self (base): overlay wins if specified.
    pub fn merge(&self, overlay: &RawDisplayConfig) -> Self {
        Self {
            show_node_ids: overlay.show_node_ids.unwrap_or(self.show_node_ids),
            select_message: overlay
                .select_message
                .clone()
                .unwrap_or_else(|| self.select_message.clone()),
            no_match_message: overlay
                .no_match_message
                .clone()
                .unwrap_or_else(|| self.no_match_message.clone()),
        }
    }
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub data_file: Option<PathBuf>,
    pub currency: Option<String>,
    #[serde(default)]
    pub display: RawDisplayConfig,
}

/// Unified configuration for captree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON table to load (default: data.json, `-` reads stdin)
    pub data_file: PathBuf,
    /// Prefix for displayed values (default: "$")
    pub currency: String,
    /// Presentation settings
    pub display: DisplayConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data.json"),
            currency: "$".into(),
            display: DisplayConfig::default(),
        }
    }
}

/// Get the XDG config directory for captree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "captree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("captree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".captree.toml")
}

/// Expand environment variables and `~` in a path-like string.
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
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.data_file.to_string_lossy().as_ref());
        self.data_file = PathBuf::from(expanded);
    }

    /// Merge overlay config onto self (base): scalars from the overlay win if specified.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            data_file: overlay
                .data_file
                .clone()
                .unwrap_or_else(|| self.data_file.clone()),
            currency: overlay
                .currency
                .clone()
                .unwrap_or_else(|| self.currency.clone()),
            display: self.display.merge(&overlay.display),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.captree.toml`
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. Global config: `$XDG_CONFIG_HOME/captree/captree.toml`
    /// 3. Local config: `<local_dir>/.captree.toml`
    /// 4. Environment variables: `CAPTREE_*` prefix
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        // Expand ~ and $VAR in path-like fields
        current.expand_paths();

        Ok(current)
    }

    /// Apply CAPTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let builder = Config::builder().add_source(
            Environment::with_prefix("CAPTREE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;

        if let Ok(val) = config.get_string("data_file") {
            settings.data_file = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("currency") {
            settings.currency = val;
        }
        if let Ok(val) = config.get_bool("display.show_node_ids") {
            settings.display.show_node_ids = val;
        }
        if let Ok(val) = config.get_string("display.select_message") {
            settings.display.select_message = val;
        }
        if let Ok(val) = config.get_string("display.no_match_message") {
            settings.display.no_match_message = val;
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
        r#"# captree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/captree/captree.toml
#   Local:  <dir>/.captree.toml
#   Env:    CAPTREE_* environment variables (CAPTREE_DISPLAY__SHOW_NODE_IDS=false)

# JSON table with BCAP1, BCAP2, BCAP3, id, name, spend columns ("-" reads stdin)
# data_file = "data.json"

# Prefix for displayed spend values
# currency = "$"

[display]
# Show node ids next to names (needed to select nodes)
# show_node_ids = true

# Shown when no branch is selected
# select_message = "Select a navigation item."

# Shown when the selected branch has no matching leaves
# no_match_message = "No matching capabilities found."
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
