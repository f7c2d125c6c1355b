//! Application configuration for chm2docset.
//!
//! User config lives at `~/.chm2docset/chm2docset.toml`. The file is
//! optional; CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DocsetError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "chm2docset.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".chm2docset";

// ---------------------------------------------------------------------------
// Config structs (matching chm2docset.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Extraction program settings.
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Default output directory for docset bundles.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Default platform family label for bundle descriptors.
    #[serde(default = "default_platform")]
    pub platform: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            platform: default_platform(),
        }
    }
}

fn default_output_dir() -> String {
    "./".into()
}
fn default_platform() -> String {
    "unknown".into()
}

/// `[extractor]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Override for the extraction program name or path.
    /// When unset, the platform default is resolved from PATH.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.chm2docset/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| DocsetError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.chm2docset/chm2docset.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| DocsetError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| DocsetError::config(format!("failed to parse {}: {e}", path.display())))
}
