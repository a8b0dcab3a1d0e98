//! Application configuration.
//!
//! The configuration is loaded from a JSON file at
//! `$XDG_CONFIG_HOME/wmosaic/config.json`.  The top-level schema uses one
//! key per section so the file can be extended later without breaking
//! backward compatibility.
//!
//! # Example
//!
//! ```json
//! {
//!   "tools": { "wmctrl": "/usr/local/bin/wmctrl" },
//!   "windows": { "skip_title_prefixes": ["Plasma", "Conky"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// Every field is optional: a minimal `{}` file is valid and all sections
/// fall back to their compiled-in defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Paths of the external tools.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Window enumeration rules.
    #[serde(default)]
    pub windows: WindowRules,
}

/// Optional absolute paths of the external tools.
///
/// Any tool left unset is located on `PATH` instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub wmctrl: Option<PathBuf>,
    pub xdotool: Option<PathBuf>,
    pub xrandr: Option<PathBuf>,
}

/// Which windows to drop from enumeration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowRules {
    /// Windows whose title starts with one of these prefixes are treated
    /// as desktop-shell furniture and excluded from every listing.
    pub skip_title_prefixes: Vec<String>,
}

impl Default for WindowRules {
    fn default() -> Self {
        Self {
            skip_title_prefixes: vec!["Plasma".into(), "Desktop — Plasma".into()],
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
