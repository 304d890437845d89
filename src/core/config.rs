//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.phylostate/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::metadata::default_color_options;
use crate::core::state::{
    ColorKind, ColorOption, DEFAULT_COLOR_BY, DEFAULT_TIP_RADIUS,
    DEFAULT_TIP_RADIUS_ON_LEGEND_MATCH, Defaults, TipRadius,
};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PhyloConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub color_options: Vec<ColorOptionEntry>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DisplayConfig {
    pub default_color_by: Option<String>,
    pub tip_radius: Option<f64>,
    pub tip_radius_on_legend_match: Option<f64>,
    pub analysis_slider_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ColorOptionEntry {
    pub key: String,
    pub menu_item: Option<String>,
    pub legend_title: Option<String>,
    #[serde(default)]
    pub continuous: bool,
}

impl From<&ColorOptionEntry> for ColorOption {
    fn from(entry: &ColorOptionEntry) -> Self {
        ColorOption {
            menu_item: entry.menu_item.clone().unwrap_or_else(|| entry.key.clone()),
            legend_title: entry.legend_title.clone().unwrap_or_else(|| entry.key.clone()),
            key: entry.key.clone(),
            kind: if entry.continuous {
                ColorKind::Continuous
            } else {
                ColorKind::Discrete
            },
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.phylostate/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".phylostate").join("config.toml"))
}

/// Load config from `~/.phylostate/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `PhyloConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<PhyloConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(PhyloConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(PhyloConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<PhyloConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: PhyloConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# phylostate configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [display]
# default_color_by = "region"       # Or set PHYLOSTATE_COLOR_BY env var
# tip_radius = 4.0
# tip_radius_on_legend_match = 7.0
# analysis_slider_key = "cTiter"     # Tip attribute the analysis slider thresholds

# Extra color-by menu entries, added to the built-in ones.
# [[color_options]]
# key = "host"
# legend_title = "Host species"

# [[color_options]]
# key = "cTiter"
# menu_item = "titer"
# continuous = true
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the startup defaults by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_color_by` is from the `--color-by` flag (None = not specified).
pub fn resolve(config: &PhyloConfig, cli_color_by: Option<&str>) -> Defaults {
    // Color-by: CLI → env → config → default
    let color_by = cli_color_by
        .map(|s| s.to_string())
        .or_else(|| std::env::var("PHYLOSTATE_COLOR_BY").ok())
        .or_else(|| config.display.default_color_by.clone())
        .unwrap_or_else(|| DEFAULT_COLOR_BY.to_string());

    let mut color_options = default_color_options();
    for entry in &config.color_options {
        color_options.insert(entry.key.clone(), ColorOption::from(entry));
    }

    Defaults {
        color_by,
        color_options,
        tip_radius: TipRadius {
            base: config.display.tip_radius.unwrap_or(DEFAULT_TIP_RADIUS),
            legend_match: config
                .display
                .tip_radius_on_legend_match
                .unwrap_or(DEFAULT_TIP_RADIUS_ON_LEGEND_MATCH),
        },
        analysis_slider_key: config.display.analysis_slider_key.clone(),
    }
}
