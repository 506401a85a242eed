//! Configuration file management
//!
//! Loads TOML configuration files and provides CLI defaults.
//! Default config path: ~/.config/pixfont/config.toml

use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_SCALE, MAX_SCALE, MIN_SCALE};
use crate::utils::{parse_hex_color, Rgba};

/// Application settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Font settings
    pub font: FontConfig,
    /// Render settings
    pub render: RenderConfig,
}

/// Font settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Descriptor (.fnt) path; relative paths are resolved from the
    /// working directory
    pub path: String,
}

/// Render settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Text color (RRGGBB, RGB or RRGGBBAA)
    pub color: String,
    /// Glyph scale factor
    pub scale: f32,
    /// Wrap output in a complete HTML document
    pub document: bool,
    /// Output file (empty = stdout)
    pub output: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            color: "ffffff".to_string(),
            scale: DEFAULT_SCALE,
            document: false,
            output: String::new(),
        }
    }
}

impl RenderConfig {
    /// Parsed color, white on invalid input
    pub fn color(&self) -> Rgba {
        match parse_hex_color(&self.color) {
            Some(c) => c,
            None => {
                warn!("Invalid color {:?} in config, using white", self.color);
                Rgba::WHITE
            }
        }
    }

    /// Scale clamped to the supported range
    pub fn scale(&self) -> f32 {
        if !self.scale.is_finite() {
            warn!("Invalid scale {} in config, using {}", self.scale, DEFAULT_SCALE);
            return DEFAULT_SCALE;
        }
        self.scale.clamp(MIN_SCALE, MAX_SCALE)
    }
}

impl Config {
    /// System-wide config path
    const SYSTEM_CONFIG_PATH: &'static str = "/etc/pixfont/config.toml";

    /// Get the path that would be used for loading config
    /// Returns None if using built-in defaults
    pub fn config_path() -> Option<PathBuf> {
        // 1. PIXFONT_CONFIG environment variable
        if let Ok(path) = std::env::var("PIXFONT_CONFIG") {
            let p = Path::new(&path);
            if p.exists() {
                return Some(p.to_path_buf());
            }
        }

        // 2. User config: ~/.config/pixfont/config.toml
        if let Some(config_path) = default_config_path() {
            if config_path.exists() {
                return Some(config_path);
            }
        }

        // 3. System config: /etc/pixfont/config.toml
        let system_config = Path::new(Self::SYSTEM_CONFIG_PATH);
        if system_config.exists() {
            return Some(system_config.to_path_buf());
        }

        None
    }

    /// Load configuration with priority:
    /// 1. PIXFONT_CONFIG environment variable
    /// 2. ~/.config/pixfont/config.toml (user config)
    /// 3. /etc/pixfont/config.toml (system config)
    /// 4. Built-in defaults
    pub fn load() -> Self {
        if let Some(path) = Self::config_path() {
            match Self::load_from_file(&path) {
                Ok(config) => {
                    info!("Loaded config: {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Failed to load config {}: {}", path.display(), e);
                }
            }
        }
        info!("Using built-in default config");
        Self::default()
    }

    /// Load settings from specified path
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Write the commented default config to the user config path
    pub fn write_default_config() -> Result<PathBuf> {
        let config_path =
            default_config_path().ok_or_else(|| anyhow::anyhow!("Config directory not found"))?;
        if let Some(dir) = config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&config_path, DEFAULT_TEMPLATE)?;
        Ok(config_path)
    }
}

const DEFAULT_TEMPLATE: &str = r#"# pixfont configuration
#
# Command line options override these values.

# =============================================================================
# Font Settings
# =============================================================================
[font]
# Descriptor file; pages are loaded from paths relative to it
path = ""

# =============================================================================
# Render Settings
# =============================================================================
[render]
color = "ffffff"    # RRGGBB, RGB or RRGGBBAA
scale = 1.0         # Glyph scale factor (0.125 - 64)
document = false    # Wrap output in <html>...</html>
output = ""         # Output file (empty = stdout)
"#;

/// Get default config file path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pixfont").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_matches_defaults() {
        assert_eq!(Config::from_toml(DEFAULT_TEMPLATE).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml("[render]\ncolor = \"#f00\"\nscale = 2.5\n").unwrap();
        assert_eq!(config.render.color(), Rgba([255, 0, 0, 255]));
        assert_eq!(config.render.scale(), 2.5);
        assert!(!config.render.document);
        assert!(config.font.path.is_empty());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_toml("[render]\ncolor = \"nope\"\nscale = 1000.0\n").unwrap();
        assert_eq!(config.render.color(), Rgba::WHITE);
        assert_eq!(config.render.scale(), MAX_SCALE);
    }

    #[test]
    fn test_parse_error() {
        assert!(Config::from_toml("[render]\nscale = \"big\"\n").is_err());
    }
}
