//! Navigation settings loaded from TOML
//!
//! Defaults match the behaviour of the controller without any config file:
//! 40/20 overlay margins, unbounded history and no overlay exclusion.

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayMargin {
    #[serde(default = "default_horizontal_margin")]
    pub horizontal: u32,
    #[serde(default = "default_vertical_margin")]
    pub vertical: u32,
}

fn default_horizontal_margin() -> u32 {
    40
}

fn default_vertical_margin() -> u32 {
    20
}

impl Default for OverlayMargin {
    fn default() -> Self {
        Self {
            horizontal: default_horizontal_margin(),
            vertical: default_vertical_margin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NavigationConfig {
    /// Subtracted from the display surface to bound views shown for a result
    #[serde(default)]
    pub overlay_margin: OverlayMargin,

    /// Maximum back-stack depth; None keeps every entry
    #[serde(default)]
    pub max_history: Option<usize>,

    /// Refuse a second overlay while one is attached
    #[serde(default)]
    pub exclusive_overlays: bool,
}

impl NavigationConfig {
    pub fn builder() -> NavigationConfigBuilder {
        NavigationConfigBuilder::new()
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("mvvm-navigation");
        Ok(config_dir.join("navigation.toml"))
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if !config_path.exists() {
            info!("Navigation config not found at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }
        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading navigation config from: {:?}", path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Invalid navigation config")?;
        Ok(config)
    }
}

/// Builder for [`NavigationConfig`]
#[derive(Debug, Default)]
pub struct NavigationConfigBuilder {
    config: NavigationConfig,
}

impl NavigationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overlay_margin(mut self, horizontal: u32, vertical: u32) -> Self {
        self.config.overlay_margin = OverlayMargin { horizontal, vertical };
        self
    }

    pub fn max_history(mut self, depth: usize) -> Self {
        self.config.max_history = Some(depth);
        self
    }

    pub fn exclusive_overlays(mut self, exclusive: bool) -> Self {
        self.config.exclusive_overlays = exclusive;
        self
    }

    pub fn build(self) -> NavigationConfig {
        self.config
    }
}
