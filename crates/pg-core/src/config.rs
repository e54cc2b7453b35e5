// ABOUTME: Layout configuration handling.
// ABOUTME: Loads and saves grid/gallery settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Settings for the block-packing presentation grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Gap between panels and around the grid edge, in pixels
    pub spacing: f32,

    /// Width of a single grid cell in pixels
    pub panel_width: f32,

    /// Height of a single grid cell in pixels
    pub panel_height: f32,

    /// Upper bound on the column count regardless of container width
    pub max_columns: usize,

    /// Style class applied to every panel by the host
    pub panel_style_class: Option<String>,

    /// Delay before the first pass after mounting, in milliseconds
    pub load_delay_ms: u64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            panel_width: 240.0,
            panel_height: 240.0,
            max_columns: 6,
            panel_style_class: None,
            load_delay_ms: 500,
        }
    }
}

impl GridSettings {
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

/// Settings for the masonry gallery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GallerySettings {
    /// Gap between columns and between stacked panels, in pixels
    pub spacing: f32,

    /// Narrowest acceptable column; fewer columns are used below this
    pub min_panel_width: f32,

    /// Widest acceptable column; more columns are used above this
    pub max_panel_width: f32,

    pub panel_style_class: Option<String>,

    /// Delay before the first pass after mounting, in milliseconds
    pub load_delay_ms: u64,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            spacing: 10.0,
            min_panel_width: 160.0,
            max_panel_width: 320.0,
            panel_style_class: None,
            load_delay_ms: 500,
        }
    }
}

impl GallerySettings {
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Presentation grid settings
    pub grid: GridSettings,

    /// Masonry gallery settings
    pub gallery: GallerySettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

fn check_spacing(section: &str, spacing: f32) -> Result<(), ConfigError> {
    if !spacing.is_finite() || spacing < 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{section}.spacing must be a non-negative number, got {spacing}"
        )));
    }
    Ok(())
}

fn check_extent(section: &str, name: &str, value: f32) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{section}.{name} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

impl LayoutConfig {
    /// Get the default config file path (~/.config/panelgrid/layout.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("panelgrid").join("layout.toml"))
    }

    /// Reject settings the engines cannot lay out with
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_spacing("grid", self.grid.spacing)?;
        check_extent("grid", "panel_width", self.grid.panel_width)?;
        check_extent("grid", "panel_height", self.grid.panel_height)?;

        check_spacing("gallery", self.gallery.spacing)?;
        check_extent("gallery", "min_panel_width", self.gallery.min_panel_width)?;
        check_extent("gallery", "max_panel_width", self.gallery.max_panel_width)?;
        if self.gallery.min_panel_width > self.gallery.max_panel_width {
            return Err(ConfigError::Invalid(format!(
                "gallery.min_panel_width ({}) exceeds gallery.max_panel_width ({})",
                self.gallery.min_panel_width, self.gallery.max_panel_width
            )));
        }
        Ok(())
    }

    /// Parse and validate config from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)?;
        Ok(path)
    }
}
