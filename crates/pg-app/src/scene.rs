// ABOUTME: Scene files describing panels and the container widths to lay them out at.
// ABOUTME: Parsed from TOML; settings sections override the user's layout config.

use std::path::Path;

use anyhow::{bail, Context, Result};
use pg_core::{GallerySettings, GridSettings, LayoutConfig, Size};
use pg_layout::{GalleryItem, GridItem, Span};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    #[default]
    Grid,
    Gallery,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PanelSpec {
    pub id: String,
    /// Grid span, in cells
    #[serde(default = "one")]
    pub columns: usize,
    #[serde(default = "one")]
    pub rows: usize,
    /// Natural pixel size for gallery panels
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
}

fn one() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub variant: Variant,
    /// Container widths, one per simulated resize. The first is measured by the initial pass.
    pub widths: Vec<f32>,
    #[serde(default)]
    pub panels: Vec<PanelSpec>,
    pub grid: Option<GridSettings>,
    pub gallery: Option<GallerySettings>,
}

impl Scene {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid scene {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scene: Scene = toml::from_str(content)?;
        if scene.widths.is_empty() {
            bail!("scene lists no container widths");
        }
        Ok(scene)
    }

    /// Width measured by the initial pass
    pub fn initial_width(&self) -> Result<f32> {
        self.widths
            .first()
            .copied()
            .context("scene lists no container widths")
    }

    /// User config with this scene's settings sections applied on top
    pub fn settings(&self, base: LayoutConfig) -> Result<LayoutConfig> {
        let config = LayoutConfig {
            grid: self.grid.clone().unwrap_or(base.grid),
            gallery: self.gallery.clone().unwrap_or(base.gallery),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn grid_items(&self) -> Vec<GridItem<String>> {
        self.panels
            .iter()
            .map(|panel| GridItem::new(panel.id.clone(), Span::new(panel.columns, panel.rows)))
            .collect()
    }

    pub fn gallery_items(&self) -> Vec<GalleryItem<String>> {
        self.panels
            .iter()
            .map(|panel| GalleryItem::new(panel.id.clone(), Size::new(panel.width, panel.height)))
            .collect()
    }
}
