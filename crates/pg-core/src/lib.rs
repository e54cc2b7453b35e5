// ABOUTME: Shared types and configuration for panelgrid.
// ABOUTME: Defines pixel geometry and layout config file handling.

pub mod config;
pub mod geometry;

pub use config::{ConfigError, GallerySettings, GridSettings, LayoutConfig};
pub use geometry::{Point, Rect, Size};
