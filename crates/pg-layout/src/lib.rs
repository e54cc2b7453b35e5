// ABOUTME: Panel layout engines for panelgrid.
// ABOUTME: Block-packing presentation grid and shortest-column masonry gallery.

pub mod columns;
pub mod engine;
pub mod error;
pub mod gallery;
pub mod grid;
pub mod item;
pub mod matrix;
pub mod placement;

pub use columns::{
    plan_gallery_columns, plan_grid_columns, GalleryColumns, GridColumns, MAX_GALLERY_COLUMNS,
};
pub use engine::{LayoutEngine, LayoutSummary};
pub use error::PanelError;
pub use gallery::{pack_gallery, ColumnHeights, GalleryLayout, GalleryPack, GalleryPlacement};
pub use grid::{pack_grid, GridLayout, GridPack, Occupant, Placement, MAX_ROW_SPAN};
pub use item::{
    GalleryFit, GalleryItem, GridItem, PanelContent, PanelSizer, Sizing, Span, PLACEHOLDER_CLASS,
};
pub use matrix::BlockMatrix;
pub use placement::{CellMetrics, CellPos};
