// ABOUTME: Converts grid cell coordinates into pixel rectangles.
// ABOUTME: Shared sizing step for real panels and placeholders.

use pg_core::{GridSettings, Rect};
use serde::Serialize;

use crate::item::Span;

/// Top-left cell of a placed block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CellPos {
    pub column: usize,
    pub row: usize,
}

impl CellPos {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// Pixel dimensions of one grid cell and the gap around it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub panel_width: f32,
    pub panel_height: f32,
    pub spacing: f32,
}

impl CellMetrics {
    pub fn from_settings(settings: &GridSettings) -> Self {
        Self {
            panel_width: settings.panel_width,
            panel_height: settings.panel_height,
            spacing: settings.spacing,
        }
    }

    /// Pixel rectangle of a block. Inner gaps between spanned cells belong to the block.
    pub fn block_rect(&self, cell: CellPos, span: Span) -> Rect {
        let (x, y) = (cell.column as f32, cell.row as f32);
        let (cols, rows) = (span.columns() as f32, span.rows() as f32);
        Rect::new(
            x * self.panel_width + (x + 1.0) * self.spacing,
            y * self.panel_height + (y + 1.0) * self.spacing,
            cols * self.panel_width + (cols - 1.0) * self.spacing,
            rows * self.panel_height + (rows - 1.0) * self.spacing,
        )
    }

    /// Container height needed to show `rect` with spacing below it
    pub fn bottom_extent(&self, rect: &Rect) -> f32 {
        rect.bottom() + self.spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> CellMetrics {
        CellMetrics::from_settings(&GridSettings::default())
    }

    #[test]
    fn single_cell_rect() {
        let rect = metrics().block_rect(CellPos::new(0, 0), Span::UNIT);
        assert_eq!(rect, Rect::new(10.0, 10.0, 240.0, 240.0));

        let rect = metrics().block_rect(CellPos::new(3, 1), Span::UNIT);
        assert_eq!(rect, Rect::new(760.0, 260.0, 240.0, 240.0));
    }

    #[test]
    fn spanned_rect_absorbs_inner_gaps() {
        let rect = metrics().block_rect(CellPos::new(1, 0), Span::new(2, 3));
        assert_eq!(rect, Rect::new(260.0, 10.0, 490.0, 740.0));
        assert_eq!(metrics().bottom_extent(&rect), 760.0);
    }
}
