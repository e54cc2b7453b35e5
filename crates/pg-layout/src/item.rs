// ABOUTME: Panel items placed by the grid and gallery engines.
// ABOUTME: Spans, payloads, placeholders and the custom sizing capability.

use std::fmt;

use pg_core::{Rect, Size};
use serde::Serialize;

/// Style class carried by synthetic filler panels
pub const PLACEHOLDER_CLASS: &str = "gi-empty";

/// Number of grid cells an item covers. Both extents are at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    columns: usize,
    rows: usize,
}

impl Span {
    pub const UNIT: Self = Self {
        columns: 1,
        rows: 1,
    };

    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::UNIT
    }
}

/// Custom sizing for panels that render something other than their reserved box.
///
/// The grid passes the reserved block size and keeps whatever comes back as the
/// panel's content size; the cells stay reserved either way. The gallery passes
/// the column width with a zero height and takes the returned size as the panel's
/// frame.
pub trait PanelSizer {
    fn resize(&mut self, available: Size) -> Size;
}

impl<F> PanelSizer for F
where
    F: FnMut(Size) -> Size,
{
    fn resize(&mut self, available: Size) -> Size {
        self(available)
    }
}

/// How a grid panel fills its reserved block
#[derive(Default)]
pub enum Sizing {
    /// Content takes exactly the reserved block
    #[default]
    Reserved,
    Custom(Box<dyn PanelSizer>),
}

impl fmt::Debug for Sizing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sizing::Reserved => f.write_str("Reserved"),
            Sizing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent<T> {
    Panel(T),
    /// Synthetic filler for a cell no queued panel could take
    Placeholder { id: usize, style_class: &'static str },
}

#[derive(Debug)]
pub struct GridItem<T> {
    /// Placement order from the most recent pass, placeholders included
    pub index: usize,
    /// Reserved block, `None` until the item has been placed once
    pub frame: Option<Rect>,
    /// Size the content reported for its block
    pub content_size: Option<Size>,
    pub span: Span,
    pub content: PanelContent<T>,
    pub sizing: Sizing,
}

impl<T> GridItem<T> {
    pub fn new(payload: T, span: Span) -> Self {
        Self {
            index: 0,
            frame: None,
            content_size: None,
            span,
            content: PanelContent::Panel(payload),
            sizing: Sizing::Reserved,
        }
    }

    pub(crate) fn placeholder(id: usize) -> Self {
        Self {
            index: 0,
            frame: None,
            content_size: None,
            span: Span::UNIT,
            content: PanelContent::Placeholder {
                id,
                style_class: PLACEHOLDER_CLASS,
            },
            sizing: Sizing::Reserved,
        }
    }

    pub fn with_sizer(mut self, sizer: impl PanelSizer + 'static) -> Self {
        self.sizing = Sizing::Custom(Box::new(sizer));
        self
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.content, PanelContent::Placeholder { .. })
    }

    pub fn payload(&self) -> Option<&T> {
        match &self.content {
            PanelContent::Panel(payload) => Some(payload),
            PanelContent::Placeholder { .. } => None,
        }
    }
}

/// How a gallery panel derives its height from the column width
pub enum GalleryFit {
    /// Natural pixel size; height scales with the column width
    Natural(Size),
    Custom(Box<dyn PanelSizer>),
}

impl fmt::Debug for GalleryFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryFit::Natural(size) => f.debug_tuple("Natural").field(size).finish(),
            GalleryFit::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[derive(Debug)]
pub struct GalleryItem<T> {
    /// Position in the gallery list as of the most recent pass
    pub index: usize,
    pub frame: Option<Rect>,
    pub fit: GalleryFit,
    pub payload: T,
}

impl<T> GalleryItem<T> {
    pub fn new(payload: T, natural: Size) -> Self {
        Self {
            index: 0,
            frame: None,
            fit: GalleryFit::Natural(natural),
            payload,
        }
    }

    pub fn with_sizer(payload: T, sizer: impl PanelSizer + 'static) -> Self {
        Self {
            index: 0,
            frame: None,
            fit: GalleryFit::Custom(Box::new(sizer)),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_is_at_least_one_cell() {
        let span = Span::new(0, 0);
        assert_eq!(span, Span::UNIT);
        assert_eq!(Span::new(3, 0).columns(), 3);
        assert_eq!(Span::new(3, 0).rows(), 1);
    }

    #[test]
    fn placeholder_has_no_payload() {
        let item: GridItem<&str> = GridItem::placeholder(7);
        assert!(item.is_placeholder());
        assert_eq!(item.payload(), None);
        assert_eq!(
            item.content,
            PanelContent::Placeholder {
                id: 7,
                style_class: PLACEHOLDER_CLASS
            }
        );
    }

    #[test]
    fn closures_act_as_sizers() {
        let mut sizer = |available: Size| Size::new(available.width / 2.0, available.height);
        assert_eq!(
            sizer.resize(Size::new(240.0, 240.0)),
            Size::new(120.0, 240.0)
        );
    }
}
