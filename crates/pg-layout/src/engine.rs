// ABOUTME: Common interface of the grid and gallery engines.
// ABOUTME: One call per pass, from a measured container width to placed panels.

use serde::Serialize;

/// Outcome of one layout pass
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LayoutSummary {
    pub columns: usize,
    /// Width the laid-out content occupies inside the container
    pub content_width: f32,
    /// Container height needed to show every placed panel
    pub height: f32,
    /// Panels placed this pass, placeholders excluded
    pub placed: usize,
    pub placeholders: usize,
}

/// A layout engine owns its panel list and re-places every panel on each pass.
///
/// Passes are synchronous and deterministic: the same panels and the same width
/// always produce the same frames. A pass never fails; panels that cannot be
/// sized are logged and left where they were.
pub trait LayoutEngine {
    fn layout(&mut self, container_width: f32) -> LayoutSummary;

    /// Style class the host should apply to every panel
    fn panel_style_class(&self) -> Option<&str> {
        None
    }
}
