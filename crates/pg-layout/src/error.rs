// ABOUTME: Per-item layout problems.
// ABOUTME: Reported through tracing inside a pass, never returned past it.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PanelError {
    #[error("Panel {index} has a non-positive intrinsic size {width}x{height}")]
    NonPositiveIntrinsic { index: usize, width: f32, height: f32 },

    #[error("Panel {index} sizer returned an unusable size {width}x{height}")]
    InvalidSize { index: usize, width: f32, height: f32 },

    #[error("Panel {index} spans {rows} rows, clamped to {max}")]
    RowSpanTooTall { index: usize, rows: usize, max: usize },
}
