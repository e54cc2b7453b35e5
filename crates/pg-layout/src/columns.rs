// ABOUTME: Column planning for both layout variants.
// ABOUTME: Fixed-size grid columns, and uniform masonry columns bounded by min/max width.

use serde::Serialize;

/// Column count for the fixed-cell grid and the pixel width of the grid it makes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridColumns {
    pub count: usize,
    pub grid_width: f32,
}

/// Column count for the gallery and the uniform width of each column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GalleryColumns {
    pub count: usize,
    pub panel_width: f32,
}

impl GalleryColumns {
    pub const NONE: Self = Self {
        count: 0,
        panel_width: 0.0,
    };
}

fn usable_spacing(spacing: f32) -> f32 {
    if spacing.is_finite() && spacing > 0.0 {
        spacing
    } else {
        0.0
    }
}

/// Pixel width of `columns` fixed panels including spacing on both outer edges
pub fn grid_width(columns: usize, panel_width: f32, spacing: f32) -> f32 {
    if columns == 0 {
        return 0.0;
    }
    columns as f32 * panel_width + (columns + 1) as f32 * spacing
}

/// Largest column count whose grid fits in `container_width`, capped at `max_columns`.
///
/// Zero, negative and non-finite widths yield no columns.
pub fn plan_grid_columns(
    container_width: f32,
    panel_width: f32,
    spacing: f32,
    max_columns: usize,
) -> GridColumns {
    let spacing = usable_spacing(spacing);
    if !(container_width > 0.0) || !container_width.is_finite() || !(panel_width > 0.0) {
        return GridColumns {
            count: 0,
            grid_width: 0.0,
        };
    }

    let mut count = 0;
    while count < max_columns && grid_width(count + 1, panel_width, spacing) <= container_width {
        count += 1;
    }

    GridColumns {
        count,
        grid_width: grid_width(count, panel_width, spacing),
    }
}

fn trial_width(container_width: f32, spacing: f32, columns: usize) -> f32 {
    ((container_width - (columns - 1) as f32 * spacing) / columns as f32).floor()
}

/// Most columns a gallery pass will ever lay out
pub const MAX_GALLERY_COLUMNS: usize = 1024;

/// Smallest column count whose trial width is at most `max_panel_width`.
///
/// Trial widths shrink as columns are added, and `ceil(W / max)` columns are
/// always narrow enough, so the answer is found by bisection.
fn narrowest_fit(container_width: f32, spacing: f32, max_panel_width: f32) -> usize {
    if trial_width(container_width, spacing, 1) <= max_panel_width {
        return 1;
    }
    let mut low = 1;
    let mut high = ((container_width / max_panel_width).ceil() as usize).max(2);
    while high - low > 1 {
        let mid = low + (high - low) / 2;
        if trial_width(container_width, spacing, mid) <= max_panel_width {
            high = mid;
        } else {
            low = mid;
        }
    }
    high
}

/// Uniform gallery columns: add columns until each is no wider than
/// `max_panel_width`, then drop one if that made them narrower than
/// `min_panel_width`.
///
/// A container narrower than `min_panel_width` still gets a single column.
/// The count never exceeds [`MAX_GALLERY_COLUMNS`].
pub fn plan_gallery_columns(
    container_width: f32,
    spacing: f32,
    min_panel_width: f32,
    max_panel_width: f32,
) -> GalleryColumns {
    let spacing = usable_spacing(spacing);
    if !(container_width > 0.0) || !container_width.is_finite() {
        return GalleryColumns::NONE;
    }
    if !(max_panel_width > 0.0) {
        tracing::warn!(
            "Gallery max panel width {} is not positive, using a single column",
            max_panel_width
        );
        return GalleryColumns {
            count: 1,
            panel_width: container_width.floor(),
        };
    }

    let mut count = narrowest_fit(container_width, spacing, max_panel_width);
    if count > MAX_GALLERY_COLUMNS {
        tracing::warn!(
            "Gallery would need {} columns of at most {}px, capping at {}",
            count,
            max_panel_width,
            MAX_GALLERY_COLUMNS
        );
        count = MAX_GALLERY_COLUMNS;
    }
    let mut panel_width = trial_width(container_width, spacing, count);
    if panel_width < min_panel_width && count > 1 {
        count -= 1;
        panel_width = trial_width(container_width, spacing, count);
    }

    GalleryColumns {
        count,
        panel_width,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_columns_for_exact_fit() {
        // 4*240 + 5*10 = 1010
        let plan = plan_grid_columns(1010.0, 240.0, 10.0, 6);
        assert_eq!(plan.count, 4);
        assert_eq!(plan.grid_width, 1010.0);

        let plan = plan_grid_columns(1009.0, 240.0, 10.0, 6);
        assert_eq!(plan.count, 3);
        assert_eq!(plan.grid_width, 760.0);
    }

    #[test]
    fn grid_columns_capped_by_max() {
        let plan = plan_grid_columns(1030.0, 240.0, 10.0, 4);
        assert_eq!(plan.count, 4);

        let plan = plan_grid_columns(10_000.0, 240.0, 10.0, 6);
        assert_eq!(plan.count, 6);
        assert_eq!(plan.grid_width, 6.0 * 240.0 + 7.0 * 10.0);
    }

    #[test]
    fn grid_columns_never_negative() {
        for width in [0.0, -50.0, f32::NAN, f32::NEG_INFINITY, 100.0, 259.0] {
            let plan = plan_grid_columns(width, 240.0, 10.0, 6);
            assert_eq!(plan.count, 0, "width {width}");
            assert_eq!(plan.grid_width, 0.0);
        }
        assert_eq!(plan_grid_columns(260.0, 240.0, 10.0, 6).count, 1);
        assert_eq!(plan_grid_columns(500.0, 240.0, 10.0, 0).count, 0);
    }

    #[test]
    fn grid_columns_are_maximal() {
        let (panel, spacing, max) = (240.0, 10.0, 6);
        for step in 0..400 {
            let width = step as f32 * 5.0;
            let count = plan_grid_columns(width, panel, spacing, max).count;
            assert!(count <= max);
            if count > 0 {
                assert!(grid_width(count, panel, spacing) <= width);
            }
            if count < max {
                assert!(grid_width(count + 1, panel, spacing) > width, "width {width}");
            }
        }
    }

    #[test]
    fn gallery_columns_search() {
        // 700: 1 col -> 700, 2 -> 345, 3 -> 226
        let plan = plan_gallery_columns(700.0, 10.0, 160.0, 320.0);
        assert_eq!(plan.count, 3);
        assert_eq!(plan.panel_width, 226.0);

        let plan = plan_gallery_columns(650.0, 10.0, 160.0, 320.0);
        assert_eq!(plan.count, 2);
        assert_eq!(plan.panel_width, 320.0);

        let plan = plan_gallery_columns(300.0, 10.0, 160.0, 320.0);
        assert_eq!(plan.count, 1);
        assert_eq!(plan.panel_width, 300.0);
    }

    #[test]
    fn gallery_backs_off_below_min_width() {
        // 2 cols -> 335 (> 320), 3 cols -> 220 (< 300): back off to 2
        let plan = plan_gallery_columns(680.0, 10.0, 300.0, 320.0);
        assert_eq!(plan.count, 2);
        assert_eq!(plan.panel_width, 335.0);
    }

    #[test]
    fn gallery_narrow_container_keeps_one_column() {
        let plan = plan_gallery_columns(100.0, 10.0, 160.0, 320.0);
        assert_eq!(plan.count, 1);
        assert_eq!(plan.panel_width, 100.0);
    }

    #[test]
    fn gallery_empty_container_has_no_columns() {
        assert_eq!(plan_gallery_columns(0.0, 10.0, 160.0, 320.0), GalleryColumns::NONE);
        assert_eq!(plan_gallery_columns(-1.0, 10.0, 160.0, 320.0), GalleryColumns::NONE);
    }

    #[test]
    fn gallery_search_matches_linear_scan() {
        for width in [161.0, 340.0, 700.0, 999.0, 1280.0, 1921.0, 4000.0] {
            for (spacing, max) in [(0.0, 160.0), (10.0, 320.0), (25.0, 200.0)] {
                let mut count = 1;
                while trial_width(width, spacing, count) > max {
                    count += 1;
                }
                assert_eq!(narrowest_fit(width, spacing, max), count, "{width} {spacing} {max}");
            }
        }
    }

    #[test]
    fn tiny_max_width_is_capped() {
        let plan = plan_gallery_columns(1.0e7, 0.0, 0.0, 0.001);
        assert_eq!(plan.count, MAX_GALLERY_COLUMNS);
        assert_eq!(plan.panel_width, (1.0e7_f32 / MAX_GALLERY_COLUMNS as f32).floor());
    }
}
