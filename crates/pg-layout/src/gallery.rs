// ABOUTME: Masonry gallery packing.
// ABOUTME: Uniform-width columns, each panel dropped into the currently shortest column.

use pg_core::{GallerySettings, Rect, Size};
use serde::Serialize;

use crate::columns::{plan_gallery_columns, GalleryColumns};
use crate::engine::{LayoutEngine, LayoutSummary};
use crate::error::PanelError;
use crate::item::{GalleryFit, GalleryItem};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnHeight {
    pub column: usize,
    pub height: f32,
}

/// Accumulated height per column for the current pass
#[derive(Debug, Clone, Default)]
pub struct ColumnHeights {
    columns: Vec<ColumnHeight>,
}

impl ColumnHeights {
    pub fn reset(&mut self, count: usize) {
        self.columns.clear();
        self.columns.extend((0..count).map(|column| ColumnHeight {
            column,
            height: 0.0,
        }));
    }

    /// Shortest column, ties going to the lower column index
    pub fn shortest_mut(&mut self) -> Option<&mut ColumnHeight> {
        self.columns.sort_by(|a, b| {
            a.height
                .total_cmp(&b.height)
                .then(a.column.cmp(&b.column))
        });
        self.columns.first_mut()
    }

    pub fn tallest(&self) -> f32 {
        self.columns
            .iter()
            .map(|c| c.height)
            .fold(0.0, f32::max)
    }

    /// Heights in column order
    pub fn heights(&self) -> Vec<f32> {
        let mut heights = vec![0.0; self.columns.len()];
        for c in &self.columns {
            heights[c.column] = c.height;
        }
        heights
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GalleryPlacement {
    /// Position of the panel in the gallery list
    pub item: usize,
    pub column: usize,
    pub frame: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GalleryPack {
    pub columns: GalleryColumns,
    pub height: f32,
    pub placements: Vec<GalleryPlacement>,
    /// Panels whose sizer failed and kept their previous frame
    pub skipped: usize,
}

fn natural_size(position: usize, natural: Size, panel_width: f32) -> Size {
    let usable = natural.width.is_finite()
        && natural.height.is_finite()
        && natural.width > 0.0
        && natural.height > 0.0;
    if !usable {
        let err = PanelError::NonPositiveIntrinsic {
            index: position,
            width: natural.width,
            height: natural.height,
        };
        tracing::warn!("{}, laying it out with zero height", err);
        return Size::new(panel_width, 0.0);
    }
    Size::new(
        panel_width,
        (natural.height * panel_width / natural.width).floor(),
    )
}

/// Place `items` in order, each at the bottom of the shortest column.
///
/// Every panel's `index` is set to its list position. Panels are written in
/// place; a panel whose custom sizer returns an unusable size keeps its old
/// frame and does not affect column heights.
pub fn pack_gallery<T>(
    items: &mut [GalleryItem<T>],
    plan: GalleryColumns,
    spacing: f32,
    tracker: &mut ColumnHeights,
) -> GalleryPack {
    tracker.reset(plan.count);
    let mut pack = GalleryPack {
        columns: plan,
        height: 0.0,
        placements: Vec::with_capacity(items.len()),
        skipped: 0,
    };
    if plan.count == 0 {
        return pack;
    }

    let panel_width = plan.panel_width;
    for (position, item) in items.iter_mut().enumerate() {
        item.index = position;
        let size = match &mut item.fit {
            GalleryFit::Natural(natural) => natural_size(position, *natural, panel_width),
            GalleryFit::Custom(sizer) => {
                let size = sizer.resize(Size::new(panel_width, 0.0));
                if !size.is_valid() {
                    let err = PanelError::InvalidSize {
                        index: position,
                        width: size.width,
                        height: size.height,
                    };
                    tracing::warn!("{}, leaving it in place", err);
                    pack.skipped += 1;
                    continue;
                }
                size
            }
        };

        let Some(column) = tracker.shortest_mut() else {
            break;
        };
        let frame = Rect::new(
            column.column as f32 * (panel_width + spacing),
            column.height,
            size.width,
            size.height,
        );
        column.height += size.height + spacing;
        pack.height = pack.height.max(column.height);

        item.frame = Some(frame);
        pack.placements.push(GalleryPlacement {
            item: position,
            column: column.column,
            frame,
        });
    }

    pack
}

/// Masonry gallery engine owning its panel list
#[derive(Debug)]
pub struct GalleryLayout<T> {
    settings: GallerySettings,
    items: Vec<GalleryItem<T>>,
    tracker: ColumnHeights,
}

impl<T> GalleryLayout<T> {
    pub fn new(settings: GallerySettings) -> Self {
        Self {
            settings,
            items: Vec::new(),
            tracker: ColumnHeights::default(),
        }
    }

    pub fn with_items(settings: GallerySettings, items: Vec<GalleryItem<T>>) -> Self {
        let mut gallery = Self::new(settings);
        gallery.items = items;
        gallery
    }

    pub fn settings(&self) -> &GallerySettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: GallerySettings) {
        self.settings = settings;
    }

    pub fn items(&self) -> &[GalleryItem<T>] {
        &self.items
    }

    pub fn items_mut(&mut self) -> &mut [GalleryItem<T>] {
        &mut self.items
    }

    pub fn push(&mut self, item: GalleryItem<T>) {
        self.items.push(item);
    }

    pub fn remove(&mut self, position: usize) -> Option<GalleryItem<T>> {
        (position < self.items.len()).then(|| self.items.remove(position))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Column heights left by the most recent pass, in column order
    pub fn column_heights(&self) -> Vec<f32> {
        self.tracker.heights()
    }

    pub fn pack(&mut self, container_width: f32) -> GalleryPack {
        let plan = plan_gallery_columns(
            container_width,
            self.settings.spacing,
            self.settings.min_panel_width,
            self.settings.max_panel_width,
        );
        let pack = pack_gallery(&mut self.items, plan, self.settings.spacing, &mut self.tracker);
        tracing::debug!(
            "Gallery pass: width={} columns={} panel_width={} placed={} height={}",
            container_width,
            plan.count,
            plan.panel_width,
            pack.placements.len(),
            pack.height
        );
        pack
    }
}

impl<T> LayoutEngine for GalleryLayout<T> {
    fn layout(&mut self, container_width: f32) -> LayoutSummary {
        let pack = self.pack(container_width);
        let count = pack.columns.count;
        let content_width = if count == 0 {
            0.0
        } else {
            count as f32 * pack.columns.panel_width + (count - 1) as f32 * self.settings.spacing
        };
        LayoutSummary {
            columns: count,
            content_width,
            height: pack.height,
            placed: pack.placements.len(),
            placeholders: 0,
        }
    }

    fn panel_style_class(&self) -> Option<&str> {
        self.settings.panel_style_class.as_deref()
    }
}

impl<T> Default for GalleryLayout<T> {
    fn default() -> Self {
        Self::new(GallerySettings::default())
    }
}
