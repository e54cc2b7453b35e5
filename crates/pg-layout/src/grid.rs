// ABOUTME: Block-packing presentation grid.
// ABOUTME: Row-major first-fit placement of spanning panels with placeholder back-fill.

use pg_core::{GridSettings, Rect};
use serde::Serialize;

use crate::columns::plan_grid_columns;
use crate::engine::{LayoutEngine, LayoutSummary};
use crate::error::PanelError;
use crate::item::{GridItem, Sizing, Span};
use crate::matrix::BlockMatrix;
use crate::placement::{CellMetrics, CellPos};

/// What occupies a placed block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Occupant {
    /// Index into the span list handed to [`pack_grid`]
    Item(usize),
    /// Index among the placeholders generated by this pack
    Placeholder(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub occupant: Occupant,
    /// Sequence number of this placement within the pack
    pub order: usize,
    pub cell: CellPos,
    /// Span actually reserved, after clamping to the column count
    pub span: Span,
    pub frame: Rect,
}

/// Result of packing one span list. Placeholders are reported, not inserted
/// anywhere; the caller decides how to merge them with its own panels.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GridPack {
    pub columns: usize,
    pub grid_width: f32,
    pub height: f32,
    pub rows: usize,
    pub placements: Vec<Placement>,
    pub placeholders: usize,
}

impl GridPack {
    pub fn placed_items(&self) -> usize {
        self.placements.len() - self.placeholders
    }
}

/// Tallest block a single panel may reserve, in rows
pub const MAX_ROW_SPAN: usize = 256;

fn bounded_span(index: usize, span: Span) -> Span {
    if span.rows() <= MAX_ROW_SPAN {
        return span;
    }
    let err = PanelError::RowSpanTooTall {
        index,
        rows: span.rows(),
        max: MAX_ROW_SPAN,
    };
    tracing::warn!("{}", err);
    Span::new(span.columns(), MAX_ROW_SPAN)
}

/// Over-wide spans are clamped to the row only when tried at the left edge
fn effective_span(span: Span, column: usize, columns: usize) -> Span {
    if column == 0 {
        Span::new(span.columns().min(columns), span.rows())
    } else {
        span
    }
}

/// Pack `spans`, in order, into a grid of `columns` fixed-size cells.
///
/// Cells are scanned left to right, top to bottom. Each free cell takes the
/// first queued span that fits there; a free cell no queued span fits gets a
/// 1x1 placeholder. Scanning stops as soon as the queue is empty, so no
/// placeholders trail the last real panel. Row spans above [`MAX_ROW_SPAN`]
/// are clamped.
pub fn pack_grid(
    spans: &[Span],
    columns: usize,
    metrics: &CellMetrics,
    matrix: &mut BlockMatrix,
) -> GridPack {
    matrix.reset(columns);
    let mut pack = GridPack {
        columns,
        grid_width: crate::columns::grid_width(columns, metrics.panel_width, metrics.spacing),
        placements: Vec::with_capacity(spans.len()),
        ..GridPack::default()
    };
    if columns == 0 {
        pack.rows = matrix.rows();
        return pack;
    }

    let spans: Vec<Span> = spans
        .iter()
        .enumerate()
        .map(|(index, &span)| bounded_span(index, span))
        .collect();
    let mut queue: Vec<usize> = (0..spans.len()).collect();
    let mut row = 0;
    'rows: while !queue.is_empty() {
        if !matrix.ensure_rows(row) {
            tracing::warn!("Grid cannot grow past row {}, stopping the pass", row);
            break;
        }
        let mut column = 0;
        while column < columns && !queue.is_empty() {
            if matrix.is_filled(column, row) {
                column += 1;
                continue;
            }

            let candidate = queue.iter().enumerate().find_map(|(slot, &item)| {
                let span = effective_span(spans[item], column, columns);
                matrix
                    .fits(column, row, span.columns(), span.rows())
                    .then_some((slot, item, span))
            });
            let (occupant, span) = match candidate {
                Some((slot, item, span)) => {
                    queue.remove(slot);
                    (Occupant::Item(item), span)
                }
                None => {
                    let occupant = Occupant::Placeholder(pack.placeholders);
                    pack.placeholders += 1;
                    (occupant, Span::UNIT)
                }
            };

            let cell = CellPos::new(column, row);
            if !matrix.occupy(column, row, span.columns(), span.rows()) {
                tracing::warn!("Grid cannot hold a block at row {}, stopping the pass", row);
                break 'rows;
            }
            let frame = metrics.block_rect(cell, span);
            pack.height = pack.height.max(metrics.bottom_extent(&frame));
            pack.placements.push(Placement {
                occupant,
                order: pack.placements.len(),
                cell,
                span,
                frame,
            });
            column += span.columns();
        }
        row += 1;
    }

    pack.rows = matrix.rows();
    pack
}

/// Presentation grid engine. Owns the panel list; placeholders generated by a
/// pass are appended after the real panels and stripped again by the next pass.
#[derive(Debug)]
pub struct GridLayout<T> {
    settings: GridSettings,
    items: Vec<GridItem<T>>,
    placeholder_count: usize,
    matrix: BlockMatrix,
}

impl<T> GridLayout<T> {
    pub fn new(settings: GridSettings) -> Self {
        Self {
            settings,
            items: Vec::new(),
            placeholder_count: 0,
            matrix: BlockMatrix::default(),
        }
    }

    pub fn with_items(settings: GridSettings, items: Vec<GridItem<T>>) -> Self {
        let mut grid = Self::new(settings);
        grid.items = items;
        grid
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: GridSettings) {
        self.settings = settings;
    }

    /// All panels, placeholders from the last pass included
    pub fn items(&self) -> &[GridItem<T>] {
        &self.items
    }

    /// Real panels only
    pub fn panels(&self) -> &[GridItem<T>] {
        &self.items[..self.real_len()]
    }

    pub fn panels_mut(&mut self) -> &mut [GridItem<T>] {
        let len = self.real_len();
        &mut self.items[..len]
    }

    pub fn placeholder_count(&self) -> usize {
        self.placeholder_count
    }

    /// Add a panel after the existing real panels
    pub fn push(&mut self, item: GridItem<T>) {
        let at = self.real_len();
        self.items.insert(at, item);
    }

    /// Remove a real panel by list position
    pub fn remove(&mut self, position: usize) -> Option<GridItem<T>> {
        (position < self.real_len()).then(|| self.items.remove(position))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.placeholder_count = 0;
    }

    fn real_len(&self) -> usize {
        self.items.len() - self.placeholder_count
    }

    fn strip_placeholders(&mut self) {
        let len = self.real_len();
        self.items.truncate(len);
        self.placeholder_count = 0;
    }

    /// Run one pass and return the full pack, placeholders included
    pub fn pack(&mut self, container_width: f32) -> GridPack {
        self.strip_placeholders();

        let metrics = CellMetrics::from_settings(&self.settings);
        let plan = plan_grid_columns(
            container_width,
            self.settings.panel_width,
            self.settings.spacing,
            self.settings.max_columns,
        );
        let spans: Vec<Span> = self.items.iter().map(|item| item.span).collect();
        let pack = pack_grid(&spans, plan.count, &metrics, &mut self.matrix);

        let real_len = self.items.len();
        for placement in &pack.placements {
            match placement.occupant {
                Occupant::Item(position) => {
                    apply_placement(&mut self.items[position], position, placement);
                }
                Occupant::Placeholder(nth) => {
                    let mut filler = GridItem::placeholder(real_len + nth + 1);
                    apply_placement(&mut filler, real_len + nth, placement);
                    self.items.push(filler);
                }
            }
        }
        self.placeholder_count = pack.placeholders;

        tracing::debug!(
            "Grid pass: width={} columns={} placed={} placeholders={} height={}",
            container_width,
            pack.columns,
            pack.placed_items(),
            pack.placeholders,
            pack.height
        );
        pack
    }
}

fn apply_placement<T>(item: &mut GridItem<T>, position: usize, placement: &Placement) {
    item.index = placement.order;
    item.frame = Some(placement.frame);
    let reserved = placement.frame.size();
    item.content_size = Some(match &mut item.sizing {
        Sizing::Reserved => reserved,
        Sizing::Custom(sizer) => {
            let size = sizer.resize(reserved);
            if size.is_valid() {
                size
            } else {
                let err = PanelError::InvalidSize {
                    index: position,
                    width: size.width,
                    height: size.height,
                };
                tracing::warn!("{}, using its reserved block", err);
                reserved
            }
        }
    });
}

impl<T> LayoutEngine for GridLayout<T> {
    fn layout(&mut self, container_width: f32) -> LayoutSummary {
        let pack = self.pack(container_width);
        LayoutSummary {
            columns: pack.columns,
            content_width: pack.grid_width,
            height: pack.height,
            placed: pack.placed_items(),
            placeholders: pack.placeholders,
        }
    }

    fn panel_style_class(&self) -> Option<&str> {
        self.settings.panel_style_class.as_deref()
    }
}

impl<T> Default for GridLayout<T> {
    fn default() -> Self {
        Self::new(GridSettings::default())
    }
}
