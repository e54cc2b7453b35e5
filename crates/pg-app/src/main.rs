// ABOUTME: Command-line entry point.
// ABOUTME: Lays out a scene file headlessly and prints each pass as JSON lines.

mod scene;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use pg_core::{LayoutConfig, Rect};
use pg_layout::{GalleryLayout, GridLayout, LayoutSummary, PanelContent};
use pg_view::{
    ContainerId, DeferredQueue, LayoutView, MemoryHost, Responsive, Trigger, TriggerRegistry,
    ViewHandle,
};
use serde::Serialize;

use scene::{Scene, Variant};

const CONTAINER: ContainerId = ContainerId(0);

#[derive(Debug, Serialize)]
struct PanelReport {
    id: String,
    index: usize,
    placeholder: bool,
    frame: Option<Rect>,
}

#[derive(Debug, Serialize)]
struct PassReport<'a> {
    width: f32,
    style_class: Option<&'a str>,
    summary: LayoutSummary,
    panels: Vec<PanelReport>,
}

fn grid_panels(view: &LayoutView<GridLayout<String>, MemoryHost>) -> Vec<PanelReport> {
    view.engine()
        .items()
        .iter()
        .map(|item| PanelReport {
            id: match &item.content {
                PanelContent::Panel(id) => id.clone(),
                PanelContent::Placeholder { id, .. } => format!("#{id}"),
            },
            index: item.index,
            placeholder: item.is_placeholder(),
            frame: item.frame,
        })
        .collect()
}

fn gallery_panels(view: &LayoutView<GalleryLayout<String>, MemoryHost>) -> Vec<PanelReport> {
    view.engine()
        .items()
        .iter()
        .map(|item| PanelReport {
            id: item.payload.clone(),
            index: item.index,
            placeholder: false,
            frame: item.frame,
        })
        .collect()
}

fn print_pass<E: Responsive>(
    view: &LayoutView<E, MemoryHost>,
    width: f32,
    panels: Vec<PanelReport>,
) -> Result<()> {
    let Some(summary) = view.last_summary() else {
        tracing::warn!("No pass has run for width {}", width);
        return Ok(());
    };
    let report = PassReport {
        width,
        style_class: view.panel_style_class(),
        summary,
        panels,
    };
    println!("{}", serde_json::to_string(&report)?);
    Ok(())
}

/// Mount the view, wait out the load delay for the first pass, then replay
/// every remaining width as a resize
async fn drive<E>(
    view: LayoutView<E, MemoryHost>,
    widths: &[f32],
    load_delay: Duration,
    panels: fn(&LayoutView<E, MemoryHost>) -> Vec<PanelReport>,
) -> Result<()>
where
    E: Responsive + 'static,
{
    let triggers = TriggerRegistry::new();
    let mut queue = DeferredQueue::new();
    let mut handle = ViewHandle::mount(view, &triggers, &mut queue, load_delay);

    while let Some(due) = queue.next_due() {
        tokio::time::sleep(due).await;
        queue.advance(due);
    }

    for (step, &width) in widths.iter().enumerate() {
        if step > 0 {
            handle.with(|view| view.host_mut().set_width(CONTAINER, width));
            triggers.dispatch(Trigger::Resize);
        }
        handle
            .with(|view| print_pass(view, width, panels(view)))
            .context("Layout view is busy")??;
    }

    handle.dispose(&mut queue);
    Ok(())
}

fn scene_path() -> Result<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("Usage: panelgrid <scene.toml>")
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting panelgrid");

    let path = scene_path()?;
    let scene = Scene::load(&path)?;
    let config = scene.settings(LayoutConfig::load_or_default())?;
    let host = MemoryHost::with_width(CONTAINER, scene.initial_width()?);
    tracing::info!(
        "Loaded scene {}: {:?} with {} panels, {} widths",
        path.display(),
        scene.variant,
        scene.panels.len(),
        scene.widths.len()
    );

    match scene.variant {
        Variant::Grid => {
            let delay = config.grid.load_delay();
            let engine = GridLayout::with_items(config.grid, scene.grid_items());
            let view = LayoutView::new(CONTAINER, engine, host);
            drive(view, &scene.widths, delay, grid_panels).await
        }
        Variant::Gallery => {
            let delay = config.gallery.load_delay();
            let engine = GalleryLayout::with_items(config.gallery, scene.gallery_items());
            let view = LayoutView::new(CONTAINER, engine, host);
            drive(view, &scene.widths, delay, gallery_panels).await
        }
    }
}
