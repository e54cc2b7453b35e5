// ABOUTME: Layout coordination for one container.
// ABOUTME: Measures the host, runs the engine, writes sizes back, and reacts to triggers.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use pg_layout::{GalleryLayout, GridLayout, LayoutEngine, LayoutSummary};

use crate::host::{ContainerId, LayoutHost};
use crate::scheduler::{Scheduler, TaskId};
use crate::triggers::{Subscription, Trigger, TriggerRegistry};

/// Triggers an engine re-lays out on, besides explicit refreshes.
///
/// Listing `ContentChanged` makes content changes re-pack with the last
/// measured width instead of measuring the container again.
pub trait Responsive: LayoutEngine {
    const TRIGGERS: &'static [Trigger];
}

impl<T> Responsive for GridLayout<T> {
    const TRIGGERS: &'static [Trigger] = &[Trigger::Load, Trigger::Resize];
}

impl<T> Responsive for GalleryLayout<T> {
    const TRIGGERS: &'static [Trigger] = &[
        Trigger::Load,
        Trigger::Resize,
        Trigger::Scroll,
        Trigger::ContentChanged,
    ];
}

/// An engine bound to one container on one host
#[derive(Debug)]
pub struct LayoutView<E, H> {
    container: ContainerId,
    engine: E,
    host: H,
    last_width: Option<f32>,
    last_summary: Option<LayoutSummary>,
    passes: u64,
}

impl<E: LayoutEngine, H: LayoutHost> LayoutView<E, H> {
    pub fn new(container: ContainerId, engine: E, host: H) -> Self {
        Self {
            container,
            engine,
            host,
            last_width: None,
            last_summary: None,
            passes: 0,
        }
    }

    pub fn container(&self) -> ContainerId {
        self.container
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn panel_style_class(&self) -> Option<&str> {
        self.engine.panel_style_class()
    }

    pub fn last_summary(&self) -> Option<LayoutSummary> {
        self.last_summary
    }

    /// Number of passes run so far
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Measure the container and run a full pass
    pub fn refresh(&mut self) -> LayoutSummary {
        let width = self.host.container_width(self.container);
        self.run_pass(width)
    }

    /// Re-pack with the last measured width. Does nothing before the first
    /// pass or while the container has no width.
    pub fn relayout(&mut self) -> Option<LayoutSummary> {
        let width = self.last_width.filter(|width| *width > 0.0)?;
        Some(self.run_pass(width))
    }

    fn run_pass(&mut self, width: f32) -> LayoutSummary {
        let summary = self.engine.layout(width);
        self.host
            .write_content_width(self.container, summary.content_width);
        self.host
            .write_container_height(self.container, summary.height);
        self.last_width = Some(width);
        self.last_summary = Some(summary);
        self.passes += 1;
        tracing::debug!(
            "Container {:?} pass {}: {} columns, {} panels, height {}",
            self.container,
            self.passes,
            summary.columns,
            summary.placed,
            summary.height
        );
        summary
    }
}

impl<E: Responsive, H: LayoutHost> LayoutView<E, H> {
    /// React to an external trigger. Returns the pass summary if a pass ran.
    pub fn handle(&mut self, trigger: Trigger) -> Option<LayoutSummary> {
        match trigger {
            Trigger::Refresh => Some(self.refresh()),
            Trigger::ContentChanged if E::TRIGGERS.contains(&trigger) => self.relayout(),
            Trigger::ContentChanged => None,
            _ if E::TRIGGERS.contains(&trigger) => Some(self.refresh()),
            _ => None,
        }
    }
}

/// Passes never nest; a trigger arriving mid-pass is dropped
fn run_guarded<E, H, R>(
    view: &RefCell<LayoutView<E, H>>,
    pass: impl FnOnce(&mut LayoutView<E, H>) -> Option<R>,
) -> Option<R> {
    match view.try_borrow_mut() {
        Ok(mut view) => pass(&mut view),
        Err(_) => {
            tracing::warn!("Layout pass already running, coalescing trigger");
            None
        }
    }
}

/// A view mounted on a trigger registry, with its first pass scheduled
#[derive(Debug)]
pub struct ViewHandle<E, H> {
    view: Rc<RefCell<LayoutView<E, H>>>,
    subscription: Option<Subscription>,
    initial_pass: Option<TaskId>,
}

impl<E, H> ViewHandle<E, H>
where
    E: Responsive + 'static,
    H: LayoutHost + 'static,
{
    /// Subscribe `view` to its triggers and schedule the first pass after
    /// `load_delay`, giving the container time to reach its final width.
    pub fn mount(
        view: LayoutView<E, H>,
        triggers: &TriggerRegistry,
        scheduler: &mut dyn Scheduler,
        load_delay: Duration,
    ) -> Self {
        let view = Rc::new(RefCell::new(view));

        let mut kinds = E::TRIGGERS.to_vec();
        kinds.push(Trigger::Refresh);
        let weak = Rc::downgrade(&view);
        let subscription = triggers.subscribe(&kinds, move |trigger| {
            if let Some(view) = weak.upgrade() {
                run_guarded(&view, |view| view.handle(trigger));
            }
        });

        let weak = Rc::downgrade(&view);
        let initial_pass = scheduler.schedule(
            load_delay,
            Box::new(move || {
                if let Some(view) = weak.upgrade() {
                    run_guarded(&view, |view| Some(view.refresh()));
                }
            }),
        );

        Self {
            view,
            subscription: Some(subscription),
            initial_pass: Some(initial_pass),
        }
    }

    /// Run a pass now. Returns `None` if a pass is already running.
    pub fn refresh(&self) -> Option<LayoutSummary> {
        run_guarded(&self.view, |view| Some(view.refresh()))
    }

    /// Borrow the view, e.g. to edit panels or read frames.
    /// Returns `None` if a pass is already running.
    pub fn with<R>(&self, f: impl FnOnce(&mut LayoutView<E, H>) -> R) -> Option<R> {
        run_guarded(&self.view, |view| Some(f(view)))
    }

    /// Unsubscribe from triggers and cancel the first pass if it has not run
    pub fn dispose(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.dispose();
        }
        if let Some(task) = self.initial_pass.take() {
            scheduler.cancel(task);
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.subscription.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;
    use crate::scheduler::DeferredQueue;
    use pg_core::{GallerySettings, GridSettings, Size};
    use pg_layout::{GalleryItem, GridItem, Span};

    const CONTAINER: ContainerId = ContainerId(1);
    const DELAY: Duration = Duration::from_millis(500);

    fn grid_view(width: f32, panels: usize) -> LayoutView<GridLayout<usize>, MemoryHost> {
        let items = (0..panels).map(|i| GridItem::new(i, Span::UNIT)).collect();
        LayoutView::new(
            CONTAINER,
            GridLayout::with_items(GridSettings::default(), items),
            MemoryHost::with_width(CONTAINER, width),
        )
    }

    fn gallery_view(width: f32, panels: u32) -> LayoutView<GalleryLayout<u32>, MemoryHost> {
        let items = (0..panels)
            .map(|i| GalleryItem::new(i, Size::new(400.0, 300.0)))
            .collect();
        LayoutView::new(
            CONTAINER,
            GalleryLayout::with_items(GallerySettings::default(), items),
            MemoryHost::with_width(CONTAINER, width),
        )
    }

    #[test]
    fn refresh_writes_height_and_grid_width() {
        let mut view = grid_view(1030.0, 5);
        let summary = view.refresh();

        assert_eq!(summary.columns, 4);
        assert_eq!(view.host().height(CONTAINER), Some(510.0));
        assert_eq!(view.host().content_width(CONTAINER), Some(1010.0));
        assert_eq!(view.passes(), 1);
    }

    #[test]
    fn zero_width_container_gets_zero_height() {
        let mut view = grid_view(0.0, 3);
        let summary = view.refresh();

        assert_eq!(summary.columns, 0);
        assert_eq!(view.host().height(CONTAINER), Some(0.0));
    }

    #[test]
    fn grid_ignores_scroll_and_content_changes() {
        let mut view = grid_view(1030.0, 5);
        assert!(view.handle(Trigger::Scroll).is_none());
        assert!(view.handle(Trigger::ContentChanged).is_none());
        assert!(view.handle(Trigger::Resize).is_some());
        assert!(view.handle(Trigger::Refresh).is_some());
        assert_eq!(view.passes(), 2);
    }

    #[test]
    fn gallery_content_change_reuses_last_width() {
        let mut view = gallery_view(650.0, 3);
        assert!(view.handle(Trigger::ContentChanged).is_none());

        view.refresh();
        view.host_mut().set_width(CONTAINER, 1400.0);
        view.engine_mut()
            .push(GalleryItem::new(3, Size::new(400.0, 300.0)));

        let summary = view.handle(Trigger::ContentChanged);
        assert_eq!(summary.map(|s| s.columns), Some(2));
        assert_eq!(summary.map(|s| s.placed), Some(4));

        let summary = view.handle(Trigger::Scroll);
        assert_eq!(summary.map(|s| s.columns), Some(5));
    }

    #[test]
    fn first_pass_waits_for_load_delay() {
        let registry = TriggerRegistry::new();
        let mut queue = DeferredQueue::new();
        let handle = ViewHandle::mount(grid_view(1030.0, 5), &registry, &mut queue, DELAY);

        assert_eq!(handle.with(|view| view.passes()), Some(0));
        queue.advance(Duration::from_millis(499));
        assert_eq!(handle.with(|view| view.passes()), Some(0));
        queue.advance(Duration::from_millis(1));
        assert_eq!(handle.with(|view| view.host().height(CONTAINER)), Some(Some(510.0)));
    }

    #[test]
    fn registry_triggers_reach_mounted_view() {
        let registry = TriggerRegistry::new();
        let mut queue = DeferredQueue::new();
        let handle = ViewHandle::mount(grid_view(1030.0, 5), &registry, &mut queue, DELAY);

        handle.with(|view| view.host_mut().set_width(CONTAINER, 520.0));
        assert_eq!(registry.dispatch(Trigger::Resize), 1);
        assert_eq!(registry.dispatch(Trigger::Scroll), 0);

        let summary = handle.with(|view| view.last_summary()).flatten();
        assert_eq!(summary.map(|s| s.columns), Some(2));
        // 5 panels in 2 columns take 3 rows
        assert_eq!(summary.map(|s| s.height), Some(760.0));
    }

    #[test]
    fn dispose_stops_triggers_and_first_pass() {
        let registry = TriggerRegistry::new();
        let mut queue = DeferredQueue::new();
        let mut handle = ViewHandle::mount(gallery_view(650.0, 3), &registry, &mut queue, DELAY);

        handle.dispose(&mut queue);
        assert!(handle.is_disposed());
        assert!(registry.is_empty());
        assert!(queue.is_empty());
        assert_eq!(registry.dispatch(Trigger::Resize), 0);
        assert_eq!(handle.with(|view| view.passes()), Some(0));

        // explicit refresh still works on a disposed handle
        assert!(handle.refresh().is_some());
    }

    #[test]
    fn dropped_handle_makes_pending_pass_a_no_op() {
        let registry = TriggerRegistry::new();
        let mut queue = DeferredQueue::new();
        let handle = ViewHandle::mount(grid_view(1030.0, 5), &registry, &mut queue, DELAY);
        drop(handle);

        assert!(registry.is_empty());
        assert_eq!(queue.advance(DELAY), 1);
    }

    #[test]
    fn nested_pass_is_coalesced() {
        let registry = TriggerRegistry::new();
        let mut queue = DeferredQueue::new();
        let handle = ViewHandle::mount(grid_view(1030.0, 5), &registry, &mut queue, DELAY);

        let nested = handle.with(|_| handle.refresh());
        assert_eq!(nested, Some(None));
        assert_eq!(handle.with(|view| view.passes()), Some(0));
    }

    #[test]
    fn style_class_comes_from_settings() {
        let settings = GridSettings {
            panel_style_class: Some("card".to_string()),
            ..GridSettings::default()
        };
        let view: LayoutView<GridLayout<()>, _> =
            LayoutView::new(CONTAINER, GridLayout::new(settings), MemoryHost::new());
        assert_eq!(view.panel_style_class(), Some("card"));
    }
}
