// ABOUTME: Layout coordination between engines and the display surface.
// ABOUTME: Hosts, trigger registry, deferred first pass, and mounted views.

pub mod host;
pub mod scheduler;
pub mod triggers;
pub mod view;

pub use host::{ContainerId, LayoutHost, MemoryHost};
pub use scheduler::{DeferredQueue, DeferredTask, Scheduler, TaskId};
pub use triggers::{Subscription, Trigger, TriggerRegistry};
pub use view::{LayoutView, Responsive, ViewHandle};
