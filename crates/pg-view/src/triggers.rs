// ABOUTME: Observer registry for layout-triggering events.
// ABOUTME: Listeners subscribe per trigger kind and unregister by disposing their subscription.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// External events that can start a layout pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    /// Container finished loading
    Load,
    Resize,
    Scroll,
    /// The panel list changed without the container changing
    ContentChanged,
    /// Explicit refresh request
    Refresh,
}

type Listener = Rc<RefCell<dyn FnMut(Trigger)>>;

struct Registration {
    id: u64,
    kinds: Vec<Trigger>,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    registrations: Vec<Registration>,
}

/// Shared dispatcher. Clones refer to the same registry.
#[derive(Clone, Default)]
pub struct TriggerRegistry {
    inner: Rc<RefCell<Registry>>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for the given trigger kinds. The registration lasts
    /// until the returned subscription is disposed or dropped.
    pub fn subscribe(
        &self,
        kinds: &[Trigger],
        listener: impl FnMut(Trigger) + 'static,
    ) -> Subscription {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        let listener: Listener = Rc::new(RefCell::new(listener));
        registry.registrations.push(Registration {
            id,
            kinds: kinds.to_vec(),
            listener,
        });
        Subscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Notify every listener registered for `trigger`, returning how many ran.
    ///
    /// Listeners may subscribe or dispose while being notified; a listener that
    /// is already running when the same trigger arrives again is skipped.
    pub fn dispatch(&self, trigger: Trigger) -> usize {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .registrations
            .iter()
            .filter(|r| r.kinds.contains(&trigger))
            .map(|r| Rc::clone(&r.listener))
            .collect();

        let mut notified = 0;
        for listener in listeners {
            match listener.try_borrow_mut() {
                Ok(mut listener) => {
                    (&mut *listener)(trigger);
                    notified += 1;
                }
                Err(_) => tracing::warn!("Skipping re-entrant {:?} notification", trigger),
            }
        }
        notified
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for TriggerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerRegistry")
            .field("registrations", &self.len())
            .finish()
    }
}

/// Handle to one registration
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    /// Remove the registration. Safe to call more than once.
    pub fn dispose(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .registrations
                .retain(|r| r.id != self.id);
        }
        self.registry = Weak::new();
    }

    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.borrow().registrations.iter().any(|r| r.id == self.id))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}
