// ABOUTME: One-shot delayed tasks, used for the settle-then-layout first pass.
// ABOUTME: DeferredQueue runs tasks against a virtual clock the caller advances.

use std::fmt;
use std::time::Duration;

pub type DeferredTask = Box<dyn FnOnce()>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

pub trait Scheduler {
    /// Run `task` once, `delay` from now
    fn schedule(&mut self, delay: Duration, task: DeferredTask) -> TaskId;

    /// Drop a task that has not run yet. Returns false if it already ran.
    fn cancel(&mut self, id: TaskId) -> bool;
}

struct Pending {
    id: TaskId,
    due: Duration,
    task: DeferredTask,
}

/// Scheduler with a virtual clock. Nothing runs until `advance` moves time
/// past a task's due point; tasks due at the same instant run in scheduling order.
#[derive(Default)]
pub struct DeferredQueue {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Delay until the earliest pending task is due
    pub fn next_due(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| p.due.saturating_sub(self.now))
            .min()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Move the clock forward and run every task that came due, returning how many ran
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        self.now += elapsed;
        let mut ran = 0;
        while let Some(slot) = self.earliest_due() {
            let pending = self.pending.remove(slot);
            (pending.task)();
            ran += 1;
        }
        ran
    }

    fn earliest_due(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= self.now)
            .min_by_key(|(_, p)| (p.due, p.id.0))
            .map(|(slot, _)| slot)
    }
}

impl Scheduler for DeferredQueue {
    fn schedule(&mut self, delay: Duration, task: DeferredTask) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }
}

impl fmt::Debug for DeferredQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("now", &self.now)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> DeferredTask) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let make = move |name: &'static str| -> DeferredTask {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(name))
        };
        (log, make)
    }

    #[test]
    fn tasks_wait_for_their_delay() {
        let (log, task) = recorder();
        let mut queue = DeferredQueue::new();
        queue.schedule(Duration::from_millis(500), task("layout"));

        assert_eq!(queue.advance(Duration::from_millis(499)), 0);
        assert_eq!(queue.next_due(), Some(Duration::from_millis(1)));
        assert_eq!(queue.advance(Duration::from_millis(1)), 1);
        assert_eq!(*log.borrow(), vec!["layout"]);
        assert!(queue.is_empty());
        assert_eq!(queue.now(), Duration::from_millis(500));
    }

    #[test]
    fn due_tasks_run_in_time_then_schedule_order() {
        let (log, task) = recorder();
        let mut queue = DeferredQueue::new();
        queue.schedule(Duration::from_millis(300), task("late"));
        queue.schedule(Duration::from_millis(100), task("early"));
        queue.schedule(Duration::from_millis(100), task("early-second"));

        assert_eq!(queue.advance(Duration::from_secs(1)), 3);
        assert_eq!(*log.borrow(), vec!["early", "early-second", "late"]);
    }

    #[test]
    fn cancelled_tasks_never_run() {
        let (log, task) = recorder();
        let mut queue = DeferredQueue::new();
        let id = queue.schedule(Duration::from_millis(10), task("cancelled"));

        assert!(queue.cancel(id));
        assert!(!queue.cancel(id));
        assert_eq!(queue.advance(Duration::from_secs(1)), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(queue.next_due(), None);
    }
}
