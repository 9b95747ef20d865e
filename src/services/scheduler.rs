//! Deferred task scheduling for the restore timeline.
//!
//! A restore schedules two independent tasks (placeholder clear and scroll
//! apply). Neither waits on the other; once scheduled a task always runs.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::debug;
use tokio::runtime::Handle;

/// A fire-and-forget callback.
pub type DeferredTask = Box<dyn FnOnce() + Send + 'static>;

/// Trait defining a cooperative timer facility.
pub trait TaskScheduler: Send + Sync {
    /// Runs `task` once `delay` has elapsed. There is no cancellation.
    fn schedule(&self, delay: Duration, task: DeferredTask);
}

/// Scheduler that spawns each task onto a tokio runtime after a `sleep`.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Uses the runtime of the calling context, if there is one.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }
}

impl TaskScheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: DeferredTask) {
        debug!("[SCHED] spawning task due in {:?}", delay);
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    task: DeferredTask,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    queue: Vec<Pending>,
}

/// Single-threaded scheduler driven by a virtual clock.
///
/// Nothing runs until [`ManualScheduler::advance`] moves the clock. Tasks due
/// at the same instant run in scheduling order.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.state().now
    }

    /// Number of tasks not yet run.
    pub fn pending(&self) -> usize {
        self.state().queue.len()
    }

    /// Moves the clock forward by `by`, running every task that falls due,
    /// including tasks scheduled by tasks run during this call.
    pub fn advance(&self, by: Duration) {
        let target = self.state().now + by;
        while let Some(task) = self.pop_due(target) {
            task();
        }
        let mut state = self.state();
        if state.now < target {
            state.now = target;
        }
    }

    /// Advances until the queue is empty.
    pub fn run_until_idle(&self) {
        loop {
            let latest = {
                let state = self.state();
                match state.queue.iter().map(|p| p.due).max() {
                    Some(due) => due.saturating_sub(state.now),
                    None => return,
                }
            };
            self.advance(latest);
        }
    }

    fn pop_due(&self, target: Duration) -> Option<DeferredTask> {
        let mut state = self.state();
        let index = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= target)
            .min_by_key(|(_, p)| (p.due, p.seq))
            .map(|(i, _)| i)?;
        let pending = state.queue.swap_remove(index);
        state.now = pending.due;
        Some(pending.task)
    }
}

impl TaskScheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: DeferredTask) {
        let mut state = self.state();
        let due = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        debug!("[SCHED] task {} due at {:?}", seq, due);
        state.queue.push(Pending { due, seq, task });
    }
}
