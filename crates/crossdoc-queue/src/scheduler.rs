use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

type Task = Box<dyn FnOnce() + Send + 'static>;

/// Shared FIFO task queue standing in for a document runtime's event loop.
///
/// Cloning a `Scheduler` yields another handle to the same queue. Tasks are
/// never run inline by [`schedule`](Scheduler::schedule); they run only when
/// a caller drives the queue with [`run_until_idle`](Scheduler::run_until_idle)
/// or [`step`](Scheduler::step), in exact enqueue order. Tasks enqueued while
/// the queue is being drained run in the same pass.
#[derive(Clone, Default)]
pub struct Scheduler {
    queue: Arc<Mutex<VecDeque<Task>>>,
}

impl Scheduler {
    /// Create a scheduler with an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a task for later dispatch.
    pub fn schedule(&self, task: impl FnOnce() + Send + 'static) {
        self.queue.lock().push_back(Box::new(task));
    }

    /// Dispatch at most one queued task. Returns `false` if the queue was empty.
    pub fn step(&self) -> bool {
        // The lock is released before the task runs so a task may schedule
        // follow-up work on the same queue.
        let task = self.queue.lock().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Dispatch queued tasks in FIFO order until the queue is empty,
    /// including tasks enqueued by tasks run in this pass.
    ///
    /// Returns the number of tasks dispatched.
    pub fn run_until_idle(&self) -> usize {
        let mut dispatched = 0;
        while self.step() {
            dispatched += 1;
        }
        trace!(dispatched, "scheduler drained");
        dispatched
    }

    /// Number of tasks currently queued.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("pending", &self.pending())
            .finish()
    }
}
