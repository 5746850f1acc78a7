use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crossdoc_queue::Scheduler;
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::event::BroadcastEvent;
use crate::listener::ListenerHandle;

pub(crate) type ListenerFn = Arc<Mutex<dyn FnMut(&mut BroadcastEvent) + Send>>;

pub(crate) struct ContextShared {
    pub(crate) origin: String,
    pub(crate) scheduler: Scheduler,
    pub(crate) listeners: Mutex<Vec<(u64, ListenerFn)>>,
    pub(crate) next_listener_id: AtomicU64,
}

/// A document execution context: the window analog.
///
/// A context carries the document's origin, a handle to the scheduler that
/// drives its deliveries, and the broadcast event source a passive connector
/// listens on. Cloning yields another handle to the same context.
#[derive(Clone)]
pub struct ExecutionContext {
    shared: Arc<ContextShared>,
}

impl ExecutionContext {
    /// Create a context for a document served from `origin`, driven by
    /// `scheduler`.
    pub fn new(scheduler: &Scheduler, origin: impl Into<String>) -> Self {
        Self {
            shared: Arc::new(ContextShared {
                origin: origin.into(),
                scheduler: scheduler.clone(),
                listeners: Mutex::new(Vec::new()),
                next_listener_id: AtomicU64::new(1),
            }),
        }
    }

    /// The origin this context's document is served from.
    pub fn origin(&self) -> &str {
        &self.shared.origin
    }

    /// The scheduler driving deliveries into this context.
    pub fn scheduler(&self) -> &Scheduler {
        &self.shared.scheduler
    }

    /// Register a broadcast listener.
    ///
    /// The returned [`ListenerHandle`] is the sole capability for removing
    /// the listener again; it belongs to whoever installed it.
    pub fn add_listener(
        &self,
        listener: impl FnMut(&mut BroadcastEvent) + Send + 'static,
    ) -> ListenerHandle {
        let id = self.shared.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let listener: ListenerFn = Arc::new(Mutex::new(listener));
        self.shared.listeners.lock().push((id, listener));
        debug!(id, origin = %self.shared.origin, "broadcast listener installed");
        ListenerHandle::new(Arc::downgrade(&self.shared), id)
    }

    /// Number of currently registered broadcast listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.listeners.lock().len()
    }

    /// Schedule delivery of `event` to this context's listeners.
    ///
    /// Listeners run in registration order and each sees the event after its
    /// predecessors, so an endpoint claimed by one listener is gone for the
    /// next. The listener set is snapshotted when the delivery runs.
    pub fn dispatch(&self, event: BroadcastEvent) {
        let shared = Arc::clone(&self.shared);
        self.shared.scheduler.schedule(move || {
            let listeners: Vec<ListenerFn> = shared
                .listeners
                .lock()
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect();
            let mut event = event;
            for listener in listeners {
                (&mut *listener.lock())(&mut event);
            }
        });
    }

    /// Deliver `event` only if this context's document is served from
    /// `target_origin`; drop it otherwise.
    ///
    /// This is the receiver-side origin check of a scoped cross-context post.
    pub fn post_scoped(&self, target_origin: &str, event: BroadcastEvent) {
        if self.shared.origin != target_origin {
            warn!(
                origin = %self.shared.origin,
                target_origin,
                "scoped post does not match context origin; event dropped"
            );
            return;
        }
        self.dispatch(event);
    }
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("origin", &self.shared.origin)
            .field("listeners", &self.listener_count())
            .finish()
    }
}
