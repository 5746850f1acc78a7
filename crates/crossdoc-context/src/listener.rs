use std::sync::Weak;

use tracing::debug;

use crate::context::ContextShared;

/// Capability for removing a broadcast listener from its context.
///
/// The handle belongs to whoever installed the listener, and calling
/// [`revoke`](ListenerHandle::revoke) is the only way to deregister it —
/// dropping the handle leaves the listener in place.
pub struct ListenerHandle {
    context: Weak<ContextShared>,
    id: u64,
}

impl ListenerHandle {
    pub(crate) fn new(context: Weak<ContextShared>, id: u64) -> Self {
        Self { context, id }
    }

    /// Remove the listener from its context.
    ///
    /// A delivery that is already scheduled may still reach the listener;
    /// revocation only prevents it from being included in future deliveries.
    pub fn revoke(self) {
        if let Some(shared) = self.context.upgrade() {
            shared.listeners.lock().retain(|(id, _)| *id != self.id);
            debug!(id = self.id, origin = %shared.origin, "broadcast listener revoked");
        }
    }
}

impl std::fmt::Debug for ListenerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerHandle").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use crossdoc_queue::Scheduler;
    use serde_json::json;

    use crate::context::ExecutionContext;
    use crate::event::BroadcastEvent;

    #[test]
    fn revoke_after_context_is_gone_is_harmless() {
        let scheduler = Scheduler::new();
        let context = ExecutionContext::new(&scheduler, "https://app.example");
        let handle = context.add_listener(|_| {});
        drop(context);
        handle.revoke();
    }

    #[test]
    fn dropping_the_handle_keeps_the_listener() {
        let scheduler = Scheduler::new();
        let context = ExecutionContext::new(&scheduler, "https://app.example");
        let count = std::sync::Arc::new(parking_lot::Mutex::new(0));

        let listener_count = std::sync::Arc::clone(&count);
        drop(context.add_listener(move |_| *listener_count.lock() += 1));
        assert_eq!(context.listener_count(), 1);

        context.dispatch(BroadcastEvent::new(json!("connect"), Vec::new()));
        scheduler.run_until_idle();
        assert_eq!(*count.lock(), 1);
    }
}
