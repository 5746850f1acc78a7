use crossdoc_channel::{Endpoint, Envelope};
use tracing::debug;

use crate::context::ExecutionContext;
use crate::event::BroadcastEvent;

/// The embedding document's view of a frame element.
///
/// A frame is addressable only once its content document has loaded; until
/// then posts into it are dropped without error and callers retry at their
/// own pace.
pub struct FrameHandle {
    content: Option<ExecutionContext>,
}

impl FrameHandle {
    /// A frame whose content document has loaded and can receive posts.
    pub fn loaded(content: ExecutionContext) -> Self {
        Self {
            content: Some(content),
        }
    }

    /// A frame element whose content document has not loaded yet.
    pub fn detached() -> Self {
        Self { content: None }
    }

    /// The frame's content context, if it is addressable.
    pub fn content(&self) -> Option<&ExecutionContext> {
        self.content.as_ref()
    }

    /// Post `data` into the frame's content context, restricted to
    /// `target_origin`, transferring `endpoints` along with it.
    ///
    /// No-op if the frame is not addressable.
    pub fn post(&self, data: Envelope, target_origin: &str, endpoints: Vec<Endpoint>) {
        match &self.content {
            Some(context) => context.post_scoped(target_origin, BroadcastEvent::new(data, endpoints)),
            None => debug!(target_origin, "frame content not addressable; post dropped"),
        }
    }
}

impl std::fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHandle")
            .field("loaded", &self.content.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crossdoc_queue::Scheduler;
    use parking_lot::Mutex;
    use serde_json::json;

    use super::*;

    #[test]
    fn post_to_detached_frame_is_a_no_op() {
        let frame = FrameHandle::detached();
        assert!(frame.content().is_none());
        frame.post(json!("connect"), "https://frame.example", Vec::new());
    }

    #[test]
    fn post_to_loaded_frame_reaches_its_listeners() {
        let scheduler = Scheduler::new();
        let content = ExecutionContext::new(&scheduler, "https://frame.example");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let listener_seen = Arc::clone(&seen);
        let _handle = content.add_listener(move |event| {
            listener_seen
                .lock()
                .push((event.data().clone(), event.has_endpoints()));
        });

        let frame = FrameHandle::loaded(content);
        let (endpoint, _keep) = Endpoint::pair(&scheduler);
        frame.post(json!("connect"), "https://frame.example", vec![endpoint]);
        scheduler.run_until_idle();

        assert_eq!(*seen.lock(), vec![(json!("connect"), true)]);
    }

    #[test]
    fn post_scoped_to_wrong_origin_is_dropped() {
        let scheduler = Scheduler::new();
        let content = ExecutionContext::new(&scheduler, "https://frame.example");
        let count = Arc::new(Mutex::new(0));

        let listener_count = Arc::clone(&count);
        let _handle = content.add_listener(move |_| *listener_count.lock() += 1);

        let frame = FrameHandle::loaded(content);
        frame.post(json!("connect"), "https://evil.example", Vec::new());
        scheduler.run_until_idle();

        assert_eq!(*count.lock(), 0);
    }
}
