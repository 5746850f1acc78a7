use std::sync::Arc;

use crossdoc_channel::{Endpoint, Message};
use crossdoc_context::{ExecutionContext, ListenerHandle};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace};

use crate::relay::{emit_on, install_relay, HandlerSlot};

struct TargetState<T> {
    endpoint: Mutex<Option<Endpoint>>,
    handler: Arc<HandlerSlot<T>>,
    listener: Mutex<Option<ListenerHandle>>,
}

/// Target-side messenger: the embedded document's end of the channel.
///
/// Attaching installs a passive listener on the context's broadcast source
/// and then waits. The first broadcast event carrying a transferred endpoint
/// binds it exactly once; endpoints arriving in later events are ignored.
/// Until then `emit` is a no-op and `subscribe` merely records the handler,
/// which is honored as soon as the endpoint attaches its relay.
///
/// Clones share the same capture state and subscription slot.
pub struct TargetMessenger<T> {
    state: Arc<TargetState<T>>,
}

impl<T> Clone for TargetMessenger<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> TargetMessenger<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    /// Install the passive handshake listener on `context` and return the
    /// messenger bound to whatever endpoint it eventually captures.
    ///
    /// Callers go through [`TargetSession`](crate::TargetSession), which
    /// guarantees this runs at most once per context.
    pub(crate) fn attach(context: &ExecutionContext) -> Self {
        let state = Arc::new(TargetState {
            endpoint: Mutex::new(None),
            handler: Arc::new(HandlerSlot::new()),
            listener: Mutex::new(None),
        });

        let capture = Arc::clone(&state);
        let handle = context.add_listener(move |event| {
            let mut bound = capture.endpoint.lock();
            if bound.is_some() {
                debug!("endpoint already bound; handshake event ignored");
                return;
            }
            // Any event carrying a transferred endpoint counts as the
            // handshake; the payload value is not inspected.
            let Some(endpoint) = event.take_endpoint() else {
                trace!("broadcast event without endpoints ignored");
                return;
            };
            install_relay(&endpoint, &capture.handler);
            *bound = Some(endpoint);
            debug!("target endpoint bound");
        });
        *state.listener.lock() = Some(handle);

        Self { state }
    }

    /// Post `message` to the host side. No-op before the endpoint is
    /// captured or after [`unsubscribe`](TargetMessenger::unsubscribe).
    pub fn emit(&self, message: Message<T>) {
        let endpoint = self.state.endpoint.lock();
        emit_on(endpoint.as_ref(), &message);
    }

    /// Register `handler` as the exclusive receiver for future inbound
    /// messages, replacing any previously registered handler. May be called
    /// before or after the endpoint is captured.
    pub fn subscribe(&self, handler: impl FnMut(Message<T>) + Send + 'static) {
        self.state.handler.replace(handler);
    }

    /// Detach: revoke the handshake listener and release the channel.
    ///
    /// No further capture or delivery occurs afterwards, even if another
    /// handshake-shaped event arrives; deliveries already scheduled may still
    /// fire. The remote side is not notified.
    pub fn unsubscribe(&self) {
        if let Some(handle) = self.state.listener.lock().take() {
            handle.revoke();
        }
        self.state.handler.clear();
        *self.state.endpoint.lock() = None;
        debug!("target connector detached");
    }
}

impl<T> std::fmt::Debug for TargetMessenger<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetMessenger")
            .field("bound", &self.state.endpoint.lock().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crossdoc_context::BroadcastEvent;
    use crossdoc_queue::Scheduler;
    use serde_json::json;

    use crate::handshake::handshake_envelope;

    use super::*;

    const TARGET_ORIGIN: &str = "https://frame.example";

    /// Deliver a handshake event into `context`, returning the host-side end
    /// of the transferred channel.
    fn deliver_handshake(context: &ExecutionContext) -> Endpoint {
        let (host_end, target_end) = Endpoint::pair(context.scheduler());
        context.dispatch(BroadcastEvent::new(handshake_envelope(), vec![target_end]));
        host_end
    }

    #[test]
    fn emit_before_capture_is_a_no_op() {
        let scheduler = Scheduler::new();
        let context = ExecutionContext::new(&scheduler, TARGET_ORIGIN);
        let messenger: TargetMessenger<String> = TargetMessenger::attach(&context);

        messenger.emit(Message::new("early", "nobody listens".to_string()));
        scheduler.run_until_idle();
    }

    #[test]
    fn subscribe_before_capture_is_honored_after_binding() {
        let scheduler = Scheduler::new();
        let context = ExecutionContext::new(&scheduler, TARGET_ORIGIN);
        let messenger: TargetMessenger<String> = TargetMessenger::attach(&context);

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        messenger.subscribe(move |message: Message<String>| sink.lock().push(message));

        let host_end = deliver_handshake(&context);
        scheduler.run_until_idle();

        host_end.post(json!({ "type": "greeting", "data": "hello" }));
        scheduler.run_until_idle();

        assert_eq!(
            *received.lock(),
            vec![Message::new("greeting", "hello".to_string())]
        );
    }

    #[test]
    fn late_subscription_sees_only_subsequent_messages() {
        let scheduler = Scheduler::new();
        let context = ExecutionContext::new(&scheduler, TARGET_ORIGIN);
        let messenger: TargetMessenger<String> = TargetMessenger::attach(&context);

        let host_end = deliver_handshake(&context);
        scheduler.run_until_idle();

        // Posted before any subscriber exists: dropped, not queued.
        host_end.post(json!({ "type": "missed", "data": "gone" }));
        scheduler.run_until_idle();

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        messenger.subscribe(move |message: Message<String>| sink.lock().push(message));

        host_end.post(json!({ "type": "caught", "data": "here" }));
        scheduler.run_until_idle();

        assert_eq!(
            *received.lock(),
            vec![Message::new("caught", "here".to_string())]
        );
    }

    #[test]
    fn only_the_first_transferred_endpoint_binds() {
        let scheduler = Scheduler::new();
        let context = ExecutionContext::new(&scheduler, TARGET_ORIGIN);
        let messenger: TargetMessenger<String> = TargetMessenger::attach(&context);

        let first_host_end = deliver_handshake(&context);
        let second_host_end = deliver_handshake(&context);
        scheduler.run_until_idle();

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        messenger.subscribe(move |message: Message<String>| sink.lock().push(message));

        first_host_end.post(json!({ "type": "from", "data": "first" }));
        second_host_end.post(json!({ "type": "from", "data": "second" }));
        scheduler.run_until_idle();

        assert_eq!(
            *received.lock(),
            vec![Message::new("from", "first".to_string())]
        );
    }

    #[test]
    fn emit_after_capture_reaches_the_host_end() {
        let scheduler = Scheduler::new();
        let context = ExecutionContext::new(&scheduler, TARGET_ORIGIN);
        let messenger: TargetMessenger<String> = TargetMessenger::attach(&context);

        let host_end = deliver_handshake(&context);
        scheduler.run_until_idle();

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        host_end.on_message(move |envelope| sink.lock().push(envelope));

        messenger.emit(Message::new("click", "inside frame".to_string()));
        messenger.emit(Message::new("click", "again".to_string()));
        scheduler.run_until_idle();

        assert_eq!(
            *received.lock(),
            vec![
                json!({ "type": "click", "data": "inside frame" }),
                json!({ "type": "click", "data": "again" }),
            ]
        );
    }

    #[test]
    fn unsubscribe_stops_capture_and_delivery() {
        let scheduler = Scheduler::new();
        let context = ExecutionContext::new(&scheduler, TARGET_ORIGIN);
        let messenger: TargetMessenger<String> = TargetMessenger::attach(&context);
        assert_eq!(context.listener_count(), 1);

        messenger.unsubscribe();
        assert_eq!(context.listener_count(), 0);

        // A handshake-shaped event arriving afterwards must not bind.
        let host_end = deliver_handshake(&context);
        scheduler.run_until_idle();

        let received = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&received);
        host_end.on_message(move |_| *sink.lock() += 1);

        messenger.emit(Message::new("void", "dropped".to_string()));
        scheduler.run_until_idle();
        assert_eq!(*received.lock(), 0);
    }

    #[test]
    fn unsubscribe_after_capture_silences_the_handler() {
        let scheduler = Scheduler::new();
        let context = ExecutionContext::new(&scheduler, TARGET_ORIGIN);
        let messenger: TargetMessenger<String> = TargetMessenger::attach(&context);

        let host_end = deliver_handshake(&context);
        scheduler.run_until_idle();

        let received = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&received);
        messenger.subscribe(move |_: Message<String>| *sink.lock() += 1);
        messenger.unsubscribe();

        host_end.post(json!({ "type": "after", "data": "detach" }));
        scheduler.run_until_idle();

        assert_eq!(*received.lock(), 0);
    }
}
