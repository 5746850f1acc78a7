use std::sync::Arc;

use crossdoc_channel::{decode_message, encode_message, Endpoint, Message};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{trace, warn};

type SharedHandler<T> = Arc<Mutex<dyn FnMut(Message<T>) + Send>>;

/// Single-slot subscription shared by both connector roles.
///
/// Exactly one handler is active at a time; `replace` swaps it, `clear`
/// empties it, and `dispatch` forwards to whatever occupies the slot at that
/// moment, or drops the message if nothing does.
pub(crate) struct HandlerSlot<T> {
    cell: Mutex<Option<SharedHandler<T>>>,
}

impl<T> HandlerSlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            cell: Mutex::new(None),
        }
    }

    pub(crate) fn replace(&self, handler: impl FnMut(Message<T>) + Send + 'static) {
        let handler: SharedHandler<T> = Arc::new(Mutex::new(handler));
        *self.cell.lock() = Some(handler);
    }

    pub(crate) fn clear(&self) {
        *self.cell.lock() = None;
    }

    pub(crate) fn dispatch(&self, message: Message<T>) {
        // Clone the handler out of the slot before calling so the handler may
        // re-subscribe or unsubscribe from inside its own invocation.
        let handler = self.cell.lock().clone();
        match handler {
            Some(handler) => (&mut *handler.lock())(message),
            None => trace!(msg_type = %message.msg_type, "no subscriber; message dropped"),
        }
    }
}

/// Post `message` on `endpoint` if one is bound; drop it silently otherwise.
///
/// Both connector roles route outbound traffic through here, so neither needs
/// its own null-safety guards and emitting before rendezvous never fails.
pub(crate) fn emit_on<T: Serialize>(endpoint: Option<&Endpoint>, message: &Message<T>) {
    let Some(endpoint) = endpoint else {
        trace!(msg_type = %message.msg_type, "no endpoint bound; message dropped");
        return;
    };
    match encode_message(message) {
        Ok(envelope) => endpoint.post(envelope),
        Err(error) => warn!(%error, "outbound message dropped"),
    }
}

/// Forward every inbound envelope on `endpoint` to `slot`.
///
/// Installed exactly once per bound endpoint; the subscription slot stays
/// independent of the endpoint binding, so a handler registered before or
/// after installation is honored for all subsequent deliveries.
pub(crate) fn install_relay<T>(endpoint: &Endpoint, slot: &Arc<HandlerSlot<T>>)
where
    T: DeserializeOwned + Send + 'static,
{
    let slot = Arc::clone(slot);
    endpoint.on_message(move |envelope| match decode_message::<T>(envelope) {
        Ok(message) => slot.dispatch(message),
        Err(error) => warn!(%error, "inbound envelope dropped"),
    });
}
