use std::sync::Arc;

use crossdoc_queue::Scheduler;
use parking_lot::Mutex;
use tracing::trace;

use crate::message::Envelope;

type InboundHandler = Arc<Mutex<dyn FnMut(Envelope) + Send>>;

#[derive(Default)]
struct PortState {
    handler: Mutex<Option<InboundHandler>>,
}

/// One side of an entangled channel pair.
///
/// An envelope posted here is delivered to the handler registered on the
/// paired endpoint, in post order. Delivery is always deferred through the
/// pair's [`Scheduler`]; `post` itself never invokes a handler.
///
/// `Endpoint` is not `Clone`: exactly one owner can use a given side at a
/// time, and moving the value into another execution context is the
/// ownership transfer.
pub struct Endpoint {
    local: Arc<PortState>,
    peer: Arc<PortState>,
    scheduler: Scheduler,
}

impl Endpoint {
    /// Create a linked pair of endpoints sharing the given scheduler.
    pub fn pair(scheduler: &Scheduler) -> (Endpoint, Endpoint) {
        let first = Arc::new(PortState::default());
        let second = Arc::new(PortState::default());
        (
            Endpoint {
                local: Arc::clone(&first),
                peer: Arc::clone(&second),
                scheduler: scheduler.clone(),
            },
            Endpoint {
                local: second,
                peer: first,
                scheduler: scheduler.clone(),
            },
        )
    }

    /// Schedule delivery of `envelope` to the paired endpoint's handler.
    ///
    /// If the peer has no handler registered when the delivery runs, the
    /// envelope is dropped, not queued.
    pub fn post(&self, envelope: Envelope) {
        let peer = Arc::clone(&self.peer);
        self.scheduler.schedule(move || {
            // Clone the handler out of the slot so the call happens without
            // holding the slot lock; the handler may re-register itself.
            let handler = peer.handler.lock().clone();
            match handler {
                Some(handler) => (&mut *handler.lock())(envelope),
                None => trace!("no handler on paired endpoint; envelope dropped"),
            }
        });
    }

    /// Register the single inbound handler for this side, replacing any
    /// previously registered handler.
    pub fn on_message(&self, handler: impl FnMut(Envelope) + Send + 'static) {
        let handler: InboundHandler = Arc::new(Mutex::new(handler));
        *self.local.handler.lock() = Some(handler);
    }

    /// Remove this side's inbound handler. Envelopes dispatched afterwards
    /// are dropped.
    pub fn clear_handler(&self) {
        *self.local.handler.lock() = None;
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("handler_bound", &self.local.handler.lock().is_some())
            .finish()
    }
}
