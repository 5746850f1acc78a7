use std::sync::Arc;

use crossdoc_channel::{Endpoint, Message};
use crossdoc_context::FrameHandle;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::handshake::{handshake_envelope, validate_target_origin};
use crate::relay::{emit_on, install_relay, HandlerSlot};

struct HostBinding<T> {
    endpoint: Mutex<Option<Endpoint>>,
    handler: Arc<HandlerSlot<T>>,
}

/// Host-side connector: originates channels and bridges them into frames the
/// host document embeds but does not control.
///
/// Each [`establish`](HostConnector::establish) call targets one frame/origin
/// pair with a fresh channel; the connector never reuses a channel across
/// calls.
pub struct HostConnector<T> {
    binding: Option<Arc<HostBinding<T>>>,
}

impl<T> HostConnector<T> {
    /// Create a connector with no channel established yet.
    pub fn new() -> Self {
        Self { binding: None }
    }
}

impl<T> Default for HostConnector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HostConnector<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    /// Create a channel, keep one end, and hand the other end to `frame`
    /// through a handshake post scoped to `target_origin`.
    ///
    /// Fails with [`ConnectError::UnsecuredOrigin`](crate::ConnectError) if
    /// `target_origin` is the wildcard — before any channel is created or
    /// anything is posted. Returns `Ok(None)` if the frame is absent or its
    /// content document is not addressable yet; that is a recoverable "not
    /// ready" condition the caller may retry, not an error.
    ///
    /// On success the previous channel, if any, is discarded and the returned
    /// messenger is bound to the new one.
    pub fn establish(
        &mut self,
        frame: Option<&FrameHandle>,
        target_origin: &str,
    ) -> Result<Option<HostMessenger<T>>> {
        validate_target_origin(target_origin)?;

        let Some(frame) = frame else {
            debug!(target_origin, "no frame element; channel not established");
            return Ok(None);
        };
        let Some(content) = frame.content() else {
            debug!(target_origin, "frame not addressable; channel not established");
            return Ok(None);
        };

        let (host_end, target_end) = Endpoint::pair(content.scheduler());
        let handler = Arc::new(HandlerSlot::new());
        install_relay(&host_end, &handler);
        frame.post(handshake_envelope(), target_origin, vec![target_end]);

        let binding = Arc::new(HostBinding {
            endpoint: Mutex::new(Some(host_end)),
            handler,
        });
        self.binding = Some(Arc::clone(&binding));
        debug!(target_origin, "host channel established");
        Ok(Some(HostMessenger { binding }))
    }
}

/// Host-side messenger interface, bound to one established channel.
///
/// Clones share the same channel binding and subscription slot.
pub struct HostMessenger<T> {
    binding: Arc<HostBinding<T>>,
}

impl<T> Clone for HostMessenger<T> {
    fn clone(&self) -> Self {
        Self {
            binding: Arc::clone(&self.binding),
        }
    }
}

impl<T> HostMessenger<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    /// Post `message` to the frame side. No-op if the channel has been
    /// released by [`unsubscribe`](HostMessenger::unsubscribe).
    pub fn emit(&self, message: Message<T>) {
        let endpoint = self.binding.endpoint.lock();
        emit_on(endpoint.as_ref(), &message);
    }

    /// Register `handler` as the exclusive receiver for future inbound
    /// messages, replacing any previously registered handler.
    pub fn subscribe(&self, handler: impl FnMut(Message<T>) + Send + 'static) {
        self.binding.handler.replace(handler);
    }

    /// Release the channel so no further delivery occurs through this
    /// messenger. The remote side is not notified and may keep emitting into
    /// the void.
    pub fn unsubscribe(&self) {
        *self.binding.endpoint.lock() = None;
        self.binding.handler.clear();
        debug!("host channel released");
    }
}

impl<T> std::fmt::Debug for HostMessenger<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostMessenger")
            .field("bound", &self.binding.endpoint.lock().is_some())
            .finish()
    }
}
