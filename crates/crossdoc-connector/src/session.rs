use std::sync::OnceLock;

use crossdoc_context::ExecutionContext;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::target::TargetMessenger;

/// Target-side session: owns the one connector an embedded document runs.
///
/// A session is constructed once at a well-defined entry point and passed by
/// reference to whatever needs the messenger. The passive handshake listener
/// is installed lazily, on the first [`messenger`](TargetSession::messenger)
/// call, and exactly once: re-entrant or racing first calls converge on the
/// same connector instead of installing a second listener, which would
/// double-capture or race on endpoint binding.
pub struct TargetSession<T> {
    context: ExecutionContext,
    messenger: OnceLock<TargetMessenger<T>>,
}

impl<T> TargetSession<T>
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    /// Create the session for `context` without installing anything yet.
    pub fn new(context: ExecutionContext) -> Self {
        Self {
            context,
            messenger: OnceLock::new(),
        }
    }

    /// The session's messenger, wiring the handshake listener on first
    /// access. Every call returns a handle to the same connector.
    pub fn messenger(&self) -> TargetMessenger<T> {
        self.messenger
            .get_or_init(|| TargetMessenger::attach(&self.context))
            .clone()
    }

    /// The execution context this session is attached to.
    pub fn context(&self) -> &ExecutionContext {
        &self.context
    }
}

impl<T> std::fmt::Debug for TargetSession<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetSession")
            .field("origin", &self.context.origin())
            .field("wired", &self.messenger.get().is_some())
            .finish()
    }
}
