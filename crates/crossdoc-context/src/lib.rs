//! Execution contexts, broadcast events, and frame handles.
//!
//! This layer models the document runtime the connectors plug into: an
//! [`ExecutionContext`] is the window analog (an origin, a scheduler handle,
//! and a broadcast event source with revocable listeners), a
//! [`BroadcastEvent`] is a posted value plus its endpoint transfer list, and
//! a [`FrameHandle`] is the embedding document's view of a frame element that
//! may or may not have loaded yet.

pub mod context;
pub mod event;
pub mod frame;
pub mod listener;

pub use context::ExecutionContext;
pub use event::BroadcastEvent;
pub use frame::FrameHandle;
pub use listener::ListenerHandle;
