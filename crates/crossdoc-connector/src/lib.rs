//! Host and target connectors for cross-document channels.
//!
//! This is the "just works" layer. The host side creates a channel, keeps one
//! end, and hands the other end to an embedded frame through a scoped
//! handshake post. The target side passively waits for that handshake,
//! captures the transferred end exactly once, and then both sides speak the
//! same `emit`/`subscribe`/`unsubscribe` interface.
//!
//! The two roles share no state; they rendezvous only through the
//! post-with-transfer mechanism, so either side may come up first and
//! messages sent before the channel is live degrade to no-ops instead of
//! failures.

pub mod error;
pub mod handshake;
pub mod host;
mod relay;
pub mod session;
pub mod target;

pub use error::{ConnectError, Result};
pub use handshake::{validate_target_origin, CONNECT_SENTINEL, WILDCARD_ORIGIN};
pub use host::{HostConnector, HostMessenger};
pub use session::TargetSession;
pub use target::TargetMessenger;
