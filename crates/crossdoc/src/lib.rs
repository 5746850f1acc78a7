//! Cross-document messaging over transferable channel endpoints.
//!
//! crossdoc establishes a bidirectional message channel between a host
//! document and an embedded frame document it does not control (potentially
//! cross-origin). The host creates an entangled endpoint pair, keeps one end,
//! and transfers the other into the frame through a single origin-scoped
//! handshake post; the frame side passively captures its end and both sides
//! then speak the same `emit`/`subscribe`/`unsubscribe` interface.
//!
//! # Crate Structure
//!
//! - [`queue`] — FIFO task scheduling (the injected event-loop stand-in)
//! - [`channel`] — Entangled endpoint pairs and the typed message envelope
//! - [`context`] — Execution contexts, broadcast events, and frame handles
//! - [`connector`] — Host/target connectors (behind the `connector` feature)

/// Re-export scheduling types.
pub mod queue {
    pub use crossdoc_queue::*;
}

/// Re-export channel types.
pub mod channel {
    pub use crossdoc_channel::*;
}

/// Re-export execution-context types.
pub mod context {
    pub use crossdoc_context::*;
}

/// Re-export connector types (requires `connector` feature).
#[cfg(feature = "connector")]
pub mod connector {
    pub use crossdoc_connector::*;
}
