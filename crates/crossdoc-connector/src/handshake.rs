use crossdoc_channel::Envelope;

use crate::error::{ConnectError, Result};

/// Sentinel payload carried by the handshake post.
///
/// The target side never inspects it; any broadcast event carrying a
/// transferred endpoint is treated as the handshake. A fixed value keeps the
/// wire traffic recognizable in logs.
pub const CONNECT_SENTINEL: &str = "connect";

/// The wildcard origin accepted by browser-style post calls.
pub const WILDCARD_ORIGIN: &str = "*";

/// Reject wildcard target origins.
///
/// Called before any channel state exists, so a rejected call has no side
/// effects whatsoever.
pub fn validate_target_origin(target_origin: &str) -> Result<()> {
    if target_origin == WILDCARD_ORIGIN {
        return Err(ConnectError::UnsecuredOrigin);
    }
    Ok(())
}

/// The envelope posted alongside the transferred endpoint.
pub(crate) fn handshake_envelope() -> Envelope {
    Envelope::from(CONNECT_SENTINEL)
}
