/// Errors raised while establishing a cross-document channel.
///
/// Everything else that can go wrong here (a frame that has not loaded, an
/// endpoint that is not bound yet) is an expected timing condition and is
/// absorbed as an empty result or a no-op rather than an error.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// `establish` was called with the wildcard target origin.
    ///
    /// A live channel end is never transferred to an unrestricted origin;
    /// the call is rejected before any channel state is created or any
    /// message is posted.
    #[error("Unsecured targetOrigin")]
    UnsecuredOrigin,
}

pub type Result<T> = std::result::Result<T, ConnectError>;
