/// Errors that can occur at the channel's serialization boundary.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// A typed message could not be encoded into an envelope.
    #[error("failed to encode message of type '{msg_type}': {source}")]
    Encode {
        msg_type: String,
        source: serde_json::Error,
    },

    /// An inbound envelope could not be decoded into the expected message type.
    #[error("failed to decode inbound envelope: {0}")]
    Decode(serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;
