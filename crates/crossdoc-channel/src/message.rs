use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ChannelError, Result};

/// Wire form of a payload crossing a channel — the structured-clone analog.
///
/// Envelopes are transported verbatim; nothing between `emit` and the
/// receiving handler looks inside one.
pub type Envelope = serde_json::Value;

/// An application message: an opaque discriminator plus a typed payload.
///
/// Both sides must agree out-of-band on meaningful `type` values and payload
/// shapes; this layer never interprets either.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<T> {
    /// Application-chosen message discriminator.
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Application payload, transported verbatim.
    pub data: T,
}

impl<T> Message<T> {
    /// Create a message with the given discriminator and payload.
    pub fn new(msg_type: impl Into<String>, data: T) -> Self {
        Self {
            msg_type: msg_type.into(),
            data,
        }
    }
}

/// Encode a typed message into its wire envelope.
pub fn encode_message<T: Serialize>(message: &Message<T>) -> Result<Envelope> {
    serde_json::to_value(message).map_err(|source| ChannelError::Encode {
        msg_type: message.msg_type.clone(),
        source,
    })
}

/// Decode a wire envelope back into a typed message.
pub fn decode_message<T: DeserializeOwned>(envelope: Envelope) -> Result<Message<T>> {
    serde_json::from_value(envelope).map_err(ChannelError::Decode)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn encode_uses_type_field_name() {
        let message = Message::new("foo", "bar");
        let envelope = encode_message(&message).expect("message should encode");
        assert_eq!(envelope, json!({ "type": "foo", "data": "bar" }));
    }

    #[test]
    fn decode_round_trips_structured_data() {
        #[derive(Debug, PartialEq, Serialize, Deserialize)]
        struct Payload {
            clicked: bool,
            count: u32,
        }

        let message = Message::new(
            "ui-event",
            Payload {
                clicked: true,
                count: 3,
            },
        );
        let envelope = encode_message(&message).expect("message should encode");
        let decoded: Message<Payload> = decode_message(envelope).expect("envelope should decode");
        assert_eq!(decoded, message);
    }

    #[test]
    fn decode_rejects_mismatched_shape() {
        let envelope = json!({ "type": "foo", "data": "not-a-number" });
        let result: Result<Message<u32>> = decode_message(envelope);
        assert!(matches!(result, Err(ChannelError::Decode(_))));
    }
}
