//! Entangled endpoint pairs and the typed message envelope.
//!
//! An [`Endpoint`] is one side of a linked pair: a value posted on one side
//! is delivered asynchronously, in post order, to the handler registered on
//! the other side. Endpoints are not cloneable: moving one into another
//! execution context is the ownership transfer that makes a channel end
//! "transferable".
//!
//! Application payloads travel as [`Message`] values, serialized to an
//! [`Envelope`] at the channel boundary and never inspected in between.

pub mod endpoint;
pub mod error;
pub mod message;

pub use endpoint::Endpoint;
pub use error::{ChannelError, Result};
pub use message::{decode_message, encode_message, Envelope, Message};
