//! Protocol errors.

use thiserror::Error;

/// Result alias for codec operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// Errors produced while encoding or decoding packets.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Packet is not a two-element `[name, payload]` JSON array.
    #[error("malformed packet: {0}")]
    Malformed(#[source] serde_json::Error),

    /// Event name is not part of the vocabulary for this direction.
    #[error("unknown event: {name}")]
    UnknownEvent {
        /// Name found in the packet.
        name: String,
    },

    /// Event name is known but the payload has the wrong shape.
    #[error("invalid payload for {event}: {source}")]
    InvalidPayload {
        /// Event the payload belonged to.
        event: &'static str,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// Payload could not be serialized.
    #[error("failed to encode {event}: {source}")]
    Encode {
        /// Event being encoded.
        event: &'static str,
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}
