//! `[name, payload]` packet framing.
//!
//! Payload typing happens one level up in [`crate::event`]; this module only
//! splits and joins the outer array.

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::errors::{ProtocolError, Result};

/// Serialize `payload` as the body of a `name` packet.
pub(crate) fn encode<P: Serialize>(name: &'static str, payload: &P) -> Result<Vec<u8>> {
    serde_json::to_vec(&(name, payload))
        .map_err(|source| ProtocolError::Encode { event: name, source })
}

/// Split a packet into its event name and untyped payload.
///
/// Rejects anything other than a JSON array of exactly two elements with a
/// string head.
pub(crate) fn split(bytes: &[u8]) -> Result<(String, Value)> {
    serde_json::from_slice::<(String, Value)>(bytes).map_err(ProtocolError::Malformed)
}

/// Deserialize the payload of a known event.
pub(crate) fn payload<T: DeserializeOwned>(event: &'static str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| ProtocolError::InvalidPayload { event, source })
}
