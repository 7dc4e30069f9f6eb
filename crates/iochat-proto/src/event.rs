//! Client and server events.
//!
//! Event names are fixed by the server. Outbound and inbound events use
//! disjoint names (`login` vs `sLogin`), so each direction has its own enum and
//! decoding an event from the wrong direction is an
//! [`ProtocolError::UnknownEvent`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    errors::{ProtocolError, Result},
    packet,
};

/// Wire names of every protocol event.
pub mod names {
    /// Client requests to join with a display name.
    pub const LOGIN: &str = "login";
    /// Client sends chat text.
    pub const MESSAGE: &str = "message";
    /// Server announces that a display name joined.
    pub const S_LOGIN: &str = "sLogin";
    /// Server broadcasts chat text.
    pub const S_MESSAGE: &str = "sMessage";
}

/// Chat text tagged with the display name of its author.
///
/// Shared by the outbound `message` and inbound `sMessage` events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message body.
    pub data: String,
    /// Display name of the author.
    pub id: String,
}

impl ChatMessage {
    /// Create a message authored by `id`.
    pub fn new(data: impl Into<String>, id: impl Into<String>) -> Self {
        Self { data: data.into(), id: id.into() }
    }
}

/// Events emitted by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// `login`: join the room with this display name.
    Login(String),
    /// `message`: send chat text.
    Message(ChatMessage),
}

impl ClientEvent {
    /// Wire name of this event.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => names::LOGIN,
            Self::Message(_) => names::MESSAGE,
        }
    }

    /// Encode as a `[name, payload]` packet.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Self::Login(name) => packet::encode(names::LOGIN, name),
            Self::Message(message) => packet::encode(names::MESSAGE, message),
        }
    }

    /// Decode a packet sent by a client.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (name, payload) = packet::split(bytes)?;
        match name.as_str() {
            names::LOGIN => packet::payload(names::LOGIN, payload).map(Self::Login),
            names::MESSAGE => packet::payload(names::MESSAGE, payload).map(Self::Message),
            _ => Err(ProtocolError::UnknownEvent { name }),
        }
    }
}

/// Inbound event kinds a client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServerEventKind {
    /// `sLogin`
    Login,
    /// `sMessage`
    Message,
}

impl ServerEventKind {
    /// Every inbound kind, in a stable order.
    pub const ALL: [Self; 2] = [Self::Message, Self::Login];

    /// Wire name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            Self::Login => names::S_LOGIN,
            Self::Message => names::S_MESSAGE,
        }
    }
}

impl fmt::Display for ServerEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Events broadcast by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// `sLogin`: a display name joined the room (possibly our own).
    Login(String),
    /// `sMessage`: chat text broadcast to the room (possibly our own).
    Message(ChatMessage),
}

impl ServerEvent {
    /// Subscription kind of this event.
    pub fn kind(&self) -> ServerEventKind {
        match self {
            Self::Login(_) => ServerEventKind::Login,
            Self::Message(_) => ServerEventKind::Message,
        }
    }

    /// Encode as a `[name, payload]` packet.
    pub fn encode(&self) -> Result<Vec<u8>> {
        match self {
            Self::Login(name) => packet::encode(names::S_LOGIN, name),
            Self::Message(message) => packet::encode(names::S_MESSAGE, message),
        }
    }

    /// Decode a packet sent by the server.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (name, payload) = packet::split(bytes)?;
        match name.as_str() {
            names::S_LOGIN => packet::payload(names::S_LOGIN, payload).map(Self::Login),
            names::S_MESSAGE => packet::payload(names::S_MESSAGE, payload).map(Self::Message),
            _ => Err(ProtocolError::UnknownEvent { name }),
        }
    }
}
