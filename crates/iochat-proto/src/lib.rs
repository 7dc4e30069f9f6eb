//! Protocol vocabulary for IOChat.
//!
//! The protocol is a handful of named events exchanged over a persistent,
//! bidirectional connection to a single broadcast server. Every event travels
//! as one packet: a JSON array whose first element is the event name and whose
//! second element is the payload.
//!
//! ```text
//! ["login",    "alice"]
//! ["message",  {"data": "hi", "id": "alice"}]
//! ["sLogin",   "alice"]
//! ["sMessage", {"data": "hi", "id": "alice"}]
//! ```
//!
//! # Components
//!
//! - [`ClientEvent`]: events the client emits (`login`, `message`)
//! - [`ServerEvent`]: events the server broadcasts (`sLogin`, `sMessage`)
//! - [`ServerEventKind`]: subscription key for inbound events
//! - [`ChatMessage`]: payload shared by `message` and `sMessage`

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod errors;
mod event;
mod packet;

pub use errors::{ProtocolError, Result};
pub use event::{ChatMessage, ClientEvent, ServerEvent, ServerEventKind, names};
