//! Client
//!
//! Single-room chat session for the IOChat protocol: an authentication
//! handshake by display name, an ordered local transcript, and the translation
//! between user actions and protocol events.
//!
//! # Architecture
//!
//! [`Session`] is a pure state machine in the same Sans-IO style as the rest of
//! the workspace: it consumes [`SessionEvent`]s and returns [`SessionAction`]s.
//! Everything that touches a connection goes through the [`Transport`] trait,
//! which is injected explicitly rather than reached through a global.
//!
//! # Components
//!
//! - [`Session`]: identity, authentication flag, transcript, message draft
//! - [`Transcript`]: append-only ordered list of [`TranscriptEntry`]
//! - [`Transport`]: subscribe/unsubscribe/emit seam to the connection
//! - [`EventBus`]: in-process [`Transport`] with a listener registry and outbox
//! - [`Ingestion`]: scoped subscription folding inbound events into the session
//! - [`Dispatcher`]: executes user actions against the session and transport
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`tcp::Connection`]: channel pair backed by a TCP stream
//! - [`tcp::connect`]: connect to a server

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod dispatch;
mod error;
mod ingestion;
mod session;
mod transcript;
mod transport;

#[cfg(feature = "transport")]
pub mod tcp;

pub use dispatch::Dispatcher;
pub use error::SessionError;
pub use ingestion::Ingestion;
pub use iochat_proto::{ChatMessage, ClientEvent, ServerEvent, ServerEventKind};
pub use session::{AuthState, Session, SessionAction, SessionEvent};
pub use transcript::{EntryKind, Transcript, TranscriptEntry};
pub use transport::{EventBus, Listener, Transport};
