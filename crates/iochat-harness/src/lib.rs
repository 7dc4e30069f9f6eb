//! Deterministic simulation harness for IOChat clients.
//!
//! In-process implementations of the broadcast server and of a fully wired
//! client for reproducible testing of transcript ordering under arbitrary
//! delivery interleavings.
//!
//! # Components
//!
//! - [`SimServer`]: broadcast double with the server's documented fan-out;
//!   per-client FIFO delivery, seeded interleaving across clients
//! - [`SimClient`]: [`iochat_client::EventBus`] + session + ingestion +
//!   dispatcher, exactly as a runtime wires them
//!
//! # Invariant Testing
//!
//! The `invariants` module checks behavioral properties over consecutive
//! [`SystemSnapshot`]s. Use [`InvariantRegistry::standard()`] for the
//! transcript and authentication invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod sim_client;
pub mod sim_server;

pub use invariants::{
    AuthNeverReverts, ClientSnapshot, Invariant, InvariantKind, InvariantRegistry,
    InvariantResult, SystemSnapshot, TranscriptAppendOnly, Violation,
};
pub use sim_client::SimClient;
pub use sim_server::{ClientId, SimServer};
