//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of every client at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use iochat_client::{EntryKind, TranscriptEntry};

use crate::{ClientId, SimClient, SimServer};

/// Snapshot of the entire system state.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-client state snapshots, indexed by [`ClientId`].
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Capture every client of `server`.
    pub fn capture(server: &SimServer) -> Self {
        let clients = server
            .client_ids()
            .filter_map(|id| server.client(id).map(|client| ClientSnapshot::capture(id, client)))
            .collect();
        Self { clients }
    }

    /// Create a snapshot from explicit client snapshots.
    pub fn from_clients(clients: Vec<ClientSnapshot>) -> Self {
        Self { clients }
    }

    /// Snapshot of one client. `None` if the ID is unknown.
    pub fn client(&self, id: ClientId) -> Option<&ClientSnapshot> {
        self.clients.iter().find(|client| client.id == id)
    }
}

/// Snapshot of a single client's observable state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSnapshot {
    /// Client identifier.
    pub id: ClientId,
    /// Display name. Empty before login.
    pub identity: String,
    /// Whether a login has been submitted.
    pub authenticated: bool,
    /// Transcript in display order.
    pub transcript: Vec<TranscriptEntry>,
}

impl ClientSnapshot {
    /// Capture the observable state of `client`.
    pub fn capture(id: ClientId, client: &SimClient) -> Self {
        Self {
            id,
            identity: client.identity(),
            authenticated: client.is_authenticated(),
            transcript: client.transcript(),
        }
    }

    /// Entries that came from the server, in arrival order.
    ///
    /// Every client connected for the whole run sees the same broadcast
    /// sequence, so these converge across clients once inboxes drain.
    pub fn remote_entries(&self) -> Vec<&TranscriptEntry> {
        self.transcript.iter().filter(|entry| entry.kind() != EntryKind::Own).collect()
    }
}
