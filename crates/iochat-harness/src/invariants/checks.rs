//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use super::{Invariant, InvariantKind, InvariantResult, SystemSnapshot, Violation};

/// The earlier transcript must be a prefix of the later one.
///
/// Covers removal, reordering, and in-place mutation of entries in one check.
pub struct TranscriptAppendOnly;

impl Invariant for TranscriptAppendOnly {
    fn kind(&self) -> InvariantKind {
        InvariantKind::TranscriptAppendOnly
    }

    fn check(&self, before: &SystemSnapshot, after: &SystemSnapshot) -> InvariantResult {
        for old in &before.clients {
            let Some(new) = after.client(old.id) else {
                continue;
            };
            if !new.transcript.starts_with(&old.transcript) {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "client {}: transcript of {} entries is not a prefix of {} entries",
                        old.id,
                        old.transcript.len(),
                        new.transcript.len()
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Authentication is terminal, and so is the identity chosen with it.
pub struct AuthNeverReverts;

impl Invariant for AuthNeverReverts {
    fn kind(&self) -> InvariantKind {
        InvariantKind::AuthNeverReverts
    }

    fn check(&self, before: &SystemSnapshot, after: &SystemSnapshot) -> InvariantResult {
        for old in before.clients.iter().filter(|client| client.authenticated) {
            let Some(new) = after.client(old.id) else {
                continue;
            };
            if !new.authenticated || new.identity != old.identity {
                return Err(Violation {
                    invariant: self.kind(),
                    message: format!(
                        "client {}: was authenticated as {:?}, now authenticated={} as {:?}",
                        old.id, old.identity, new.authenticated, new.identity
                    ),
                });
            }
        }
        Ok(())
    }
}
