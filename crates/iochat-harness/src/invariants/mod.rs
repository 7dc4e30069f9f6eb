//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during system execution.
//! Unlike example-based tests that check specific scenarios, invariants
//! verify behavioral properties across all possible execution paths.
//!
//! # Architecture
//!
//! The invariant system extracts observable state from every [`SimClient`]
//! into a [`SystemSnapshot`], then runs registered [`Invariant`] checks over
//! each pair of consecutive snapshots.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let before = SystemSnapshot::capture(&server);
//! server.run_until_idle();
//! registry.check_all(&before, &SystemSnapshot::capture(&server))?;
//! ```
//!
//! [`SimClient`]: crate::SimClient

mod checks;
mod snapshot;

use std::fmt;

pub use checks::{AuthNeverReverts, TranscriptAppendOnly};
pub use snapshot::{ClientSnapshot, SystemSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Identifies which invariant was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantKind {
    /// Transcript entries were removed, reordered, or changed.
    TranscriptAppendOnly,
    /// A session went from authenticated back to unauthenticated.
    AuthNeverReverts,
}

impl fmt::Display for InvariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TranscriptAppendOnly => write!(f, "transcript_append_only"),
            Self::AuthNeverReverts => write!(f, "auth_never_reverts"),
        }
    }
}

/// Invariant violation with context.
#[derive(Debug, Clone)]
pub struct Violation {
    /// Which invariant was violated.
    pub invariant: InvariantKind,
    /// Description of what went wrong.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// A transition invariant checked between two snapshots.
pub trait Invariant {
    /// Which invariant this is.
    fn kind(&self) -> InvariantKind;

    /// Check that moving from `before` to `after` is allowed.
    fn check(&self, before: &SystemSnapshot, after: &SystemSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with the standard session invariants.
    ///
    /// Includes:
    /// - [`TranscriptAppendOnly`]: earlier entries are a prefix of later ones
    /// - [`AuthNeverReverts`]: authentication is terminal
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(TranscriptAppendOnly);
        registry.add(AuthNeverReverts);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants across one transition.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(
        &self,
        before: &SystemSnapshot,
        after: &SystemSnapshot,
    ) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(before, after).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }
}
