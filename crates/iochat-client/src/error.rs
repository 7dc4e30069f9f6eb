//! Session errors.

use thiserror::Error;

/// Errors from local session operations.
///
/// Nothing here reaches the user: the dispatcher logs these and carries on,
/// matching the protocol's silent-absorb policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Login attempted after the session already authenticated.
    #[error("already logged in as {identity:?}")]
    AlreadyAuthenticated {
        /// Identity chosen at the first login.
        identity: String,
    },
}
