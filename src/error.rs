//! Ledger error types with stable numeric codes.
//!
//! [`LedgerError`] is the central error type for the crate. Each variant
//! carries a stable numeric code so the embedding application can map a
//! failure to a user-facing notification without matching on message text.

use crate::domain::deposit_status::DepositStatus;

/// Central error enum for all ledger operations.
///
/// # Error Code Ranges
///
/// | Range     | Category            |
/// |-----------|---------------------|
/// | 1000–1999 | Validation          |
/// | 2000–2999 | Not Found / Conflict|
/// | 3000–3999 | Server / Storage    |
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Owner already has an active challenge.
    #[error("owner {0} already has an active challenge")]
    DuplicateChallenge(uuid::Uuid),

    /// Generator invoked with a target outside the supported set.
    #[error("unsupported challenge target: {0}")]
    InvalidTarget(i64),

    /// Requested status change is not in the transition table.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// Status the obligation currently holds.
        from: DepositStatus,
        /// Status that was requested.
        to: DepositStatus,
    },

    /// No challenge exists for the given owner.
    #[error("no challenge found for owner {0}")]
    ChallengeNotFound(uuid::Uuid),

    /// Deposit obligation with the given ID was not found.
    #[error("deposit not found: {0}")]
    DepositNotFound(uuid::Uuid),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal invariant breakage (e.g. a corrupt stored status).
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidTarget(_) => 1001,
            Self::InvalidTransition { .. } => 1002,
            Self::ChallengeNotFound(_) => 2001,
            Self::DepositNotFound(_) => 2002,
            Self::DuplicateChallenge(_) => 2003,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns `true` for the not-found family of errors.
    ///
    /// Lets callers distinguish a missing record from a validation
    /// failure without matching every variant.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ChallengeNotFound(_) | Self::DepositNotFound(_))
    }
}
