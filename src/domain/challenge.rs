//! Challenge aggregate and its read-side snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::deposit::DepositObligation;
use super::ids::{ChallengeId, OwnerId};
use super::progress::ChallengeProgress;

/// A savings challenge owned by a single user.
///
/// At most one challenge exists per owner at any time; the store enforces
/// this as a uniqueness constraint rather than the ledger holding any
/// in-process global state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Challenge {
    /// Challenge identifier (immutable after creation).
    pub id: ChallengeId,

    /// Owning user (immutable after creation).
    pub owner: OwnerId,

    /// Savings goal in whole currency units.
    pub target: i64,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    /// Creates a new challenge for the given owner and target.
    ///
    /// Target validation happens in the deposit plan generator; a
    /// challenge is only ever persisted together with a successfully
    /// generated plan.
    #[must_use]
    pub fn new(owner: OwnerId, target: i64) -> Self {
        Self {
            id: ChallengeId::new(),
            owner,
            target,
            created_at: Utc::now(),
        }
    }
}

/// A challenge together with its obligations in plan order.
///
/// This is the shape every read returns: deposits are always ordered by
/// `sequence_order` ascending, regardless of the store's retrieval order.
#[derive(Debug, Clone, Serialize)]
pub struct ChallengeSnapshot {
    /// The challenge itself.
    pub challenge: Challenge,

    /// Obligations ordered by `sequence_order` ascending.
    pub deposits: Vec<DepositObligation>,
}

impl ChallengeSnapshot {
    /// Computes aggregate progress over the snapshot.
    #[must_use]
    pub fn progress(&self) -> ChallengeProgress {
        ChallengeProgress::compute(self.challenge.target, &self.deposits)
    }
}
