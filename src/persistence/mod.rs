//! Persistence layer: the challenge store contract and its backends.
//!
//! [`ChallengeStore`] is the narrow contract the ledger requires from its
//! persistence collaborator: create-with-uniqueness-check for challenges,
//! ordered bulk insert of obligations, point updates of a single
//! obligation, and ordered reads. [`postgres::PostgresStore`] is the
//! durable implementation; [`memory::MemoryStore`] backs tests and
//! embedders that do not need a database.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Challenge, ChallengeId, DepositId, DepositObligation, DepositStatus, OwnerId};
use crate::error::LedgerError;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

/// Contract the ledger requires from its persistence collaborator.
///
/// Implementations must enforce the one-challenge-per-owner invariant at
/// insert time and return obligations ordered by `sequence_order`
/// ascending, regardless of physical storage order. Concurrent updates
/// to the same obligation may resolve last-write-wins; there is no
/// cross-obligation transaction requirement.
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Persists a challenge together with its full obligation set as one
    /// logical unit, in plan order.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateChallenge`] when the owner already
    /// has a challenge and [`LedgerError::PersistenceError`] on storage
    /// failure.
    async fn insert_challenge(
        &self,
        challenge: &Challenge,
        deposits: &[DepositObligation],
    ) -> Result<(), LedgerError>;

    /// Returns the owner's challenge, or `None` if the owner has no
    /// challenge yet.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PersistenceError`] on storage failure.
    async fn challenge_for_owner(&self, owner: OwnerId) -> Result<Option<Challenge>, LedgerError>;

    /// Returns a challenge's obligations ordered by `sequence_order`
    /// ascending.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PersistenceError`] on storage failure.
    async fn deposits_for_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<DepositObligation>, LedgerError>;

    /// Returns a single obligation by ID.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DepositNotFound`] when no obligation with
    /// the given ID exists and [`LedgerError::PersistenceError`] on
    /// storage failure.
    async fn deposit_by_id(&self, deposit_id: DepositId) -> Result<DepositObligation, LedgerError>;

    /// Point update of one obligation's status and completion timestamp.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DepositNotFound`] when no obligation with
    /// the given ID exists and [`LedgerError::PersistenceError`] on
    /// storage failure.
    async fn update_deposit(
        &self,
        deposit_id: DepositId,
        status: DepositStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), LedgerError>;

    /// Removes the owner's challenge and, by cascade, all its
    /// obligations. Returns the removed challenge's ID.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ChallengeNotFound`] when the owner has no
    /// challenge and [`LedgerError::PersistenceError`] on storage
    /// failure.
    async fn delete_challenge(&self, owner: OwnerId) -> Result<ChallengeId, LedgerError>;
}
