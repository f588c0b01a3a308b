//! In-memory challenge store.
//!
//! [`MemoryStore`] keeps challenges and their obligation sets in
//! `HashMap`s behind [`tokio::sync::RwLock`]. It honors the same
//! contract as the PostgreSQL store (owner uniqueness at insert,
//! ordered reads, cascade delete) and backs the service tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::ChallengeStore;
use crate::domain::{Challenge, ChallengeId, DepositId, DepositObligation, DepositStatus, OwnerId};
use crate::error::LedgerError;

/// In-memory store keyed by owner, with a deposit-to-challenge index
/// for point lookups.
#[derive(Debug, Default)]
pub struct MemoryStore {
    challenges: RwLock<HashMap<OwnerId, Challenge>>,
    deposits: RwLock<HashMap<ChallengeId, Vec<DepositObligation>>>,
    deposit_index: RwLock<HashMap<DepositId, ChallengeId>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChallengeStore for MemoryStore {
    async fn insert_challenge(
        &self,
        challenge: &Challenge,
        deposits: &[DepositObligation],
    ) -> Result<(), LedgerError> {
        let mut challenges = self.challenges.write().await;
        if challenges.contains_key(&challenge.owner) {
            return Err(LedgerError::DuplicateChallenge(Uuid::from(challenge.owner)));
        }

        // Stored sorted so the ordered-read contract holds even when the
        // caller supplies obligations out of plan order.
        let mut ordered = deposits.to_vec();
        ordered.sort_by_key(|d| d.sequence_order);

        let mut index = self.deposit_index.write().await;
        for deposit in &ordered {
            index.insert(deposit.id, challenge.id);
        }
        self.deposits.write().await.insert(challenge.id, ordered);
        challenges.insert(challenge.owner, challenge.clone());
        Ok(())
    }

    async fn challenge_for_owner(&self, owner: OwnerId) -> Result<Option<Challenge>, LedgerError> {
        Ok(self.challenges.read().await.get(&owner).cloned())
    }

    async fn deposits_for_challenge(
        &self,
        challenge_id: ChallengeId,
    ) -> Result<Vec<DepositObligation>, LedgerError> {
        Ok(self
            .deposits
            .read()
            .await
            .get(&challenge_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn deposit_by_id(&self, deposit_id: DepositId) -> Result<DepositObligation, LedgerError> {
        let index = self.deposit_index.read().await;
        let challenge_id = index
            .get(&deposit_id)
            .ok_or(LedgerError::DepositNotFound(Uuid::from(deposit_id)))?;

        let deposits = self.deposits.read().await;
        deposits
            .get(challenge_id)
            .and_then(|list| list.iter().find(|d| d.id == deposit_id))
            .cloned()
            .ok_or(LedgerError::DepositNotFound(Uuid::from(deposit_id)))
    }

    async fn update_deposit(
        &self,
        deposit_id: DepositId,
        status: DepositStatus,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), LedgerError> {
        let index = self.deposit_index.read().await;
        let challenge_id = index
            .get(&deposit_id)
            .ok_or(LedgerError::DepositNotFound(Uuid::from(deposit_id)))?;

        let mut deposits = self.deposits.write().await;
        let deposit = deposits
            .get_mut(challenge_id)
            .and_then(|list| list.iter_mut().find(|d| d.id == deposit_id))
            .ok_or(LedgerError::DepositNotFound(Uuid::from(deposit_id)))?;

        deposit.status = status;
        deposit.completed_at = completed_at;
        Ok(())
    }

    async fn delete_challenge(&self, owner: OwnerId) -> Result<ChallengeId, LedgerError> {
        let mut challenges = self.challenges.write().await;
        let challenge = challenges
            .remove(&owner)
            .ok_or(LedgerError::ChallengeNotFound(Uuid::from(owner)))?;

        let removed = self.deposits.write().await.remove(&challenge.id);
        if let Some(removed) = removed {
            let mut index = self.deposit_index.write().await;
            for deposit in &removed {
                index.remove(&deposit.id);
            }
        }
        Ok(challenge.id)
    }
}
