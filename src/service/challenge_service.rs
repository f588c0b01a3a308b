//! Challenge service: orchestrates ledger operations and emits events.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::deposit::build_plan;
use crate::domain::{
    Challenge, ChallengeProgress, ChallengeSnapshot, DepositId, DepositObligation, DepositStatus,
    EventBus, LedgerEvent, OwnerId,
};
use crate::error::LedgerError;
use crate::persistence::ChallengeStore;

/// Orchestration layer for all ledger operations.
///
/// Stateless coordinator: owns a reference to the store for persistence
/// and an [`EventBus`] for event emission. Every mutation follows the
/// pattern: validate in the domain → persist through the store → emit
/// an event → return the result.
#[derive(Debug, Clone)]
pub struct ChallengeService<S> {
    store: Arc<S>,
    event_bus: EventBus,
}

impl<S: ChallengeStore> ChallengeService<S> {
    /// Creates a new `ChallengeService`.
    #[must_use]
    pub fn new(store: Arc<S>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the inner store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Creates a challenge and its full deposit plan for the owner.
    ///
    /// The plan is generated before anything touches the store, so an
    /// unsupported target never leaves a partial challenge behind. The
    /// challenge and its obligations are persisted as one logical unit;
    /// uniqueness under racing creations is the store's unique
    /// constraint, and the loser surfaces the conflict unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidTarget`] for unsupported targets and
    /// [`LedgerError::DuplicateChallenge`] when the owner already has a
    /// challenge.
    pub async fn create_challenge(
        &self,
        owner: OwnerId,
        target: i64,
    ) -> Result<ChallengeSnapshot, LedgerError> {
        let challenge = Challenge::new(owner, target);
        let deposits = build_plan(challenge.id, target)?;

        self.store.insert_challenge(&challenge, &deposits).await?;

        let _ = self.event_bus.publish(LedgerEvent::ChallengeCreated {
            challenge_id: challenge.id,
            owner,
            target,
            deposit_count: deposits.len(),
            timestamp: Utc::now(),
        });

        tracing::info!(challenge_id = %challenge.id, %owner, target, "challenge created");
        Ok(ChallengeSnapshot {
            challenge,
            deposits,
        })
    }

    /// Returns the owner's challenge with obligations in plan order, or
    /// `None` if the owner has no challenge yet.
    ///
    /// Idempotent and side-effect free; safe to repeat.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::PersistenceError`] on storage failure.
    pub async fn get_challenge(
        &self,
        owner: OwnerId,
    ) -> Result<Option<ChallengeSnapshot>, LedgerError> {
        let Some(challenge) = self.store.challenge_for_owner(owner).await? else {
            return Ok(None);
        };
        let deposits = self.store.deposits_for_challenge(challenge.id).await?;
        Ok(Some(ChallengeSnapshot {
            challenge,
            deposits,
        }))
    }

    /// Transitions a single obligation to the requested status.
    ///
    /// Consults the transition table before persisting; a rejected move
    /// leaves both the domain object and the stored row unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DepositNotFound`] for an unknown ID and
    /// [`LedgerError::InvalidTransition`] for a move outside the table.
    pub async fn transition_deposit(
        &self,
        deposit_id: DepositId,
        to: DepositStatus,
    ) -> Result<DepositObligation, LedgerError> {
        let mut deposit = self.store.deposit_by_id(deposit_id).await?;
        let from = deposit.status;
        deposit.apply_transition(to, Utc::now())?;

        self.store
            .update_deposit(deposit_id, deposit.status, deposit.completed_at)
            .await?;

        let _ = self.event_bus.publish(LedgerEvent::DepositTransitioned {
            challenge_id: deposit.challenge_id,
            deposit_id,
            from,
            to,
            timestamp: Utc::now(),
        });

        tracing::info!(%deposit_id, %from, %to, "deposit transitioned");
        Ok(deposit)
    }

    /// Advances an obligation one step along the primary toggle cycle
    /// (`Pending → Completed → Skipped → Pending`).
    ///
    /// This is what a single tap on a deposit cell does in the grid.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DepositNotFound`] for an unknown ID.
    pub async fn toggle_deposit(
        &self,
        deposit_id: DepositId,
    ) -> Result<DepositObligation, LedgerError> {
        let deposit = self.store.deposit_by_id(deposit_id).await?;
        self.transition_deposit(deposit_id, deposit.status.next_in_cycle())
            .await
    }

    /// Computes aggregate progress for the owner's challenge.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ChallengeNotFound`] when the owner has no
    /// challenge.
    pub async fn progress(&self, owner: OwnerId) -> Result<ChallengeProgress, LedgerError> {
        let snapshot = self
            .get_challenge(owner)
            .await?
            .ok_or(LedgerError::ChallengeNotFound(uuid::Uuid::from(owner)))?;
        Ok(snapshot.progress())
    }

    /// Removes the owner's challenge and all its obligations.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ChallengeNotFound`] when the owner has no
    /// challenge.
    pub async fn delete_challenge(&self, owner: OwnerId) -> Result<(), LedgerError> {
        let challenge_id = self.store.delete_challenge(owner).await?;

        let _ = self.event_bus.publish(LedgerEvent::ChallengeRemoved {
            challenge_id,
            owner,
            timestamp: Utc::now(),
        });

        tracing::info!(%challenge_id, %owner, "challenge removed");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::sequence::{TARGET_FULL, TARGET_REDUCED};
    use crate::persistence::MemoryStore;

    fn make_service() -> ChallengeService<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        let event_bus = EventBus::new(1000);
        ChallengeService::new(store, event_bus)
    }

    async fn make_challenge(
        service: &ChallengeService<MemoryStore>,
        target: i64,
    ) -> (OwnerId, ChallengeSnapshot) {
        let owner = OwnerId::new();
        let Ok(snapshot) = service.create_challenge(owner, target).await else {
            panic!("challenge creation failed");
        };
        (owner, snapshot)
    }

    #[tokio::test]
    async fn create_challenge_emits_event() {
        let service = make_service();
        let mut rx = service.event_bus().subscribe();

        let (_, snapshot) = make_challenge(&service, TARGET_FULL).await;
        assert_eq!(snapshot.deposits.len(), 400);

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "challenge_created");
        assert_eq!(event.challenge_id(), snapshot.challenge.id);
    }

    #[tokio::test]
    async fn create_challenge_rejects_unsupported_target() {
        let service = make_service();
        let owner = OwnerId::new();

        let result = service.create_challenge(owner, 50_000).await;
        assert!(matches!(result, Err(LedgerError::InvalidTarget(50_000))));

        // Nothing was persisted for the owner.
        let found = service.get_challenge(owner).await.ok().flatten();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn duplicate_challenge_is_rejected_and_existing_untouched() {
        let service = make_service();
        let (owner, snapshot) = make_challenge(&service, TARGET_FULL).await;

        let result = service.create_challenge(owner, TARGET_REDUCED).await;
        assert!(matches!(result, Err(LedgerError::DuplicateChallenge(_))));

        let Ok(Some(found)) = service.get_challenge(owner).await else {
            panic!("existing challenge must survive");
        };
        assert_eq!(found.challenge.id, snapshot.challenge.id);
        assert_eq!(found.deposits, snapshot.deposits);
    }

    #[tokio::test]
    async fn get_challenge_is_idempotent() {
        let service = make_service();
        let (owner, _) = make_challenge(&service, TARGET_REDUCED).await;

        let Ok(Some(first)) = service.get_challenge(owner).await else {
            panic!("challenge must exist");
        };
        let Ok(Some(second)) = service.get_challenge(owner).await else {
            panic!("challenge must exist");
        };
        assert_eq!(first.challenge, second.challenge);
        assert_eq!(first.deposits, second.deposits);
    }

    #[tokio::test]
    async fn get_challenge_returns_none_for_unknown_owner() {
        let service = make_service();
        let found = service.get_challenge(OwnerId::new()).await.ok().flatten();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn transition_persists_and_emits() {
        let service = make_service();
        let (owner, snapshot) = make_challenge(&service, TARGET_FULL).await;
        let Some(first) = snapshot.deposits.first() else {
            panic!("plan must not be empty");
        };

        let mut rx = service.event_bus().subscribe();
        let result = service
            .transition_deposit(first.id, DepositStatus::Completed)
            .await;
        let Ok(updated) = result else {
            panic!("transition failed");
        };
        assert_eq!(updated.status, DepositStatus::Completed);
        assert!(updated.completed_at.is_some());

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "deposit_transitioned");

        // The stored copy reflects the transition.
        let Ok(Some(found)) = service.get_challenge(owner).await else {
            panic!("challenge must exist");
        };
        let stored = found.deposits.iter().find(|d| d.id == first.id);
        assert_eq!(stored.map(|d| d.status), Some(DepositStatus::Completed));
    }

    #[tokio::test]
    async fn skipped_deposit_cannot_jump_to_completed() {
        let service = make_service();
        let (owner, snapshot) = make_challenge(&service, TARGET_FULL).await;
        let Some(first) = snapshot.deposits.first() else {
            panic!("plan must not be empty");
        };

        let completed = service
            .transition_deposit(first.id, DepositStatus::Completed)
            .await;
        assert!(completed.is_ok());
        let skipped = service
            .transition_deposit(first.id, DepositStatus::Skipped)
            .await;
        assert!(skipped.is_ok());

        let result = service
            .transition_deposit(first.id, DepositStatus::Completed)
            .await;
        assert!(matches!(
            result,
            Err(LedgerError::InvalidTransition {
                from: DepositStatus::Skipped,
                to: DepositStatus::Completed,
            })
        ));

        let Ok(Some(found)) = service.get_challenge(owner).await else {
            panic!("challenge must exist");
        };
        let stored = found.deposits.iter().find(|d| d.id == first.id);
        assert_eq!(stored.map(|d| d.status), Some(DepositStatus::Skipped));
    }

    #[tokio::test]
    async fn toggle_walks_the_cycle_back_to_pending() {
        let service = make_service();
        let (_, snapshot) = make_challenge(&service, TARGET_FULL).await;
        let Some(first) = snapshot.deposits.first() else {
            panic!("plan must not be empty");
        };

        for expected in [
            DepositStatus::Completed,
            DepositStatus::Skipped,
            DepositStatus::Pending,
        ] {
            let Ok(updated) = service.toggle_deposit(first.id).await else {
                panic!("toggle failed");
            };
            assert_eq!(updated.status, expected);
        }

        let Ok(back) = service.store().deposit_by_id(first.id).await else {
            panic!("deposit must exist");
        };
        assert_eq!(back.status, DepositStatus::Pending);
        assert_eq!(back.completed_at, None);
    }

    #[tokio::test]
    async fn transition_unknown_deposit_is_not_found() {
        let service = make_service();
        let result = service
            .transition_deposit(DepositId::new(), DepositStatus::Completed)
            .await;
        assert!(matches!(result, Err(LedgerError::DepositNotFound(_))));
    }

    #[tokio::test]
    async fn completing_every_deposit_reaches_exactly_the_target() {
        let service = make_service();
        let (owner, snapshot) = make_challenge(&service, TARGET_REDUCED).await;
        assert_eq!(snapshot.deposits.len(), 399);

        for deposit in &snapshot.deposits {
            let result = service
                .transition_deposit(deposit.id, DepositStatus::Completed)
                .await;
            assert!(result.is_ok());
        }

        let Ok(progress) = service.progress(owner).await else {
            panic!("progress failed");
        };
        assert_eq!(progress.accumulated, TARGET_REDUCED);
        assert_eq!(progress.remaining, 0);
        assert!((progress.completion_percent - 100.0).abs() < f64::EPSILON);
        assert!(progress.is_complete());
        assert_eq!(progress.completed_count, 399);
        assert_eq!(progress.skipped_count, 0);
    }

    #[tokio::test]
    async fn skipping_a_completed_deposit_restores_prior_progress() {
        let service = make_service();
        let (owner, snapshot) = make_challenge(&service, TARGET_FULL).await;
        let Some(first) = snapshot.deposits.first() else {
            panic!("plan must not be empty");
        };

        let Ok(before) = service.progress(owner).await else {
            panic!("progress failed");
        };

        let completed = service
            .transition_deposit(first.id, DepositStatus::Completed)
            .await;
        assert!(completed.is_ok());
        let skipped = service
            .transition_deposit(first.id, DepositStatus::Skipped)
            .await;
        assert!(skipped.is_ok());

        let Ok(after) = service.progress(owner).await else {
            panic!("progress failed");
        };
        assert_eq!(after.accumulated, before.accumulated);
        assert_eq!(after.skipped_count, 1);
    }

    #[tokio::test]
    async fn progress_without_challenge_is_not_found() {
        let service = make_service();
        let result = service.progress(OwnerId::new()).await;
        assert!(matches!(result, Err(LedgerError::ChallengeNotFound(_))));
    }

    #[tokio::test]
    async fn delete_challenge_emits_event_and_frees_owner() {
        let service = make_service();
        let (owner, snapshot) = make_challenge(&service, TARGET_FULL).await;
        let mut rx = service.event_bus().subscribe();

        let result = service.delete_challenge(owner).await;
        assert!(result.is_ok());

        let event = rx.recv().await;
        let Ok(event) = event else {
            panic!("expected event");
        };
        assert_eq!(event.event_type_str(), "challenge_removed");
        assert_eq!(event.challenge_id(), snapshot.challenge.id);

        // The owner can start over.
        let recreated = service.create_challenge(owner, TARGET_REDUCED).await;
        assert!(recreated.is_ok());
    }
}
