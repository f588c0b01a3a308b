//! Deposit obligation aggregate and plan construction.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::deposit_status::DepositStatus;
use super::ids::{ChallengeId, DepositId};
use super::sequence;
use crate::error::LedgerError;

/// One unit of a challenge's deposit plan.
///
/// Obligations are created in bulk when the challenge is created and are
/// never added or removed individually afterwards; only `status` and
/// `completed_at` mutate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepositObligation {
    /// Obligation identifier.
    pub id: DepositId,

    /// Owning challenge. Obligations are destroyed with their challenge.
    pub challenge_id: ChallengeId,

    /// Deposit amount in whole currency units.
    pub value: i32,

    /// 1-based position in the plan; unique within a challenge and
    /// defines display and completion order.
    pub sequence_order: i32,

    /// Current fulfillment status.
    pub status: DepositStatus,

    /// Set while `status` is `Completed`, `None` otherwise.
    pub completed_at: Option<DateTime<Utc>>,
}

impl DepositObligation {
    /// Creates a pending obligation at the given plan position.
    #[must_use]
    pub fn new(challenge_id: ChallengeId, value: i32, sequence_order: i32) -> Self {
        Self {
            id: DepositId::new(),
            challenge_id,
            value,
            sequence_order,
            status: DepositStatus::Pending,
            completed_at: None,
        }
    }

    /// Applies a status transition in place.
    ///
    /// Consults [`DepositStatus::can_transition_to`]. Moving to
    /// `Completed` stamps `completed_at` with `now`; every other allowed
    /// move clears it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidTransition`] and leaves the
    /// obligation untouched when the move is not in the table.
    pub fn apply_transition(
        &mut self,
        to: DepositStatus,
        now: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        if !self.status.can_transition_to(to) {
            return Err(LedgerError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.completed_at = match to {
            DepositStatus::Completed => Some(now),
            DepositStatus::Pending | DepositStatus::Skipped => None,
        };
        self.status = to;
        Ok(())
    }
}

/// Builds the full pending deposit plan for a challenge.
///
/// Pure wrapper over [`sequence::generate`]: each generated value becomes
/// one pending obligation carrying its 1-based `sequence_order`. No store
/// access happens here; persisting the plan is the caller's job.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidTarget`] for unsupported targets.
pub fn build_plan(
    challenge_id: ChallengeId,
    target: i64,
) -> Result<Vec<DepositObligation>, LedgerError> {
    let values = sequence::generate(target)?;
    Ok(values
        .into_iter()
        .zip(1i32..)
        .map(|(value, sequence_order)| DepositObligation::new(challenge_id, value, sequence_order))
        .collect())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn pending_deposit() -> DepositObligation {
        DepositObligation::new(ChallengeId::new(), 42, 1)
    }

    #[test]
    fn new_deposit_is_pending_without_timestamp() {
        let deposit = pending_deposit();
        assert_eq!(deposit.status, DepositStatus::Pending);
        assert_eq!(deposit.completed_at, None);
    }

    #[test]
    fn completing_stamps_timestamp() {
        let mut deposit = pending_deposit();
        let now = Utc::now();
        let result = deposit.apply_transition(DepositStatus::Completed, now);
        assert!(result.is_ok());
        assert_eq!(deposit.status, DepositStatus::Completed);
        assert_eq!(deposit.completed_at, Some(now));
    }

    #[test]
    fn full_cycle_returns_to_pending_without_timestamp() {
        let mut deposit = pending_deposit();
        for _ in 0..3 {
            let next = deposit.status.next_in_cycle();
            let result = deposit.apply_transition(next, Utc::now());
            assert!(result.is_ok());
        }
        assert_eq!(deposit.status, DepositStatus::Pending);
        assert_eq!(deposit.completed_at, None);
    }

    #[test]
    fn undo_from_completed_clears_timestamp() {
        let mut deposit = pending_deposit();
        let _ = deposit.apply_transition(DepositStatus::Completed, Utc::now());
        let result = deposit.apply_transition(DepositStatus::Pending, Utc::now());
        assert!(result.is_ok());
        assert_eq!(deposit.status, DepositStatus::Pending);
        assert_eq!(deposit.completed_at, None);
    }

    #[test]
    fn invalid_transition_leaves_deposit_untouched() {
        let mut deposit = pending_deposit();
        let _ = deposit.apply_transition(DepositStatus::Completed, Utc::now());
        let _ = deposit.apply_transition(DepositStatus::Skipped, Utc::now());

        let result = deposit.apply_transition(DepositStatus::Completed, Utc::now());
        let Err(LedgerError::InvalidTransition { from, to }) = result else {
            panic!("skipped -> completed must be rejected");
        };
        assert_eq!(from, DepositStatus::Skipped);
        assert_eq!(to, DepositStatus::Completed);
        assert_eq!(deposit.status, DepositStatus::Skipped);
        assert_eq!(deposit.completed_at, None);
    }

    #[test]
    fn build_plan_assigns_sequential_orders() {
        let challenge_id = ChallengeId::new();
        let Ok(plan) = build_plan(challenge_id, sequence::TARGET_FULL) else {
            panic!("full target must be supported");
        };
        assert_eq!(plan.len(), 400);
        assert_eq!(plan.first().map(|d| d.sequence_order), Some(1));
        assert_eq!(plan.last().map(|d| d.sequence_order), Some(400));
        assert!(plan.iter().all(|d| d.challenge_id == challenge_id));
        assert!(plan.iter().all(|d| d.status == DepositStatus::Pending));
    }

    #[test]
    fn build_plan_rejects_unsupported_target() {
        let result = build_plan(ChallengeId::new(), 12_345);
        assert!(matches!(result, Err(LedgerError::InvalidTarget(12_345))));
    }
}
