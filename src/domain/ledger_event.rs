//! Domain events reflecting ledger state mutations.
//!
//! Every successful mutation publishes a [`LedgerEvent`] through the
//! [`super::EventBus`]. The embedding application subscribes to drive
//! user-facing notifications and view refreshes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::deposit_status::DepositStatus;
use super::ids::{ChallengeId, DepositId, OwnerId};

/// Domain event emitted after every state mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Emitted when a challenge and its deposit plan are created.
    ChallengeCreated {
        /// Challenge identifier.
        challenge_id: ChallengeId,
        /// Owning user.
        owner: OwnerId,
        /// Savings goal in whole currency units.
        target: i64,
        /// Number of obligations in the generated plan.
        deposit_count: usize,
        /// Creation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted when a challenge and its obligations are removed.
    ChallengeRemoved {
        /// Challenge identifier.
        challenge_id: ChallengeId,
        /// Owning user.
        owner: OwnerId,
        /// Removal timestamp.
        timestamp: DateTime<Utc>,
    },

    /// Emitted after a successful deposit status transition.
    DepositTransitioned {
        /// Owning challenge.
        challenge_id: ChallengeId,
        /// The obligation that changed.
        deposit_id: DepositId,
        /// Status before the transition.
        from: DepositStatus,
        /// Status after the transition.
        to: DepositStatus,
        /// Transition timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Returns the challenge ID associated with this event.
    #[must_use]
    pub fn challenge_id(&self) -> ChallengeId {
        match self {
            Self::ChallengeCreated { challenge_id, .. }
            | Self::ChallengeRemoved { challenge_id, .. }
            | Self::DepositTransitioned { challenge_id, .. } => *challenge_id,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ChallengeCreated { .. } => "challenge_created",
            Self::ChallengeRemoved { .. } => "challenge_removed",
            Self::DepositTransitioned { .. } => "deposit_transitioned",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn challenge_created_event_type() {
        let event = LedgerEvent::ChallengeCreated {
            challenge_id: ChallengeId::new(),
            owner: OwnerId::new(),
            target: 40_200,
            deposit_count: 400,
            timestamp: Utc::now(),
        };
        assert_eq!(event.event_type_str(), "challenge_created");
    }

    #[test]
    fn deposit_transitioned_serializes() {
        let event = LedgerEvent::DepositTransitioned {
            challenge_id: ChallengeId::new(),
            deposit_id: DepositId::new(),
            from: DepositStatus::Pending,
            to: DepositStatus::Completed,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event);
        assert!(json.is_ok());
        let json_str = json.unwrap_or_default();
        assert!(json_str.contains("deposit_transitioned"));
        assert!(json_str.contains("\"completed\""));
    }

    #[test]
    fn challenge_id_accessor() {
        let id = ChallengeId::new();
        let event = LedgerEvent::ChallengeRemoved {
            challenge_id: id,
            owner: OwnerId::new(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.challenge_id(), id);
    }
}
