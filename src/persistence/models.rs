//! Database row models for challenges and deposits.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    Challenge, ChallengeId, DepositId, DepositObligation, DepositStatus, OwnerId,
};
use crate::error::LedgerError;

/// A stored challenge row from the `challenges` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChallengeRow {
    /// Challenge UUID.
    pub id: Uuid,
    /// Owning user UUID (unique across the table).
    pub owner: Uuid,
    /// Savings goal in whole currency units.
    pub target: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<ChallengeRow> for Challenge {
    fn from(row: ChallengeRow) -> Self {
        Self {
            id: ChallengeId::from_uuid(row.id),
            owner: OwnerId::from_uuid(row.owner),
            target: row.target,
            created_at: row.created_at,
        }
    }
}

/// A stored deposit row from the `deposits` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DepositRow {
    /// Deposit UUID.
    pub id: Uuid,
    /// Owning challenge UUID.
    pub challenge_id: Uuid,
    /// Deposit amount in whole currency units.
    pub value: i32,
    /// 1-based plan position.
    pub sequence_order: i32,
    /// Status storage encoding (`pending`, `completed`, `skipped`).
    pub status: String,
    /// Completion timestamp, set only while completed.
    pub completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<DepositRow> for DepositObligation {
    type Error = LedgerError;

    fn try_from(row: DepositRow) -> Result<Self, Self::Error> {
        let status = DepositStatus::from_str(&row.status)?;
        Ok(Self {
            id: DepositId::from_uuid(row.id),
            challenge_id: ChallengeId::from_uuid(row.challenge_id),
            value: row.value,
            sequence_order: row.sequence_order,
            status,
            completed_at: row.completed_at,
        })
    }
}
