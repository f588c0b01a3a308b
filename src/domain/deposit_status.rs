//! Deposit fulfillment status and its transition table.
//!
//! The three states form a cycle driven by repeated toggling in the
//! deposit grid: `Pending → Completed → Skipped → Pending → …`. An
//! explicit `Completed → Pending` undo path is also allowed. There is no
//! terminal state; every state is revisitable.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Fulfillment status of a single deposit obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositStatus {
    /// Not yet fulfilled.
    Pending,
    /// The deposit has been made.
    Completed,
    /// Deliberately passed over.
    Skipped,
}

impl DepositStatus {
    /// Returns the status as its storage encoding.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
        }
    }

    /// Returns `true` if the move from `self` to `to` is allowed.
    ///
    /// The full table:
    ///
    /// | From      | To        |
    /// |-----------|-----------|
    /// | Pending   | Completed |
    /// | Completed | Skipped   |
    /// | Skipped   | Pending   |
    /// | Completed | Pending   |
    ///
    /// Everything else is rejected, including self-transitions and the
    /// direct `Skipped → Completed` jump.
    #[must_use]
    pub const fn can_transition_to(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Completed)
                | (Self::Completed, Self::Skipped)
                | (Self::Skipped, Self::Pending)
                | (Self::Completed, Self::Pending)
        )
    }

    /// Returns the next status in the primary toggle cycle.
    #[must_use]
    pub const fn next_in_cycle(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Skipped,
            Self::Skipped => Self::Pending,
        }
    }
}

impl fmt::Display for DepositStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepositStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "skipped" => Ok(Self::Skipped),
            other => Err(LedgerError::Internal(format!(
                "unknown deposit status: {other}"
            ))),
        }
    }
}
