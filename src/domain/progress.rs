//! Aggregate progress derived from an obligation set.

use serde::Serialize;

use super::deposit::DepositObligation;
use super::deposit_status::DepositStatus;

/// Aggregate progress of a challenge, derived on demand.
///
/// A pure read over the current obligation set; nothing here is stored.
/// `completion_percent` is unclamped; a bounded progress bar clamps to
/// `[0, 100]` at presentation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChallengeProgress {
    /// Sum of completed deposit values.
    pub accumulated: i64,

    /// Target minus accumulated. Reported even when negative, although
    /// that is unreachable under normal use since the obligation values
    /// sum to the target by construction.
    pub remaining: i64,

    /// Accumulated over target as a percentage, unclamped.
    pub completion_percent: f64,

    /// Number of completed obligations.
    pub completed_count: usize,

    /// Number of skipped obligations.
    pub skipped_count: usize,
}

impl ChallengeProgress {
    /// Computes progress for the given target and obligation set.
    #[must_use]
    pub fn compute(target: i64, deposits: &[DepositObligation]) -> Self {
        let mut accumulated: i64 = 0;
        let mut completed_count = 0;
        let mut skipped_count = 0;
        for deposit in deposits {
            match deposit.status {
                DepositStatus::Completed => {
                    accumulated += i64::from(deposit.value);
                    completed_count += 1;
                }
                DepositStatus::Skipped => skipped_count += 1,
                DepositStatus::Pending => {}
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let completion_percent = if target > 0 {
            accumulated as f64 / target as f64 * 100.0
        } else {
            0.0
        };

        Self {
            accumulated,
            remaining: target - accumulated,
            completion_percent,
            completed_count,
            skipped_count,
        }
    }

    /// `true` once the accumulated amount has reached the target.
    ///
    /// Purely derived; never stored as a flag.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion_percent >= 100.0
    }
}
