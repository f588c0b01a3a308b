//! Deterministic deposit plan generation.
//!
//! The savings challenge follows a fixed "1 to 200 and back" plan:
//! deposits of 1, 2, … 200 followed by 200, 199, … 1. The raw plan has
//! 400 entries and sums to 40,200 (every value in `[1, 200]` appears
//! exactly twice). The 40,000 variant drops a single 200 from the plan.

use crate::error::LedgerError;

/// Highest single deposit value in the plan.
pub const PEAK_VALUE: i32 = 200;

/// Sum of the full 400-deposit plan.
pub const TARGET_FULL: i64 = 40_200;

/// Sum of the reduced 399-deposit plan.
pub const TARGET_REDUCED: i64 = 40_000;

/// Generates the ordered deposit values for a supported target.
///
/// For [`TARGET_REDUCED`] the first occurrence of 200, scanning from the
/// start (the ascending run's peak), is removed, shortening the plan by
/// one position and the sum by exactly 200. The removal position is
/// user-visible in the deposit grid, so it must not move to the end or
/// into the descending run.
///
/// # Errors
///
/// Returns [`LedgerError::InvalidTarget`] for any target other than
/// [`TARGET_FULL`] or [`TARGET_REDUCED`]; unsupported targets are never
/// coerced to a supported one.
pub fn generate(target: i64) -> Result<Vec<i32>, LedgerError> {
    match target {
        TARGET_FULL | TARGET_REDUCED => {}
        other => return Err(LedgerError::InvalidTarget(other)),
    }

    let mut values: Vec<i32> = (1..=PEAK_VALUE).chain((1..=PEAK_VALUE).rev()).collect();

    if target == TARGET_REDUCED
        && let Some(pos) = values.iter().position(|v| *v == PEAK_VALUE)
    {
        values.remove(pos);
    }

    Ok(values)
}
