//! # Domain Invariants
//!
//! Business rules shared by the budget components. Pure functions, no state.

use super::entities::{BlockBudget, TokenEpochUsage};
use super::value_objects::UsdValue;
use primitive_types::U256;

/// Lazy reset: a counter stored under `stored_key` is only meaningful while
/// the current key (block number, slot or epoch index) is the same.
///
/// Any difference resets, including a key moving backwards.
pub fn effective_value<T: Default>(stored_key: u64, stored_value: T, current_key: u64) -> T {
    if stored_key == current_key {
        stored_value
    } else {
        T::default()
    }
}

/// Invariant: committed block consumption never exceeds an enabled cap.
pub fn invariant_block_within_cap(budget: &BlockBudget) -> bool {
    budget.cap_usd.is_zero() || budget.consumed_usd <= budget.cap_usd
}

/// Invariant: committed epoch usage never exceeds a non-zero threshold.
pub fn invariant_epoch_within_threshold(usage: &TokenEpochUsage) -> bool {
    usage.threshold.is_zero() || usage.used <= usage.threshold
}

/// Invariant: per-transaction bounds are non-empty and positive.
pub fn invariant_cap_range(min: UsdValue, max: UsdValue) -> bool {
    !min.is_zero() && min <= max
}

/// Epoch index for `now`. Callers guarantee `duration > 0`.
pub fn epoch_index(now: u64, duration: u64) -> u64 {
    now / duration
}

/// `used + amount <= threshold`, with overflow counted as exceeding.
pub fn fits_threshold(used: U256, amount: U256, threshold: U256) -> Option<U256> {
    used.checked_add(amount).filter(|total| *total <= threshold)
}
