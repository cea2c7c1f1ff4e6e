//! # Block Budget Ledger
//!
//! Shared USD budget per ordering unit (block number on EVM, slot on
//! Solana). Resets lazily: a stored total only counts while the key matches.

use crate::domain::{
    effective_value, invariant_block_within_cap, AdmissionError, BlockBudget, UsdValue,
};

impl BlockBudget {
    /// Next record if `usd` fits in `block_key`, without writing.
    ///
    /// `Ok(None)` when the budget is disabled (cap 0).
    pub fn plan_consume(
        &self,
        usd: UsdValue,
        block_key: u64,
    ) -> Result<Option<BlockBudget>, AdmissionError> {
        if self.cap_usd.is_zero() {
            return Ok(None);
        }
        let consumed = effective_value(self.block_key, self.consumed_usd, block_key);
        match consumed.checked_add(usd) {
            Some(total) if total <= self.cap_usd => Ok(Some(BlockBudget {
                block_key,
                consumed_usd: total,
                cap_usd: self.cap_usd,
            })),
            _ => Err(AdmissionError::BlockCapExceeded {
                requested: usd,
                consumed,
                cap: self.cap_usd,
            }),
        }
    }

    /// Value consumed in `block_key` as seen from this record.
    pub fn consumed_at(&self, block_key: u64) -> UsdValue {
        effective_value(self.block_key, self.consumed_usd, block_key)
    }
}

/// Per-block USD ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockBudgetLedger {
    budget: BlockBudget,
}

impl BlockBudgetLedger {
    /// Ledger with the given cap (0 disables).
    pub fn new(cap_usd: UsdValue) -> Self {
        Self {
            budget: BlockBudget {
                cap_usd,
                ..BlockBudget::default()
            },
        }
    }

    /// Stored record.
    pub fn budget(&self) -> BlockBudget {
        self.budget
    }

    /// Consume `usd` in `block_key`, writing only on success.
    pub fn try_consume(&mut self, usd: UsdValue, block_key: u64) -> Result<(), AdmissionError> {
        if let Some(next) = self.budget.plan_consume(usd, block_key)? {
            self.apply(next);
        }
        Ok(())
    }

    /// Store a record produced by [`BlockBudget::plan_consume`].
    pub(crate) fn apply(&mut self, next: BlockBudget) {
        debug_assert!(invariant_block_within_cap(&next));
        self.budget.block_key = next.block_key;
        self.budget.consumed_usd = next.consumed_usd;
    }

    /// Read-only view of consumption in `block_key`.
    pub fn consumed_at(&self, block_key: u64) -> UsdValue {
        self.budget.consumed_at(block_key)
    }

    /// Current cap.
    pub fn cap(&self) -> UsdValue {
        self.budget.cap_usd
    }

    /// Replace the cap. Stored consumption is left as is.
    pub fn set_cap(&mut self, cap_usd: UsdValue) {
        self.budget.cap_usd = cap_usd;
    }
}
