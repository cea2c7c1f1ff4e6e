//! # Ledger Store
//!
//! Single mutation point for the block budget and epoch counters.
//!
//! [`LedgerHandle::begin`] locks the store and returns a [`LedgerTxn`] that
//! keeps the lock for the whole check, stage, transfer, commit sequence.
//! Staged records live in the transaction until [`LedgerTxn::commit`];
//! dropping the transaction discards them.

use super::block_budget::BlockBudgetLedger;
use super::epoch_limiter::{plan_epoch_consume, EpochRateLimiter};
use crate::domain::{AdmissionError, Asset, BlockBudget, TokenEpochUsage, UsdValue};
use parking_lot::{Mutex, MutexGuard};
use primitive_types::U256;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Persistent admission counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LedgerState {
    /// Per-block USD budget.
    pub block: BlockBudgetLedger,
    /// Per-asset epoch counters.
    pub epochs: EpochRateLimiter,
}

impl LedgerState {
    /// Comparable copy of the stored records.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            block_budget: self.block.budget(),
            epoch_duration: self.epochs.epoch_duration(),
            tokens: self.epochs.records().clone(),
        }
    }
}

/// Point-in-time copy of the ledger, for comparisons in tests and tooling.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LedgerSnapshot {
    /// Block budget record.
    pub block_budget: BlockBudget,
    /// Epoch length in seconds.
    pub epoch_duration: u64,
    /// Per-asset epoch records.
    pub tokens: BTreeMap<Asset, TokenEpochUsage>,
}

/// Shared handle to the ledger store.
#[derive(Clone, Debug, Default)]
pub struct LedgerHandle {
    inner: Arc<Mutex<LedgerState>>,
}

impl LedgerHandle {
    /// Store with the given block cap and epoch length.
    pub fn new(block_cap: UsdValue, epoch_duration: u64) -> Self {
        Self::from_state(LedgerState {
            block: BlockBudgetLedger::new(block_cap),
            epochs: EpochRateLimiter::new(epoch_duration),
        })
    }

    /// Wrap existing state.
    pub fn from_state(state: LedgerState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Lock the store and open a transaction.
    pub fn begin(&self) -> LedgerTxn<'_> {
        LedgerTxn {
            guard: self.inner.lock(),
            staged_block: None,
            staged_tokens: BTreeMap::new(),
        }
    }

    /// Run `f` with exclusive access to the stored state.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut LedgerState) -> R) -> R {
        f(&mut *self.inner.lock())
    }

    /// Comparable copy of the stored records.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.inner.lock().snapshot()
    }

    /// Block consumption in `block_key`. Read-only.
    pub fn consumed_at(&self, block_key: u64) -> UsdValue {
        self.inner.lock().block.consumed_at(block_key)
    }

    /// `(used, remaining)` for `asset` at `now`. Read-only.
    pub fn usage(&self, asset: &Asset, now: u64) -> Result<(U256, U256), AdmissionError> {
        self.inner.lock().epochs.usage(asset, now)
    }
}

/// Open ledger transaction. Holds the store lock until dropped.
pub struct LedgerTxn<'a> {
    guard: MutexGuard<'a, LedgerState>,
    staged_block: Option<BlockBudget>,
    staged_tokens: BTreeMap<Asset, TokenEpochUsage>,
}

impl LedgerTxn<'_> {
    /// Stage `usd` against the block budget of `block_key`.
    pub fn stage_block(&mut self, usd: UsdValue, block_key: u64) -> Result<(), AdmissionError> {
        let current = self.staged_block.unwrap_or_else(|| self.guard.block.budget());
        if let Some(next) = current.plan_consume(usd, block_key)? {
            self.staged_block = Some(next);
        }
        Ok(())
    }

    /// Stage `amount` of `asset` against the epoch containing `now`.
    ///
    /// Returns the epoch charged, or `None` when rate limiting is off.
    pub fn stage_epoch(
        &mut self,
        asset: Asset,
        amount: U256,
        now: u64,
    ) -> Result<Option<u64>, AdmissionError> {
        let current = self
            .staged_tokens
            .get(&asset)
            .or_else(|| self.guard.epochs.record(&asset));
        let planned = plan_epoch_consume(
            asset,
            current,
            amount,
            now,
            self.guard.epochs.epoch_duration(),
        )?;
        Ok(planned.map(|next| {
            let epoch = next.epoch_index;
            self.staged_tokens.insert(asset, next);
            epoch
        }))
    }

    /// Whether anything has been staged.
    pub fn is_dirty(&self) -> bool {
        self.staged_block.is_some() || !self.staged_tokens.is_empty()
    }

    /// Apply staged records and release the lock.
    pub fn commit(mut self) {
        if let Some(block) = self.staged_block.take() {
            self.guard.block.apply(block);
        }
        for (_, usage) in std::mem::take(&mut self.staged_tokens) {
            self.guard.epochs.apply(usage);
        }
    }

    /// Discard staged records and release the lock.
    pub fn rollback(self) {}
}
