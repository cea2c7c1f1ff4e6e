//! # Epoch Rate Limiter
//!
//! Per-asset consumption budget over fixed epochs of `epoch_duration`
//! seconds. `epoch_index = now / epoch_duration`; counters reset lazily when
//! the index changes. A duration of 0 turns rate limiting off but assets
//! still need a non-zero threshold to be accepted.

use crate::domain::{
    effective_value, epoch_index, fits_threshold, invariant_epoch_within_threshold,
    AdmissionError, Asset, TokenEpochUsage,
};
use primitive_types::U256;
use std::collections::BTreeMap;

impl TokenEpochUsage {
    /// Next record if `amount` fits in `epoch_now`, without writing.
    pub fn plan_consume(
        &self,
        amount: U256,
        epoch_now: u64,
    ) -> Result<TokenEpochUsage, AdmissionError> {
        if self.threshold.is_zero() {
            return Err(AdmissionError::TokenUnsupported(self.asset));
        }
        let used = effective_value(self.epoch_index, self.used, epoch_now);
        let total = fits_threshold(used, amount, self.threshold).ok_or_else(|| {
            AdmissionError::RateLimitExceeded {
                asset: self.asset,
                requested: amount,
                used,
                threshold: self.threshold,
            }
        })?;
        Ok(TokenEpochUsage {
            epoch_index: epoch_now,
            used: total,
            ..*self
        })
    }
}

/// Plan consumption against `record` under `epoch_duration`.
///
/// `Ok(None)`: supported asset, rate limiting off, nothing to record.
pub fn plan_epoch_consume(
    asset: Asset,
    record: Option<&TokenEpochUsage>,
    amount: U256,
    now: u64,
    epoch_duration: u64,
) -> Result<Option<TokenEpochUsage>, AdmissionError> {
    let record = match record {
        Some(record) if !record.threshold.is_zero() => record,
        _ => return Err(AdmissionError::TokenUnsupported(asset)),
    };
    if epoch_duration == 0 {
        return Ok(None);
    }
    record
        .plan_consume(amount, epoch_index(now, epoch_duration))
        .map(Some)
}

/// Per-asset epoch counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EpochRateLimiter {
    epoch_duration: u64,
    tokens: BTreeMap<Asset, TokenEpochUsage>,
}

impl EpochRateLimiter {
    /// Limiter with the given epoch length in seconds (0 disables limiting).
    pub fn new(epoch_duration: u64) -> Self {
        Self {
            epoch_duration,
            tokens: BTreeMap::new(),
        }
    }

    /// Consume `amount` of `asset` at `now`, writing only on success.
    pub fn try_consume(
        &mut self,
        asset: Asset,
        amount: U256,
        now: u64,
    ) -> Result<(), AdmissionError> {
        let planned = plan_epoch_consume(
            asset,
            self.tokens.get(&asset),
            amount,
            now,
            self.epoch_duration,
        )?;
        if let Some(next) = planned {
            self.apply(next);
        }
        Ok(())
    }

    /// Store a record produced by [`plan_epoch_consume`].
    pub(crate) fn apply(&mut self, next: TokenEpochUsage) {
        debug_assert!(invariant_epoch_within_threshold(&next));
        self.tokens.insert(next.asset, next);
    }

    /// `(used, remaining)` in the epoch containing `now`. Read-only.
    pub fn usage(&self, asset: &Asset, now: u64) -> Result<(U256, U256), AdmissionError> {
        let record = self
            .tokens
            .get(asset)
            .filter(|r| !r.threshold.is_zero())
            .ok_or(AdmissionError::TokenUnsupported(*asset))?;
        let used = if self.epoch_duration == 0 {
            U256::zero()
        } else {
            effective_value(
                record.epoch_index,
                record.used,
                epoch_index(now, self.epoch_duration),
            )
        };
        Ok((used, record.threshold.saturating_sub(used)))
    }

    /// Set the per-epoch threshold for `asset` (0 marks it unsupported).
    /// Usage already recorded in the current epoch is kept.
    pub fn set_threshold(&mut self, asset: Asset, threshold: U256) {
        self.tokens
            .entry(asset)
            .and_modify(|r| r.threshold = threshold)
            .or_insert_with(|| TokenEpochUsage::new(asset, threshold));
    }

    /// Threshold for `asset` (0 when never configured).
    pub fn threshold(&self, asset: &Asset) -> U256 {
        self.tokens
            .get(asset)
            .map(|r| r.threshold)
            .unwrap_or_default()
    }

    /// Change the epoch length. Stored indices are not rewritten; records
    /// from the old length reset on their next access unless the index
    /// happens to coincide.
    pub fn set_epoch_duration(&mut self, epoch_duration: u64) {
        self.epoch_duration = epoch_duration;
    }

    /// Epoch length in seconds.
    pub fn epoch_duration(&self) -> u64 {
        self.epoch_duration
    }

    /// Stored record for `asset`.
    pub fn record(&self, asset: &Asset) -> Option<&TokenEpochUsage> {
        self.tokens.get(asset)
    }

    /// All stored records.
    pub fn records(&self) -> &BTreeMap<Asset, TokenEpochUsage> {
        &self.tokens
    }
}
