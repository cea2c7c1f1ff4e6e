//! # Price Oracle
//!
//! Sanitizes feed answers into an 18-decimal USD price and converts native
//! amounts to USD. The feed is re-read on every call; nothing is cached.
//!
//! ## Checks (in order)
//!
//! 1. Sequencer up and past its grace period (when a sequencer feed is set)
//! 2. Positive answer from a completed round
//! 3. `answered_in_round >= round_id`
//! 4. Freshness (`now - updated_at <= stale_period`, 0 disables)
//! 5. Decimals in `0..=18` (`None` or 0 fall back to 8)

use crate::domain::{AdmissionError, PriceQuote, UsdValue, USD_DECIMALS};
use crate::ports::{PriceFeed, SequencerFeed};
use primitive_types::{U256, U512};
use std::sync::Arc;
use tracing::debug;

/// Decimals assumed when the feed reports none (or zero).
pub const DEFAULT_FEED_DECIMALS: u8 = 8;

/// Decimals of the native asset on EVM chains.
pub const EVM_NATIVE_DECIMALS: u8 = 18;

/// Decimals of the native asset on Solana (lamports).
pub const SOLANA_NATIVE_DECIMALS: u8 = 9;

#[derive(Clone)]
struct SequencerCheck {
    feed: Arc<dyn SequencerFeed>,
    grace_period_secs: u64,
}

/// USD price oracle for the native asset.
#[derive(Clone)]
pub struct PriceOracle {
    feed: Arc<dyn PriceFeed>,
    sequencer: Option<SequencerCheck>,
    stale_period_secs: u64,
    native_decimals: u8,
}

impl PriceOracle {
    /// Oracle over `feed` with the given staleness window (0 disables).
    pub fn new(feed: Arc<dyn PriceFeed>, stale_period_secs: u64) -> Self {
        Self {
            feed,
            sequencer: None,
            stale_period_secs,
            native_decimals: EVM_NATIVE_DECIMALS,
        }
    }

    /// Set the native asset's decimals (18 on EVM, 9 on Solana).
    pub fn with_native_decimals(mut self, native_decimals: u8) -> Self {
        self.native_decimals = native_decimals;
        self
    }

    /// Gate quotes on an L2 sequencer uptime feed.
    pub fn with_sequencer(mut self, feed: Arc<dyn SequencerFeed>, grace_period_secs: u64) -> Self {
        self.set_sequencer(Some(feed), grace_period_secs);
        self
    }

    /// Replace the price feed.
    pub fn set_feed(&mut self, feed: Arc<dyn PriceFeed>) {
        self.feed = feed;
    }

    /// Replace or remove the sequencer gate.
    pub fn set_sequencer(&mut self, feed: Option<Arc<dyn SequencerFeed>>, grace_period_secs: u64) {
        self.sequencer = feed.map(|feed| SequencerCheck {
            feed,
            grace_period_secs,
        });
    }

    /// Set the staleness window (0 disables).
    pub fn set_stale_period(&mut self, stale_period_secs: u64) {
        self.stale_period_secs = stale_period_secs;
    }

    /// Configured staleness window.
    pub fn stale_period_secs(&self) -> u64 {
        self.stale_period_secs
    }

    /// Native asset decimals.
    pub fn native_decimals(&self) -> u8 {
        self.native_decimals
    }

    /// Whether a sequencer gate is installed.
    pub fn has_sequencer(&self) -> bool {
        self.sequencer.is_some()
    }

    /// Fetch and validate the current price.
    pub fn quote(&self, now: u64) -> Result<PriceQuote, AdmissionError> {
        if let Some(check) = &self.sequencer {
            let status = check.feed.status()?;
            if !status.is_up {
                return Err(AdmissionError::OracleInvalid("sequencer is down".to_string()));
            }
            let uptime = now.saturating_sub(status.started_at);
            if uptime < check.grace_period_secs {
                return Err(AdmissionError::OracleInvalid(format!(
                    "sequencer grace period not over ({uptime}s of {}s)",
                    check.grace_period_secs
                )));
            }
        }

        let round = self.feed.latest_round_data()?;
        if round.answer <= 0 {
            return Err(AdmissionError::OracleInvalid(format!(
                "non-positive answer {}",
                round.answer
            )));
        }
        if round.updated_at == 0 {
            return Err(AdmissionError::OracleInvalid(format!(
                "round {} incomplete",
                round.round_id
            )));
        }
        if round.answered_in_round < round.round_id {
            return Err(AdmissionError::OracleRoundInconsistent {
                round_id: round.round_id,
                answered_in_round: round.answered_in_round,
            });
        }

        let age_secs = now.saturating_sub(round.updated_at);
        if self.stale_period_secs > 0 && age_secs > self.stale_period_secs {
            return Err(AdmissionError::OracleStale {
                age_secs,
                stale_period_secs: self.stale_period_secs,
            });
        }

        let decimals = match self.feed.decimals() {
            None | Some(0) => DEFAULT_FEED_DECIMALS,
            Some(d) if d > USD_DECIMALS => {
                return Err(AdmissionError::OracleInvalid(format!(
                    "feed decimals {d} exceed {USD_DECIMALS}"
                )))
            }
            Some(d) => d,
        };

        let factor = U256::exp10((USD_DECIMALS - decimals) as usize);
        let price_usd_scaled = U256::from(round.answer as u128).saturating_mul(factor);

        debug!(
            round_id = round.round_id,
            decimals,
            age_secs,
            "[pg-admission] oracle quote accepted"
        );

        Ok(PriceQuote {
            price_usd_scaled,
            source_decimals: decimals,
            observed_at: round.updated_at,
            round_id: round.round_id,
        })
    }

    /// USD value of `native_amount` at the current price.
    pub fn quote_as_usd(&self, native_amount: U256, now: u64) -> Result<UsdValue, AdmissionError> {
        let quote = self.quote(now)?;
        Ok(usd_value_of(native_amount, &quote, self.native_decimals))
    }
}

/// `amount * price / 10^native_decimals`, floored. Saturates at `U256::MAX`.
pub fn usd_value_of(amount: U256, quote: &PriceQuote, native_decimals: u8) -> UsdValue {
    let product: U512 = amount.full_mul(quote.price_usd_scaled);
    let value = product / U512::exp10(native_decimals as usize);
    UsdValue::from_raw(U256::try_from(value).unwrap_or(U256::MAX))
}
