//! # USD Cap Policy
//!
//! Inclusive per-transaction USD bounds for the instant (gas) route.

use super::price_oracle::usd_value_of;
use crate::domain::{AdmissionError, CapConfig, PriceQuote, UsdValue};
use primitive_types::{U256, U512};

/// Per-transaction USD cap check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UsdCapPolicy {
    caps: CapConfig,
    native_decimals: u8,
}

impl UsdCapPolicy {
    /// Policy over validated bounds.
    pub fn new(caps: CapConfig, native_decimals: u8) -> Self {
        Self {
            caps,
            native_decimals,
        }
    }

    /// Current bounds.
    pub fn caps(&self) -> CapConfig {
        self.caps
    }

    /// Replace the bounds (0 < min <= max).
    pub fn set_caps(&mut self, min_usd: UsdValue, max_usd: UsdValue) -> Result<(), AdmissionError> {
        self.caps = CapConfig::new(min_usd, max_usd)?;
        Ok(())
    }

    /// Quote `native_amount` and check it against the bounds. Returns the
    /// USD value for the block budget.
    pub fn check_tx_cap(
        &self,
        quote: &PriceQuote,
        native_amount: U256,
    ) -> Result<UsdValue, AdmissionError> {
        let usd = usd_value_of(native_amount, quote, self.native_decimals);
        self.check_usd(usd)?;
        Ok(usd)
    }

    /// Check an already converted value.
    pub fn check_usd(&self, usd: UsdValue) -> Result<(), AdmissionError> {
        if usd < self.caps.min_usd || usd > self.caps.max_usd {
            return Err(AdmissionError::AmountOutOfRange {
                usd,
                min: self.caps.min_usd,
                max: self.caps.max_usd,
            });
        }
        Ok(())
    }

    /// Approximate native bounds at `quote`: `(ceil(min), floor(max))`.
    ///
    /// Informational. Rounding near the edges can disagree with
    /// [`check_tx_cap`](Self::check_tx_cap), which is authoritative.
    pub fn native_bounds(&self, quote: &PriceQuote) -> (U256, U256) {
        let scale = U256::exp10(self.native_decimals as usize);
        let price = U512::from(quote.price_usd_scaled);
        if price.is_zero() {
            return (U256::MAX, U256::MAX);
        }

        let min_num = self.caps.min_usd.raw().full_mul(scale);
        let (min_q, min_r) = min_num.div_mod(price);
        let min_native = if min_r.is_zero() {
            min_q
        } else {
            min_q + U512::one()
        };
        let max_native = self.caps.max_usd.raw().full_mul(scale) / price;

        (saturate(min_native), saturate(max_native))
    }
}

fn saturate(value: U512) -> U256 {
    U256::try_from(value).unwrap_or(U256::MAX)
}
