//! # Inbound Ports
//!
//! API trait defining what the gateway admission core can do.

use super::outbound::{PriceFeed, SequencerFeed};
use crate::algorithms::LedgerSnapshot;
use crate::domain::{
    Address, AdmissionDecision, AdmissionError, AdmissionReceipt, Asset, RevertInstructions,
    UniversalTxRequest, UsdValue,
};
use primitive_types::U256;
use std::sync::Arc;

/// Gateway API - inbound port.
pub trait GatewayApi: Send + Sync {
    /// Admit a deposit, move its legs into custody and emit `UniversalTx`.
    ///
    /// `native_amount` is the native value sent with the request.
    fn send_universal_tx(
        &self,
        sender: Address,
        request: UniversalTxRequest,
        native_amount: U256,
    ) -> Result<AdmissionReceipt, AdmissionError>;

    /// Run every admission check without recording anything.
    fn preview(
        &self,
        sender: Address,
        request: &UniversalTxRequest,
        native_amount: U256,
    ) -> AdmissionDecision;

    /// Release custody to `recipient` (TSS only).
    fn withdraw(
        &self,
        caller: Address,
        asset: Asset,
        amount: U256,
        recipient: Address,
    ) -> Result<(), AdmissionError>;

    /// Refund a failed deposit per its revert instructions (TSS only).
    fn revert_deposit(
        &self,
        caller: Address,
        asset: Asset,
        amount: U256,
        revert_instruction: RevertInstructions,
    ) -> Result<(), AdmissionError>;

    /// Replace the per-transaction USD bounds (Admin).
    fn set_caps(&self, caller: Address, min_usd: UsdValue, max_usd: UsdValue)
        -> Result<(), AdmissionError>;

    /// Replace the per-block USD cap, 0 disables (Admin).
    fn set_block_cap(&self, caller: Address, cap_usd: UsdValue) -> Result<(), AdmissionError>;

    /// Set an asset's per-epoch threshold, 0 marks it unsupported (Admin).
    fn set_token_threshold(
        &self,
        caller: Address,
        asset: Asset,
        threshold: U256,
    ) -> Result<(), AdmissionError>;

    /// Set the epoch length, 0 disables rate limiting (Admin).
    fn set_epoch_duration(&self, caller: Address, seconds: u64) -> Result<(), AdmissionError>;

    /// Replace the price feed (Admin).
    fn set_oracle_source(
        &self,
        caller: Address,
        feed: Arc<dyn PriceFeed>,
    ) -> Result<(), AdmissionError>;

    /// Set the staleness window, 0 disables (Admin).
    fn set_oracle_stale_period(&self, caller: Address, seconds: u64)
        -> Result<(), AdmissionError>;

    /// Install or remove the sequencer uptime gate (Admin).
    fn set_sequencer_feed(
        &self,
        caller: Address,
        feed: Option<Arc<dyn SequencerFeed>>,
        grace_period_secs: u64,
    ) -> Result<(), AdmissionError>;

    /// Engage the pause (Pauser or Admin).
    fn pause(&self, caller: Address) -> Result<(), AdmissionError>;

    /// Release the pause (Pauser or Admin).
    fn unpause(&self, caller: Address) -> Result<(), AdmissionError>;

    /// USD consumed in the current block.
    fn block_consumed_usd(&self) -> UsdValue;

    /// `(used, remaining)` for `asset` in the current epoch.
    fn token_usage(&self, asset: &Asset) -> Result<(U256, U256), AdmissionError>;

    /// Current native-amount bounds of the instant route. Informational.
    fn native_bounds(&self) -> Result<(U256, U256), AdmissionError>;

    /// Copy of the ledger store.
    fn ledger_snapshot(&self) -> LedgerSnapshot;
}
