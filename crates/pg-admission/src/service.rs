//! # Admission Controller
//!
//! Implements [`GatewayApi`]: classifies requests, prices the gas leg,
//! stages block and epoch consumption in a ledger transaction, moves the
//! legs into custody and commits only once every transfer succeeded.
//!
//! ## Rule order
//!
//! 1. Pause switch
//! 2. Classification and amount consistency
//! 3. Revert recipient
//! 4. Oracle quote and per-transaction USD cap (gas leg)
//! 5. Block budget (gas leg)
//! 6. Epoch rate limit (funds leg)
//! 7. Vault transfers, gas leg first
//!
//! Failures at any step leave the ledger untouched.

use crate::algorithms::{
    plan_legs, LedgerHandle, LedgerSnapshot, LedgerTxn, LegPlan, PriceOracle, UsdCapPolicy,
};
use crate::config::{ConfigError, GatewayConfig};
use crate::domain::{
    Address, AdmissionDecision, AdmissionError, AdmissionPlan, AdmissionReceipt, Asset, CapConfig,
    GatewayEvent, RevertInstructions, Role, TxType, UniversalTxRequest, UsdValue,
};
use crate::metrics;
use crate::ports::{
    AccessControl, ChainClock, EventSink, GatewayApi, PauseSwitch, PriceFeed, SequencerFeed, Vault,
};
use parking_lot::RwLock;
use primitive_types::U256;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Collaborators the controller drives, apart from the price feed.
#[derive(Clone)]
pub struct GatewayDeps {
    /// Custody.
    pub vault: Arc<dyn Vault>,
    /// Role membership.
    pub access: Arc<dyn AccessControl>,
    /// Pause flag.
    pub pause: Arc<dyn PauseSwitch>,
    /// Time and block source.
    pub clock: Arc<dyn ChainClock>,
    /// Event publication.
    pub events: Arc<dyn EventSink>,
}

/// Gateway admission controller.
pub struct AdmissionController {
    oracle: RwLock<PriceOracle>,
    caps: RwLock<UsdCapPolicy>,
    ledger: LedgerHandle,
    deps: GatewayDeps,
}

impl AdmissionController {
    /// Controller over explicit components.
    pub fn new(
        oracle: PriceOracle,
        caps: UsdCapPolicy,
        ledger: LedgerHandle,
        deps: GatewayDeps,
    ) -> Self {
        Self {
            oracle: RwLock::new(oracle),
            caps: RwLock::new(caps),
            ledger,
            deps,
        }
    }

    /// Controller built from configuration. The sequencer gate, if any, is
    /// installed with the configured grace period.
    pub fn from_config(
        config: &GatewayConfig,
        feed: Arc<dyn PriceFeed>,
        sequencer: Option<Arc<dyn SequencerFeed>>,
        deps: GatewayDeps,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut oracle = PriceOracle::new(feed, config.oracle_stale_period_seconds)
            .with_native_decimals(config.native_decimals);
        oracle.set_sequencer(sequencer, config.sequencer_grace_period_seconds);

        let caps = UsdCapPolicy::new(config.caps()?, config.native_decimals);

        let block_cap = config.block_cap()?;
        let ledger = LedgerHandle::new(block_cap, config.epoch_duration_seconds);
        ledger.with_state(|state| {
            for (asset, threshold) in config.thresholds() {
                state.epochs.set_threshold(asset, threshold);
            }
        });

        info!(
            min = %caps.caps().min_usd,
            max = %caps.caps().max_usd,
            block_cap = %block_cap,
            epoch_secs = config.epoch_duration_seconds,
            "[pg-admission] controller configured"
        );

        Ok(Self::new(oracle, caps, ledger, deps))
    }

    /// Shared ledger handle.
    pub fn ledger(&self) -> &LedgerHandle {
        &self.ledger
    }

    /// Current per-transaction bounds.
    pub fn caps(&self) -> CapConfig {
        self.caps.read().caps()
    }

    /// Passes when `caller` holds any of `roles`. The error names the first
    /// role listed, the one the operation is primarily gated on.
    fn require_role(&self, caller: &Address, roles: &[Role]) -> Result<(), AdmissionError> {
        if roles
            .iter()
            .any(|role| self.deps.access.has_role(*role, caller))
        {
            return Ok(());
        }
        Err(AdmissionError::Unauthorized {
            caller: format!("0x{}", hex::encode(caller)),
            role: roles.first().copied().unwrap_or(Role::Admin),
        })
    }

    fn require_unpaused(&self) -> Result<(), AdmissionError> {
        if self.deps.pause.is_paused() {
            return Err(AdmissionError::Paused);
        }
        Ok(())
    }

    /// Checks that need no ledger state. Returns the legs and the gas leg's
    /// USD value.
    fn check_request(
        &self,
        request: &UniversalTxRequest,
        native_amount: U256,
        now: u64,
    ) -> Result<(LegPlan, UsdValue), AdmissionError> {
        self.require_unpaused()?;
        let legs = plan_legs(request, native_amount)?;
        if request.revert_instruction.fund_recipient == [0u8; 32] {
            return Err(AdmissionError::InvalidRecipient);
        }

        if legs.gas_amount.is_zero() {
            return Ok((legs, UsdValue::ZERO));
        }
        let quote = self.oracle.read().quote(now)?;
        let gas_usd = self.caps.read().check_tx_cap(&quote, legs.gas_amount)?;
        Ok((legs, gas_usd))
    }

    /// Stage both budgets. Returns the epoch charged, if any.
    fn stage(
        txn: &mut LedgerTxn<'_>,
        legs: &LegPlan,
        gas_usd: UsdValue,
        now: u64,
        block_key: u64,
    ) -> Result<Option<u64>, AdmissionError> {
        if !legs.gas_amount.is_zero() {
            txn.stage_block(gas_usd, block_key)?;
        }
        match legs.funds {
            Some(leg) => txn.stage_epoch(leg.asset, leg.amount, now),
            None => Ok(None),
        }
    }

    /// Gas leg first, then funds, in one all-or-nothing vault call.
    fn move_into_custody(&self, sender: Address, legs: &LegPlan) -> Result<(), AdmissionError> {
        let mut deposits = Vec::with_capacity(2);
        if !legs.gas_amount.is_zero() {
            deposits.push((Asset::Native, legs.gas_amount));
        }
        if let Some(leg) = legs.funds {
            deposits.push((leg.asset, leg.amount));
        }
        if deposits.is_empty() {
            return Ok(());
        }
        self.deps.vault.deposit_batch(&deposits, sender)
    }

    fn admit(
        &self,
        sender: Address,
        request: UniversalTxRequest,
        native_amount: U256,
    ) -> Result<AdmissionReceipt, AdmissionError> {
        let now = self.deps.clock.now();
        let block_key = self.deps.clock.block_key();

        let (legs, gas_usd) = self.check_request(&request, native_amount, now)?;

        let mut txn = self.ledger.begin();
        let epoch_index = Self::stage(&mut txn, &legs, gas_usd, now, block_key)?;
        if let Err(e) = self.move_into_custody(sender, &legs) {
            warn!(
                sender = %hex::encode(sender),
                error = %e,
                "[pg-admission] transfer failed, staged consumption discarded"
            );
            metrics::record_transfer_failure();
            return Err(e);
        }
        txn.commit();

        metrics::set_block_consumed_usd(self.ledger.consumed_at(block_key).as_dollars_f64());
        self.emit_universal_tx(sender, &request, &legs);

        let plan = AdmissionPlan {
            tx_type: legs.tx_type,
            gas_amount: legs.gas_amount,
            gas_usd,
            funds: legs.funds,
        };
        let receipt = AdmissionReceipt {
            id: Uuid::new_v4(),
            plan,
            block_key,
            epoch_index,
        };
        info!(
            id = %receipt.id,
            tx_type = legs.tx_type.as_str(),
            gas_usd = %gas_usd,
            block_key,
            "[pg-admission] request admitted"
        );
        Ok(receipt)
    }

    fn emit_universal_tx(&self, sender: Address, request: &UniversalTxRequest, legs: &LegPlan) {
        if legs.tx_type.is_gas_route() {
            // Gas always lands in the sender's executor account.
            self.deps.events.emit(GatewayEvent::UniversalTx {
                sender,
                recipient: [0u8; 20],
                asset: Asset::Native,
                amount: legs.gas_amount,
                payload: request.payload.clone(),
                revert_instruction: request.revert_instruction.clone(),
                tx_type: legs.tx_type,
                signature_data: request.signature_data.clone(),
            });
            return;
        }

        if legs.tx_type == TxType::FundsAndPayload && !legs.gas_amount.is_zero() {
            self.deps.events.emit(GatewayEvent::UniversalTx {
                sender,
                recipient: [0u8; 20],
                asset: Asset::Native,
                amount: legs.gas_amount,
                payload: Vec::new(),
                revert_instruction: request.revert_instruction.clone(),
                tx_type: TxType::Gas,
                signature_data: request.signature_data.clone(),
            });
        }
        self.deps.events.emit(GatewayEvent::UniversalTx {
            sender,
            recipient: request.recipient,
            asset: request.asset,
            amount: request.amount,
            payload: request.payload.clone(),
            revert_instruction: request.revert_instruction.clone(),
            tx_type: legs.tx_type,
            signature_data: request.signature_data.clone(),
        });
    }

    fn release(
        &self,
        caller: Address,
        asset: Asset,
        amount: U256,
        recipient: Address,
    ) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Tss])?;
        self.require_unpaused()?;
        if amount.is_zero() {
            return Err(AdmissionError::InvalidAmount("zero release amount".to_string()));
        }
        if recipient == [0u8; 32] {
            return Err(AdmissionError::InvalidRecipient);
        }
        self.deps
            .vault
            .transfer_out(asset, amount, recipient)
            .inspect_err(|_| metrics::record_transfer_failure())
    }

    fn record_outcome<T>(result: &Result<T, AdmissionError>, tx_type: Option<TxType>) {
        match result {
            Ok(_) => {
                if let Some(tx_type) = tx_type {
                    metrics::record_admission(tx_type.as_str());
                }
            }
            Err(e) => {
                debug!(reason = e.kind().as_str(), error = %e, "[pg-admission] request rejected");
                metrics::record_rejection(e.kind().as_str());
            }
        }
    }
}

impl GatewayApi for AdmissionController {
    fn send_universal_tx(
        &self,
        sender: Address,
        request: UniversalTxRequest,
        native_amount: U256,
    ) -> Result<AdmissionReceipt, AdmissionError> {
        let result = self.admit(sender, request, native_amount);
        let tx_type = result.as_ref().ok().map(|r| r.plan.tx_type);
        Self::record_outcome(&result, tx_type);
        result
    }

    fn preview(
        &self,
        _sender: Address,
        request: &UniversalTxRequest,
        native_amount: U256,
    ) -> AdmissionDecision {
        let now = self.deps.clock.now();
        let block_key = self.deps.clock.block_key();
        let result = self
            .check_request(request, native_amount, now)
            .and_then(|(legs, gas_usd)| {
                let mut txn = self.ledger.begin();
                Self::stage(&mut txn, &legs, gas_usd, now, block_key)?;
                txn.rollback();
                Ok(AdmissionPlan {
                    tx_type: legs.tx_type,
                    gas_amount: legs.gas_amount,
                    gas_usd,
                    funds: legs.funds,
                })
            });
        result.into()
    }

    fn withdraw(
        &self,
        caller: Address,
        asset: Asset,
        amount: U256,
        recipient: Address,
    ) -> Result<(), AdmissionError> {
        self.release(caller, asset, amount, recipient)?;
        info!(%asset, %amount, "[pg-admission] funds withdrawn");
        self.deps.events.emit(GatewayEvent::FundsWithdrawn {
            recipient,
            asset,
            amount,
        });
        Ok(())
    }

    fn revert_deposit(
        &self,
        caller: Address,
        asset: Asset,
        amount: U256,
        revert_instruction: RevertInstructions,
    ) -> Result<(), AdmissionError> {
        let recipient = revert_instruction.fund_recipient;
        self.release(caller, asset, amount, recipient)?;
        info!(%asset, %amount, "[pg-admission] deposit reverted");
        self.deps.events.emit(GatewayEvent::DepositReverted {
            recipient,
            asset,
            amount,
            revert_msg: revert_instruction.revert_msg,
        });
        Ok(())
    }

    fn set_caps(
        &self,
        caller: Address,
        min_usd: UsdValue,
        max_usd: UsdValue,
    ) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Admin])?;
        self.caps.write().set_caps(min_usd, max_usd)?;
        info!(min = %min_usd, max = %max_usd, "[pg-admission] caps updated");
        self.deps
            .events
            .emit(GatewayEvent::CapsUpdated { min_usd, max_usd });
        Ok(())
    }

    fn set_block_cap(&self, caller: Address, cap_usd: UsdValue) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Admin])?;
        self.ledger.with_state(|state| state.block.set_cap(cap_usd));
        info!(cap = %cap_usd, "[pg-admission] block cap updated");
        self.deps
            .events
            .emit(GatewayEvent::BlockCapUpdated { cap_usd });
        Ok(())
    }

    fn set_token_threshold(
        &self,
        caller: Address,
        asset: Asset,
        threshold: U256,
    ) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Admin])?;
        self.ledger
            .with_state(|state| state.epochs.set_threshold(asset, threshold));
        info!(%asset, %threshold, "[pg-admission] token threshold updated");
        self.deps
            .events
            .emit(GatewayEvent::TokenThresholdUpdated { asset, threshold });
        Ok(())
    }

    fn set_epoch_duration(&self, caller: Address, seconds: u64) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Admin])?;
        self.ledger
            .with_state(|state| state.epochs.set_epoch_duration(seconds));
        info!(seconds, "[pg-admission] epoch duration updated");
        self.deps
            .events
            .emit(GatewayEvent::EpochDurationUpdated { seconds });
        Ok(())
    }

    fn set_oracle_source(
        &self,
        caller: Address,
        feed: Arc<dyn PriceFeed>,
    ) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Admin])?;
        self.oracle.write().set_feed(feed);
        info!("[pg-admission] oracle source updated");
        self.deps.events.emit(GatewayEvent::OracleSourceUpdated);
        Ok(())
    }

    fn set_oracle_stale_period(&self, caller: Address, seconds: u64) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Admin])?;
        self.oracle.write().set_stale_period(seconds);
        info!(seconds, "[pg-admission] oracle stale period updated");
        self.deps
            .events
            .emit(GatewayEvent::OracleStalePeriodUpdated { seconds });
        Ok(())
    }

    fn set_sequencer_feed(
        &self,
        caller: Address,
        feed: Option<Arc<dyn SequencerFeed>>,
        grace_period_secs: u64,
    ) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Admin])?;
        let enabled = feed.is_some();
        self.oracle.write().set_sequencer(feed, grace_period_secs);
        info!(enabled, grace_period_secs, "[pg-admission] sequencer feed updated");
        self.deps.events.emit(GatewayEvent::SequencerFeedUpdated {
            enabled,
            grace_period_secs,
        });
        Ok(())
    }

    fn pause(&self, caller: Address) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Pauser, Role::Admin])?;
        self.deps.pause.set_paused(true);
        warn!("[pg-admission] gateway paused");
        self.deps.events.emit(GatewayEvent::Paused { by: caller });
        Ok(())
    }

    fn unpause(&self, caller: Address) -> Result<(), AdmissionError> {
        self.require_role(&caller, &[Role::Pauser, Role::Admin])?;
        self.deps.pause.set_paused(false);
        info!("[pg-admission] gateway unpaused");
        self.deps.events.emit(GatewayEvent::Unpaused { by: caller });
        Ok(())
    }

    fn block_consumed_usd(&self) -> UsdValue {
        self.ledger.consumed_at(self.deps.clock.block_key())
    }

    fn token_usage(&self, asset: &Asset) -> Result<(U256, U256), AdmissionError> {
        self.ledger.usage(asset, self.deps.clock.now())
    }

    fn native_bounds(&self) -> Result<(U256, U256), AdmissionError> {
        let quote = self.oracle.read().quote(self.deps.clock.now())?;
        Ok(self.caps.read().native_bounds(&quote))
    }

    fn ledger_snapshot(&self) -> LedgerSnapshot {
        self.ledger.snapshot()
    }
}
