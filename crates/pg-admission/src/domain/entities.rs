//! # Domain Entities
//!
//! Records owned by the admission core plus the request/receipt shapes that
//! cross its boundary.

use super::codec::{dec_u256, hex_array, hex_vec};
use super::errors::{AdmissionError, ErrorKind};
use super::invariants::invariant_cap_range;
use super::value_objects::{Address, Asset, PushAddress, TxType, UsdValue};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw answer of a price feed, Chainlink `latestRoundData` shaped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundData {
    /// Round requested.
    pub round_id: u64,
    /// Signed price in feed decimals.
    pub answer: i128,
    /// Round start (unix secs).
    pub started_at: u64,
    /// Last update (unix secs); 0 means the round never completed.
    pub updated_at: u64,
    /// Round that actually produced the answer.
    pub answered_in_round: u64,
}

/// L2 sequencer uptime report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerStatus {
    /// Sequencer currently producing blocks.
    pub is_up: bool,
    /// When the current status began (unix secs).
    pub started_at: u64,
}

/// Sanitized oracle quote. Never stored: every admission re-queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceQuote {
    /// USD per whole native unit, 18 decimals.
    pub price_usd_scaled: U256,
    /// Decimals the feed answered in (after fallback).
    pub source_decimals: u8,
    /// Feed update time (unix secs).
    pub observed_at: u64,
    /// Round identifier.
    pub round_id: u64,
}

/// Per-transaction USD bounds for the instant route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapConfig {
    /// Inclusive lower bound.
    pub min_usd: UsdValue,
    /// Inclusive upper bound.
    pub max_usd: UsdValue,
}

impl CapConfig {
    /// Build validated bounds (0 < min <= max).
    pub fn new(min_usd: UsdValue, max_usd: UsdValue) -> Result<Self, AdmissionError> {
        if !invariant_cap_range(min_usd, max_usd) {
            return Err(AdmissionError::InvalidCapRange {
                min: min_usd,
                max: max_usd,
            });
        }
        Ok(Self { min_usd, max_usd })
    }
}

/// USD consumed within one ordering unit (block number or slot).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockBudget {
    /// Ordering unit of the last write.
    pub block_key: u64,
    /// Value consumed in `block_key`.
    pub consumed_usd: UsdValue,
    /// Ceiling per unit; zero disables the budget.
    pub cap_usd: UsdValue,
}

/// Consumption of one asset within the current epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenEpochUsage {
    /// Limited asset.
    pub asset: Asset,
    /// Epoch of the last write.
    pub epoch_index: u64,
    /// Amount used in `epoch_index`.
    #[serde(with = "dec_u256")]
    pub used: U256,
    /// Per-epoch ceiling; zero means unsupported.
    #[serde(with = "dec_u256")]
    pub threshold: U256,
}

impl TokenEpochUsage {
    /// Fresh record with no usage.
    pub fn new(asset: Asset, threshold: U256) -> Self {
        Self {
            asset,
            epoch_index: 0,
            used: U256::zero(),
            threshold,
        }
    }
}

/// Where refunds go if execution on Push Chain fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevertInstructions {
    /// Refund recipient on the source chain.
    #[serde(with = "hex_array")]
    pub fund_recipient: Address,
    /// Opaque message forwarded with the refund.
    #[serde(with = "hex_vec", default)]
    pub revert_msg: Vec<u8>,
}

/// Inbound deposit request. `native_amount` (value sent) travels separately.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversalTxRequest {
    /// Push Chain recipient; zero routes to the sender's executor account.
    #[serde(with = "hex_array", default)]
    pub recipient: PushAddress,
    /// Bridged asset.
    pub asset: Asset,
    /// Bridged amount; zero for gas-only requests.
    #[serde(with = "dec_u256", default)]
    pub amount: U256,
    /// Call payload for Push Chain.
    #[serde(with = "hex_vec", default)]
    pub payload: Vec<u8>,
    /// Refund routing.
    pub revert_instruction: RevertInstructions,
    /// Opaque relayer authentication bytes.
    #[serde(with = "hex_vec", default)]
    pub signature_data: Vec<u8>,
}

/// Legs an admitted request will execute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdmissionPlan {
    /// Classification.
    pub tx_type: TxType,
    /// Native gas leg (zero when absent).
    #[serde(with = "dec_u256")]
    pub gas_amount: U256,
    /// USD value of the gas leg.
    pub gas_usd: UsdValue,
    /// Bridged asset leg.
    pub funds: Option<FundsLeg>,
}

/// Bridged-asset leg of a plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FundsLeg {
    /// Asset.
    pub asset: Asset,
    /// Amount.
    #[serde(with = "dec_u256")]
    pub amount: U256,
}

/// Result of a committed admission.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AdmissionReceipt {
    /// Correlation id.
    pub id: Uuid,
    /// Executed plan.
    pub plan: AdmissionPlan,
    /// Ordering unit the admission was charged to.
    pub block_key: u64,
    /// Epoch the funds leg was charged to (when rate limiting is active).
    pub epoch_index: Option<u64>,
}

/// Outcome of an admission check without side effects.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// Every rule passed.
    Admitted(AdmissionPlan),
    /// First failing rule.
    Rejected(AdmissionError),
}

impl AdmissionDecision {
    /// True when admitted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, AdmissionDecision::Admitted(_))
    }

    /// Rejection cause, if any.
    pub fn reason(&self) -> Option<ErrorKind> {
        match self {
            AdmissionDecision::Admitted(_) => None,
            AdmissionDecision::Rejected(err) => Some(err.kind()),
        }
    }
}

impl From<Result<AdmissionPlan, AdmissionError>> for AdmissionDecision {
    fn from(result: Result<AdmissionPlan, AdmissionError>) -> Self {
        match result {
            Ok(plan) => AdmissionDecision::Admitted(plan),
            Err(err) => AdmissionDecision::Rejected(err),
        }
    }
}

/// Events published by the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
#[allow(missing_docs)]
pub enum GatewayEvent {
    /// Deposit leg admitted and moved into custody. Gas legs carry a zero
    /// recipient (the sender's executor account on Push Chain).
    UniversalTx {
        #[serde(with = "hex_array")]
        sender: Address,
        #[serde(with = "hex_array")]
        recipient: PushAddress,
        asset: Asset,
        #[serde(with = "dec_u256")]
        amount: U256,
        #[serde(with = "hex_vec")]
        payload: Vec<u8>,
        revert_instruction: RevertInstructions,
        tx_type: TxType,
        #[serde(with = "hex_vec")]
        signature_data: Vec<u8>,
    },
    /// TSS withdrawal executed.
    FundsWithdrawn {
        #[serde(with = "hex_array")]
        recipient: Address,
        asset: Asset,
        #[serde(with = "dec_u256")]
        amount: U256,
    },
    /// TSS refund of a failed deposit executed.
    DepositReverted {
        #[serde(with = "hex_array")]
        recipient: Address,
        asset: Asset,
        #[serde(with = "dec_u256")]
        amount: U256,
        #[serde(with = "hex_vec")]
        revert_msg: Vec<u8>,
    },
    /// Per-transaction bounds replaced.
    CapsUpdated { min_usd: UsdValue, max_usd: UsdValue },
    /// Block cap replaced.
    BlockCapUpdated { cap_usd: UsdValue },
    /// Asset threshold set.
    TokenThresholdUpdated {
        asset: Asset,
        #[serde(with = "dec_u256")]
        threshold: U256,
    },
    /// Epoch length changed.
    EpochDurationUpdated { seconds: u64 },
    /// Price feed replaced.
    OracleSourceUpdated,
    /// Staleness window changed.
    OracleStalePeriodUpdated { seconds: u64 },
    /// Sequencer gate installed or removed.
    SequencerFeedUpdated {
        enabled: bool,
        grace_period_secs: u64,
    },
    /// Pause engaged.
    Paused {
        #[serde(with = "hex_array")]
        by: Address,
    },
    /// Pause released.
    Unpaused {
        #[serde(with = "hex_array")]
        by: Address,
    },
}
