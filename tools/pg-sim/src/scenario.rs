//! Scenario replay.
//!
//! A scenario is a starting price plus a list of deposit steps. Each step
//! may move the clock, change the price or make the vault fail before the
//! request is submitted.

use pg_admission::adapters::{
    AtomicPauseSwitch, InMemoryVault, ManualClock, RoleRegistry, StaticPriceFeed, TracingEventSink,
};
use pg_admission::domain::codec::dec_u256;
use pg_admission::{
    Address, AdmissionController, ChainClock, GatewayApi, GatewayConfig, GatewayDeps,
    UniversalTxRequest,
};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Default sender when a step names none.
const DEFAULT_SENDER: Address = [0x11; 32];

/// Scenario file.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Feed answer at start, in `price_decimals`.
    pub price: i128,
    /// Feed decimals.
    #[serde(default = "default_price_decimals")]
    pub price_decimals: u8,
    /// Unix time at start.
    pub start_time: u64,
    /// Block key at start.
    #[serde(default)]
    pub start_block: u64,
    /// Steps in order.
    pub steps: Vec<Step>,
}

fn default_price_decimals() -> u8 {
    8
}

/// One submitted request.
#[derive(Debug, Deserialize)]
pub struct Step {
    /// Unix time for this step (default: unchanged).
    pub time: Option<u64>,
    /// Block key for this step (default: unchanged).
    pub block: Option<u64>,
    /// New feed answer, published at `time`.
    pub price: Option<i128>,
    /// Make the vault refuse transfers for this step.
    #[serde(default)]
    pub fail_transfer: bool,
    /// Sender, `0x` hex of 32 bytes.
    #[serde(default, with = "opt_address")]
    pub sender: Option<Address>,
    /// Request body.
    pub request: UniversalTxRequest,
    /// Native value sent.
    #[serde(default, with = "dec_u256")]
    pub native_amount: U256,
}

/// Result of one step, printed as a JSON line.
#[derive(Debug, Serialize)]
pub struct StepOutcome {
    /// Step index.
    pub step: usize,
    /// Clock time.
    pub time: u64,
    /// Block key.
    pub block: u64,
    /// Admitted or not.
    pub admitted: bool,
    /// Rejection label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    /// Rejection message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Receipt of an admitted request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<serde_json::Value>,
    /// Block consumption after the step.
    pub block_consumed_usd: String,
}

mod opt_address {
    use pg_admission::Address;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Address>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let digits = raw.strip_prefix("0x").unwrap_or(&raw);
        let bytes = hex::decode(digits).map_err(serde::de::Error::custom)?;
        let address: Address = bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom("sender must be 32 bytes"))?;
        Ok(Some(address))
    }
}

/// Replay `scenario` under `config`. All roles belong to the default sender.
pub fn run(config: &GatewayConfig, scenario: Scenario) -> anyhow::Result<Vec<StepOutcome>> {
    let feed = Arc::new(StaticPriceFeed::new(
        scenario.price,
        scenario.price_decimals,
        scenario.start_time,
    ));
    let vault = Arc::new(InMemoryVault::new());
    let clock = Arc::new(ManualClock::new(scenario.start_time, scenario.start_block));
    let deps = GatewayDeps {
        vault: vault.clone(),
        access: Arc::new(RoleRegistry::with_members(
            DEFAULT_SENDER,
            DEFAULT_SENDER,
            DEFAULT_SENDER,
        )),
        pause: Arc::new(AtomicPauseSwitch::new()),
        clock: clock.clone(),
        events: Arc::new(TracingEventSink),
    };
    let gateway = AdmissionController::from_config(config, feed.clone(), None, deps)?;

    let mut outcomes = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.into_iter().enumerate() {
        if let Some(time) = step.time {
            clock.set_time(time);
        }
        if let Some(block) = step.block {
            clock.set_block(block);
        }
        if let Some(price) = step.price {
            feed.set_answer(price, clock.now());
        }
        vault.set_failing(step.fail_transfer);

        let sender = step.sender.unwrap_or(DEFAULT_SENDER);
        let result = gateway.send_universal_tx(sender, step.request, step.native_amount);

        let (admitted, reason, error, receipt) = match result {
            Ok(receipt) => (true, None, None, Some(serde_json::to_value(&receipt)?)),
            Err(e) => (false, Some(e.kind().as_str()), Some(e.to_string()), None),
        };
        outcomes.push(StepOutcome {
            step: index,
            time: clock.now(),
            block: clock.block_key(),
            admitted,
            reason,
            error,
            receipt,
            block_consumed_usd: gateway.block_consumed_usd().to_string(),
        });
    }
    Ok(outcomes)
}
