//! # Shared Fixtures
//!
//! A gateway wired to in-memory collaborators with handles kept for
//! inspection and fault injection.

use pg_admission::adapters::{
    AtomicPauseSwitch, InMemoryEventSink, InMemoryVault, ManualClock, RoleRegistry,
    StaticPriceFeed, StaticSequencerFeed,
};
use pg_admission::{
    Address, AdmissionController, Asset, GatewayConfig, GatewayDeps, RevertInstructions, TokenId,
    UniversalTxRequest, UsdValue,
};
use primitive_types::U256;
use std::sync::Arc;

pub const ADMIN: Address = [0xa1; 32];
pub const PAUSER: Address = [0xb2; 32];
pub const TSS: Address = [0xc3; 32];
pub const USER: Address = [0x11; 32];

/// Scenario start time.
pub const T0: u64 = 1_700_000_000;

/// Feed answer for $2000 at 8 decimals.
pub const ETH_2000: i128 = 2_000_0000_0000;

/// Wei per dollar at $2000.
pub const WEI_PER_DOLLAR: u64 = 500_000_000_000_000;

pub struct TestGateway {
    pub gateway: Arc<AdmissionController>,
    pub feed: Arc<StaticPriceFeed>,
    pub sequencer: Arc<StaticSequencerFeed>,
    pub vault: Arc<InMemoryVault>,
    pub clock: Arc<ManualClock>,
    pub events: Arc<InMemoryEventSink>,
    pub roles: Arc<RoleRegistry>,
}

/// Fungible test token.
pub fn usdc() -> Asset {
    Asset::Fungible(TokenId::from_evm_address([0xaa; 20]))
}

/// Caps [$1, $10], block cap $10, epoch 3600s, USDC threshold 1000.
pub fn default_config() -> GatewayConfig {
    let mut config = GatewayConfig {
        block_cap_usd: UsdValue::from_dollars(10).raw(),
        epoch_duration_seconds: 3600,
        ..GatewayConfig::default()
    };
    config
        .token_thresholds
        .insert(usdc(), pg_admission::config::ThresholdAmount(U256::from(1000u64)));
    config
}

/// Gateway at `T0`, block 100, ETH at $2000, no sequencer gate.
pub fn gateway(config: &GatewayConfig) -> TestGateway {
    build(config, false)
}

/// Same as [`gateway`] with a sequencer gate that has been up for a day.
pub fn gateway_with_sequencer(config: &GatewayConfig) -> TestGateway {
    build(config, true)
}

fn build(config: &GatewayConfig, with_sequencer: bool) -> TestGateway {
    let feed = Arc::new(StaticPriceFeed::new(ETH_2000, 8, T0));
    let sequencer = Arc::new(StaticSequencerFeed::new(true, T0 - 86_400));
    let vault = Arc::new(InMemoryVault::new());
    let clock = Arc::new(ManualClock::new(T0, 100));
    let events = Arc::new(InMemoryEventSink::new());
    let roles = Arc::new(RoleRegistry::with_members(ADMIN, PAUSER, TSS));

    let deps = GatewayDeps {
        vault: vault.clone(),
        access: roles.clone(),
        pause: Arc::new(AtomicPauseSwitch::new()),
        clock: clock.clone(),
        events: events.clone(),
    };
    let sequencer_port: Option<Arc<dyn pg_admission::SequencerFeed>> = if with_sequencer {
        Some(sequencer.clone())
    } else {
        None
    };
    let gateway = AdmissionController::from_config(config, feed.clone(), sequencer_port, deps)
        .expect("valid test config");

    TestGateway {
        gateway: Arc::new(gateway),
        feed,
        sequencer,
        vault,
        clock,
        events,
        roles,
    }
}

/// Gas-only request.
pub fn gas_request() -> UniversalTxRequest {
    request(Asset::Native, U256::zero(), Vec::new())
}

/// Request bridging `amount` of `asset`.
pub fn funds_request(asset: Asset, amount: u64) -> UniversalTxRequest {
    request(asset, U256::from(amount), Vec::new())
}

pub fn request(asset: Asset, amount: U256, payload: Vec<u8>) -> UniversalTxRequest {
    UniversalTxRequest {
        recipient: [0x22; 20],
        asset,
        amount,
        payload,
        revert_instruction: RevertInstructions {
            fund_recipient: USER,
            revert_msg: Vec::new(),
        },
        signature_data: vec![0x5a; 65],
    }
}

/// Wei worth `cents` at $2000.
pub fn wei_for_cents(cents: u64) -> U256 {
    U256::from(cents) * U256::from(WEI_PER_DOLLAR / 100)
}
