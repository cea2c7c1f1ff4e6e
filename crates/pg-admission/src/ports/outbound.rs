//! # Outbound Ports
//!
//! Collaborators the admission core drives: price and sequencer feeds, the
//! custody vault, role checks, the pause switch, the chain clock and the
//! event sink. All calls are synchronous.

use crate::domain::{
    Address, AdmissionError, Asset, GatewayEvent, Role, RoundData, SequencerStatus,
};
use primitive_types::U256;

/// USD price feed for the native asset - outbound port.
pub trait PriceFeed: Send + Sync {
    /// Latest round, Chainlink `latestRoundData` shaped.
    fn latest_round_data(&self) -> Result<RoundData, AdmissionError>;

    /// Feed decimals. `None` when the feed cannot report them.
    fn decimals(&self) -> Option<u8>;
}

/// L2 sequencer uptime feed - outbound port.
pub trait SequencerFeed: Send + Sync {
    /// Current sequencer status.
    fn status(&self) -> Result<SequencerStatus, AdmissionError>;
}

/// Custody of bridged assets - outbound port.
///
/// Each call is atomic on its own. Failures are reported as
/// [`AdmissionError::TransferFailed`].
pub trait Vault: Send + Sync {
    /// Pull every `(asset, amount)` leg from `from` into custody.
    ///
    /// All legs land or none do: a refused leg leaves custody untouched.
    fn deposit_batch(&self, legs: &[(Asset, U256)], from: Address) -> Result<(), AdmissionError>;

    /// Pull `amount` of `asset` from `from` into custody.
    fn deposit(&self, asset: Asset, amount: U256, from: Address) -> Result<(), AdmissionError> {
        self.deposit_batch(&[(asset, amount)], from)
    }

    /// Release `amount` of `asset` from custody to `destination`.
    fn transfer_out(
        &self,
        asset: Asset,
        amount: U256,
        destination: Address,
    ) -> Result<(), AdmissionError>;
}

/// Role membership - outbound port.
pub trait AccessControl: Send + Sync {
    /// Does `caller` hold `role`?
    fn has_role(&self, role: Role, caller: &Address) -> bool;
}

/// Global pause flag - outbound port.
pub trait PauseSwitch: Send + Sync {
    /// Is the gateway paused?
    fn is_paused(&self) -> bool;

    /// Engage or release the pause.
    fn set_paused(&self, paused: bool);
}

/// Time and ordering source - outbound port.
pub trait ChainClock: Send + Sync {
    /// Unix seconds.
    fn now(&self) -> u64;

    /// Current ordering unit (block number or slot).
    fn block_key(&self) -> u64;
}

/// Event publication - outbound port.
pub trait EventSink: Send + Sync {
    /// Publish an event. Must not fail the admission.
    fn emit(&self, event: GatewayEvent);
}
