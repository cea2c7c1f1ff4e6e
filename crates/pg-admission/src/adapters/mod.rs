//! # Adapters Layer (Hexagonal Architecture)
//!
//! In-memory and system implementations of the outbound ports, used by the
//! simulator and the test suites.

mod access_control;
mod clock;
mod events;
mod pause;
mod price_feed;
mod sequencer;
mod vault;

pub use access_control::RoleRegistry;
pub use clock::{ManualClock, SystemClock};
pub use events::{InMemoryEventSink, TracingEventSink};
pub use pause::AtomicPauseSwitch;
pub use price_feed::{ExponentPriceFeed, StaticPriceFeed};
pub use sequencer::StaticSequencerFeed;
pub use vault::InMemoryVault;
