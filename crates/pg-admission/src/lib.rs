//! # PG Admission
//!
//! Rate limiting and admission control for the Push Chain universal gateway.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Decide, per request and per block, whether a deposit into the gateway may
//! proceed:
//! - Live USD price from an oracle feed, sanitized before use
//! - Inclusive per-transaction USD caps on the instant (gas) route
//! - A shared USD budget per block or slot
//! - Per-asset consumption budgets over fixed epochs
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | No quota leak on failure | Write-ahead [`LedgerTxn`], committed after transfers |
//! | No same-block overshoot | Single ledger mutex held from check to commit |
//! | Deterministic reset | Lazy reset on block key / epoch index change |
//! | No stale prices | Oracle re-queried on every admission |
//!
//! ## Module Structure
//!
//! ```text
//! pg-admission/
//! ├── domain/          # Asset, UsdValue, records, errors, invariants
//! ├── algorithms/      # PriceOracle, UsdCapPolicy, budgets, ledger, classify
//! ├── ports/           # GatewayApi, PriceFeed, Vault, AccessControl, ...
//! ├── adapters/        # In-memory and system collaborators
//! ├── config.rs        # GatewayConfig (env / JSON)
//! ├── metrics.rs       # Prometheus counters (feature "metrics")
//! └── service.rs       # AdmissionController
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports
pub use algorithms::{
    BlockBudgetLedger, EpochRateLimiter, LedgerHandle, LedgerSnapshot, LedgerState, LedgerTxn,
    PriceOracle, UsdCapPolicy,
};
pub use config::{ConfigError, GatewayConfig};
pub use domain::{
    Address, AdmissionDecision, AdmissionError, AdmissionPlan, AdmissionReceipt, Asset,
    BlockBudget, CapConfig, ErrorKind, FundsLeg, GatewayEvent, PriceQuote, PushAddress,
    RevertInstructions, Role, RoundData, SequencerStatus, TokenEpochUsage, TokenId, TxType,
    UniversalTxRequest, UsdValue,
};
pub use ports::{
    AccessControl, ChainClock, EventSink, GatewayApi, PauseSwitch, PriceFeed, SequencerFeed, Vault,
};
pub use service::{AdmissionController, GatewayDeps};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
