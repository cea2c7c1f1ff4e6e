//! # Algorithms
//!
//! Admission components: oracle sanitization, per-transaction caps, the
//! per-block budget, per-asset epoch limits, request classification and the
//! ledger store that ties the two budgets together.

pub mod block_budget;
pub mod classify;
pub mod epoch_limiter;
pub mod ledger;
pub mod price_oracle;
pub mod usd_cap;

pub use block_budget::BlockBudgetLedger;
pub use classify::{classify, plan_legs, LegPlan};
pub use epoch_limiter::{plan_epoch_consume, EpochRateLimiter};
pub use ledger::{LedgerHandle, LedgerSnapshot, LedgerState, LedgerTxn};
pub use price_oracle::{
    usd_value_of, PriceOracle, DEFAULT_FEED_DECIMALS, EVM_NATIVE_DECIMALS, SOLANA_NATIVE_DECIMALS,
};
pub use usd_cap::UsdCapPolicy;
