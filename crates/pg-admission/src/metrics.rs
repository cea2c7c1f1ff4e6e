//! # Admission Metrics
//!
//! Prometheus metrics for the admission path.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! pg-admission = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `pg_admissions_total` - Counter of admitted requests (by tx_type)
//! - `pg_rejections_total` - Counter of rejected requests (by reason)
//! - `pg_transfer_failures_total` - Counter of vault failures that rolled back
//! - `pg_block_consumed_usd` - Gauge of USD consumed in the current block

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_counter_vec, register_gauge, register_int_counter, CounterVec, Gauge, IntCounter,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Admitted requests, labeled by transaction type
    pub static ref ADMISSIONS: CounterVec = register_counter_vec!(
        "pg_admissions_total",
        "Total number of admitted gateway requests",
        &["tx_type"]
    )
    .expect("Failed to create ADMISSIONS metric");

    /// Rejected requests, labeled by reason
    pub static ref REJECTIONS: CounterVec = register_counter_vec!(
        "pg_rejections_total",
        "Total number of rejected gateway requests",
        &["reason"]
    )
    .expect("Failed to create REJECTIONS metric");

    /// Vault failures
    pub static ref TRANSFER_FAILURES: IntCounter = register_int_counter!(
        "pg_transfer_failures_total",
        "Total number of vault transfers that failed and rolled back"
    )
    .expect("Failed to create TRANSFER_FAILURES metric");

    /// USD consumed in the current block
    pub static ref BLOCK_CONSUMED_USD: Gauge = register_gauge!(
        "pg_block_consumed_usd",
        "USD consumed from the per-block budget in the current block"
    )
    .expect("Failed to create BLOCK_CONSUMED_USD metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record an admitted request
#[cfg(feature = "metrics")]
pub fn record_admission(tx_type: &str) {
    ADMISSIONS.with_label_values(&[tx_type]).inc();
}

/// Record a rejected request
#[cfg(feature = "metrics")]
pub fn record_rejection(reason: &str) {
    REJECTIONS.with_label_values(&[reason]).inc();
}

/// Record a vault failure
#[cfg(feature = "metrics")]
pub fn record_transfer_failure() {
    TRANSFER_FAILURES.inc();
}

/// Update the block consumption gauge
#[cfg(feature = "metrics")]
pub fn set_block_consumed_usd(dollars: f64) {
    BLOCK_CONSUMED_USD.set(dollars);
}

/// Render all registered metrics in the Prometheus text format
#[cfg(feature = "metrics")]
pub fn gather_text() -> String {
    use prometheus::Encoder;
    let mut buffer = Vec::new();
    let encoder = prometheus::TextEncoder::new();
    if encoder.encode(&prometheus::gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature is disabled)
// =============================================================================

/// Record an admitted request (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_admission(_tx_type: &str) {}

/// Record a rejected request (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_reason: &str) {}

/// Record a vault failure (no-op)
#[cfg(not(feature = "metrics"))]
pub fn record_transfer_failure() {}

/// Update the block consumption gauge (no-op)
#[cfg(not(feature = "metrics"))]
pub fn set_block_consumed_usd(_dollars: f64) {}

/// Render metrics (empty without the feature)
#[cfg(not(feature = "metrics"))]
pub fn gather_text() -> String {
    String::new()
}
