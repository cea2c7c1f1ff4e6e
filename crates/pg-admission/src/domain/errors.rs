//! # Domain Errors
//!
//! Every rejection maps to exactly one `ErrorKind` so callers can assert on
//! the cause, not just on failure.

use super::value_objects::{Asset, Role, UsdValue};
use primitive_types::U256;
use thiserror::Error;

/// Admission error types.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// Pause switch engaged. Checked before any other rule.
    #[error("Gateway is paused")]
    Paused,

    /// Caller does not hold the role required for the operation.
    #[error("Unauthorized: caller {caller} lacks role {role:?}")]
    Unauthorized {
        /// Hex-encoded caller identity
        caller: String,
        /// Required role
        role: Role,
    },

    /// Oracle answer unusable (non-positive, bad decimals, sequencer down...).
    #[error("Invalid oracle price: {0}")]
    OracleInvalid(String),

    /// Oracle answer older than the staleness window.
    #[error("Stale oracle price: observed {age_secs}s ago, window is {stale_period_secs}s")]
    OracleStale {
        /// Age of the answer
        age_secs: u64,
        /// Configured window
        stale_period_secs: u64,
    },

    /// Answering round is older than the requested round.
    #[error("Inconsistent oracle round: answered in {answered_in_round} < round {round_id}")]
    OracleRoundInconsistent {
        /// Round requested
        round_id: u64,
        /// Round that produced the answer
        answered_in_round: u64,
    },

    /// Per-transaction USD cap violated.
    #[error("Amount out of range: {usd} not within [{min}, {max}]")]
    AmountOutOfRange {
        /// Quoted value of the transaction
        usd: UsdValue,
        /// Lower bound (inclusive)
        min: UsdValue,
        /// Upper bound (inclusive)
        max: UsdValue,
    },

    /// Shared per-block USD budget exhausted.
    #[error("Block USD cap exceeded: {consumed} consumed + {requested} requested > {cap}")]
    BlockCapExceeded {
        /// Value of this request
        requested: UsdValue,
        /// Already consumed in the block
        consumed: UsdValue,
        /// Block ceiling
        cap: UsdValue,
    },

    /// Asset has no (or a zero) threshold.
    #[error("Token not supported: {0}")]
    TokenUnsupported(Asset),

    /// Per-asset epoch budget exhausted.
    #[error("Rate limit exceeded for {asset}: {used} used + {requested} requested > {threshold}")]
    RateLimitExceeded {
        /// Limited asset
        asset: Asset,
        /// Amount of this request
        requested: U256,
        /// Already used in the epoch
        used: U256,
        /// Epoch threshold
        threshold: U256,
    },

    /// Vault collaborator refused or failed the transfer.
    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    /// Request shape is not routable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Amounts inconsistent with the request shape.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Zero recipient or revert recipient.
    #[error("Invalid recipient")]
    InvalidRecipient,

    /// Cap bounds rejected by an administrative setter.
    #[error("Invalid cap range: min {min}, max {max}")]
    InvalidCapRange {
        /// Requested minimum
        min: UsdValue,
        /// Requested maximum
        max: UsdValue,
    },
}

/// Fieldless discriminant of [`AdmissionError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ErrorKind {
    Paused,
    Unauthorized,
    OracleInvalid,
    OracleStale,
    OracleRoundInconsistent,
    AmountOutOfRange,
    BlockCapExceeded,
    TokenUnsupported,
    RateLimitExceeded,
    TransferFailed,
    InvalidInput,
    InvalidAmount,
    InvalidRecipient,
    InvalidCapRange,
}

impl ErrorKind {
    /// Stable snake_case label, used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Paused => "paused",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::OracleInvalid => "oracle_invalid",
            ErrorKind::OracleStale => "oracle_stale",
            ErrorKind::OracleRoundInconsistent => "oracle_round_inconsistent",
            ErrorKind::AmountOutOfRange => "amount_out_of_range",
            ErrorKind::BlockCapExceeded => "block_cap_exceeded",
            ErrorKind::TokenUnsupported => "token_unsupported",
            ErrorKind::RateLimitExceeded => "rate_limit_exceeded",
            ErrorKind::TransferFailed => "transfer_failed",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidAmount => "invalid_amount",
            ErrorKind::InvalidRecipient => "invalid_recipient",
            ErrorKind::InvalidCapRange => "invalid_cap_range",
        }
    }
}

impl AdmissionError {
    /// Discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AdmissionError::Paused => ErrorKind::Paused,
            AdmissionError::Unauthorized { .. } => ErrorKind::Unauthorized,
            AdmissionError::OracleInvalid(_) => ErrorKind::OracleInvalid,
            AdmissionError::OracleStale { .. } => ErrorKind::OracleStale,
            AdmissionError::OracleRoundInconsistent { .. } => ErrorKind::OracleRoundInconsistent,
            AdmissionError::AmountOutOfRange { .. } => ErrorKind::AmountOutOfRange,
            AdmissionError::BlockCapExceeded { .. } => ErrorKind::BlockCapExceeded,
            AdmissionError::TokenUnsupported(_) => ErrorKind::TokenUnsupported,
            AdmissionError::RateLimitExceeded { .. } => ErrorKind::RateLimitExceeded,
            AdmissionError::TransferFailed(_) => ErrorKind::TransferFailed,
            AdmissionError::InvalidInput(_) => ErrorKind::InvalidInput,
            AdmissionError::InvalidAmount(_) => ErrorKind::InvalidAmount,
            AdmissionError::InvalidRecipient => ErrorKind::InvalidRecipient,
            AdmissionError::InvalidCapRange { .. } => ErrorKind::InvalidCapRange,
        }
    }
}
