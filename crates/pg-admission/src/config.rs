//! # Gateway Configuration
//!
//! Loaded from `PG_*` environment variables or a JSON document. USD fields
//! are expressed in `usd_decimals` places (18, or 8 for Pyth-style
//! deployments) and normalized with [`GatewayConfig::caps`] and friends.
//!
//! ## Environment Variables
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `PG_MIN_CAP_USD` | `min_cap_usd` | $1 |
//! | `PG_MAX_CAP_USD` | `max_cap_usd` | $10 |
//! | `PG_BLOCK_CAP_USD` | `block_cap_usd` | 0 (disabled) |
//! | `PG_USD_DECIMALS` | `usd_decimals` | 18 |
//! | `PG_NATIVE_DECIMALS` | `native_decimals` | 18 |
//! | `PG_EPOCH_DURATION_SECS` | `epoch_duration_seconds` | 0 (disabled) |
//! | `PG_ORACLE_STALE_PERIOD_SECS` | `oracle_stale_period_seconds` | 3600 |
//! | `PG_SEQUENCER_GRACE_PERIOD_SECS` | `sequencer_grace_period_seconds` | 3600 |
//! | `PG_TOKEN_THRESHOLDS` | `token_thresholds` | empty, `native=1000,0xabc..=500` |

use crate::domain::codec::dec_u256;
use crate::domain::{Asset, CapConfig, UsdValue, USD_DECIMALS};
use primitive_types::U256;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use thiserror::Error;

/// Largest accepted native-asset decimals.
pub const MAX_NATIVE_DECIMALS: u8 = 36;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable present but unparsable.
    #[error("Invalid value for {var}: {reason}")]
    InvalidVar {
        /// Variable name
        var: &'static str,
        /// Parse failure
        reason: String,
    },

    /// JSON document rejected.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Config file unreadable.
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Per-transaction bounds invalid.
    #[error("Invalid cap range: min {min} max {max} (need 0 < min <= max)")]
    CapRange {
        /// Configured minimum (raw)
        min: U256,
        /// Configured maximum (raw)
        max: U256,
    },

    /// USD scale not supported.
    #[error("Unsupported USD scale: {0} decimals (expected 8 or 18)")]
    UsdDecimals(u8),

    /// Native decimals out of range.
    #[error("Unsupported native decimals: {0} (max {MAX_NATIVE_DECIMALS})")]
    NativeDecimals(u8),
}

/// Gateway configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Per-transaction lower bound, in `usd_decimals`.
    #[serde(with = "dec_u256")]
    pub min_cap_usd: U256,
    /// Per-transaction upper bound, in `usd_decimals`.
    #[serde(with = "dec_u256")]
    pub max_cap_usd: U256,
    /// Per-block ceiling in `usd_decimals`; 0 disables.
    #[serde(with = "dec_u256")]
    pub block_cap_usd: U256,
    /// Scale of the USD fields above.
    pub usd_decimals: u8,
    /// Decimals of the native asset (18 EVM, 9 Solana).
    pub native_decimals: u8,
    /// Epoch length; 0 disables rate limiting.
    pub epoch_duration_seconds: u64,
    /// Per-epoch thresholds; 0 marks an asset unsupported.
    pub token_thresholds: BTreeMap<Asset, ThresholdAmount>,
    /// Oracle staleness window; 0 disables.
    pub oracle_stale_period_seconds: u64,
    /// Wait after sequencer recovery before trusting prices.
    pub sequencer_grace_period_seconds: u64,
}

/// Threshold amount, a decimal string in JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdAmount(#[serde(with = "dec_u256")] pub U256);

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            min_cap_usd: UsdValue::from_dollars(1).raw(),
            max_cap_usd: UsdValue::from_dollars(10).raw(),
            block_cap_usd: U256::zero(),
            usd_decimals: USD_DECIMALS,
            native_decimals: 18,
            epoch_duration_seconds: 0,
            token_thresholds: BTreeMap::new(),
            oracle_stale_period_seconds: 3600,
            sequencer_grace_period_seconds: 3600,
        }
    }
}

impl GatewayConfig {
    /// Load from `PG_*` variables over defaults.
    ///
    /// When `PG_USD_DECIMALS` is set without explicit cap variables, the
    /// default caps are rescaled to it.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(decimals) = parse_var::<u8>("PG_USD_DECIMALS")? {
            config.min_cap_usd = UsdValue::from_raw(config.min_cap_usd).to_scaled(decimals);
            config.max_cap_usd = UsdValue::from_raw(config.max_cap_usd).to_scaled(decimals);
            config.usd_decimals = decimals;
        }
        if let Some(v) = parse_u256_var("PG_MIN_CAP_USD")? {
            config.min_cap_usd = v;
        }
        if let Some(v) = parse_u256_var("PG_MAX_CAP_USD")? {
            config.max_cap_usd = v;
        }
        if let Some(v) = parse_u256_var("PG_BLOCK_CAP_USD")? {
            config.block_cap_usd = v;
        }
        if let Some(v) = parse_var("PG_NATIVE_DECIMALS")? {
            config.native_decimals = v;
        }
        if let Some(v) = parse_var("PG_EPOCH_DURATION_SECS")? {
            config.epoch_duration_seconds = v;
        }
        if let Some(v) = parse_var("PG_ORACLE_STALE_PERIOD_SECS")? {
            config.oracle_stale_period_seconds = v;
        }
        if let Some(v) = parse_var("PG_SEQUENCER_GRACE_PERIOD_SECS")? {
            config.sequencer_grace_period_seconds = v;
        }
        if let Ok(raw) = env::var("PG_TOKEN_THRESHOLDS") {
            config.token_thresholds = parse_thresholds(&raw).map_err(|reason| {
                ConfigError::InvalidVar {
                    var: "PG_TOKEN_THRESHOLDS",
                    reason,
                }
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Check ranges and scales.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.usd_decimals != 8 && self.usd_decimals != USD_DECIMALS {
            return Err(ConfigError::UsdDecimals(self.usd_decimals));
        }
        if self.native_decimals > MAX_NATIVE_DECIMALS {
            return Err(ConfigError::NativeDecimals(self.native_decimals));
        }
        if self.min_cap_usd.is_zero() || self.min_cap_usd > self.max_cap_usd {
            return Err(ConfigError::CapRange {
                min: self.min_cap_usd,
                max: self.max_cap_usd,
            });
        }
        // Rescaling must not overflow.
        self.usd(self.max_cap_usd)?;
        self.usd(self.block_cap_usd)?;
        Ok(())
    }

    /// Per-transaction bounds on the 18-decimal scale.
    pub fn caps(&self) -> Result<CapConfig, ConfigError> {
        let min = self.usd(self.min_cap_usd)?;
        let max = self.usd(self.max_cap_usd)?;
        CapConfig::new(min, max).map_err(|_| ConfigError::CapRange {
            min: self.min_cap_usd,
            max: self.max_cap_usd,
        })
    }

    /// Block cap on the 18-decimal scale.
    pub fn block_cap(&self) -> Result<UsdValue, ConfigError> {
        self.usd(self.block_cap_usd)
    }

    /// Thresholds as plain amounts.
    pub fn thresholds(&self) -> impl Iterator<Item = (Asset, U256)> + '_ {
        self.token_thresholds.iter().map(|(asset, t)| (*asset, t.0))
    }

    fn usd(&self, raw: U256) -> Result<UsdValue, ConfigError> {
        UsdValue::from_scaled(raw, self.usd_decimals).map_err(|e| ConfigError::InvalidVar {
            var: "usd amount",
            reason: e.to_string(),
        })
    }
}

fn parse_var<T>(var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidVar {
                var,
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

fn parse_u256_var(var: &'static str) -> Result<Option<U256>, ConfigError> {
    match env::var(var) {
        Ok(raw) => parse_u256(&raw)
            .map(Some)
            .map_err(|reason| ConfigError::InvalidVar { var, reason }),
        Err(_) => Ok(None),
    }
}

fn parse_u256(raw: &str) -> Result<U256, String> {
    U256::from_dec_str(raw.trim().replace('_', "").as_str()).map_err(|e| format!("{e:?}"))
}

/// Parse `asset=amount` pairs separated by commas.
pub fn parse_thresholds(raw: &str) -> Result<BTreeMap<Asset, ThresholdAmount>, String> {
    let mut thresholds = BTreeMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (asset, amount) = entry
            .split_once('=')
            .ok_or_else(|| format!("expected asset=amount, got {entry}"))?;
        let asset: Asset = asset.parse().map_err(|e| format!("{e}"))?;
        thresholds.insert(asset, ThresholdAmount(parse_u256(amount)?));
    }
    Ok(thresholds)
}
