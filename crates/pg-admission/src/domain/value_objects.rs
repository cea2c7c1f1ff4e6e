//! # Domain Value Objects
//!
//! Immutable value types shared by every admission component.

use super::codec::dec_u256;
use super::errors::AdmissionError;
use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Account identity on the source chain (EVM addresses are left-padded).
pub type Address = [u8; 32];

/// Account identity on Push Chain (20-byte EVM address).
pub type PushAddress = [u8; 20];

/// Decimal places of the canonical USD scale.
pub const USD_DECIMALS: u8 = 18;

/// Fungible token identity (ERC-20 address or SPL mint).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenId(pub [u8; 32]);

impl TokenId {
    /// Left-pad a 20-byte EVM token address.
    pub fn from_evm_address(address: [u8; 20]) -> Self {
        let mut id = [0u8; 32];
        id[12..].copy_from_slice(&address);
        Self(id)
    }

    /// All-zero identity (never a valid token).
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

/// Asset moved by a request. The native asset is an explicit variant rather
/// than a zero-address convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Asset {
    /// Chain base currency (ETH, SOL, ...).
    Native,
    /// Fungible token.
    Fungible(TokenId),
}

impl Asset {
    /// True for the native asset.
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Fungible(id) => write!(f, "0x{}", hex::encode(id.0)),
        }
    }
}

impl FromStr for Asset {
    type Err = AdmissionError;

    /// Accepts `native`, a 20-byte EVM address or a 32-byte identity, hex
    /// encoded with an optional `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("native") {
            return Ok(Asset::Native);
        }
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(digits)
            .map_err(|e| AdmissionError::InvalidInput(format!("asset {trimmed}: {e}")))?;
        let id = match bytes.len() {
            20 => {
                let mut address = [0u8; 20];
                address.copy_from_slice(&bytes);
                TokenId::from_evm_address(address)
            }
            32 => {
                let mut id = [0u8; 32];
                id.copy_from_slice(&bytes);
                TokenId(id)
            }
            n => {
                return Err(AdmissionError::InvalidInput(format!(
                    "asset {trimmed}: expected 20 or 32 bytes, got {n}"
                )))
            }
        };
        if id.is_zero() {
            return Err(AdmissionError::InvalidInput(
                "zero token id is not an asset; use \"native\"".to_string(),
            ));
        }
        Ok(Asset::Fungible(id))
    }
}

impl Serialize for Asset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Asset {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// USD value in the canonical 18-decimal fixed-point scale (`1e18` = $1.00).
///
/// Other scales (8-decimal Pyth convention) are converted at the boundary
/// with [`UsdValue::from_scaled`] and [`UsdValue::to_scaled`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UsdValue(U256);

impl UsdValue {
    /// $0.
    pub const ZERO: UsdValue = UsdValue(U256::zero());

    /// Wrap a raw 18-decimal value.
    pub fn from_raw(raw: U256) -> Self {
        Self(raw)
    }

    /// Whole dollars.
    pub fn from_dollars(dollars: u64) -> Self {
        Self(U256::from(dollars) * U256::exp10(USD_DECIMALS as usize))
    }

    /// Cents.
    pub fn from_cents(cents: u64) -> Self {
        Self(U256::from(cents) * U256::exp10(USD_DECIMALS as usize - 2))
    }

    /// Convert a value expressed with `decimals` places (at most 18).
    pub fn from_scaled(raw: U256, decimals: u8) -> Result<Self, AdmissionError> {
        if decimals > USD_DECIMALS {
            return Err(AdmissionError::InvalidInput(format!(
                "USD scale of {decimals} decimals exceeds {USD_DECIMALS}"
            )));
        }
        let factor = U256::exp10((USD_DECIMALS - decimals) as usize);
        raw.checked_mul(factor)
            .map(Self)
            .ok_or_else(|| AdmissionError::InvalidInput("USD value overflows".to_string()))
    }

    /// Express with `decimals` places (at most 18), truncating.
    pub fn to_scaled(&self, decimals: u8) -> U256 {
        let decimals = decimals.min(USD_DECIMALS);
        self.0 / U256::exp10((USD_DECIMALS - decimals) as usize)
    }

    /// Raw 18-decimal value.
    pub fn raw(&self) -> U256 {
        self.0
    }

    /// True for $0.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Addition returning `None` on overflow.
    pub fn checked_add(&self, other: UsdValue) -> Option<UsdValue> {
        self.0.checked_add(other.0).map(UsdValue)
    }

    /// Whole dollars as a float, for gauges and logs only.
    pub fn as_dollars_f64(&self) -> f64 {
        let one = U256::exp10(USD_DECIMALS as usize);
        let whole = (self.0 / one).low_u128() as f64;
        let frac = (self.0 % one).low_u128() as f64 / 1e18;
        whole + frac
    }
}

impl fmt::Display for UsdValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let one = U256::exp10(USD_DECIMALS as usize);
        let whole = self.0 / one;
        let frac = format!("{:0>18}", (self.0 % one).to_string());
        let trimmed = frac.trim_end_matches('0');
        let shown = if trimmed.len() < 2 { &frac[..2] } else { trimmed };
        write!(f, "${whole}.{shown}")
    }
}

impl Serialize for UsdValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        dec_u256::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for UsdValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        dec_u256::deserialize(deserializer).map(UsdValue)
    }
}

/// Transaction classification, derived from request shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    /// Instant gas top-up, no payload.
    Gas,
    /// Instant gas top-up (or payload-only) with payload execution.
    GasAndPayload,
    /// High-value bridge, no payload.
    Funds,
    /// High-value bridge with payload; may batch a gas leg.
    FundsAndPayload,
}

impl TxType {
    /// Instant (USD-capped) route.
    pub fn is_gas_route(&self) -> bool {
        matches!(self, TxType::Gas | TxType::GasAndPayload)
    }

    /// Stable label, used for metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Gas => "gas",
            TxType::GasAndPayload => "gas_and_payload",
            TxType::Funds => "funds",
            TxType::FundsAndPayload => "funds_and_payload",
        }
    }
}

/// Capabilities checked by the access-control collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Configuration setters.
    Admin,
    /// Pause / unpause.
    Pauser,
    /// Off-chain relayer authority: withdrawals and reverts.
    Tss,
}
