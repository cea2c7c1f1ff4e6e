//! Serde helpers for the JSON forms of amounts and identities.
//!
//! `U256` is written as a decimal string (the `primitive-types` default is
//! hex, which nobody wants in a config file); byte identities as `0x` hex.

/// `U256` as a decimal string; unsigned integers are accepted on input.
pub mod dec_u256 {
    use primitive_types::U256;
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    /// Write as decimal.
    pub fn serialize<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Read a decimal string or integer.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<U256, D::Error> {
        struct DecVisitor;

        impl Visitor<'_> for DecVisitor {
            type Value = U256;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal string or unsigned integer")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
                Ok(U256::from(v))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<U256, E> {
                Ok(U256::from(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
                U256::from_dec_str(v.trim().replace('_', "").as_str())
                    .map_err(|e| E::custom(format!("invalid decimal {v}: {e:?}")))
            }
        }

        deserializer.deserialize_any(DecVisitor)
    }
}

/// Fixed-size byte arrays as `0x`-prefixed hex.
pub mod hex_array {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Write as `0x` hex.
    pub fn serialize<S: Serializer, const N: usize>(
        bytes: &[u8; N],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    /// Read `0x` hex of exactly `N` bytes.
    pub fn deserialize<'de, D: Deserializer<'de>, const N: usize>(
        deserializer: D,
    ) -> Result<[u8; N], D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = raw.strip_prefix("0x").unwrap_or(&raw);
        let bytes = hex::decode(digits).map_err(serde::de::Error::custom)?;
        let len = bytes.len();
        bytes
            .try_into()
            .map_err(|_| serde::de::Error::custom(format!("expected {N} bytes, got {len}")))
    }
}

/// Variable-length bytes as `0x`-prefixed hex.
pub mod hex_vec {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Write as `0x` hex.
    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    /// Read `0x` hex.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let digits = raw.strip_prefix("0x").unwrap_or(&raw);
        hex::decode(digits).map_err(serde::de::Error::custom)
    }
}
