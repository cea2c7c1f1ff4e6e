//! Price Feed Adapters
//!
//! `StaticPriceFeed` serves a settable Chainlink-style round.
//! `ExponentPriceFeed` adapts Pyth-style `(price, conf, expo, publish_time)`
//! updates and rejects quotes with a wide confidence interval.

use crate::domain::{AdmissionError, RoundData};
use crate::ports::PriceFeed;
use parking_lot::RwLock;

/// Round-based feed with settable answer.
pub struct StaticPriceFeed {
    round: RwLock<RoundData>,
    decimals: Option<u8>,
    unavailable: RwLock<bool>,
}

impl StaticPriceFeed {
    /// Feed answering `answer` (in `decimals`) as of `updated_at`.
    pub fn new(answer: i128, decimals: u8, updated_at: u64) -> Self {
        Self {
            round: RwLock::new(RoundData {
                round_id: 1,
                answer,
                started_at: updated_at,
                updated_at,
                answered_in_round: 1,
            }),
            decimals: Some(decimals),
            unavailable: RwLock::new(false),
        }
    }

    /// Override reported decimals (`None`: feed cannot report them).
    pub fn with_decimals(mut self, decimals: Option<u8>) -> Self {
        self.decimals = decimals;
        self
    }

    /// Publish a new answer in a fresh round.
    pub fn set_answer(&self, answer: i128, updated_at: u64) {
        let mut round = self.round.write();
        round.round_id += 1;
        round.answered_in_round = round.round_id;
        round.answer = answer;
        round.started_at = updated_at;
        round.updated_at = updated_at;
    }

    /// Replace the round verbatim.
    pub fn set_round(&self, round: RoundData) {
        *self.round.write() = round;
    }

    /// Make `latest_round_data` fail.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }
}

impl PriceFeed for StaticPriceFeed {
    fn latest_round_data(&self) -> Result<RoundData, AdmissionError> {
        if *self.unavailable.read() {
            return Err(AdmissionError::OracleInvalid("feed unavailable".to_string()));
        }
        Ok(*self.round.read())
    }

    fn decimals(&self) -> Option<u8> {
        self.decimals
    }
}

#[derive(Clone, Copy, Debug)]
struct ExponentPrice {
    price: i64,
    conf: u64,
    expo: i32,
    publish_time: u64,
    sequence: u64,
}

/// Pyth-style feed: `price * 10^expo` with a confidence interval.
pub struct ExponentPriceFeed {
    latest: RwLock<Option<ExponentPrice>>,
    max_conf_bps: u64,
}

impl ExponentPriceFeed {
    /// Feed rejecting quotes whose `conf / price` exceeds `max_conf_bps`.
    pub fn new(max_conf_bps: u64) -> Self {
        Self {
            latest: RwLock::new(None),
            max_conf_bps,
        }
    }

    /// Publish an update.
    pub fn publish(&self, price: i64, conf: u64, expo: i32, publish_time: u64) {
        let mut latest = self.latest.write();
        let sequence = latest.map(|p| p.sequence + 1).unwrap_or(1);
        *latest = Some(ExponentPrice {
            price,
            conf,
            expo,
            publish_time,
            sequence,
        });
    }
}

impl PriceFeed for ExponentPriceFeed {
    fn latest_round_data(&self) -> Result<RoundData, AdmissionError> {
        let latest = (*self.latest.read())
            .ok_or_else(|| AdmissionError::OracleInvalid("no price published".to_string()))?;

        if latest.expo >= 0 {
            return Err(AdmissionError::OracleInvalid(format!(
                "unsupported exponent {}",
                latest.expo
            )));
        }
        if latest.price > 0 {
            let limit = u128::from(latest.price.unsigned_abs()) * u128::from(self.max_conf_bps);
            if u128::from(latest.conf) * 10_000 > limit {
                return Err(AdmissionError::OracleInvalid(format!(
                    "confidence {} too wide for price {}",
                    latest.conf, latest.price
                )));
            }
        }

        Ok(RoundData {
            round_id: latest.sequence,
            answer: i128::from(latest.price),
            started_at: latest.publish_time,
            updated_at: latest.publish_time,
            answered_in_round: latest.sequence,
        })
    }

    fn decimals(&self) -> Option<u8> {
        let latest = (*self.latest.read())?;
        u8::try_from(latest.expo.unsigned_abs()).ok()
    }
}
