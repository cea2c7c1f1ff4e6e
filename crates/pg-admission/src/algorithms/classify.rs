//! # Request Classification
//!
//! Derives the transaction type from the request shape and splits it into a
//! gas leg (native, USD capped) and a funds leg (epoch rate limited).

use crate::domain::{AdmissionError, Asset, FundsLeg, TxType, UniversalTxRequest};
use primitive_types::U256;

/// Legs of a classified request, before any pricing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LegPlan {
    /// Classification.
    pub tx_type: TxType,
    /// Native gas amount (zero when absent).
    pub gas_amount: U256,
    /// Bridged asset leg.
    pub funds: Option<FundsLeg>,
}

/// Classify `request` given the native value sent with it.
pub fn classify(request: &UniversalTxRequest, native_amount: U256) -> Result<TxType, AdmissionError> {
    let has_payload = !request.payload.is_empty();
    let has_funds = !request.amount.is_zero();

    if !has_funds {
        if has_payload {
            return Ok(TxType::GasAndPayload);
        }
        if native_amount.is_zero() {
            return Err(AdmissionError::InvalidInput(
                "request carries no gas, funds or payload".to_string(),
            ));
        }
        return Ok(TxType::Gas);
    }

    if has_payload {
        if request.asset.is_native() && native_amount < request.amount {
            return Err(AdmissionError::InvalidAmount(format!(
                "native value {native_amount} below bridged amount {}",
                request.amount
            )));
        }
        return Ok(TxType::FundsAndPayload);
    }

    match request.asset {
        Asset::Native if native_amount != request.amount => Err(AdmissionError::InvalidAmount(
            format!(
                "native value {native_amount} must equal bridged amount {}",
                request.amount
            ),
        )),
        Asset::Fungible(_) if !native_amount.is_zero() => Err(AdmissionError::InvalidAmount(
            format!("native value {native_amount} sent with a token-only bridge"),
        )),
        _ => Ok(TxType::Funds),
    }
}

/// Classify and split `request` into legs.
pub fn plan_legs(request: &UniversalTxRequest, native_amount: U256) -> Result<LegPlan, AdmissionError> {
    let tx_type = classify(request, native_amount)?;
    let funds = Some(FundsLeg {
        asset: request.asset,
        amount: request.amount,
    });
    let plan = match tx_type {
        TxType::Gas | TxType::GasAndPayload => LegPlan {
            tx_type,
            gas_amount: native_amount,
            funds: None,
        },
        TxType::Funds => LegPlan {
            tx_type,
            gas_amount: U256::zero(),
            funds,
        },
        TxType::FundsAndPayload => {
            // Native surplus over the bridged amount becomes a batched gas leg.
            let gas_amount = if request.asset.is_native() {
                native_amount - request.amount
            } else {
                native_amount
            };
            LegPlan {
                tx_type,
                gas_amount,
                funds,
            }
        }
    };
    Ok(plan)
}
