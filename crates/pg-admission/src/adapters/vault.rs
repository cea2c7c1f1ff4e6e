//! In-Memory Vault Adapter
//!
//! Tracks custody per asset plus per-account credits, with failure
//! injection for rollback tests.

use crate::domain::{Address, AdmissionError, Asset};
use crate::ports::Vault;
use parking_lot::RwLock;
use primitive_types::U256;
use std::collections::{HashMap, HashSet};
use tracing::debug;

#[derive(Default)]
struct VaultState {
    custody: HashMap<Asset, U256>,
    released: HashMap<(Asset, Address), U256>,
    deposits: u64,
    fail_deposits_after: Option<u64>,
    fail_all: bool,
    refused: HashSet<Asset>,
}

/// Custody ledger held in memory.
#[derive(Default)]
pub struct InMemoryVault {
    state: RwLock<VaultState>,
}

impl InMemoryVault {
    /// Empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every transfer while set.
    pub fn set_failing(&self, failing: bool) {
        self.state.write().fail_all = failing;
    }

    /// Let `n` more deposits succeed, then fail the rest.
    pub fn fail_deposits_after(&self, n: u64) {
        let mut state = self.state.write();
        state.fail_deposits_after = Some(state.deposits + n);
    }

    /// Refuse deposits of `asset` until failures are cleared.
    pub fn refuse_asset(&self, asset: Asset) {
        self.state.write().refused.insert(asset);
    }

    /// Clear all injected failures.
    pub fn clear_failures(&self) {
        let mut state = self.state.write();
        state.fail_all = false;
        state.fail_deposits_after = None;
        state.refused.clear();
    }

    /// Amount of `asset` held in custody.
    pub fn custody(&self, asset: &Asset) -> U256 {
        self.state
            .read()
            .custody
            .get(asset)
            .copied()
            .unwrap_or_default()
    }

    /// Amount of `asset` released to `destination`.
    pub fn released_to(&self, asset: &Asset, destination: &Address) -> U256 {
        self.state
            .read()
            .released
            .get(&(*asset, *destination))
            .copied()
            .unwrap_or_default()
    }
}

impl Vault for InMemoryVault {
    fn deposit_batch(&self, legs: &[(Asset, U256)], from: Address) -> Result<(), AdmissionError> {
        let mut state = self.state.write();

        // Every leg is checked against a scratch copy before custody changes.
        let mut staged: HashMap<Asset, U256> = HashMap::new();
        for (index, (asset, amount)) in legs.iter().enumerate() {
            let limit_hit = state
                .fail_deposits_after
                .is_some_and(|limit| state.deposits + index as u64 >= limit);
            if state.fail_all || limit_hit || state.refused.contains(asset) {
                return Err(AdmissionError::TransferFailed(format!(
                    "deposit of {amount} {asset} from 0x{} refused",
                    hex::encode(from)
                )));
            }
            let held = staged
                .get(asset)
                .or_else(|| state.custody.get(asset))
                .copied()
                .unwrap_or_default();
            let next = held.checked_add(*amount).ok_or_else(|| {
                AdmissionError::TransferFailed(format!("custody of {asset} overflows"))
            })?;
            staged.insert(*asset, next);
        }

        state.custody.extend(staged);
        state.deposits += legs.len() as u64;
        debug!(legs = legs.len(), from = %hex::encode(from), "[pg-admission] vault deposit");
        Ok(())
    }

    fn transfer_out(
        &self,
        asset: Asset,
        amount: U256,
        destination: Address,
    ) -> Result<(), AdmissionError> {
        let mut state = self.state.write();
        if state.fail_all {
            return Err(AdmissionError::TransferFailed(format!(
                "release of {amount} {asset} refused"
            )));
        }
        let held = state.custody.get(&asset).copied().unwrap_or_default();
        if held < amount {
            return Err(AdmissionError::TransferFailed(format!(
                "insufficient custody of {asset}: {held} < {amount}"
            )));
        }
        state.custody.insert(asset, held - amount);
        let credited = state.released.entry((asset, destination)).or_default();
        *credited = credited.saturating_add(amount);
        debug!(%asset, %amount, "[pg-admission] vault release");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_then_release() {
        let vault = InMemoryVault::new();
        vault.deposit(Asset::Native, U256::from(10u64), [1u8; 32]).unwrap();
        vault.transfer_out(Asset::Native, U256::from(4u64), [2u8; 32]).unwrap();
        assert_eq!(vault.custody(&Asset::Native), U256::from(6u64));
        assert_eq!(vault.released_to(&Asset::Native, &[2u8; 32]), U256::from(4u64));
    }

    #[test]
    fn test_release_beyond_custody_fails() {
        let vault = InMemoryVault::new();
        assert!(vault.transfer_out(Asset::Native, U256::one(), [2u8; 32]).is_err());
    }

    #[test]
    fn test_fail_after_counts_successes() {
        let vault = InMemoryVault::new();
        vault.fail_deposits_after(1);
        assert!(vault.deposit(Asset::Native, U256::one(), [1u8; 32]).is_ok());
        assert!(vault.deposit(Asset::Native, U256::one(), [1u8; 32]).is_err());
        vault.clear_failures();
        assert!(vault.deposit(Asset::Native, U256::one(), [1u8; 32]).is_ok());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let vault = InMemoryVault::new();
        let token = Asset::Fungible(crate::domain::TokenId([7u8; 32]));
        let legs = [(Asset::Native, U256::from(5u64)), (token, U256::from(9u64))];

        vault.fail_deposits_after(1);
        assert!(vault.deposit_batch(&legs, [1u8; 32]).is_err());
        assert_eq!(vault.custody(&Asset::Native), U256::zero());

        vault.clear_failures();
        vault.refuse_asset(token);
        assert!(vault.deposit_batch(&legs, [1u8; 32]).is_err());
        assert_eq!(vault.custody(&Asset::Native), U256::zero());

        vault.clear_failures();
        vault.deposit_batch(&legs, [1u8; 32]).unwrap();
        assert_eq!(vault.custody(&Asset::Native), U256::from(5u64));
        assert_eq!(vault.custody(&token), U256::from(9u64));
    }

    #[test]
    fn test_batch_overflow_leaves_custody() {
        let vault = InMemoryVault::new();
        vault.deposit(Asset::Native, U256::one(), [1u8; 32]).unwrap();
        let legs = [(Asset::Native, U256::one()), (Asset::Native, U256::MAX)];
        assert!(vault.deposit_batch(&legs, [1u8; 32]).is_err());
        assert_eq!(vault.custody(&Asset::Native), U256::one());
    }
}
