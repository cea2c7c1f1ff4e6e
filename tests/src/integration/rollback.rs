//! # Rollback
//!
//! A failed vault transfer must leave the ledger exactly as it was and
//! emit nothing.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use pg_admission::{Asset, ErrorKind, GatewayApi, UsdValue};
    use primitive_types::U256;

    #[test]
    fn test_failed_transfer_leaves_block_at_zero() {
        let t = gateway(&default_config());
        t.vault.set_failing(true);

        let err = t
            .gateway
            .send_universal_tx(USER, gas_request(), wei_for_cents(600))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferFailed);
        assert_eq!(t.gateway.block_consumed_usd(), UsdValue::ZERO);
        assert!(t.events.is_empty());

        t.vault.clear_failures();
        t.gateway
            .send_universal_tx(USER, gas_request(), wei_for_cents(600))
            .expect("full budget still available");
        assert_eq!(t.gateway.block_consumed_usd(), UsdValue::from_dollars(6));
    }

    #[test]
    fn test_failed_funds_leg_restores_epoch_counter() {
        let t = gateway(&default_config());
        let before = t.gateway.ledger_snapshot();
        t.vault.set_failing(true);

        let err = t
            .gateway
            .send_universal_tx(USER, funds_request(usdc(), 700), U256::zero())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferFailed);
        assert_eq!(t.gateway.ledger_snapshot(), before);
        assert_eq!(t.gateway.token_usage(&usdc()).unwrap().0, U256::zero());
    }

    #[test]
    fn test_second_leg_failure_undoes_first() {
        let t = gateway(&default_config());
        let before = t.gateway.ledger_snapshot();
        // Gas deposit succeeds, token deposit fails.
        t.vault.fail_deposits_after(1);

        let req = request(usdc(), U256::from(300u64), vec![0xab, 0xcd]);
        let err = t
            .gateway
            .send_universal_tx(USER, req, wei_for_cents(300))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferFailed);
        assert_eq!(t.gateway.ledger_snapshot(), before);
        assert_eq!(t.vault.custody(&Asset::Native), U256::zero());
        assert_eq!(t.vault.custody(&usdc()), U256::zero());
        assert!(t.events.is_empty());
    }

    #[test]
    fn test_vault_refusing_funds_leg_keeps_no_gas() {
        let t = gateway(&default_config());
        let before = t.gateway.ledger_snapshot();
        t.vault.refuse_asset(usdc());

        let req = request(usdc(), U256::from(300u64), vec![0xab, 0xcd]);
        let err = t
            .gateway
            .send_universal_tx(USER, req.clone(), wei_for_cents(300))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferFailed);
        assert_eq!(t.gateway.ledger_snapshot(), before);
        assert_eq!(t.vault.custody(&Asset::Native), U256::zero());
        assert!(t.events.is_empty());

        t.vault.clear_failures();
        t.gateway
            .send_universal_tx(USER, req, wei_for_cents(300))
            .expect("both legs land once the vault accepts");
        assert_eq!(t.vault.custody(&Asset::Native), wei_for_cents(300));
        assert_eq!(t.vault.custody(&usdc()), U256::from(300u64));
    }

    #[test]
    fn test_rejection_after_staging_leaves_no_trace() {
        let t = gateway(&default_config());
        t.gateway
            .send_universal_tx(USER, funds_request(usdc(), 900), U256::zero())
            .unwrap();
        let before = t.gateway.ledger_snapshot();

        // Gas leg stages fine, funds leg then exceeds the threshold.
        let req = request(usdc(), U256::from(200u64), vec![1]);
        let err = t
            .gateway
            .send_universal_tx(USER, req, wei_for_cents(400))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
        assert_eq!(t.gateway.ledger_snapshot(), before);
        assert_eq!(t.gateway.block_consumed_usd(), UsdValue::ZERO);
        assert_eq!(t.vault.custody(&Asset::Native), U256::zero());
    }

    #[test]
    fn test_failed_release_keeps_custody() {
        let t = gateway(&default_config());
        t.gateway
            .send_universal_tx(USER, funds_request(usdc(), 100), U256::zero())
            .unwrap();

        let err = t
            .gateway
            .withdraw(TSS, usdc(), U256::from(101u64), USER)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransferFailed);
        assert_eq!(t.vault.custody(&usdc()), U256::from(100u64));
        assert_eq!(t.vault.released_to(&usdc(), &USER), U256::zero());
    }
}
