//! # Concurrency
//!
//! Parallel admissions race for the same block budget and epoch counter.
//! The ledger lock serializes them, so exactly the affordable number wins.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use pg_admission::{ErrorKind, GatewayApi, UsdValue};
    use primitive_types::U256;
    use rayon::prelude::*;

    #[test]
    fn test_block_flood_admits_exactly_cap() {
        let t = gateway(&default_config());
        let gateway = t.gateway.clone();

        let results: Vec<_> = (0..64)
            .into_par_iter()
            .map(|_| gateway.send_universal_tx(USER, gas_request(), U256::from(WEI_PER_DOLLAR)))
            .collect();

        let admitted = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(admitted, 10);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| e.kind() == ErrorKind::BlockCapExceeded));
        assert_eq!(t.gateway.block_consumed_usd(), UsdValue::from_dollars(10));
        assert_eq!(t.events.len(), 10);
    }

    #[test]
    fn test_epoch_flood_never_exceeds_threshold() {
        let t = gateway(&default_config());
        let gateway = t.gateway.clone();

        let admitted = (0..50)
            .into_par_iter()
            .filter(|_| {
                gateway
                    .send_universal_tx(USER, funds_request(usdc(), 100), U256::zero())
                    .is_ok()
            })
            .count();

        assert_eq!(admitted, 10);
        assert_eq!(
            t.gateway.token_usage(&usdc()).unwrap(),
            (U256::from(1000u64), U256::zero())
        );
        assert_eq!(t.vault.custody(&usdc()), U256::from(1000u64));
    }

    #[test]
    fn test_readers_run_alongside_writers() {
        let t = gateway(&default_config());
        let gateway = t.gateway.clone();

        (0..40).into_par_iter().for_each(|i| {
            if i % 2 == 0 {
                let _ = gateway.send_universal_tx(USER, gas_request(), U256::from(WEI_PER_DOLLAR));
            } else {
                let consumed = gateway.block_consumed_usd();
                assert!(consumed <= UsdValue::from_dollars(10));
                let snapshot = gateway.ledger_snapshot();
                assert!(snapshot.block_budget.consumed_usd <= snapshot.block_budget.cap_usd);
            }
        });
    }
}
