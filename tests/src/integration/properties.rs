//! # Ledger Properties
//!
//! Randomized sequences of admissions, block advances and epoch rollovers.
//! After every step the stored records stay within their limits, and any
//! rejected request leaves the ledger byte-for-byte unchanged.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use pg_admission::adapters::StaticPriceFeed;
    use pg_admission::{GatewayApi, PriceOracle, UsdValue};
    use primitive_types::U256;
    use proptest::prelude::*;
    use std::sync::Arc;

    #[derive(Clone, Debug)]
    enum Op {
        Gas(u64),
        Funds(u64),
        Batched { gas_cents: u64, funds: u64 },
        NextBlock,
        Advance(u64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => (50u64..1_500).prop_map(Op::Gas),
            4 => (1u64..600).prop_map(Op::Funds),
            2 => (50u64..1_200, 1u64..400)
                .prop_map(|(gas_cents, funds)| Op::Batched { gas_cents, funds }),
            1 => Just(Op::NextBlock),
            1 => (1u64..4_000).prop_map(Op::Advance),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_limits_hold_and_rejections_leave_no_trace(ops in prop::collection::vec(op(), 1..40)) {
            let t = gateway(&default_config());
            let mut now = T0;

            for op in ops {
                let before = t.gateway.ledger_snapshot();
                let result = match op {
                    Op::Gas(cents) => Some(t.gateway.send_universal_tx(
                        USER,
                        gas_request(),
                        wei_for_cents(cents),
                    )),
                    Op::Funds(amount) => Some(t.gateway.send_universal_tx(
                        USER,
                        funds_request(usdc(), amount),
                        U256::zero(),
                    )),
                    Op::Batched { gas_cents, funds } => Some(t.gateway.send_universal_tx(
                        USER,
                        request(usdc(), U256::from(funds), vec![0x01]),
                        wei_for_cents(gas_cents),
                    )),
                    Op::NextBlock => {
                        t.clock.next_block();
                        None
                    }
                    Op::Advance(secs) => {
                        now += secs;
                        t.clock.set_time(now);
                        t.feed.set_answer(ETH_2000, now);
                        None
                    }
                };

                if let Some(Err(_)) = result {
                    prop_assert_eq!(t.gateway.ledger_snapshot(), before);
                }

                prop_assert!(t.gateway.block_consumed_usd() <= UsdValue::from_dollars(10));
                let (used, remaining) = t.gateway.token_usage(&usdc()).unwrap();
                prop_assert!(used <= U256::from(1000u64));
                prop_assert_eq!(used + remaining, U256::from(1000u64));
            }
        }

        #[test]
        fn prop_usage_queries_do_not_mutate(
            spent in 1u64..1_000,
            later in 0u64..20_000,
        ) {
            let t = gateway(&default_config());
            t.gateway
                .send_universal_tx(USER, funds_request(usdc(), spent), U256::zero())
                .unwrap();
            let stored = t.gateway.ledger_snapshot();

            t.clock.set_time(T0 + later);
            t.clock.next_block();
            let _ = t.gateway.token_usage(&usdc());
            let _ = t.gateway.block_consumed_usd();
            let _ = t.gateway.native_bounds();

            prop_assert_eq!(t.gateway.ledger_snapshot(), stored);
        }

        #[test]
        fn prop_quote_as_usd_is_monotonic(
            price in 1i128..1_000_000_0000_0000,
            a in any::<u128>(),
            b in any::<u128>(),
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let oracle = PriceOracle::new(Arc::new(StaticPriceFeed::new(price, 8, T0)), 3600);

            let lo_usd = oracle.quote_as_usd(U256::from(lo), T0).unwrap();
            let hi_usd = oracle.quote_as_usd(U256::from(hi), T0).unwrap();
            prop_assert!(lo_usd <= hi_usd);
        }

        #[test]
        fn prop_preview_matches_send(cents in 1u64..2_000, consumed in 0u64..1_000) {
            let t = gateway(&default_config());
            if consumed >= 100 {
                t.gateway
                    .send_universal_tx(USER, gas_request(), wei_for_cents(consumed))
                    .unwrap();
            }
            let before = t.gateway.ledger_snapshot();
            let decision = t.gateway.preview(USER, &gas_request(), wei_for_cents(cents));
            prop_assert_eq!(t.gateway.ledger_snapshot(), before);

            let sent = t.gateway.send_universal_tx(USER, gas_request(), wei_for_cents(cents));
            prop_assert_eq!(decision.is_allowed(), sent.is_ok());
        }
    }
}
