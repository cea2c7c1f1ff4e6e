//! # Boundary Scenarios
//!
//! Admission edges at the USD cap, block budget, epoch threshold and
//! oracle freshness, each probed from both sides.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use pg_admission::{Asset, ErrorKind, GatewayApi, GatewayConfig, UsdValue};
    use primitive_types::U256;

    fn next_epoch_start(now: u64, duration: u64) -> u64 {
        (now / duration + 1) * duration
    }

    // =========================================================================
    // USD cap
    // =========================================================================

    #[test]
    fn test_exact_min_cap_admitted_one_wei_less_rejected() {
        let t = gateway(&default_config());

        let receipt = t
            .gateway
            .send_universal_tx(USER, gas_request(), U256::from(WEI_PER_DOLLAR))
            .expect("exactly $1 admitted");
        assert_eq!(receipt.plan.gas_usd, UsdValue::from_dollars(1));

        let err = t
            .gateway
            .send_universal_tx(USER, gas_request(), U256::from(WEI_PER_DOLLAR - 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmountOutOfRange);
    }

    #[test]
    fn test_exact_max_cap_admitted_one_wei_more_rejected() {
        let t = gateway(&GatewayConfig::default());
        let ten_dollars = wei_for_cents(1000);

        assert!(t
            .gateway
            .send_universal_tx(USER, gas_request(), ten_dollars)
            .is_ok());
        let err = t
            .gateway
            .send_universal_tx(USER, gas_request(), ten_dollars + U256::one())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AmountOutOfRange);
    }

    #[test]
    fn test_native_bounds_bracket_the_cap() {
        let t = gateway(&default_config());
        let (min, max) = t.gateway.native_bounds().unwrap();
        assert_eq!(min, U256::from(WEI_PER_DOLLAR));
        assert_eq!(max, wei_for_cents(1000));
    }

    // =========================================================================
    // Block budget
    // =========================================================================

    #[test]
    fn test_block_fills_to_cap_then_resets() {
        let config = GatewayConfig {
            min_cap_usd: UsdValue::from_cents(1).raw(),
            ..default_config()
        };
        let t = gateway(&config);

        for cents in [200, 300, 500] {
            t.gateway
                .send_universal_tx(USER, gas_request(), wei_for_cents(cents))
                .expect("within block budget");
        }
        assert_eq!(t.gateway.block_consumed_usd(), UsdValue::from_dollars(10));

        let err = t
            .gateway
            .send_universal_tx(USER, gas_request(), wei_for_cents(1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BlockCapExceeded);
        assert_eq!(t.gateway.block_consumed_usd(), UsdValue::from_dollars(10));

        t.clock.next_block();
        assert_eq!(t.gateway.block_consumed_usd(), UsdValue::ZERO);
        for cents in [200, 300, 500] {
            t.gateway
                .send_universal_tx(USER, gas_request(), wei_for_cents(cents))
                .expect("fresh block");
        }
    }

    #[test]
    fn test_zero_block_cap_disables_budget() {
        let config = GatewayConfig {
            block_cap_usd: U256::zero(),
            ..default_config()
        };
        let t = gateway(&config);
        for _ in 0..5 {
            t.gateway
                .send_universal_tx(USER, gas_request(), wei_for_cents(1000))
                .expect("no block ceiling");
        }
        assert_eq!(t.gateway.block_consumed_usd(), UsdValue::ZERO);
    }

    // =========================================================================
    // Epoch rate limit
    // =========================================================================

    #[test]
    fn test_epoch_threshold_and_rollover() {
        let t = gateway(&default_config());

        t.gateway
            .send_universal_tx(USER, funds_request(usdc(), 600), U256::zero())
            .expect("600 of 1000");

        let err = t
            .gateway
            .send_universal_tx(USER, funds_request(usdc(), 500), U256::zero())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
        assert_eq!(
            t.gateway.token_usage(&usdc()).unwrap(),
            (U256::from(600u64), U256::from(400u64))
        );

        t.clock.set_time(next_epoch_start(T0, 3600));
        let receipt = t
            .gateway
            .send_universal_tx(USER, funds_request(usdc(), 500), U256::zero())
            .expect("new epoch");
        assert_eq!(receipt.epoch_index, Some(T0 / 3600 + 1));
    }

    #[test]
    fn test_epoch_exact_threshold_admitted() {
        let t = gateway(&default_config());
        t.gateway
            .send_universal_tx(USER, funds_request(usdc(), 1000), U256::zero())
            .expect("exactly the threshold");
        let err = t
            .gateway
            .send_universal_tx(USER, funds_request(usdc(), 1), U256::zero())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimitExceeded);
    }

    #[test]
    fn test_unconfigured_token_unsupported() {
        let t = gateway(&default_config());
        let other = "0x00000000000000000000000000000000000000bb"
            .parse::<Asset>()
            .unwrap();
        let err = t
            .gateway
            .send_universal_tx(USER, funds_request(other, 1), U256::zero())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TokenUnsupported);
    }

    // =========================================================================
    // Oracle
    // =========================================================================

    #[test]
    fn test_stale_price_boundary() {
        let t = gateway(&default_config());

        t.feed.set_answer(ETH_2000, T0 - 3601);
        let err = t
            .gateway
            .send_universal_tx(USER, gas_request(), wei_for_cents(200))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OracleStale);

        t.feed.set_answer(ETH_2000, T0 - 3599);
        assert!(t
            .gateway
            .send_universal_tx(USER, gas_request(), wei_for_cents(200))
            .is_ok());
    }

    #[test]
    fn test_sequencer_down_blocks_fresh_price() {
        let t = gateway_with_sequencer(&default_config());
        assert!(t
            .gateway
            .send_universal_tx(USER, gas_request(), wei_for_cents(200))
            .is_ok());

        t.sequencer.set_status(false, T0 - 86_400);
        let err = t
            .gateway
            .send_universal_tx(USER, gas_request(), wei_for_cents(200))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OracleInvalid);
    }

    #[test]
    fn test_sequencer_grace_period() {
        let t = gateway_with_sequencer(&default_config());
        t.sequencer.set_status(true, T0 - 60);
        let err = t
            .gateway
            .send_universal_tx(USER, gas_request(), wei_for_cents(200))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OracleInvalid);

        t.clock.advance(3600);
        t.feed.set_answer(ETH_2000, T0 + 3600);
        assert!(t
            .gateway
            .send_universal_tx(USER, gas_request(), wei_for_cents(200))
            .is_ok());
    }

    #[test]
    fn test_funds_only_route_ignores_oracle() {
        let t = gateway(&default_config());
        t.feed.set_unavailable(true);
        assert!(t
            .gateway
            .send_universal_tx(USER, funds_request(usdc(), 10), U256::zero())
            .is_ok());
    }
}
