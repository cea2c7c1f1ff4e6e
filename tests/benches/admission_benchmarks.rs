//! # Admission Benchmarks
//!
//! | Path | Target |
//! |------|--------|
//! | Gas admission (quote, cap, block budget, custody) | < 10µs |
//! | Funds admission (epoch counter, custody) | < 10µs |
//! | Preview (no commit) | < 5µs |
//! | USD conversion | < 1µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pg_admission::adapters::StaticPriceFeed;
use pg_admission::{GatewayApi, GatewayConfig, PriceOracle, UsdValue};
use pg_tests::fixtures::*;
use primitive_types::U256;
use std::sync::Arc;
use std::time::Duration;

fn unlimited_config() -> GatewayConfig {
    let mut config = default_config();
    config.block_cap_usd = U256::zero();
    config.epoch_duration_seconds = 0;
    config
}

fn bench_gas_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("pg-admission-gas");
    group.measurement_time(Duration::from_secs(5));
    group.throughput(Throughput::Elements(1));

    let t = gateway(&unlimited_config());
    let amount = wei_for_cents(500);
    group.bench_function("send_universal_tx", |b| {
        b.iter(|| {
            let receipt = t
                .gateway
                .send_universal_tx(USER, black_box(gas_request()), black_box(amount))
                .unwrap();
            t.events.drain();
            receipt
        })
    });

    group.bench_function("preview", |b| {
        let req = gas_request();
        b.iter(|| t.gateway.preview(USER, black_box(&req), black_box(amount)))
    });

    group.finish();
}

fn bench_funds_admission(c: &mut Criterion) {
    let mut group = c.benchmark_group("pg-admission-funds");
    group.throughput(Throughput::Elements(1));

    let mut config = default_config();
    config.epoch_duration_seconds = 0;
    let t = gateway(&config);
    group.bench_function("token_bridge", |b| {
        b.iter(|| {
            let receipt = t
                .gateway
                .send_universal_tx(USER, black_box(funds_request(usdc(), 1)), U256::zero())
                .unwrap();
            t.events.drain();
            receipt
        })
    });

    group.finish();
}

fn bench_block_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("pg-admission-block-fill");

    for count in [10u64, 100, 1_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_with_setup(
                || {
                    let mut config = default_config();
                    config.block_cap_usd = UsdValue::from_dollars(count).raw();
                    gateway(&config)
                },
                |t| {
                    for _ in 0..count {
                        t.gateway
                            .send_universal_tx(USER, gas_request(), U256::from(WEI_PER_DOLLAR))
                            .unwrap();
                    }
                },
            )
        });
    }

    group.finish();
}

fn bench_usd_conversion(c: &mut Criterion) {
    let oracle = PriceOracle::new(Arc::new(StaticPriceFeed::new(ETH_2000, 8, T0)), 3600);
    let amount = U256::from(123_456_789_000_000_000u64);

    c.bench_function("pg-oracle-quote-as-usd", |b| {
        b.iter(|| oracle.quote_as_usd(black_box(amount), black_box(T0)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_gas_admission,
    bench_funds_admission,
    bench_block_fill,
    bench_usd_conversion
);
criterion_main!(benches);
