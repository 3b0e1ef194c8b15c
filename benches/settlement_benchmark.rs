use cashflow_engine::optimization::engine::SettlementEngine;
use cashflow_engine::simulation::stress_test::{generate_random_network, NetworkConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_settle(c: &mut Criterion, name: &str, bank_count: usize, transaction_count: usize) {
    let config = NetworkConfig {
        bank_count,
        transaction_count,
        ..Default::default()
    };
    let (network, set) = generate_random_network(&config).expect("valid generated network");
    let engine = SettlementEngine::default();

    c.bench_function(name, |b| {
        b.iter(|| engine.settle(black_box(&network), black_box(set.transactions())))
    });
}

fn bench_settlement_10_banks(c: &mut Criterion) {
    bench_settle(c, "settlement_10_banks", 10, 50);
}

fn bench_settlement_100_banks(c: &mut Criterion) {
    bench_settle(c, "settlement_100_banks", 100, 1_000);
}

fn bench_settlement_500_banks(c: &mut Criterion) {
    bench_settle(c, "settlement_500_banks", 500, 5_000);
}

criterion_group!(
    benches,
    bench_settlement_10_banks,
    bench_settlement_100_banks,
    bench_settlement_500_banks
);
criterion_main!(benches);
