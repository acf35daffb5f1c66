use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use sigmine::{
    mine_candidates, mine_significant_itemsets, ConditionalOrder, ConfidenceTable, MinerConfig, SignificanceMeasure,
    Transaction, TransactionDatabase,
};

/// Generate a synthetic weighted database
///
/// Parameters:
/// - num_transactions: Number of transactions
/// - num_items: Size of the item domain
/// - avg_transaction_size: Average items per transaction
/// - density: Probability that a drawn item is kept
fn generate_database(
    num_transactions: usize,
    num_items: usize,
    avg_transaction_size: usize,
    density: f64,
    config: &MinerConfig,
) -> TransactionDatabase {
    let mut rng = StdRng::seed_from_u64(num_transactions as u64 ^ num_items as u64);

    let mut transactions = Vec::with_capacity(num_transactions);
    for id in 1..=num_transactions {
        let random_factor: f64 = rng.r#gen();
        let size = (avg_transaction_size as f64 * (0.5 + random_factor)).round() as usize;

        let mut items = Vec::with_capacity(size);
        for _ in 0..size.min(num_items) {
            let density_check: f64 = rng.r#gen();
            if density_check < density {
                items.push((rng.gen_range(1..=num_items), rng.gen_range(1..=100u64)));
            }
        }
        transactions.push(Transaction::new(id, items));
    }

    let confidence =
        ConfidenceTable::from_pairs(num_items, (1..=num_items).map(|item| (item, rng.gen_range(0.05..1.0))))
            .expect("coefficients lie in [0, 1)");

    TransactionDatabase::new(transactions, confidence, config).expect("generated items stay in the domain")
}

fn bench_config(min_significance: f64) -> MinerConfig {
    MinerConfig {
        max_itemsets: 5_000_000,
        ..MinerConfig::with_min_significance(min_significance)
    }
}

/// Full three-scan mining over growing databases
fn bench_mining_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("mining_scaling");

    let configs = vec![
        ("small_100tx", 100, 20, 5),
        ("medium_500tx", 500, 50, 10),
        ("large_1000tx", 1000, 100, 15),
        ("xlarge_5000tx", 5000, 100, 20),
    ];

    let config = bench_config(0.1);
    for (name, num_tx, num_items, avg_size) in configs {
        let db = generate_database(num_tx, num_items, avg_size, 0.7, &config);

        group.bench_with_input(BenchmarkId::from_parameter(name), &db, |b, db| {
            b.iter(|| mine_significant_itemsets(black_box(db), black_box(&config)));
        });
    }

    group.finish();
}

fn bench_mining_min_significance(c: &mut Criterion) {
    let mut group = c.benchmark_group("mining_min_significance");

    let db = generate_database(1000, 50, 10, 0.7, &bench_config(0.1));

    for min_significance in [0.05, 0.1, 0.2, 0.3, 0.5] {
        let config = bench_config(min_significance);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:.2}", min_significance)),
            &config,
            |b, config| {
                b.iter(|| mine_significant_itemsets(black_box(&db), black_box(config)));
            },
        );
    }

    group.finish();
}

/// Tree phase only, comparing the growth variants
fn bench_growth_variants(c: &mut Criterion) {
    let mut group = c.benchmark_group("growth_variants");

    let base = bench_config(0.1);
    let db = generate_database(1000, 50, 10, 0.8, &base);

    let variants = vec![
        ("resorted", base.clone()),
        (
            "inherited",
            MinerConfig {
                conditional_order: ConditionalOrder::Inherited,
                ..base.clone()
            },
        ),
        (
            "no_single_path",
            MinerConfig {
                single_path_shortcut: false,
                ..base.clone()
            },
        ),
        (
            "pattern_share",
            MinerConfig {
                measure: SignificanceMeasure::PatternShare,
                ..base.clone()
            },
        ),
    ];

    for (name, config) in variants {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            b.iter(|| mine_candidates(black_box(&db), black_box(config)));
        });
    }

    group.finish();
}

fn bench_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    let sequential = bench_config(0.05);
    let parallel = MinerConfig {
        parallel_validation: true,
        ..sequential.clone()
    };
    let db = generate_database(5000, 50, 12, 0.8, &sequential);

    for (name, config) in [("sequential", sequential), ("parallel", parallel)] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &config, |b, config| {
            b.iter(|| mine_significant_itemsets(black_box(&db), black_box(config)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_mining_scaling,
    bench_mining_min_significance,
    bench_growth_variants,
    bench_validation
);
criterion_main!(benches);
