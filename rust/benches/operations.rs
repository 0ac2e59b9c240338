use bplus_engine::BPlusTree;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEED: u64 = 42;
const ORDERS: [usize; 4] = [3, 8, 32, 128];
const SNAPSHOT_ORDER: usize = 8;

fn generate_keys(size: usize) -> Vec<i32> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..size).map(|_| rng.gen_range(0..size as i32 * 2)).collect()
}

fn build_tree(order: usize, keys: &[i32]) -> BPlusTree<i32, i32> {
    let mut tree = BPlusTree::new(order).unwrap();
    for &key in keys {
        tree.insert_key(key);
    }
    tree
}

fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");
    group.sample_size(30);
    let keys = generate_keys(10_000);

    for order in ORDERS {
        group.bench_with_input(BenchmarkId::new("random", order), &order, |b, &order| {
            b.iter(|| black_box(build_tree(order, &keys)))
        });

        group.bench_with_input(BenchmarkId::new("sequential", order), &order, |b, &order| {
            b.iter(|| {
                let mut tree = BPlusTree::new(order).unwrap();
                for key in 0..10_000 {
                    black_box(tree.insert(key, key));
                }
                black_box(tree)
            })
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let keys = generate_keys(10_000);

    for order in ORDERS {
        let tree = build_tree(order, &keys);
        group.bench_with_input(BenchmarkId::new("lookup", order), &order, |b, _| {
            b.iter(|| {
                for key in &keys {
                    black_box(tree.search(key));
                }
            })
        });
    }
    group.finish();
}

fn bench_deletion(c: &mut Criterion) {
    let mut group = c.benchmark_group("deletion");
    group.sample_size(20);
    let keys = generate_keys(5_000);

    for order in ORDERS {
        let tree_keys = keys.clone();
        group.bench_with_input(BenchmarkId::new("random", order), &order, |b, &order| {
            b.iter_with_setup(
                || build_tree(order, &tree_keys),
                |mut tree| {
                    for key in &tree_keys {
                        black_box(tree.delete(key));
                    }
                    tree
                },
            )
        });
    }
    group.finish();
}

fn bench_snapshot(c: &mut Criterion) {
    let tree = build_tree(SNAPSHOT_ORDER, &generate_keys(2_000));
    c.bench_function("snapshot_export", |b| b.iter(|| black_box(tree.snapshot())));
}

criterion_group!(
    benches,
    bench_insertion,
    bench_search,
    bench_deletion,
    bench_snapshot
);
criterion_main!(benches);
