use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use searchbench::{
    linear_search, BenchConfig, ChainedHashTable, RedBlackTree, ReferenceMap, SearchIndex,
    SearchTree,
};

mod support;

fn bench_lookup(c: &mut Criterion) {
    let query_count = support::usize_env("SEARCHBENCH_QUERY_COUNT", 1_000);
    let measurement = support::duration_env("SEARCHBENCH_MEASUREMENT_SECS", 5.0);
    let warmup = support::duration_env("SEARCHBENCH_WARMUP_SECS", 1.0);
    let sample_size = support::usize_env("SEARCHBENCH_SAMPLE_SIZE", 10);

    let mut group = c.benchmark_group("lookup");
    group.measurement_time(measurement);
    group.warm_up_time(warmup);
    group.sample_size(sample_size);

    for n in [1_000usize, 10_000, 100_000] {
        let data = support::dataset(n);
        let existing = support::pick_existing(&data, query_count);
        let missing: Vec<String> = (0..existing.len()).map(|i| format!("MISSING{i}")).collect();

        let mut bst = SearchTree::new();
        let mut rbt = RedBlackTree::new();
        let mut table = ChainedHashTable::with_buckets(BenchConfig::bucket_count(n));
        let mut map = ReferenceMap::new();
        bst.extend_from(&data);
        rbt.extend_from(&data);
        table.extend_from(&data);
        map.extend_from(&data);

        group.throughput(Throughput::Elements(existing.len() as u64));
        if n <= 10_000 {
            group.bench_with_input(BenchmarkId::new("linear", n), &existing, |b, keys| {
                b.iter(|| {
                    for key in keys {
                        black_box(linear_search(&data, black_box(key)));
                    }
                });
            });
        }
        let indexes: [(&str, &dyn SearchIndex<'_>); 4] = [
            ("bst", &bst),
            ("rbt", &rbt),
            ("hash", &table),
            ("btree_map", &map),
        ];
        for (name, index) in indexes {
            group.bench_with_input(BenchmarkId::new(name, n), &existing, |b, keys| {
                b.iter(|| {
                    for key in keys {
                        black_box(index.search(black_box(key)));
                    }
                });
            });
            group.bench_with_input(
                BenchmarkId::new(format!("{name}/missing"), n),
                &missing,
                |b, keys| {
                    b.iter(|| {
                        for key in keys {
                            black_box(index.search(black_box(key)));
                        }
                    });
                },
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_lookup);
criterion_main!(benches);
