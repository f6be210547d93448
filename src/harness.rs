use anyhow::{ensure, Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{hint::black_box, num::NonZeroUsize, path::PathBuf, time::Instant};
use tracing::{debug, info};

use crate::{
    bst::SearchTree,
    chained::ChainedHashTable,
    dataset::{Dataset, GeneratorConfig},
    entry::{RecordId, SearchIndex},
    linear::linear_search,
    rbtree::RedBlackTree,
    reference::ReferenceMap,
    report::ResultSink,
};

pub const DEFAULT_SIZES: [usize; 10] = [
    100, 1_000, 5_000, 10_000, 50_000, 100_000, 200_000, 500_000, 750_000, 1_000_000,
];

pub const DEFAULT_OUTPUT: &str = "search_times.csv";

#[derive(Clone, Debug)]
pub struct BenchConfig {
    pub sizes: Vec<usize>,
    pub generator: GeneratorConfig,
    /// Fixed seed for reproducible datasets; `None` draws from OS entropy.
    pub seed: Option<u64>,
    pub output: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            sizes: DEFAULT_SIZES.to_vec(),
            generator: GeneratorConfig::default(),
            seed: None,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl BenchConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.sizes.is_empty(), "size list is empty");
        for &n in &self.sizes {
            ensure!(n > 0, "size 0 has no record to pick a lookup key from");
            ensure!(
                RecordId::try_from(n).is_ok(),
                "size {n} exceeds the addressable record count"
            );
        }
        self.generator.validate()
    }

    /// Hash table width for a dataset of `n` records: `2n + 1`.
    pub fn bucket_count(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n.saturating_mul(2).saturating_add(1)).unwrap_or(NonZeroUsize::MIN)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Single-lookup latencies for one dataset size, in nanoseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResultRow {
    pub size: usize,
    pub linear_ns: u64,
    pub bst_ns: u64,
    pub rbt_ns: u64,
    pub hash_ns: u64,
    pub map_ns: u64,
    pub collisions: usize,
}

/// Runs `f` once and returns its result with the wall time it took. The
/// result passes through `black_box` inside the window so the lookup cannot
/// be elided or hoisted out of it.
#[inline]
fn timed<R>(f: impl FnOnce() -> R) -> (R, u64) {
    let start = Instant::now();
    let out = black_box(f());
    let elapsed = start.elapsed();
    (out, u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX))
}

fn build<'a, I: SearchIndex<'a>>(mut index: I, dataset: &'a Dataset) -> I {
    index.extend_from(dataset);
    index
}

/// Builds every structure from `dataset` and times one lookup of `key` in
/// each. Construction is not timed. All structures are dropped on return.
pub fn measure_dataset(dataset: &Dataset, key: &str, buckets: NonZeroUsize) -> ResultRow {
    let (linear, linear_ns) = timed(|| linear_search(dataset, key));

    let bst = build(SearchTree::new(), dataset);
    let (bst_hits, bst_ns) = timed(|| bst.search(key));

    let rbt = build(RedBlackTree::new(), dataset);
    let (rbt_hits, rbt_ns) = timed(|| rbt.search(key));

    let table = build(ChainedHashTable::with_buckets(buckets), dataset);
    let (hash_hits, hash_ns) = timed(|| table.search(key));

    let map = build(ReferenceMap::new(), dataset);
    let (map_hits, map_ns) = timed(|| map.search(key));

    debug_assert!(
        [bst_hits.len(), rbt_hits.len(), hash_hits.len(), map_hits.len()]
            .iter()
            .all(|&n| n == linear.len()),
        "structures disagree on hit count for {key:?}"
    );
    debug!(
        size = dataset.len(),
        hits = linear.len(),
        unique_keys = rbt.len(),
        bst_height = bst.height(),
        rbt_height = rbt.height(),
        buckets = table.bucket_count(),
        occupied_buckets = table.occupied_buckets(),
        longest_chain = table.longest_chain(),
        key_collisions = table.key_collision_count(),
        "structures built"
    );

    ResultRow {
        size: dataset.len(),
        linear_ns,
        bst_ns,
        rbt_ns,
        hash_ns,
        map_ns,
        collisions: table.collision_count(),
    }
}

/// Generates a dataset of `n` records and measures it.
pub fn measure_size<R: Rng + ?Sized>(
    config: &BenchConfig,
    n: usize,
    rng: &mut R,
) -> Result<ResultRow> {
    let dataset = config.generator.generate(n, rng)?;
    let key = dataset
        .pick_key(rng)
        .with_context(|| format!("no lookup key available for size {n}"))?;
    Ok(measure_dataset(&dataset, key, BenchConfig::bucket_count(n)))
}

/// Measures every configured size in order, handing each row to `sink`.
pub fn run<S: ResultSink + ?Sized>(config: &BenchConfig, sink: &mut S) -> Result<()> {
    config.validate()?;
    let mut rng = config.rng();
    for &n in &config.sizes {
        let row = measure_size(config, n, &mut rng)?;
        sink.accept(&row)?;
        info!(size = n, collisions = row.collisions, "N={n} done");
    }
    sink.finish()
}
