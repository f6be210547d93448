use std::sync::Mutex;

use once_cell::sync::Lazy;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use searchbench::{Dataset, GeneratorConfig};

static BASE_SEED: Lazy<u64> = Lazy::new(|| {
    std::env::var("SEARCHBENCH_SEED")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x7d11_5eed_f065_cafe)
});

static RNG_COUNTER: Lazy<Mutex<u64>> = Lazy::new(|| Mutex::new(0));

pub fn usize_env(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

pub fn duration_env(name: &str, default_secs: f64) -> std::time::Duration {
    let secs = std::env::var(name)
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(default_secs);
    std::time::Duration::from_secs_f64(secs)
}

#[inline]
pub fn seeded_rng() -> StdRng {
    let mut guard = RNG_COUNTER.lock().unwrap();
    let seed = BASE_SEED.wrapping_add(*guard);
    *guard = guard.wrapping_add(1);
    StdRng::seed_from_u64(seed)
}

pub fn dataset(n: usize) -> Dataset {
    GeneratorConfig::default()
        .generate(n, &mut seeded_rng())
        .expect("default generator config is valid")
}

/// Up to `k` keys drawn from the dataset, duplicates allowed.
pub fn pick_existing(dataset: &Dataset, k: usize) -> Vec<String> {
    let mut rng = seeded_rng();
    (0..k)
        .filter_map(|_| dataset.records().choose(&mut rng))
        .map(|r| r.key.clone())
        .collect()
}
