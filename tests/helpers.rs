#![allow(dead_code)]

use rand::{rngs::StdRng, SeedableRng};
use rustc_hash::FxHashMap;
use searchbench::{
    BenchConfig, ChainedHashTable, Dataset, GeneratorConfig, Record, RecordId, RedBlackTree,
    ReferenceMap, SearchIndex, SearchTree,
};

pub struct Built<'a> {
    pub bst: SearchTree<'a>,
    pub rbt: RedBlackTree<'a>,
    pub table: ChainedHashTable<'a>,
    pub map: ReferenceMap<'a>,
}

impl<'a> Built<'a> {
    pub fn from_dataset(dataset: &'a Dataset) -> Self {
        let mut bst = SearchTree::new();
        let mut rbt = RedBlackTree::new();
        let mut table = ChainedHashTable::with_buckets(BenchConfig::bucket_count(dataset.len()));
        let mut map = ReferenceMap::new();
        bst.extend_from(dataset);
        rbt.extend_from(dataset);
        table.extend_from(dataset);
        map.extend_from(dataset);
        Self {
            bst,
            rbt,
            table,
            map,
        }
    }

    /// Results of every keyed structure, in a fixed order.
    pub fn search_all(&self, key: &str) -> [&[RecordId]; 4] {
        [
            self.bst.search(key),
            self.rbt.search(key),
            self.table.search(key),
            self.map.search(key),
        ]
    }
}

pub fn multiset(ids: &[RecordId]) -> FxHashMap<RecordId, usize> {
    let mut counts = FxHashMap::default();
    for &id in ids {
        *counts.entry(id).or_insert(0) += 1;
    }
    counts
}

pub fn dataset_of(keys: &[&str]) -> Dataset {
    Dataset::from(keys.iter().map(|k| Record::with_key(*k)).collect::<Vec<_>>())
}

pub fn generated(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    GeneratorConfig::default().generate(n, &mut rng).unwrap()
}
