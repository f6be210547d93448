use anyhow::{ensure, Context, Result};
use rand::{seq::SliceRandom, Rng};
use std::{convert::TryFrom, fmt, ops::RangeInclusive};

use crate::entry::RecordId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CabinType {
    Lux,
    First,
    Second,
    Third,
}

impl CabinType {
    pub const ALL: [CabinType; 4] = [
        CabinType::Lux,
        CabinType::First,
        CabinType::Second,
        CabinType::Third,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CabinType::Lux => "Lux",
            CabinType::First => "1",
            CabinType::Second => "2",
            CabinType::Third => "3",
        }
    }
}

impl fmt::Display for CabinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A passenger record. Only `key` takes part in lookups.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub cabin_number: u32,
    pub cabin_type: CabinType,
    pub destination_port: String,
}

impl Record {
    pub fn new(
        key: impl Into<String>,
        cabin_number: u32,
        cabin_type: CabinType,
        destination_port: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            cabin_number,
            cabin_type,
            destination_port: destination_port.into(),
        }
    }

    /// Record with placeholder non-key fields.
    pub fn with_key(key: impl Into<String>) -> Self {
        Self::new(key, 1, CabinType::Lux, "port")
    }
}

/// Immutable, ordered record sequence. Structures built from it borrow it,
/// so it stays alive and unchanged until every one of them is dropped.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(records: Vec<Record>) -> Self {
        RecordId::try_from(records.len()).expect("too many records for a dataset");
        Self { records }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.get(id as usize)
    }

    #[inline]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = (RecordId, &Record)> + '_ {
        // `new` bounds the length, so every index fits a RecordId.
        self.records
            .iter()
            .enumerate()
            .map(|(idx, record)| (idx as RecordId, record))
    }

    /// Key of a uniformly chosen record; `None` only for an empty dataset.
    pub fn pick_key<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&str> {
        self.records.choose(rng).map(|r| r.key.as_str())
    }
}

impl From<Vec<Record>> for Dataset {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

/// Shape of the synthetic workload.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub key_len: usize,
    pub port_len: usize,
    pub cabin_numbers: RangeInclusive<u32>,
    pub cabin_types: Vec<CabinType>,
    /// Lower bound on the number of distinct keys.
    pub min_pool: usize,
    /// One distinct key per `pool_divisor` records on average.
    pub pool_divisor: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            key_len: 10,
            port_len: 6,
            cabin_numbers: 1..=1000,
            cabin_types: CabinType::ALL.to_vec(),
            min_pool: 10,
            pool_divisor: 20,
        }
    }
}

impl GeneratorConfig {
    pub fn pool_size(&self, n: usize) -> usize {
        self.min_pool.max(n.checked_div(self.pool_divisor).unwrap_or(0))
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.key_len > 0, "key length must be positive");
        ensure!(self.pool_divisor > 0, "pool divisor must be positive");
        ensure!(!self.cabin_types.is_empty(), "cabin type set is empty");
        ensure!(!self.cabin_numbers.is_empty(), "cabin number range is empty");
        Ok(())
    }

    /// Generates `n` records whose keys are drawn uniformly from a pool of
    /// `pool_size(n)` random strings, so most keys repeat many times.
    ///
    /// Fails without drawing anything if the config does not pass
    /// [`validate`](Self::validate).
    pub fn generate<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Dataset> {
        self.validate()?;
        let pool: Vec<String> = (0..self.pool_size(n).max(1))
            .map(|_| random_string(rng, self.key_len))
            .collect();

        let mut records = Vec::with_capacity(n);
        for _ in 0..n {
            let key = pool[rng.gen_range(0..pool.len())].clone();
            let cabin_number = rng.gen_range(self.cabin_numbers.clone());
            let cabin_type = self
                .cabin_types
                .choose(rng)
                .copied()
                .context("cabin type set is empty")?;
            let destination_port = random_string(rng, self.port_len);
            records.push(Record {
                key,
                cabin_number,
                cabin_type,
                destination_port,
            });
        }
        Ok(Dataset::new(records))
    }
}

/// Lowercase ASCII string of exactly `len` bytes.
pub fn random_string<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
}
