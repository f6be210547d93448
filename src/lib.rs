#![deny(clippy::uninlined_format_args)]
#![deny(clippy::to_string_in_format_args)]
//! Lookup latency of four string-keyed search strategies over a
//! duplicate-heavy workload, measured against a B-tree baseline.
//!
//! Every structure borrows its keys from a [`Dataset`] and stores one
//! [`Entry`] per unique key; repeated keys extend that entry's payload.

pub mod bst;
pub mod chained;
pub mod dataset;
pub mod entry;
pub mod harness;
pub mod linear;
pub mod rbtree;
pub mod reference;
pub mod report;

pub use bst::SearchTree;
pub use chained::{rolling_hash, ChainedHashTable};
pub use dataset::{CabinType, Dataset, GeneratorConfig, Record};
pub use entry::{Entry, Payload, RecordId, SearchIndex};
pub use harness::{measure_dataset, measure_size, run, BenchConfig, ResultRow};
pub use linear::linear_search;
pub use rbtree::{Color, InvariantViolation, RedBlackTree};
pub use reference::ReferenceMap;
pub use report::{CsvSink, ResultSink, CSV_HEADER};
