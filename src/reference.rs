use std::collections::BTreeMap;

use crate::{
    dataset::Record,
    entry::{Payload, RecordId, SearchIndex},
};

/// Baseline ordered multi-key map built on the standard B-tree.
#[derive(Default)]
pub struct ReferenceMap<'a> {
    by_key: BTreeMap<&'a str, Payload>,
}

impl<'a> ReferenceMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl<'a> SearchIndex<'a> for ReferenceMap<'a> {
    #[inline]
    fn insert(&mut self, id: RecordId, record: &'a Record) {
        self.by_key.entry(record.key.as_str()).or_default().push(id);
    }

    fn search(&self, key: &str) -> &[RecordId] {
        self.by_key.get(key).map_or(&[], |p| p.as_slice())
    }
}
