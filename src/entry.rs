use smallvec::SmallVec;

use crate::dataset::{Dataset, Record};

/// Index of a record inside the [`Dataset`] it was generated into.
pub type RecordId = u32;

/// Every record sharing one key, in insertion order.
pub type Payload = SmallVec<[RecordId; 4]>;

/// One unique key plus its payload. The key is borrowed from the dataset,
/// so no structure holding entries can outlive the records they point at.
#[derive(Clone, Debug)]
pub struct Entry<'a> {
    pub key: &'a str,
    pub payload: Payload,
}

impl<'a> Entry<'a> {
    #[inline]
    pub fn new(key: &'a str, first: RecordId) -> Self {
        let mut payload = Payload::new();
        payload.push(first);
        Self { key, payload }
    }
}

/// Keyed lookup structure built from a borrowed dataset.
pub trait SearchIndex<'a> {
    /// Adds one record. A key seen before appends to its existing payload.
    fn insert(&mut self, id: RecordId, record: &'a Record);

    /// Payload for `key`, or an empty slice when the key is absent.
    fn search(&self, key: &str) -> &[RecordId];

    fn extend_from(&mut self, dataset: &'a Dataset) {
        for (id, record) in dataset.iter() {
            self.insert(id, record);
        }
    }
}
