use crate::{dataset::Dataset, entry::RecordId};

/// Ids of every record whose key equals `key`, in ascending order.
pub fn linear_search(dataset: &Dataset, key: &str) -> Vec<RecordId> {
    dataset
        .iter()
        .filter(|(_, record)| record.key == key)
        .map(|(id, _)| id)
        .collect()
}
