use std::num::NonZeroUsize;

use crate::{
    dataset::Record,
    entry::{Entry, RecordId, SearchIndex},
};

type LinkId = u32;

const HASH_MULTIPLIER: usize = 31;

/// Polynomial rolling hash, reduced modulo `buckets` after every byte.
#[inline]
pub fn rolling_hash(bytes: &[u8], buckets: NonZeroUsize) -> usize {
    let m = buckets.get();
    bytes.iter().fold(0usize, |h, &b| {
        h.wrapping_mul(HASH_MULTIPLIER).wrapping_add(b as usize) % m
    })
}

struct Link<'a> {
    entry: Entry<'a>,
    next: Option<LinkId>,
}

/// Fixed-size separate-chaining hash table, one entry per unique key.
///
/// Chains are singly linked through an arena of links; each bucket only
/// stores the index of its head.
pub struct ChainedHashTable<'a> {
    buckets: NonZeroUsize,
    heads: Vec<Option<LinkId>>,
    links: Vec<Link<'a>>,
    collisions: usize,
    key_collisions: usize,
}

impl<'a> ChainedHashTable<'a> {
    pub fn with_buckets(buckets: NonZeroUsize) -> Self {
        Self {
            buckets,
            heads: vec![None; buckets.get()],
            links: Vec::new(),
            collisions: 0,
            key_collisions: 0,
        }
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.heads.len()
    }

    /// Number of unique keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Insertions that landed in an already occupied bucket, including
    /// repeated inserts of a key that is already stored there.
    #[inline]
    pub fn collision_count(&self) -> usize {
        self.collisions
    }

    /// Insertions that added a new key to an already occupied bucket.
    #[inline]
    pub fn key_collision_count(&self) -> usize {
        self.key_collisions
    }

    pub fn occupied_buckets(&self) -> usize {
        self.heads.iter().filter(|h| h.is_some()).count()
    }

    pub fn longest_chain(&self) -> usize {
        self.heads
            .iter()
            .map(|&head| self.chain(head).count())
            .max()
            .unwrap_or(0)
    }

    #[inline]
    pub fn bucket_of(&self, key: &str) -> usize {
        rolling_hash(key.as_bytes(), self.buckets)
    }

    fn chain(&self, head: Option<LinkId>) -> impl Iterator<Item = &Link<'a>> + '_ {
        std::iter::successors(head.map(|id| &self.links[id as usize]), move |link| {
            link.next.map(|id| &self.links[id as usize])
        })
    }

    fn alloc(&mut self, key: &'a str, first: RecordId) -> LinkId {
        let id = LinkId::try_from(self.links.len()).expect("too many entries in hash table");
        self.links.push(Link {
            entry: Entry::new(key, first),
            next: None,
        });
        id
    }

    pub fn insert_key(&mut self, id: RecordId, key: &'a str) {
        let bucket = self.bucket_of(key);
        let Some(mut cur) = self.heads[bucket] else {
            let link = self.alloc(key, id);
            self.heads[bucket] = Some(link);
            return;
        };

        self.collisions += 1;
        loop {
            let link = &mut self.links[cur as usize];
            if link.entry.key == key {
                link.entry.payload.push(id);
                return;
            }
            match link.next {
                Some(next) => cur = next,
                None => break,
            }
        }
        self.key_collisions += 1;
        let tail = self.alloc(key, id);
        self.links[cur as usize].next = Some(tail);
    }

    pub fn get(&self, key: &str) -> Option<&Entry<'a>> {
        self.chain(self.heads[self.bucket_of(key)])
            .map(|link| &link.entry)
            .find(|entry| entry.key == key)
    }
}

impl<'a> SearchIndex<'a> for ChainedHashTable<'a> {
    #[inline]
    fn insert(&mut self, id: RecordId, record: &'a Record) {
        self.insert_key(id, &record.key);
    }

    fn search(&self, key: &str) -> &[RecordId] {
        self.get(key).map_or(&[], |entry| entry.payload.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nz(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn hash_matches_hand_computation() {
        // "ab" = (97 * 31 + 98) mod 1000 = 3105 mod 1000
        assert_eq!(rolling_hash(b"ab", nz(1000)), 105);
        assert_eq!(rolling_hash(b"", nz(7)), 0);
        assert_eq!(rolling_hash(b"anything", nz(1)), 0);
        for n in [1, 2, 3, 201, 2_000_001] {
            assert!(rolling_hash(b"qwertyuiop", nz(n)) < n);
        }
    }

    #[test]
    fn single_bucket_counts_every_later_insert() {
        let keys: Vec<String> = (0..50).map(|i| format!("key{i}")).collect();
        let mut t = ChainedHashTable::with_buckets(nz(1));
        for (i, k) in keys.iter().enumerate() {
            t.insert_key(i as RecordId, k);
        }
        assert_eq!(t.collision_count(), keys.len() - 1);
        assert_eq!(t.key_collision_count(), keys.len() - 1);
        assert_eq!(t.len(), keys.len());
        assert_eq!(t.longest_chain(), keys.len());
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(t.search(k), [i as RecordId]);
        }
    }

    #[test]
    fn same_key_reinsert_counts_as_collision() {
        let mut t = ChainedHashTable::with_buckets(nz(101));
        for i in 0..5 {
            t.insert_key(i, "repeat");
        }
        assert_eq!(t.collision_count(), 4);
        assert_eq!(t.key_collision_count(), 0);
        assert_eq!(t.len(), 1);
        assert_eq!(t.occupied_buckets(), 1);
        assert_eq!(t.search("repeat"), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn new_keys_append_at_chain_tail() {
        let mut t = ChainedHashTable::with_buckets(nz(1));
        t.insert_key(0, "first");
        t.insert_key(1, "second");
        t.insert_key(2, "third");
        let order: Vec<&str> = t.chain(t.heads[0]).map(|l| l.entry.key).collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[test]
    fn miss_in_empty_and_occupied_buckets() {
        let mut t = ChainedHashTable::with_buckets(nz(3));
        assert!(t.search("x").is_empty());
        t.insert_key(0, "x");
        assert!(t.search("y").is_empty());
        assert!(t.get("x").is_some());
    }
}
