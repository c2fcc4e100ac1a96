//! Batch types and traits
//!
//! Defines the keyed-record abstraction, the per-run key frequency table and
//! the batch container.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// A record with one designated key
///
/// The partitioner only ever looks at the key. Everything else about the
/// record is payload and is moved through untouched.
pub trait Keyed {
    /// Key type whose duplication within a batch is forbidden
    type Key: Eq + Hash + Debug;

    /// Get the record's key
    fn key(&self) -> &Self::Key;
}

impl<K: Eq + Hash + Debug, V> Keyed for (K, V) {
    type Key = K;

    fn key(&self) -> &K {
        &self.0
    }
}

// ============================================================================
// Key Frequency
// ============================================================================

/// Occurrence count per key for a single run
///
/// Borrows the keys from the records it was built from, so it never outlives
/// the input.
#[derive(Debug, Clone)]
pub struct KeyFrequency<'a, K> {
    counts: HashMap<&'a K, usize>,
    /// Distinct keys in order of first appearance
    first_seen: Vec<&'a K>,
    total: usize,
    max: usize,
}

impl<'a, K: Eq + Hash> KeyFrequency<'a, K> {
    /// Count the keys of a slice of records
    pub fn from_records<R>(records: &'a [R]) -> Self
    where
        R: Keyed<Key = K>,
    {
        Self::from_keys(records.iter().map(|r| r.key()))
    }

    /// Count a sequence of keys
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = &'a K>,
    {
        let mut counts = HashMap::new();
        let mut first_seen = Vec::new();
        let mut total = 0;
        let mut max = 0;

        for key in keys {
            let count = counts.entry(key).or_insert_with(|| {
                first_seen.push(key);
                0
            });
            *count += 1;
            max = max.max(*count);
            total += 1;
        }

        Self {
            counts,
            first_seen,
            total,
            max,
        }
    }

    /// Number of occurrences of a key (0 if never seen)
    pub fn count(&self, key: &K) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Highest occurrence count of any key, which is also the batch count
    pub fn max(&self) -> usize {
        self.max
    }

    /// The key with the highest count; ties go to the key seen first
    pub fn dominating_key(&self) -> Option<&'a K> {
        self.first_seen
            .iter()
            .copied()
            .find(|key| self.count(key) == self.max)
    }

    /// Number of distinct keys
    pub fn distinct_keys(&self) -> usize {
        self.first_seen.len()
    }

    /// Number of records counted
    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether nothing was counted
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Iterate `(key, count)` pairs in order of first appearance
    pub fn iter(&self) -> impl Iterator<Item = (&'a K, usize)> + '_ {
        self.first_seen.iter().map(|key| (*key, self.count(key)))
    }
}

// ============================================================================
// Assignment
// ============================================================================

/// Batch index chosen for every input record, in input order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    /// Number of batches the indices refer to
    pub batch_count: usize,
    /// `indices[i]` is the batch of the i-th input record
    pub indices: Vec<usize>,
}

impl Assignment {
    /// Create an assignment
    pub fn new(batch_count: usize, indices: Vec<usize>) -> Self {
        Self {
            batch_count,
            indices,
        }
    }

    /// Number of records assigned
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether no record was assigned
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Move records into their batches, keeping input order inside each batch
    ///
    /// `records` must be the slice the assignment was computed from.
    pub fn apply<R>(&self, records: Vec<R>) -> Vec<Batch<R>> {
        debug_assert_eq!(records.len(), self.indices.len());

        let mut batches: Vec<Batch<R>> = (0..self.batch_count).map(Batch::new).collect();
        for (record, &index) in records.into_iter().zip(&self.indices) {
            batches[index].push(record);
        }
        batches
    }
}

// ============================================================================
// Batch
// ============================================================================

/// One output group of records, free of duplicate keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch<R> {
    index: usize,
    records: Vec<R>,
}

impl<R> Batch<R> {
    /// Create an empty batch at the given index
    pub fn new(index: usize) -> Self {
        Self {
            index,
            records: Vec::new(),
        }
    }

    /// Create a batch from records already known to be key-unique
    pub fn from_records(index: usize, records: Vec<R>) -> Self {
        Self { index, records }
    }

    /// Position of this batch in the output
    pub fn index(&self) -> usize {
        self.index
    }

    /// Records in this batch
    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate the records
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    /// Take the records out of the batch
    pub fn into_records(self) -> Vec<R> {
        self.records
    }

    pub(crate) fn push(&mut self, record: R) {
        self.records.push(record);
    }
}

impl<R: Keyed> Batch<R> {
    /// Whether a record with this key is in the batch
    pub fn contains_key(&self, key: &R::Key) -> bool {
        self.records.iter().any(|r| r.key() == key)
    }

    /// Keys of the records, in batch order
    pub fn keys(&self) -> impl Iterator<Item = &R::Key> {
        self.records.iter().map(|r| r.key())
    }
}

impl<R> IntoIterator for Batch<R> {
    type Item = R;
    type IntoIter = std::vec::IntoIter<R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'b, R> IntoIterator for &'b Batch<R> {
    type Item = &'b R;
    type IntoIter = std::slice::Iter<'b, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
