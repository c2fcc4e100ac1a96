//! Batch invariant checks
//!
//! Verifies a partition against the input it was built from: every record
//! placed exactly once, no duplicate key inside a batch, the minimum batch
//! count, no empty batch and an even spread of the dominating key.

use super::types::{Batch, KeyFrequency, Keyed};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

/// A broken batch invariant
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("expected {expected} records across batches, found {actual}")]
    RecordCountMismatch { expected: usize, actual: usize },

    #[error("record {record} occurs {expected} times in the input but {actual} times in the batches")]
    RecordMismatch {
        record: String,
        expected: usize,
        actual: usize,
    },

    #[error("batch {batch} holds key {key} more than once")]
    DuplicateKey { batch: usize, key: String },

    #[error("expected {expected} batches, found {actual}")]
    BatchCountMismatch { expected: usize, actual: usize },

    #[error("batch {batch} is empty")]
    EmptyBatch { batch: usize },

    #[error("key {key} is spread unevenly: per-batch counts range from {min} to {max}")]
    UnevenSpread { key: String, min: usize, max: usize },
}

/// Check every invariant, including whole-record conservation
pub fn verify<R>(input: &[R], batches: &[Batch<R>]) -> Result<(), Violation>
where
    R: Keyed + Eq + Hash + Debug,
{
    check_conservation(input, batches)?;
    check_keys(input, batches)
}

/// Check every invariant that only needs the keys
///
/// Record count is compared, but records are not matched one to one.
pub fn check_keys<R: Keyed>(input: &[R], batches: &[Batch<R>]) -> Result<(), Violation> {
    let placed: usize = batches.iter().map(Batch::len).sum();
    if placed != input.len() {
        return Err(Violation::RecordCountMismatch {
            expected: input.len(),
            actual: placed,
        });
    }

    check_unique_keys(batches)?;

    let frequency = KeyFrequency::from_records(input);
    if batches.len() != frequency.max() {
        return Err(Violation::BatchCountMismatch {
            expected: frequency.max(),
            actual: batches.len(),
        });
    }

    if let Some(empty) = batches.iter().position(Batch::is_empty) {
        return Err(Violation::EmptyBatch { batch: empty });
    }

    match frequency.dominating_key() {
        Some(key) => check_spread(key, batches),
        None => Ok(()),
    }
}

/// Check that input and batches hold the same records, counted as a multiset
pub fn check_conservation<R>(input: &[R], batches: &[Batch<R>]) -> Result<(), Violation>
where
    R: Eq + Hash + Debug,
{
    let placed: usize = batches.iter().map(Batch::len).sum();
    if placed != input.len() {
        return Err(Violation::RecordCountMismatch {
            expected: input.len(),
            actual: placed,
        });
    }

    let mut expected: HashMap<&R, usize> = HashMap::new();
    for record in input {
        *expected.entry(record).or_insert(0) += 1;
    }

    let mut actual: HashMap<&R, usize> = HashMap::new();
    for record in batches.iter().flat_map(|batch| batch.iter()) {
        *actual.entry(record).or_insert(0) += 1;
    }

    for (record, &count) in &expected {
        let found = actual.get(record).copied().unwrap_or(0);
        if found != count {
            return Err(Violation::RecordMismatch {
                record: format!("{record:?}"),
                expected: count,
                actual: found,
            });
        }
    }

    // Same total and every input record matched, so nothing extra can remain
    Ok(())
}

/// Check that no batch holds the same key twice
pub fn check_unique_keys<R: Keyed>(batches: &[Batch<R>]) -> Result<(), Violation> {
    for batch in batches {
        let mut seen = std::collections::HashSet::with_capacity(batch.len());
        for key in batch.keys() {
            if !seen.insert(key) {
                return Err(Violation::DuplicateKey {
                    batch: batch.index(),
                    key: format!("{key:?}"),
                });
            }
        }
    }
    Ok(())
}

/// Check that a key's per-batch counts differ by at most one
pub fn check_spread<R: Keyed>(key: &R::Key, batches: &[Batch<R>]) -> Result<(), Violation> {
    let counts = spread(key, batches);
    let min = counts.iter().copied().min().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0);

    if max - min > 1 {
        return Err(Violation::UnevenSpread {
            key: format!("{key:?}"),
            min,
            max,
        });
    }
    Ok(())
}

/// Occurrences of a key in each batch
pub fn spread<R: Keyed>(key: &R::Key, batches: &[Batch<R>]) -> Vec<usize> {
    batches
        .iter()
        .map(|batch| batch.keys().filter(|k| *k == key).count())
        .collect()
}
