//! Run summary
//!
//! Statistics about a finished partition, for logs and the `stats` command.

use super::types::{Batch, KeyFrequency, Keyed};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Statistics about one partition run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Number of input records
    pub records: usize,
    /// Number of batches produced
    pub batches: usize,
    /// Number of distinct keys
    pub distinct_keys: usize,
    /// Key with the highest count, if any
    pub dominating_key: Option<String>,
    /// Occurrences of the dominating key
    pub dominating_count: usize,
    /// Size of each batch, by index
    pub batch_sizes: Vec<usize>,
    /// Size of the largest batch
    pub largest_batch: usize,
    /// Size of the smallest batch
    pub smallest_batch: usize,
}

impl BatchSummary {
    /// Summarize batches built from `input`
    pub fn new<R>(input: &[R], batches: &[Batch<R>]) -> Self
    where
        R: Keyed,
        R::Key: Display,
    {
        let frequency = KeyFrequency::from_records(input);
        let batch_sizes: Vec<usize> = batches.iter().map(Batch::len).collect();

        Self {
            records: frequency.total(),
            batches: batches.len(),
            distinct_keys: frequency.distinct_keys(),
            dominating_key: frequency.dominating_key().map(ToString::to_string),
            dominating_count: frequency.max(),
            largest_batch: batch_sizes.iter().copied().max().unwrap_or(0),
            smallest_batch: batch_sizes.iter().copied().min().unwrap_or(0),
            batch_sizes,
        }
    }

    /// Difference between the largest and smallest batch
    pub fn size_skew(&self) -> usize {
        self.largest_batch - self.smallest_batch
    }
}
