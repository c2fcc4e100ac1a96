//! Engine types
//!
//! Result of a batching run.

use crate::batch::{Batch, BatchSummary};
use crate::record::JsonRecord;
use std::time::Duration;

/// Batches produced by one run, with their statistics
#[derive(Debug, Clone)]
pub struct BatchRun {
    /// The batches, by index
    pub batches: Vec<Batch<JsonRecord>>,
    /// Statistics about the run
    pub summary: BatchSummary,
    /// Time spent partitioning and verifying
    pub elapsed: Duration,
}

impl BatchRun {
    /// Number of batches
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Number of records across all batches
    pub fn record_count(&self) -> usize {
        self.batches.iter().map(Batch::len).sum()
    }

    /// Whether the run produced no batches
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Take the batches out of the run
    pub fn into_batches(self) -> Vec<Batch<JsonRecord>> {
        self.batches
    }
}
