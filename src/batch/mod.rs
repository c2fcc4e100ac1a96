//! Batch partitioning module
//!
//! Strategies: frequency countdown (default), round-robin rotation
//!
//! # Overview
//!
//! Splits keyed records into the fewest batches such that no batch holds two
//! records with the same key. The batch count is the highest per-key
//! occurrence count, so the most frequent key appears exactly once in every
//! batch.
//!
//! ```
//! use keyed_batcher::batch::partition;
//!
//! let records = vec![("a", 1), ("b", 2), ("a", 3), ("c", 4), ("b", 5)];
//! let batches = partition(records);
//!
//! assert_eq!(batches.len(), 2);
//! assert_eq!(batches.iter().map(|b| b.len()).sum::<usize>(), 5);
//! ```

mod invariants;
mod strategies;
mod summary;
mod types;

pub use invariants::{
    check_conservation, check_keys, check_spread, check_unique_keys, spread, verify, Violation,
};
pub use strategies::{
    partition, BatchPartitioner, BatchStrategy, CountdownStrategy, RoundRobinStrategy,
};
pub use summary::BatchSummary;
pub use types::{Assignment, Batch, KeyFrequency, Keyed};
