//! Batch assignment strategies
//!
//! Both strategies produce `max(count(key))` batches with no duplicate key in
//! any batch. They differ only in which valid arrangement they pick.

use super::types::{Assignment, Batch, KeyFrequency, Keyed};
use crate::types::StrategyKind;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Trait for batch assignment strategies
pub trait BatchStrategy {
    /// Strategy name, for logs
    fn name(&self) -> &'static str;

    /// Choose a batch index for every record
    fn assign<R: Keyed>(&self, records: &[R]) -> Assignment;

    /// Split records into batches
    fn partition<R: Keyed>(&self, records: Vec<R>) -> Vec<Batch<R>> {
        let assignment = self.assign(&records);
        assignment.apply(records)
    }
}

// ============================================================================
// Countdown Strategy
// ============================================================================

/// Frequency-countdown assignment
///
/// Each key owns a cursor that starts at its total count and is decremented
/// on every occurrence; the decremented value is the batch index. The first
/// occurrence of a key lands in batch `count - 1`, later ones in strictly
/// lower batches, so a key can never meet itself. The dominating key walks
/// every index from `max - 1` down to `0`.
///
/// Linear time, one map entry per distinct key.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountdownStrategy;

impl BatchStrategy for CountdownStrategy {
    fn name(&self) -> &'static str {
        "countdown"
    }

    fn assign<R: Keyed>(&self, records: &[R]) -> Assignment {
        let frequency = KeyFrequency::from_records(records);
        let mut cursors: HashMap<&R::Key, usize> =
            HashMap::with_capacity(frequency.distinct_keys());

        let indices = records
            .iter()
            .map(|record| {
                let key = record.key();
                let cursor = cursors
                    .entry(key)
                    .or_insert_with(|| frequency.count(key));
                *cursor -= 1;
                *cursor
            })
            .collect();

        Assignment::new(frequency.max(), indices)
    }
}

// ============================================================================
// Round-Robin Strategy
// ============================================================================

/// Round-robin rotation over the batch indices
///
/// The indices `0..max` sit in a rotating queue. Each record goes to the
/// first index, starting from the head, whose batch does not hold its key
/// yet; the queue is then rotated past that index. Spreads every key over
/// the whole index range at the cost of a scan per record.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoundRobinStrategy;

impl BatchStrategy for RoundRobinStrategy {
    fn name(&self) -> &'static str {
        "round_robin"
    }

    fn assign<R: Keyed>(&self, records: &[R]) -> Assignment {
        let frequency = KeyFrequency::from_records(records);
        let batch_count = frequency.max();

        let mut rotation: VecDeque<usize> = (0..batch_count).collect();
        let mut members: Vec<HashSet<&R::Key>> =
            (0..batch_count).map(|_| HashSet::new()).collect();
        let mut indices = Vec::with_capacity(records.len());

        for record in records {
            let key = record.key();

            // A key occurs at most `batch_count` times, so before its last
            // occurrence at least one batch still lacks it and this terminates.
            let index = loop {
                let head = rotation[0];
                if members[head].insert(key) {
                    break head;
                }
                rotation.rotate_left(1);
            };
            rotation.rotate_left(1);

            indices.push(index);
        }

        Assignment::new(batch_count, indices)
    }
}

// ============================================================================
// Partitioner
// ============================================================================

/// Partitioner dispatching to the configured strategy
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchPartitioner {
    kind: StrategyKind,
}

impl BatchPartitioner {
    /// Create a partitioner for a strategy
    pub fn new(kind: StrategyKind) -> Self {
        Self { kind }
    }

    /// The configured strategy
    pub fn kind(&self) -> StrategyKind {
        self.kind
    }

    /// Choose a batch index for every record
    pub fn assign<R: Keyed>(&self, records: &[R]) -> Assignment {
        match self.kind {
            StrategyKind::Countdown => CountdownStrategy.assign(records),
            StrategyKind::RoundRobin => RoundRobinStrategy.assign(records),
        }
    }

    /// Split records into the fewest batches with no duplicate key per batch
    pub fn partition<R: Keyed>(&self, records: Vec<R>) -> Vec<Batch<R>> {
        let record_count = records.len();
        let assignment = self.assign(&records);
        let batches = assignment.apply(records);

        debug!(
            "Partitioned {} records into {} batches ({})",
            record_count,
            batches.len(),
            self.kind
        );

        batches
    }
}

/// Split records into batches using the countdown strategy
pub fn partition<R: Keyed>(records: Vec<R>) -> Vec<Batch<R>> {
    CountdownStrategy.partition(records)
}
