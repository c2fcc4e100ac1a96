//! Common types used throughout keyed-batcher
//!
//! Shared enums that appear both in the YAML config and on the command line.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Strategy
// ============================================================================

/// Batch assignment strategy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Frequency countdown: each key walks down from its own count (linear time)
    #[default]
    Countdown,
    /// Round-robin rotation over the batch indices
    RoundRobin,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Countdown => write!(f, "countdown"),
            StrategyKind::RoundRobin => write!(f, "round_robin"),
        }
    }
}

// ============================================================================
// Missing Key Policy
// ============================================================================

/// What to do with a record whose key field is absent or not a scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Fail the run, naming the offending record
    #[default]
    Reject,
    /// Give every keyless record the same sentinel key, so no two of them share a batch
    Literal,
}

// ============================================================================
// Formats
// ============================================================================

/// Format of the record input
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// A JSON array (or a document holding one at `record_path`)
    #[default]
    Json,
    /// JSON Lines, one record per line
    Jsonl,
    /// CSV with a header row
    Csv,
}

/// Format of the batch output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Compact JSON array of batches
    #[default]
    Json,
    /// One JSON object per batch, one per line
    Jsonl,
    /// Indented JSON array of batches
    Pretty,
}
