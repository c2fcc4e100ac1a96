// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Keyed Batcher
//!
//! Splits keyed records into the fewest batches such that no batch holds two
//! records with the same key.
//!
//! ## Features
//!
//! - **Minimal batch count**: exactly as many batches as the most frequent key occurs
//! - **Two strategies**: frequency countdown and round-robin rotation
//! - **Verification**: every invariant can be rechecked on any partition
//! - **File pipeline**: JSON, JSONL and CSV in; JSON, JSONL and pretty JSON out
//!
//! ## Quick Start
//!
//! ```rust
//! use keyed_batcher::{BatchPartitioner, StrategyKind};
//!
//! let records = vec![("a@x.com", 1), ("b@x.com", 2), ("a@x.com", 3)];
//! let batches = BatchPartitioner::new(StrategyKind::RoundRobin).partition(records);
//!
//! assert_eq!(batches.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      CLI / Runner                        │
//! │          split        stats        verify                │
//! └──────────────────────────────────────────────────────────┘
//!                             │
//! ┌──────────┬────────────┬───┴────────┬───────────┬─────────┐
//! │  Config  │   Decode   │   Record   │   Batch   │ Output  │
//! ├──────────┼────────────┼────────────┼───────────┼─────────┤
//! │ YAML     │ JSON       │ Key path   │ Countdown │ JSON    │
//! │ JSON     │ JSONL      │ Missing    │ Rotation  │ JSONL   │
//! │ Defaults │ CSV        │ key policy │ Verify    │ Pretty  │
//! └──────────┴────────────┴────────────┴───────────┴─────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Shared enums
pub mod types;

/// Batch partitioning
pub mod batch;

/// Keyed JSON records
pub mod record;

/// Input decoders (JSON, JSONL, CSV)
pub mod decode;

/// Batch writers and readers
pub mod output;

/// Batcher configuration
pub mod config;

/// Load, partition, verify and write pipeline
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use batch::{partition, verify, Batch, BatchPartitioner, BatchSummary, Keyed};
pub use config::{load_config, load_config_from_str, BatcherConfig};
pub use engine::{BatchEngine, BatchRun};
pub use record::{JsonRecord, KeyExtractor, RecordKey};
