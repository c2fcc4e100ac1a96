//! Output module
//!
//! Handles writing batches and reading them back.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Writing batches as JSON, JSON Lines or indented JSON
//! - Writing to any `io::Write` or to a file path
//! - Reading written batches back for verification

mod reader;
mod writer;

pub use reader::{load_batches, read_batches};
pub use writer::{batches_to_json, BatchWriter};
