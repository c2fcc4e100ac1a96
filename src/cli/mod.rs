//! CLI module
//!
//! Command-line interface for batching record files.
//!
//! # Commands
//!
//! - `split` - Split records into batches and write them
//! - `stats` - Print batch statistics
//! - `verify` - Check a batches file against its input

mod commands;
mod logging;
mod runner;

pub use commands::{Cli, Commands};
pub use logging::{log_filter, log_filter_from};
pub use runner::Runner;
