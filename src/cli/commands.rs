//! CLI commands and argument parsing

use crate::types::{InputFormat, OutputFormat, StrategyKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Keyed record batcher CLI
#[derive(Parser, Debug)]
#[command(name = "keyed-batcher")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Dot path to the key field of each record
    #[arg(short, long, global = true)]
    pub key_field: Option<String>,

    /// Batch assignment strategy
    #[arg(long, global = true)]
    pub strategy: Option<StrategyKind>,

    /// Input format
    #[arg(long, global = true)]
    pub input_format: Option<InputFormat>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split records into batches with unique keys
    Split {
        /// Input file
        input: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to the records inside a JSON document (e.g. `data.items` or `$.data[*]`)
        #[arg(long)]
        record_path: Option<String>,
    },

    /// Print batch statistics without writing batches
    Stats {
        /// Input file
        input: PathBuf,

        /// Path to the records inside a JSON document
        #[arg(long)]
        record_path: Option<String>,
    },

    /// Check a batches file against its input
    Verify {
        /// Input file the batches were built from
        input: PathBuf,

        /// Batches file
        batches: PathBuf,

        /// Format of the batches file (defaults to the output format)
        #[arg(long)]
        batches_format: Option<OutputFormat>,

        /// Path to the records inside a JSON document
        #[arg(long)]
        record_path: Option<String>,
    },
}

impl Commands {
    /// Record path given to the command, if any
    pub fn record_path(&self) -> Option<&str> {
        match self {
            Commands::Split { record_path, .. }
            | Commands::Stats { record_path, .. }
            | Commands::Verify { record_path, .. } => record_path.as_deref(),
        }
    }
}
