// Allow common clippy pedantic lints
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! Keyed batcher CLI
//!
//! Command-line interface for splitting record files into batches

use clap::Parser;
use keyed_batcher::cli::{log_filter, Cli, Runner};

fn main() {
    let cli = Cli::parse();

    // Initialize logging; stdout carries batch output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(cli.verbose))
        .init();

    let runner = Runner::new(cli);

    if let Err(e) = runner.run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
