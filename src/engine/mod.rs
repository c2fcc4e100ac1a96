//! Execution engine module
//!
//! Load records, partition them, verify the result, write it out.
//!
//! # Overview
//!
//! The engine module provides:
//! - `BatchEngine` - Runs the pipeline for one configuration
//! - `BatchRun` - Batches and statistics of one run

mod types;

pub use types::BatchRun;

use crate::batch::{self, BatchPartitioner, BatchSummary};
use crate::config::BatcherConfig;
use crate::error::{Error, Result};
use crate::output::{load_batches, BatchWriter};
use crate::record::JsonRecord;
use crate::types::OutputFormat;
use std::fs;
use std::io;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Batching pipeline for one configuration
#[derive(Debug, Clone, Default)]
pub struct BatchEngine {
    config: BatcherConfig,
}

impl BatchEngine {
    /// Create an engine for a configuration
    pub fn new(config: BatcherConfig) -> Self {
        Self { config }
    }

    /// Get the configuration
    pub fn config(&self) -> &BatcherConfig {
        &self.config
    }

    /// Load records from a file
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Vec<JsonRecord>> {
        let path = path.as_ref();
        let body = read_file(path)?;
        let records = self.load_str(&body)?;
        debug!("Loaded {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Load records from input text
    pub fn load_str(&self, body: &str) -> Result<Vec<JsonRecord>> {
        let decoder = self.config.decoder_config().build();
        let payloads = decoder.decode(body)?;
        self.config.key_extractor().records(payloads)
    }

    /// Partition records and check the result
    pub fn run(&self, records: Vec<JsonRecord>) -> Result<BatchRun> {
        let start = Instant::now();
        let input = records.clone();

        let batches = BatchPartitioner::new(self.config.strategy).partition(records);
        batch::verify(&input, &batches)?;
        let summary = BatchSummary::new(&input, &batches);

        let elapsed = start.elapsed();
        info!(
            "Split {} records into {} batches ({} distinct keys, dominating key {:?} x{}) in {:?}",
            summary.records,
            summary.batches,
            summary.distinct_keys,
            summary.dominating_key.as_deref().unwrap_or("-"),
            summary.dominating_count,
            elapsed
        );

        Ok(BatchRun {
            batches,
            summary,
            elapsed,
        })
    }

    /// Statistics for records without keeping the batches
    pub fn summarize(&self, records: Vec<JsonRecord>) -> Result<BatchSummary> {
        Ok(self.run(records)?.summary)
    }

    /// Write a run to the configured destination (stdout when none)
    pub fn write(&self, run: &BatchRun) -> Result<()> {
        let writer = BatchWriter::new(self.config.output.format);
        match &self.config.output.path {
            Some(path) => {
                writer.write_to_path(&run.batches, path)?;
                info!("Wrote {} batches to {}", run.batch_count(), path.display());
                Ok(())
            }
            None => writer.write_to(&run.batches, io::stdout().lock()),
        }
    }

    /// Check batches written earlier against their input records
    ///
    /// `format` is the format the batches were written in.
    pub fn verify_str(
        &self,
        input: &[JsonRecord],
        batches_body: &str,
        format: OutputFormat,
    ) -> Result<BatchSummary> {
        let batches = load_batches(batches_body, format, &self.config.key_extractor())?;
        batch::verify(input, &batches)?;
        Ok(BatchSummary::new(input, &batches))
    }

    /// Check a batches file against an input file
    pub fn verify_files(
        &self,
        input: impl AsRef<Path>,
        batches: impl AsRef<Path>,
        format: OutputFormat,
    ) -> Result<BatchSummary> {
        let records = self.load_file(input)?;
        let body = read_file(batches.as_ref())?;
        self.verify_str(&records, &body, format)
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::Io(e)
        }
    })
}
