//! Batch writer
//!
//! Serializes batches of JSON records. Only payloads are written; the
//! extracted key is an in-memory detail.

use crate::batch::Batch;
use crate::error::{Error, Result};
use crate::record::JsonRecord;
use crate::types::OutputFormat;
use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Writes batches in the configured format
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchWriter {
    format: OutputFormat,
}

impl BatchWriter {
    /// Create a writer for a format
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// The configured format
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Render batches to a string
    pub fn render(&self, batches: &[Batch<JsonRecord>]) -> Result<String> {
        let mut buf = Vec::new();
        self.write_to(batches, &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::output(format!("Invalid UTF-8 output: {e}")))
    }

    /// Write batches to any writer
    pub fn write_to<W: Write>(&self, batches: &[Batch<JsonRecord>], mut writer: W) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut writer, &batches_to_json(batches))
                    .map_err(serialize_error)?;
                writeln!(writer)?;
            }
            OutputFormat::Pretty => {
                serde_json::to_writer_pretty(&mut writer, &batches_to_json(batches))
                    .map_err(serialize_error)?;
                writeln!(writer)?;
            }
            OutputFormat::Jsonl => {
                for batch in batches {
                    serde_json::to_writer(&mut writer, &batch_line(batch))
                        .map_err(serialize_error)?;
                    writeln!(writer)?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Write batches to a file, creating parent directories
    pub fn write_to_path(&self, batches: &[Batch<JsonRecord>], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::output(format!(
                        "Failed to create directory '{}': {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            Error::output(format!("Failed to create '{}': {e}", path.display()))
        })?;
        self.write_to(batches, BufWriter::new(file))?;

        debug!("Wrote {} batches to {}", batches.len(), path.display());
        Ok(())
    }
}

/// All batches as an array of arrays of payloads
pub fn batches_to_json(batches: &[Batch<JsonRecord>]) -> Value {
    Value::Array(
        batches
            .iter()
            .map(|batch| Value::Array(batch.iter().map(|r| r.payload().clone()).collect()))
            .collect(),
    )
}

fn serialize_error(e: serde_json::Error) -> Error {
    Error::output(format!("Failed to write batches: {e}"))
}

/// One JSONL line for a batch
fn batch_line(batch: &Batch<JsonRecord>) -> Value {
    let records: Vec<&Value> = batch.iter().map(JsonRecord::payload).collect();
    json!({
        "batch": batch.index(),
        "size": batch.len(),
        "records": records,
    })
}
