//! Batch reader
//!
//! Reads batches previously written by [`super::BatchWriter`] so they can be
//! checked against their input.

use crate::batch::Batch;
use crate::error::{Error, Result};
use crate::record::{JsonRecord, KeyExtractor};
use crate::types::OutputFormat;
use serde_json::Value;

/// Parse batch output into payload groups
///
/// `json` and `pretty` expect an array of arrays. `jsonl` expects one object
/// per line with a `records` array; lines may also be bare arrays.
pub fn read_batches(body: &str, format: OutputFormat) -> Result<Vec<Vec<Value>>> {
    match format {
        OutputFormat::Json | OutputFormat::Pretty => {
            let value: Value = serde_json::from_str(body)
                .map_err(|e| Error::decode(format!("Failed to parse batches: {e}")))?;
            let Value::Array(batches) = value else {
                return Err(Error::decode("Batches must be a JSON array of arrays"));
            };
            batches
                .into_iter()
                .enumerate()
                .map(|(index, batch)| into_records(index, batch))
                .collect()
        }
        OutputFormat::Jsonl => body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(index, line)| {
                let value: Value = serde_json::from_str(line).map_err(|e| {
                    Error::decode(format!("Failed to parse batch line {}: {e}", index + 1))
                })?;
                match value {
                    Value::Object(mut obj) => {
                        let records = obj.remove("records").ok_or_else(|| {
                            Error::decode(format!("Batch line {} has no 'records'", index + 1))
                        })?;
                        into_records(index, records)
                    }
                    other => into_records(index, other),
                }
            })
            .collect(),
    }
}

/// Parse batch output and key every record
pub fn load_batches(
    body: &str,
    format: OutputFormat,
    extractor: &KeyExtractor,
) -> Result<Vec<Batch<JsonRecord>>> {
    let mut position = 0;
    read_batches(body, format)?
        .into_iter()
        .enumerate()
        .map(|(index, payloads)| {
            let records = payloads
                .into_iter()
                .map(|payload| {
                    let record = extractor.record(position, payload);
                    position += 1;
                    record
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(Batch::from_records(index, records))
        })
        .collect()
}

fn into_records(index: usize, batch: Value) -> Result<Vec<Value>> {
    match batch {
        Value::Array(records) => Ok(records),
        _ => Err(Error::decode(format!("Batch {index} is not an array"))),
    }
}
