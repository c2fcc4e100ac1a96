//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use super::decoders::{CsvDecoder, JsonDecoder, JsonlDecoder};
use crate::error::Result;
use crate::types::InputFormat;
use serde_json::Value;

/// Configuration for decoding record input
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Input format
    pub format: InputFormat,
    /// Path to the records inside a JSON document
    pub record_path: Option<String>,
    /// CSV delimiter
    pub csv_delimiter: char,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            format: InputFormat::Json,
            record_path: None,
            csv_delimiter: ',',
        }
    }
}

impl DecoderConfig {
    /// Create a JSON decoder config
    pub fn json() -> Self {
        Self::default()
    }

    /// Create a JSON decoder config with a record path
    pub fn json_with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Create a JSONL decoder config
    pub fn jsonl() -> Self {
        Self {
            format: InputFormat::Jsonl,
            ..Self::default()
        }
    }

    /// Create a CSV decoder config
    pub fn csv() -> Self {
        Self {
            format: InputFormat::Csv,
            ..Self::default()
        }
    }

    /// Create a CSV decoder config with a custom delimiter
    pub fn csv_with_delimiter(delimiter: char) -> Self {
        Self {
            format: InputFormat::Csv,
            csv_delimiter: delimiter,
            ..Self::default()
        }
    }

    /// Set the record path
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Build the decoder for this config
    ///
    /// The record path only applies to JSON input.
    pub fn build(&self) -> Box<dyn RecordDecoder> {
        match self.format {
            InputFormat::Json => match &self.record_path {
                Some(path) => Box::new(JsonDecoder::with_path(path.clone())),
                None => Box::new(JsonDecoder::new()),
            },
            InputFormat::Jsonl => Box::new(JsonlDecoder::new()),
            InputFormat::Csv => Box::new(CsvDecoder::with_delimiter(self.csv_delimiter)),
        }
    }
}

/// Trait for decoding input text into JSON records
pub trait RecordDecoder: Send + Sync {
    /// Decode the input into a list of records, in input order
    fn decode(&self, body: &str) -> Result<Vec<Value>>;
}
