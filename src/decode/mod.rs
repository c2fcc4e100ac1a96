//! Record decoder module
//!
//! Supports: JSON, JSONL, CSV
//!
//! # Overview
//!
//! Turns input text into JSON values, one per record, in input order. Key
//! extraction happens afterwards in [`crate::record`].

mod decoders;
mod types;

pub use decoders::{CsvDecoder, JsonDecoder, JsonlDecoder};
pub use types::{DecoderConfig, RecordDecoder};
