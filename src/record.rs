//! JSON records with an extracted key
//!
//! A decoded JSON object becomes a `JsonRecord` once its key field has been
//! resolved. The key field is a dot path (`email`, `contact.email`).
//!
//! Records without a usable key are rejected by default. With
//! `MissingKeyPolicy::Literal` they all receive `RecordKey::Missing`, one
//! shared sentinel that never equals a real key, so keyless records are
//! spread over batches like any other repeated key.

use crate::batch::Keyed;
use crate::error::{Error, Result};
use crate::types::MissingKeyPolicy;
use serde_json::Value;
use std::fmt;
use std::hash::{Hash, Hasher};
use tracing::warn;

/// Key of a JSON record
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKey {
    /// Key taken from the record
    Value(String),
    /// Shared key of records without one
    Missing,
}

impl RecordKey {
    /// The key text, if the record had one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RecordKey::Value(s) => Some(s),
            RecordKey::Missing => None,
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Value(s) => write!(f, "{s}"),
            RecordKey::Missing => write!(f, "<missing>"),
        }
    }
}

impl From<&str> for RecordKey {
    fn from(s: &str) -> Self {
        RecordKey::Value(s.to_string())
    }
}

impl From<String> for RecordKey {
    fn from(s: String) -> Self {
        RecordKey::Value(s)
    }
}

// ============================================================================
// JsonRecord
// ============================================================================

/// A JSON payload and its key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonRecord {
    key: RecordKey,
    payload: Value,
}

impl JsonRecord {
    /// Create a record with an explicit key
    pub fn new(key: impl Into<RecordKey>, payload: Value) -> Self {
        Self {
            key: key.into(),
            payload,
        }
    }

    /// The record's key
    pub fn record_key(&self) -> &RecordKey {
        &self.key
    }

    /// The untouched payload
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Take the payload out of the record
    pub fn into_payload(self) -> Value {
        self.payload
    }
}

impl Keyed for JsonRecord {
    type Key = RecordKey;

    fn key(&self) -> &RecordKey {
        &self.key
    }
}

// `serde_json::Value` has no `Hash`, so the compact serialized form is hashed.
impl Hash for JsonRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.payload.to_string().hash(state);
    }
}

// ============================================================================
// Key Extraction
// ============================================================================

/// Resolves the key field of decoded JSON values
#[derive(Debug, Clone)]
pub struct KeyExtractor {
    field: String,
    policy: MissingKeyPolicy,
    normalize: bool,
}

impl KeyExtractor {
    /// Create an extractor for a dot-path key field
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            policy: MissingKeyPolicy::default(),
            normalize: false,
        }
    }

    /// Set the missing key policy
    #[must_use]
    pub fn with_policy(mut self, policy: MissingKeyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Trim and lowercase string keys
    #[must_use]
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// The key field path
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Extract the key text from a value
    ///
    /// Strings are used verbatim (or normalized), numbers and booleans are
    /// stringified. A number and its string spelling are therefore the same
    /// key: `1` and `"1"` never share a batch. Absent fields, `null`, arrays
    /// and objects yield `None`.
    pub fn extract(&self, value: &Value) -> Option<String> {
        let mut current = value;
        for part in self.field.split('.') {
            current = current.get(part)?;
        }

        match current {
            Value::String(s) if self.normalize => Some(s.trim().to_lowercase()),
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Build a record from the value at position `index` of the input
    pub fn record(&self, index: usize, payload: Value) -> Result<JsonRecord> {
        match self.extract(&payload) {
            Some(key) => Ok(JsonRecord::new(key, payload)),
            None => match self.policy {
                MissingKeyPolicy::Reject => Err(Error::missing_key(index, &self.field)),
                MissingKeyPolicy::Literal => Ok(JsonRecord::new(RecordKey::Missing, payload)),
            },
        }
    }

    /// Build records from decoded values, in input order
    pub fn records(&self, payloads: Vec<Value>) -> Result<Vec<JsonRecord>> {
        let records = payloads
            .into_iter()
            .enumerate()
            .map(|(index, payload)| self.record(index, payload))
            .collect::<Result<Vec<_>>>()?;

        let missing = records
            .iter()
            .filter(|r| *r.key() == RecordKey::Missing)
            .count();
        if missing > 0 {
            warn!(
                "{} records have no key at '{}' and share the missing-key sentinel",
                missing, self.field
            );
        }

        Ok(records)
    }
}
