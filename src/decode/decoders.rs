//! Decoder implementations
//!
//! Each decoder handles a specific input format.

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::{Map, Value};

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Path to the records array
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Extract records from a JSON value using the configured path
    fn extract_records(&self, value: Value) -> Result<Vec<Value>> {
        match &self.record_path {
            Some(path) => {
                // jsonpath-rust only for wildcards; dot paths also cover negative indices
                if path.contains('*') && !path.contains("[-") {
                    extract_with_jsonpath(&value, path)
                } else {
                    match extract_simple_path(&value, path) {
                        Some(Value::Array(arr)) => Ok(arr),
                        Some(v) => Ok(vec![v]),
                        None => Err(Error::decode(format!(
                            "Record path '{path}' not found in input"
                        ))),
                    }
                }
            }
            None => match value {
                Value::Array(arr) => Ok(arr),
                other => Ok(vec![other]),
            },
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value: Value = serde_json::from_str(body)?;
        self.extract_records(value)
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one JSON value per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut records = Vec::new();

        for (line_num, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| {
                Error::decode(format!(
                    "Failed to parse JSONL at line {}: {e}",
                    line_num + 1
                ))
            })?;

            records.push(value);
        }

        Ok(records)
    }
}

// ============================================================================
// CSV Decoder
// ============================================================================

/// CSV decoder with a header row
///
/// Cell values stay strings so that keys such as `007` or `1e3` are not
/// reinterpreted as numbers. Empty cells become `null`.
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    /// Field delimiter
    delimiter: char,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self { delimiter: ',' }
    }
}

impl CsvDecoder {
    /// Create a new CSV decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV decoder with a custom delimiter
    pub fn with_delimiter(delimiter: char) -> Self {
        Self { delimiter }
    }
}

impl RecordDecoder for CsvDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut rows = parse_csv_rows(body, self.delimiter)?.into_iter();
        let Some(header) = rows.next() else {
            return Ok(Vec::new());
        };
        let headers = header.fields;

        rows.map(|row| {
            if row.fields.len() > headers.len() {
                return Err(Error::csv(format!(
                    "line {} has {} fields but the header has {}",
                    row.line,
                    row.fields.len(),
                    headers.len()
                )));
            }

            let mut obj = Map::new();
            let mut fields = row.fields.into_iter();
            for header in &headers {
                let value = match fields.next() {
                    Some(field) if !field.is_empty() => Value::String(field),
                    _ => Value::Null,
                };
                obj.insert(header.clone(), value);
            }
            Ok(Value::Object(obj))
        })
        .collect()
    }
}

/// A CSV row and the line it starts on
struct CsvRow {
    line: usize,
    fields: Vec<String>,
}

/// Split CSV text into rows
///
/// Quoted fields may span lines and keep their whitespace; unquoted fields
/// are trimmed. Blank lines are skipped.
fn parse_csv_rows(body: &str, delimiter: char) -> Result<Vec<CsvRow>> {
    let mut rows = Vec::new();
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut line = 1;
    let mut row_line = 1;
    let mut quote_line = 1;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    current.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    current.push(c);
                }
                _ => current.push(c),
            }
            continue;
        }

        match c {
            '"' if !quoted && current.trim().is_empty() => {
                current.clear();
                quoted = true;
                in_quotes = true;
                quote_line = line;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                if !fields.is_empty() || quoted || !current.trim().is_empty() {
                    fields.push(finish_field(&mut current, &mut quoted));
                    rows.push(CsvRow {
                        line: row_line,
                        fields: std::mem::take(&mut fields),
                    });
                } else {
                    current.clear();
                }
                line += 1;
                row_line = line;
            }
            c if c == delimiter => fields.push(finish_field(&mut current, &mut quoted)),
            // whitespace after a closing quote is dropped
            c if quoted && c.is_whitespace() => {}
            _ => current.push(c),
        }
    }

    if in_quotes {
        return Err(Error::csv(format!(
            "unterminated quoted field starting on line {quote_line}"
        )));
    }

    if !fields.is_empty() || quoted || !current.trim().is_empty() {
        fields.push(finish_field(&mut current, &mut quoted));
        rows.push(CsvRow {
            line: row_line,
            fields,
        });
    }

    Ok(rows)
}

/// Take the finished field, trimming it unless it was quoted
fn finish_field(current: &mut String, quoted: &mut bool) -> String {
    let field = if *quoted {
        std::mem::take(current)
    } else {
        current.trim().to_string()
    };
    current.clear();
    *quoted = false;
    field
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extract a value using simple dot-notation path
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value.clone());
    }

    let parts: Vec<&str> = path.split('.').collect();
    resolve_parts(value, &parts)
}

/// Resolve dot-path segments; `[*]` applies the remaining segments to every element
fn resolve_parts(value: &Value, parts: &[&str]) -> Option<Value> {
    let mut current = value;
    for (position, part) in parts.iter().enumerate() {
        // Array indexing like "data[0]" or "items[-1]"
        if let Some(bracket_pos) = part.find('[') {
            let name = &part[..bracket_pos];
            let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

            if !name.is_empty() {
                current = current.get(name)?;
            }

            if index_str == "*" {
                let rest = &parts[position + 1..];
                if rest.is_empty() {
                    return Some(current.clone());
                }
                let Value::Array(items) = current else {
                    return None;
                };

                // Nested wildcards yield one flat list, as JSONPath does
                let flatten = rest.iter().any(|p| p.contains("[*]"));
                let mut matches = Vec::new();
                for item in items {
                    match resolve_parts(item, rest) {
                        Some(Value::Array(inner)) if flatten => matches.extend(inner),
                        Some(found) => matches.push(found),
                        None => {}
                    }
                }
                return Some(Value::Array(matches));
            }

            let index = index_str.parse::<i64>().ok()?;
            let Value::Array(arr) = current else {
                return None;
            };
            #[allow(clippy::cast_possible_wrap)]
            let idx = if index < 0 {
                usize::try_from(arr.len() as i64 + index).ok()?
            } else {
                usize::try_from(index).ok()?
            };
            current = arr.get(idx)?;
        } else {
            current = current.get(part)?;
        }
    }

    Some(current.clone())
}

/// Extract records using jsonpath-rust
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path).map_err(|e| Error::JsonPath {
        message: format!("Invalid JSONPath: {e}"),
    })?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
