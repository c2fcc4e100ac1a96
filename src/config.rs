//! Batcher configuration
//!
//! Configuration is read from a YAML or JSON file. Every field has a
//! default, so an empty file (or no file at all) is a valid configuration.
//!
//! ```yaml
//! key_field: contact.email
//! strategy: round_robin
//! missing_key: literal
//! normalize_keys: true
//! input:
//!   format: jsonl
//! output:
//!   format: pretty
//!   path: out/batches.json
//! ```

use crate::decode::DecoderConfig;
use crate::error::{Error, Result};
use crate::record::KeyExtractor;
use crate::types::{InputFormat, MissingKeyPolicy, OutputFormat, StrategyKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete batcher configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BatcherConfig {
    /// Dot path to the key field of each record
    #[serde(default = "default_key_field")]
    pub key_field: String,

    /// Batch assignment strategy
    #[serde(default)]
    pub strategy: StrategyKind,

    /// What to do with records that have no key
    #[serde(default)]
    pub missing_key: MissingKeyPolicy,

    /// Trim and lowercase string keys before comparing them
    #[serde(default)]
    pub normalize_keys: bool,

    /// Input settings
    #[serde(default)]
    pub input: InputConfig,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_key_field() -> String {
    "email".to_string()
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            key_field: default_key_field(),
            strategy: StrategyKind::default(),
            missing_key: MissingKeyPolicy::default(),
            normalize_keys: false,
            input: InputConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl BatcherConfig {
    /// Check that the configuration is usable
    pub fn validate(&self) -> Result<()> {
        if self.key_field.trim().is_empty() {
            return Err(Error::invalid_value("key_field", "must not be empty"));
        }

        if self.key_field.split('.').any(|part| part.trim().is_empty()) {
            return Err(Error::invalid_value(
                "key_field",
                format!("'{}' has an empty path segment", self.key_field),
            ));
        }

        if matches!(self.input.csv_delimiter, '"' | '\n' | '\r') {
            return Err(Error::invalid_value(
                "input.csv_delimiter",
                format!("{:?} cannot be used as a delimiter", self.input.csv_delimiter),
            ));
        }

        if let Some(path) = &self.input.record_path {
            if path.trim().is_empty() {
                return Err(Error::invalid_value(
                    "input.record_path",
                    "must not be empty when set",
                ));
            }
        }

        Ok(())
    }

    /// Key extractor for this configuration
    pub fn key_extractor(&self) -> KeyExtractor {
        KeyExtractor::new(self.key_field.clone())
            .with_policy(self.missing_key)
            .with_normalize(self.normalize_keys)
    }

    /// Decoder configuration for this configuration
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            format: self.input.format,
            record_path: self.input.record_path.clone(),
            csv_delimiter: self.input.csv_delimiter,
        }
    }
}

// ============================================================================
// Input / Output
// ============================================================================

/// Input settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// Input format
    #[serde(default)]
    pub format: InputFormat,

    /// Path to the records inside a JSON document
    #[serde(default)]
    pub record_path: Option<String>,

    /// CSV delimiter
    #[serde(default = "default_csv_delimiter")]
    pub csv_delimiter: char,
}

fn default_csv_delimiter() -> char {
    ','
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            format: InputFormat::default(),
            record_path: None,
            csv_delimiter: default_csv_delimiter(),
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Output file; stdout when absent
    #[serde(default)]
    pub path: Option<PathBuf>,
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a configuration file (YAML or JSON)
pub fn load_config(path: impl AsRef<Path>) -> Result<BatcherConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        }
    })?;
    load_config_from_str(&content)
}

/// Load and validate a configuration from a YAML or JSON string
///
/// JSON is valid YAML, so one parser handles both.
pub fn load_config_from_str(content: &str) -> Result<BatcherConfig> {
    let config: BatcherConfig = if content.trim().is_empty() {
        BatcherConfig::default()
    } else {
        serde_yaml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse config: {e}")))?
    };

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = BatcherConfig::default();
        assert_eq!(config.key_field, "email");
        assert_eq!(config.strategy, StrategyKind::Countdown);
        assert_eq!(config.missing_key, MissingKeyPolicy::Reject);
        assert!(!config.normalize_keys);
        assert_eq!(config.input.csv_delimiter, ',');
        assert!(config.output.path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
key_field: contact.email
strategy: round_robin
missing_key: literal
normalize_keys: true
input:
  format: csv
  csv_delimiter: ";"
output:
  format: jsonl
  path: out/batches.jsonl
"#;

        let config = load_config_from_str(yaml).unwrap();
        assert_eq!(config.key_field, "contact.email");
        assert_eq!(config.strategy, StrategyKind::RoundRobin);
        assert_eq!(config.missing_key, MissingKeyPolicy::Literal);
        assert!(config.normalize_keys);
        assert_eq!(config.input.format, InputFormat::Csv);
        assert_eq!(config.input.csv_delimiter, ';');
        assert_eq!(config.output.format, OutputFormat::Jsonl);
        assert_eq!(
            config.output.path,
            Some(PathBuf::from("out/batches.jsonl"))
        );
    }

    #[test]
    fn test_parse_json() {
        let json = r#"{"key_field": "recipient", "input": {"record_path": "$.items"}}"#;

        let config = load_config_from_str(json).unwrap();
        assert_eq!(config.key_field, "recipient");
        assert_eq!(config.input.record_path, Some("$.items".to_string()));
        assert_eq!(config.strategy, StrategyKind::Countdown);
    }

    #[test]
    fn test_empty_content_is_default() {
        let config = load_config_from_str("  \n").unwrap();
        assert_eq!(config, BatcherConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = load_config_from_str("key_feild: email\n").unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_validate_key_field() {
        let config = BatcherConfig {
            key_field: "  ".to_string(),
            ..BatcherConfig::default()
        };
        assert!(config.validate().is_err());

        let config = BatcherConfig {
            key_field: "contact..email".to_string(),
            ..BatcherConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("empty path segment"));
    }

    #[test]
    fn test_validate_csv_delimiter() {
        let mut config = BatcherConfig::default();
        config.input.csv_delimiter = '"';
        assert!(config.validate().is_err());

        config.input.csv_delimiter = '\t';
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_record_path() {
        let mut config = BatcherConfig::default();
        config.input.record_path = Some(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_decoder_config_mirrors_input() {
        let mut config = BatcherConfig::default();
        config.input.format = InputFormat::Csv;
        config.input.csv_delimiter = '|';

        let decoder = config.decoder_config();
        assert_eq!(decoder.format, InputFormat::Csv);
        assert_eq!(decoder.csv_delimiter, '|');
        assert!(decoder.record_path.is_none());
    }

    #[test]
    fn test_key_extractor_uses_field() {
        let config = BatcherConfig {
            key_field: "to".to_string(),
            normalize_keys: true,
            ..BatcherConfig::default()
        };
        let extractor = config.key_extractor();
        assert_eq!(extractor.field(), "to");
        assert_eq!(
            extractor.extract(&serde_json::json!({"to": " X@Y.COM"})),
            Some("x@y.com".to_string())
        );
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "key_field: user.id\nstrategy: countdown").unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.key_field, "user.id");
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/keyed-batcher.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
