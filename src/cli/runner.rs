//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{load_config, BatcherConfig};
use crate::engine::BatchEngine;
use crate::error::{Result, ResultExt};
use crate::types::OutputFormat;
use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        let config = self.resolve_config()?;
        debug!(
            "Batching on '{}' with {} strategy",
            config.key_field, config.strategy
        );
        let engine = BatchEngine::new(config);

        match &self.cli.command {
            Commands::Split { input, .. } => self.split(&engine, input),
            Commands::Stats { input, .. } => self.stats(&engine, input),
            Commands::Verify {
                input,
                batches,
                batches_format,
                ..
            } => self.verify(&engine, input, batches, *batches_format),
        }
    }

    /// Build the configuration: defaults, then the config file, then flags
    pub fn resolve_config(&self) -> Result<BatcherConfig> {
        let mut config = match &self.cli.config {
            Some(path) => load_config(path)?,
            None => BatcherConfig::default(),
        };

        if let Some(key_field) = &self.cli.key_field {
            config.key_field.clone_from(key_field);
        }
        if let Some(strategy) = self.cli.strategy {
            config.strategy = strategy;
        }
        if let Some(format) = self.cli.input_format {
            config.input.format = format;
        }
        if let Some(format) = self.cli.format {
            config.output.format = format;
        }
        if let Some(path) = self.cli.command.record_path() {
            config.input.record_path = Some(path.to_string());
        }
        if let Commands::Split {
            output: Some(path), ..
        } = &self.cli.command
        {
            config.output.path = Some(path.clone());
        }

        config.validate()?;
        Ok(config)
    }

    /// Split input into batches and write them
    fn split(&self, engine: &BatchEngine, input: &Path) -> Result<()> {
        let records = engine.load_file(input)?;
        let run = engine.run(records)?;
        engine.write(&run)
    }

    /// Print statistics for input
    fn stats(&self, engine: &BatchEngine, input: &Path) -> Result<()> {
        let records = engine.load_file(input)?;
        let summary = engine.summarize(records)?;
        let message = serde_json::to_value(&summary).context("Failed to serialize summary")?;
        self.output_message(engine, &message);
        Ok(())
    }

    /// Verify a batches file
    fn verify(
        &self,
        engine: &BatchEngine,
        input: &Path,
        batches: &Path,
        format: Option<OutputFormat>,
    ) -> Result<()> {
        let format = format.unwrap_or(engine.config().output.format);
        let summary = engine.verify_files(input, batches, format)?;

        info!(
            "{} holds {} records in {} valid batches",
            batches.display(),
            summary.records,
            summary.batches
        );
        self.output_message(
            engine,
            &json!({
                "valid": true,
                "summary": summary,
            }),
        );
        Ok(())
    }

    /// Output a message
    fn output_message(&self, engine: &BatchEngine, msg: &Value) {
        match engine.config().output.format {
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
            _ => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StrategyKind;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::path::PathBuf;

    fn runner(args: &[&str]) -> Runner {
        let mut argv = vec!["keyed-batcher"];
        argv.extend_from_slice(args);
        Runner::new(Cli::parse_from(argv))
    }

    #[test]
    fn test_defaults_without_flags() {
        let config = runner(&["stats", "in.json"]).resolve_config().unwrap();
        assert_eq!(config, BatcherConfig::default());
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "key_field: contact.email\nstrategy: round_robin\noutput:\n  format: pretty"
        )
        .unwrap();
        let config_path = file.path().to_string_lossy().to_string();

        let config = runner(&[
            "-C",
            &config_path,
            "--strategy",
            "countdown",
            "split",
            "in.json",
            "--output",
            "out.json",
        ])
        .resolve_config()
        .unwrap();

        assert_eq!(config.key_field, "contact.email");
        assert_eq!(config.strategy, StrategyKind::Countdown);
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert_eq!(config.output.path, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_record_path_flag() {
        let config = runner(&["split", "in.json", "--record-path", "data.items"])
            .resolve_config()
            .unwrap();
        assert_eq!(config.input.record_path.as_deref(), Some("data.items"));
    }

    #[test]
    fn test_invalid_key_field_flag() {
        let result = runner(&["-k", "a..b", "stats", "in.json"]).resolve_config();
        assert!(result.is_err());
    }

    #[test]
    fn test_strategy_value_names() {
        let cli = Cli::parse_from(["keyed-batcher", "--strategy", "round-robin", "stats", "x"]);
        assert_eq!(cli.strategy, Some(StrategyKind::RoundRobin));
    }
}
