//! Integration tests on temporary files
//!
//! Tests the full end-to-end flow: input file → records → batches → output file → verify

use clap::Parser;
use keyed_batcher::cli::{Cli, Runner};
use keyed_batcher::output::load_batches;
use keyed_batcher::{
    BatchEngine, BatcherConfig, Error, InputFormat, Keyed, MissingKeyPolicy, OutputFormat,
    RecordKey, StrategyKind,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::tempdir;
use test_case::test_case;

fn run_cli(args: &[&str]) -> keyed_batcher::Result<()> {
    let mut argv = vec!["keyed-batcher"];
    argv.extend_from_slice(args);
    Runner::new(Cli::parse_from(argv)).run()
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// 40 unique addresses and one address repeated 10 times
fn mailing_list_jsonl() -> String {
    let mut lines: Vec<String> = (0..40)
        .map(|i| json!({"email": format!("user{i}@example.com"), "seq": i}).to_string())
        .collect();
    for i in 0..10 {
        lines.push(json!({"email": "dupe@example.com", "seq": 100 + i}).to_string());
    }
    lines.join("\n")
}

// ============================================================================
// Engine Pipeline Tests
// ============================================================================

#[test_case(StrategyKind::Countdown, OutputFormat::Json ; "countdown json")]
#[test_case(StrategyKind::Countdown, OutputFormat::Jsonl ; "countdown jsonl")]
#[test_case(StrategyKind::RoundRobin, OutputFormat::Pretty ; "round robin pretty")]
#[test_case(StrategyKind::RoundRobin, OutputFormat::Jsonl ; "round robin jsonl")]
fn test_pipeline_mailing_list(strategy: StrategyKind, format: OutputFormat) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("list.jsonl");
    let output = dir.path().join("batches.out");
    fs::write(&input, mailing_list_jsonl()).unwrap();

    let mut config = BatcherConfig {
        strategy,
        ..BatcherConfig::default()
    };
    config.input.format = InputFormat::Jsonl;
    config.output.format = format;
    config.output.path = Some(output.clone());
    let engine = BatchEngine::new(config);

    let records = engine.load_file(&input).unwrap();
    let run = engine.run(records).unwrap();
    engine.write(&run).unwrap();

    assert_eq!(run.batch_count(), 10);
    assert_eq!(run.summary.distinct_keys, 41);

    let body = fs::read_to_string(&output).unwrap();
    let batches = load_batches(&body, format, &engine.config().key_extractor()).unwrap();
    assert_eq!(batches, run.batches);

    let dupe = RecordKey::from("dupe@example.com");
    for batch in &batches {
        assert!(batch.contains_key(&dupe));
        let keys: HashSet<_> = batch.keys().collect();
        assert_eq!(keys.len(), batch.len());
    }

    let seqs: HashSet<i64> = batches
        .iter()
        .flat_map(|b| b.iter())
        .map(|r| r.payload()["seq"].as_i64().unwrap())
        .collect();
    assert_eq!(seqs.len(), 50);
}

#[test]
fn test_pipeline_csv_with_normalized_keys() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("contacts.csv");
    fs::write(
        &input,
        "email;name\nA@x.com ;Ann\nb@x.com;Bob\na@X.COM;Ann again\n",
    )
    .unwrap();

    let mut config = BatcherConfig {
        normalize_keys: true,
        ..BatcherConfig::default()
    };
    config.input.format = InputFormat::Csv;
    config.input.csv_delimiter = ';';
    let engine = BatchEngine::new(config);

    let run = engine.run(engine.load_file(&input).unwrap()).unwrap();

    assert_eq!(run.batch_count(), 2);
    assert_eq!(run.summary.dominating_key.as_deref(), Some("a@x.com"));
    // payloads keep the original spelling
    let names: Vec<&str> = run
        .batches
        .iter()
        .flat_map(|b| b.iter())
        .filter(|r| r.key() == &RecordKey::from("a@x.com"))
        .map(|r| r.payload()["email"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.contains(&"A@x.com"));
    assert!(names.contains(&"a@X.COM"));
}

#[test]
fn test_pipeline_nested_record_path() {
    let engine = BatchEngine::new({
        let mut config = BatcherConfig {
            key_field: "to.address".to_string(),
            ..BatcherConfig::default()
        };
        config.input.record_path = Some("$.data.messages[*]".to_string());
        config
    });

    let body = json!({
        "data": {
            "messages": [
                {"to": {"address": "x"}, "body": 1},
                {"to": {"address": "y"}, "body": 2},
                {"to": {"address": "x"}, "body": 3},
                {"to": {"address": "x"}, "body": 4}
            ]
        }
    })
    .to_string();

    let run = engine.run(engine.load_str(&body).unwrap()).unwrap();
    assert_eq!(run.batch_count(), 3);
    assert_eq!(run.summary.batch_sizes.iter().sum::<usize>(), 4);
}

#[test]
fn test_pipeline_missing_key_policies() {
    let body = r#"[{"email": "a"}, {"phone": "1"}, {"email": "a"}, {"phone": "2"}, {"phone": "3"}]"#;

    let rejecting = BatchEngine::default();
    assert!(matches!(
        rejecting.load_str(body),
        Err(Error::MissingKey { index: 1, .. })
    ));

    let literal = BatchEngine::new(BatcherConfig {
        missing_key: MissingKeyPolicy::Literal,
        ..BatcherConfig::default()
    });
    let run = literal.run(literal.load_str(body).unwrap()).unwrap();
    assert_eq!(run.batch_count(), 3);
    assert_eq!(run.summary.dominating_key.as_deref(), Some("<missing>"));
    for batch in &run.batches {
        assert!(batch.contains_key(&RecordKey::Missing));
    }
}

// ============================================================================
// CLI Tests
// ============================================================================

#[test]
fn test_cli_split_then_verify() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("list.jsonl");
    let output = dir.path().join("out/batches.jsonl");
    fs::write(&input, mailing_list_jsonl()).unwrap();

    run_cli(&[
        "--input-format",
        "jsonl",
        "--format",
        "jsonl",
        "--strategy",
        "round-robin",
        "split",
        &path_str(&input),
        "--output",
        &path_str(&output),
    ])
    .unwrap();

    let lines = fs::read_to_string(&output).unwrap();
    assert_eq!(lines.lines().count(), 10);

    run_cli(&[
        "--input-format",
        "jsonl",
        "verify",
        &path_str(&input),
        &path_str(&output),
        "--batches-format",
        "jsonl",
    ])
    .unwrap();
}

#[test]
fn test_cli_verify_rejects_tampered_batches() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("records.json");
    let batches = dir.path().join("batches.json");
    fs::write(&input, r#"[{"email": "a"}, {"email": "b"}, {"email": "a"}]"#).unwrap();
    fs::write(&batches, r#"[[{"email": "a"}, {"email": "b"}, {"email": "a"}]]"#).unwrap();

    let err = run_cli(&["verify", &path_str(&input), &path_str(&batches)]).unwrap_err();
    assert!(matches!(err, Error::Invariant(_)));
    assert!(err.to_string().contains("more than once"));
}

#[test]
fn test_cli_uses_config_file() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("batcher.yaml");
    let input = dir.path().join("records.json");
    let output = dir.path().join("batches.json");
    fs::write(
        &config,
        format!(
            "key_field: user.id\nstrategy: round_robin\noutput:\n  format: json\n  path: {}\n",
            path_str(&output)
        ),
    )
    .unwrap();
    fs::write(
        &input,
        r#"[{"user": {"id": 1}}, {"user": {"id": 2}}, {"user": {"id": 1}}]"#,
    )
    .unwrap();

    run_cli(&["-C", &path_str(&config), "split", &path_str(&input)]).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 2);
}

#[test]
fn test_cli_missing_input_file() {
    let err = run_cli(&["stats", "/nonexistent/records.json"]).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}
