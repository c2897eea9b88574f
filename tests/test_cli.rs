//! Tests for CLI argument parsing and the ivrank binary

use assert_cmd::Command;
use clap::Parser;
use ivrank::cli::{Cli, Commands};
use ivrank::pipeline::{BinningMethod, ReturnType};
use predicates::prelude::*;
use std::path::PathBuf;

mod common;
use common::{create_segment_example_dataframe, create_temp_csv, create_test_dataframe};

fn ivrank() -> Command {
    let mut cmd = Command::cargo_bin("ivrank").unwrap();
    cmd.env("IVRANK_LOG", "ivrank=warn");
    cmd
}

#[test]
fn test_cli_default_values() {
    let cli = Cli::parse_from(["ivrank", "evaluate", "-i", "data.csv", "-t", "label"]);

    match cli.command {
        Commands::Evaluate { data, binning, return_type, .. } => {
            assert_eq!(binning.method, BinningMethod::Quantile, "Default method should be quantile");
            assert_eq!(binning.bins, 10, "Default bins should be 10");
            assert_eq!(binning.min_leaf_frac, 0.05, "Default min leaf fraction should be 0.05");
            assert_eq!(binning.positive_label, "1");
            assert_eq!(return_type, ReturnType::Both);
            assert_eq!(data.infer_schema_length, 10000, "Default schema inference should be 10000");
            assert!(data.features.is_empty());
        }
        other => panic!("unexpected command {:?}", other),
    }
    assert!(!cli.verbose);
}

#[test]
fn test_cli_run_command_flags() {
    let cli = Cli::parse_from([
        "ivrank", "run", "-i", "data.csv", "-t", "label", "-s", "segment", "-o", "out", "--no-confirm", "--top-n",
        "5", "--no-charts", "--bundle", "--method", "width", "-v",
    ]);

    assert!(cli.verbose);
    match cli.command {
        Commands::Run { binning, segments, report, .. } => {
            assert_eq!(binning.method, BinningMethod::Width);
            assert!(segments.no_confirm);
            assert!(segments.segments.is_empty());
            assert_eq!(segments.output_dir, PathBuf::from("out"));
            assert_eq!(report.top_n, 5);
            assert!(report.no_charts && report.bundle);
        }
        other => panic!("unexpected command {:?}", other),
    }
}

#[test]
fn test_cli_rejects_invalid_values() {
    assert!(Cli::try_parse_from(["ivrank", "evaluate", "-i", "d.csv", "-t", "y", "--bins", "0"]).is_err());
    assert!(Cli::try_parse_from(["ivrank", "evaluate", "-i", "d.csv", "-t", "y", "--min-leaf-frac", "2"]).is_err());
    assert!(Cli::try_parse_from(["ivrank", "evaluate", "-i", "d.csv", "-t", "y", "--return-type", "all"]).is_err());
    assert!(Cli::try_parse_from(["ivrank", "evaluate", "-i", "d.csv"]).is_err(), "label is required");
}

#[test]
fn test_binary_evaluate_prints_ranking() {
    let mut df = create_test_dataframe();
    let (dir, csv_path) = create_temp_csv(&mut df);
    let json_path = dir.path().join("iv.json");

    ivrank()
        .args(["evaluate", "-t", "label", "--features", "feature_signal,feature_noise", "--bins", "3"])
        .arg("-i")
        .arg(&csv_path)
        .arg("--export-json")
        .arg(&json_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("FEATURE IV RANKING"))
        .stdout(predicate::str::contains("feature_signal"));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["metadata"]["config"]["label_col"], "label");
    assert_eq!(json["summary"]["features_evaluated"], 2);
    assert_eq!(json["per_feature"][0]["feature"], "feature_signal");
}

#[test]
fn test_binary_run_writes_artifacts_report_and_bundle() {
    let mut df = create_segment_example_dataframe();
    let (dir, csv_path) = create_temp_csv(&mut df);
    let out = dir.path().join("output");

    ivrank()
        .args(["run", "-t", "label", "-s", "segment", "--segments", "MTB,YNTB,NOPE", "--bins", "3"])
        .args(["--no-confirm", "--bundle"])
        .arg("-i")
        .arg(&csv_path)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    assert!(out.join("MTB_features_IV.csv").is_file());
    assert!(out.join("YNTB_features_IV.csv").is_file());
    assert!(!out.join("NOPE_features_IV.csv").exists());
    assert!(out.join("MTB_iv_top.png").is_file());
    assert!(out.join("report.zip").is_file());

    let report = std::fs::read_to_string(out.join("report.md")).unwrap();
    assert!(report.contains("![Top IV chart for MTB](MTB_iv_top.png)"));
    assert!(report.contains("## Segment: NOPE"));
    assert!(report.contains("- No IV data found at"));
}

#[test]
fn test_binary_segments_uses_all_values_without_prompt() {
    let mut df = create_segment_example_dataframe();
    let (dir, csv_path) = create_temp_csv(&mut df);
    let out = dir.path().join("out");

    ivrank()
        .args(["segments", "-t", "label", "-s", "segment", "--no-confirm"])
        .arg("-i")
        .arg(&csv_path)
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("SEGMENT RUN SUMMARY"));

    assert!(out.join("MTB_features_IV.csv").is_file());
    assert!(out.join("YNTB_features_IV.csv").is_file());
}

#[test]
fn test_binary_report_subcommand() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("A_features_IV.csv"), "x,0.25\ny,0.5\n").unwrap();

    ivrank()
        .args(["report", "--segments", "A,B", "--no-charts", "--report-name", "summary.md"])
        .arg("-o")
        .arg(dir.path())
        .assert()
        .success();

    let text = std::fs::read_to_string(dir.path().join("summary.md")).unwrap();
    assert!(text.contains("- y: 0.5000\n- x: 0.2500"));
    assert!(text.contains("## Segment: B"));
}

#[test]
fn test_binary_missing_input_fails() {
    ivrank()
        .args(["evaluate", "-i", "/definitely/not/here.csv", "-t", "label"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_binary_unsupported_method_fails() {
    ivrank()
        .args(["evaluate", "-i", "data.csv", "-t", "label", "--method", "kmeans"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported binning method"));
}
