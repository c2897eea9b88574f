//! Tests for dataset loading and column helpers

use ivrank::pipeline::{column_names, load_dataframe, load_dataset, require_column, IvError};
use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;

mod common;
use common::{create_temp_csv, create_temp_parquet, create_test_dataframe};

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let df = load_dataframe(&csv_path).unwrap();

    assert_eq!(df.height(), 2, "Should have 2 data rows");
    assert_eq!(df.get_column_names(), &["a", "b", "c"]);
}

#[test]
fn test_load_parquet_file() {
    let mut df = create_test_dataframe();
    let (_dir, path) = create_temp_parquet(&mut df);

    let loaded = load_dataframe(&path).unwrap();
    assert_eq!(loaded.shape(), df.shape());
    assert_eq!(column_names(&loaded), column_names(&df));
}

#[test]
fn test_load_pq_extension_and_uppercase_csv() {
    let temp_dir = TempDir::new().unwrap();

    let mut df = df! {
        "x" => [1i32, 2, 3],
        "y" => [4i32, 5, 6],
    }
    .unwrap();
    let pq_path = temp_dir.path().join("data.pq");
    let file = std::fs::File::create(&pq_path).unwrap();
    ParquetWriter::new(file).finish(&mut df).unwrap();
    assert_eq!(load_dataframe(&pq_path).unwrap().height(), 3);

    let csv_path = temp_dir.path().join("DATA.CSV");
    std::fs::write(&csv_path, "x,y\n1,2\n").unwrap();
    assert_eq!(load_dataframe(&csv_path).unwrap().height(), 1);
}

#[test]
fn test_round_trip_through_csv_keeps_text_column() {
    let mut df = create_test_dataframe();
    let (_dir, path) = create_temp_csv(&mut df);

    let loaded = load_dataset(&path, None).unwrap().collect().unwrap();
    assert_eq!(loaded.height(), 12);
    assert_eq!(loaded.column("segment").unwrap().dtype(), &DataType::String);
}

#[test]
fn test_missing_file_reported_before_extension() {
    let temp_dir = TempDir::new().unwrap();

    match load_dataset(&temp_dir.path().join("nope.txt"), None) {
        Err(IvError::FileNotFound(path)) => assert!(path.ends_with("nope.txt")),
        other => panic!("Expected FileNotFound, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unsupported_extension() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("data.xlsx");
    std::fs::write(&path, "not really excel").unwrap();

    match load_dataset(&path, None) {
        Err(IvError::UnsupportedFormat(ext)) => assert_eq!(ext, "xlsx"),
        other => panic!("Expected UnsupportedFormat, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_require_column_lists_available_columns() {
    let df = create_test_dataframe();
    let err = require_column(&df, "target", "Label").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Label column 'target' not found"));
    assert!(msg.contains("feature_signal"));
}
