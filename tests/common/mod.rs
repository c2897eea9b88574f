//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Small segmented table with known characteristics
///
/// - `label`: binary outcome (0/1), both classes in every segment
/// - `segment`: "A" (6 rows) and "B" (6 rows)
/// - `feature_signal`: high values go with label 1
/// - `feature_noise`: unrelated to the label
/// - `feature_missing`: half the rows missing
/// - `feature_text`: numbers stored as text, one unparsable entry
pub fn create_test_dataframe() -> DataFrame {
    df! {
        "label" => [0i32, 0, 0, 1, 1, 1, 0, 0, 1, 0, 1, 1],
        "segment" => ["A", "A", "A", "A", "A", "A", "B", "B", "B", "B", "B", "B"],
        "feature_signal" => [1.0f64, 2.0, 3.0, 10.0, 11.0, 12.0, 1.5, 2.5, 9.5, 3.5, 10.5, 11.5],
        "feature_noise" => [5.0f64, 1.0, 4.0, 2.0, 3.0, 6.0, 2.0, 6.0, 1.0, 5.0, 3.0, 4.0],
        "feature_missing" => [Some(1.0f64), None, Some(3.0), None, Some(5.0), None, Some(1.0), None, Some(2.0), None, Some(3.0), None],
        "feature_text" => ["1", "2", "x", "4", "5", "6", "7", "8", "9", "10", "11", "12"],
    }
    .unwrap()
}

/// The two-segment example: MTB and YNTB, three rows each
pub fn create_segment_example_dataframe() -> DataFrame {
    df! {
        "feature1" => [1i64, 2, 3, 4, 5, 6],
        "feature2" => [10i64, 9, 8, 7, 6, 5],
        "label" => [1i64, 0, 1, 0, 1, 0],
        "segment" => ["MTB", "MTB", "YNTB", "YNTB", "MTB", "YNTB"],
    }
    .unwrap()
}

/// Create a larger random table for stress tests
pub fn create_large_test_dataframe(rows: usize, cols: usize) -> DataFrame {
    use rand::Rng;
    let mut rng = rand::thread_rng();

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 2);

    let label: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();
    columns.push(Column::new("label".into(), label));

    let segment: Vec<&str> = (0..rows).map(|i| if i % 2 == 0 { "even" } else { "odd" }).collect();
    columns.push(Column::new("segment".into(), segment));

    for i in 0..cols {
        let values: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats agree within `tol`
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "Value mismatch: expected {}, got {} (tolerance {})",
        expected,
        actual,
        tol
    );
}
