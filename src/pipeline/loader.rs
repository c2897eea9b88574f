//! Dataset loader for CSV and Parquet files, plus column access helpers

use polars::prelude::*;
use std::path::Path;

use super::error::{IvError, IvResult};

/// Rows used for CSV schema inference unless the caller asks otherwise
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

/// Lazily open a dataset (CSV or Parquet based on extension).
///
/// `infer_schema_length` only applies to CSV; `None` scans the whole file.
pub fn load_dataset(path: &Path, infer_schema_length: Option<usize>) -> IvResult<LazyFrame> {
    if !path.is_file() {
        return Err(IvError::FileNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(infer_schema_length)
            .finish()?,
        "parquet" | "pq" => LazyFrame::scan_parquet(path, Default::default())?,
        _ => return Err(IvError::UnsupportedFormat(extension)),
    };

    Ok(lf)
}

/// Load a dataset fully into memory with the default schema inference length
pub fn load_dataframe(path: &Path) -> IvResult<DataFrame> {
    let df = load_dataset(path, Some(DEFAULT_INFER_SCHEMA_LENGTH))?.collect()?;
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "dataset loaded"
    );
    Ok(df)
}

/// Rows, columns and estimated memory (MB) of a loaded dataset
pub fn dataset_stats(df: &DataFrame) -> (usize, usize, f64) {
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    (rows, cols, memory_mb)
}

/// Column names in table order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Look up a column, failing with `MissingColumn` when it is absent.
///
/// `role` names what the column is needed for ("Label", "Segment", "Feature").
pub fn require_column<'a>(df: &'a DataFrame, name: &str, role: &'static str) -> IvResult<&'a Column> {
    df.column(name).map_err(|_| IvError::MissingColumn {
        role,
        column: name.to_string(),
        available: column_names(df),
    })
}

/// Coerce a raw column to numeric values.
///
/// Values that cannot be read as finite numbers (unparsable text, nulls,
/// NaN, infinities) become `None` instead of raising an error.
pub fn coerce_numeric(col: &Column) -> IvResult<Vec<Option<f64>>> {
    // Non-strict cast: unparsable strings turn into nulls
    let float_col = col.cast(&DataType::Float64)?;

    let values = float_col
        .f64()?
        .into_iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect();

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numeric_handles_text_and_nan() {
        let col = Column::new("f".into(), [Some("1.5"), Some("abc"), None, Some("3")]);
        let values = coerce_numeric(&col).unwrap();
        assert_eq!(values, vec![Some(1.5), None, None, Some(3.0)]);

        let col = Column::new("g".into(), [1.0f64, f64::NAN, 2.0]);
        let values = coerce_numeric(&col).unwrap();
        assert_eq!(values, vec![Some(1.0), None, Some(2.0)]);
    }

    #[test]
    fn test_coerce_numeric_drops_infinities() {
        let col = Column::new("h".into(), [1.0f64, f64::INFINITY, f64::NEG_INFINITY, 2.0]);
        let values = coerce_numeric(&col).unwrap();
        assert_eq!(values, vec![Some(1.0), None, None, Some(2.0)]);
    }

    #[test]
    fn test_coerce_numeric_integers_and_booleans() {
        let col = Column::new("i".into(), [Some(3i64), None, Some(-1)]);
        assert_eq!(coerce_numeric(&col).unwrap(), vec![Some(3.0), None, Some(-1.0)]);

        let col = Column::new("b".into(), [true, false]);
        assert_eq!(coerce_numeric(&col).unwrap(), vec![Some(1.0), Some(0.0)]);
    }

    #[test]
    fn test_require_column() {
        let df = df! {
            "a" => [1i32, 2],
        }.unwrap();

        assert!(require_column(&df, "a", "Feature").is_ok());
        match require_column(&df, "b", "Feature") {
            Err(IvError::MissingColumn { role, column, available }) => {
                assert_eq!(role, "Feature");
                assert_eq!(column, "b");
                assert_eq!(available, vec!["a".to_string()]);
            }
            other => panic!("Expected MissingColumn, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_dataset_stats() {
        let df = df! {
            "a" => [1i32, 2, 3],
            "b" => [1.0f64, 2.0, 3.0],
        }.unwrap();
        let (rows, cols, mem) = dataset_stats(&df);
        assert_eq!((rows, cols), (3, 2));
        assert!(mem >= 0.0);
    }
}
