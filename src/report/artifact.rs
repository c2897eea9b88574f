//! Per-segment feature-IV artifacts
//!
//! One headerless two-column CSV per segment: feature name, then IV written
//! at full (shortest round-trip) precision. The file lives at
//! `{output_dir}/{segment}_features_IV.csv`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use polars::prelude::*;

use crate::pipeline::error::{IvError, IvResult};
use crate::pipeline::woe::FeatureIv;

/// File name suffix shared by every segment artifact
pub const ARTIFACT_SUFFIX: &str = "_features_IV.csv";

/// Artifact file name for a segment; path separators become `_`
pub fn artifact_file_name(segment: &str) -> String {
    let safe: String = segment
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}{}", safe, ARTIFACT_SUFFIX)
}

pub fn artifact_path(output_dir: &Path, segment: &str) -> PathBuf {
    output_dir.join(artifact_file_name(segment))
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Write a feature-IV table, replacing any existing file
pub fn write_feature_iv(path: &Path, features: &[FeatureIv]) -> IvResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for row in features {
        writeln!(writer, "{},{}", csv_field(&row.feature), row.iv)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a feature-IV table back in file order.
///
/// Rows with an empty IV cell are skipped.
pub fn read_feature_iv(path: &Path) -> IvResult<Vec<FeatureIv>> {
    if !path.is_file() {
        return Err(IvError::FileNotFound(path.to_path_buf()));
    }
    if std::fs::metadata(path)?.len() == 0 {
        return Ok(Vec::new());
    }

    let schema = Schema::from_iter([
        Field::new("feature".into(), DataType::String),
        Field::new("iv".into(), DataType::Float64),
    ]);

    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_schema(Some(Arc::new(schema)))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let names = df.column("feature")?.str()?;
    let values = df.column("iv")?.f64()?;

    let rows = names
        .into_iter()
        .zip(values)
        .filter_map(|(name, iv)| match (name, iv) {
            (Some(name), Some(iv)) => Some(FeatureIv {
                feature: name.to_string(),
                iv,
            }),
            _ => None,
        })
        .collect();

    Ok(rows)
}
