//! Per-segment IV runs
//!
//! Loads one dataset, evaluates every requested segment in feature-only mode
//! and writes one feature-IV artifact per segment that has data. Segments
//! without rows, or whose evaluation fails, are skipped so the rest of the
//! run still produces output.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use polars::prelude::*;

use super::config::{EvaluationConfig, SegmentRunConfig};
use super::error::IvResult;
use super::evaluator::{evaluate, resolve_features};
use super::loader::{load_dataframe, require_column};
use crate::report::artifact::{artifact_path, write_feature_iv};
use crate::utils::progress::{finish_with_success, finish_with_warning, segment_progress};

/// Rows whose segment value, rendered as text, equals `segment`.
///
/// Null segment cells never match.
pub fn filter_segment(df: &DataFrame, segment_col: &str, segment: &str) -> IvResult<DataFrame> {
    let col = require_column(df, segment_col, "Segment")?;
    let text = col.cast(&DataType::String)?;
    let mask: BooleanChunked = text.str()?.into_iter().map(|v| v == Some(segment)).collect();
    Ok(df.filter(&mask)?)
}

/// Distinct non-null segment values in order of first appearance
pub fn distinct_segments(df: &DataFrame, segment_col: &str) -> IvResult<Vec<String>> {
    let col = require_column(df, segment_col, "Segment")?;
    let text = col.cast(&DataType::String)?;

    let mut seen = HashSet::new();
    let mut segments = Vec::new();
    for value in text.str()?.into_iter().flatten() {
        if seen.insert(value) {
            segments.push(value.to_string());
        }
    }
    Ok(segments)
}

/// Load `input_path` and run every configured segment.
///
/// Returns the artifact paths actually written, in segment order.
pub fn run_by_segments(input_path: &Path, config: &SegmentRunConfig) -> IvResult<Vec<PathBuf>> {
    let df = load_dataframe(input_path)?;
    run_segments_on_frame(&df, config)
}

/// Run every configured segment of an already loaded table.
///
/// Column and configuration problems fail the whole run up front; problems
/// inside a single segment only skip that segment.
pub fn run_segments_on_frame(df: &DataFrame, config: &SegmentRunConfig) -> IvResult<Vec<PathBuf>> {
    require_column(df, &config.label_col, "Label")?;
    require_column(df, &config.segment_col, "Segment")?;
    let features = resolve_features(
        df,
        config.feature_cols.as_deref(),
        &[config.label_col.as_str(), config.segment_col.as_str()],
    )?;
    config.binning.validate()?;

    std::fs::create_dir_all(&config.output_dir)?;

    let eval_config = config.evaluation_config(features);
    let pb = segment_progress(config.segments.len());
    let mut written = Vec::new();
    let mut skipped = 0usize;

    for segment in &config.segments {
        pb.set_message(segment.clone());

        match run_segment(df, config, &eval_config, segment) {
            Ok(Some(path)) => written.push(path),
            Ok(None) => {
                tracing::info!(segment = %segment, "no rows for segment, skipping");
                skipped += 1;
            }
            Err(err) => {
                tracing::warn!(
                    segment = %segment,
                    kind = err.kind(),
                    error = %err,
                    "segment evaluation failed, skipping"
                );
                skipped += 1;
            }
        }
        pb.inc(1);
    }

    let summary = format!("{} artifacts written, {} segments skipped", written.len(), skipped);
    if skipped == 0 {
        finish_with_success(&pb, &summary);
    } else {
        finish_with_warning(&pb, &summary);
    }

    tracing::info!(
        written = written.len(),
        skipped,
        output_dir = %config.output_dir.display(),
        "segment run complete"
    );
    Ok(written)
}

/// Evaluate one segment and persist its artifact; `None` when it has no rows
fn run_segment(
    df: &DataFrame,
    config: &SegmentRunConfig,
    eval_config: &EvaluationConfig,
    segment: &str,
) -> IvResult<Option<PathBuf>> {
    let subset = filter_segment(df, &config.segment_col, segment)?;
    if subset.height() == 0 {
        return Ok(None);
    }

    let result = evaluate(&subset, eval_config)?;
    let features = result.per_feature.unwrap_or_default();

    let path = artifact_path(&config.output_dir, segment);
    write_feature_iv(&path, &features)?;

    tracing::info!(
        segment = %segment,
        rows = subset.height(),
        features = features.len(),
        path = %path.display(),
        "segment artifact written"
    );
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df! {
            "segment" => [Some("A"), Some("B"), None, Some("A"), Some("C")],
            "x" => [1.0f64, 2.0, 3.0, 4.0, 5.0],
        }
        .unwrap()
    }

    #[test]
    fn test_filter_segment_exact_match() {
        let df = sample();
        assert_eq!(filter_segment(&df, "segment", "A").unwrap().height(), 2);
        assert_eq!(filter_segment(&df, "segment", "a").unwrap().height(), 0);
        assert_eq!(filter_segment(&df, "segment", "Z").unwrap().height(), 0);
    }

    #[test]
    fn test_filter_numeric_segment_by_text() {
        let df = df! {
            "segment" => [1i64, 2, 1],
        }
        .unwrap();
        assert_eq!(filter_segment(&df, "segment", "1").unwrap().height(), 2);
    }

    #[test]
    fn test_distinct_segments_first_appearance() {
        let df = sample();
        assert_eq!(distinct_segments(&df, "segment").unwrap(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_missing_segment_column() {
        let df = sample();
        let err = filter_segment(&df, "region", "A").unwrap_err();
        assert_eq!(err.kind(), "missing_column");
    }
}
