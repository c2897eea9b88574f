//! Markdown IV report built from the per-segment artifacts

use std::path::{Path, PathBuf};

use crate::pipeline::error::IvResult;
use crate::pipeline::woe::FeatureIv;

use super::artifact::{artifact_path, read_feature_iv};
use super::chart::{BarChart, ChartRenderer};

/// Default report file name inside the artifact directory
pub const DEFAULT_REPORT_NAME: &str = "report.md";

/// Default number of features listed per segment
pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub report_name: String,
    pub top_n: usize,
    /// When false no chart is attempted and no chart line is written
    pub generate_charts: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            report_name: DEFAULT_REPORT_NAME.to_string(),
            top_n: DEFAULT_TOP_N,
            generate_charts: true,
        }
    }
}

impl ReportOptions {
    pub fn with_report_name(mut self, name: impl Into<String>) -> Self {
        self.report_name = name.into();
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn with_charts(mut self, generate_charts: bool) -> Self {
        self.generate_charts = generate_charts;
        self
    }
}

/// File name of a segment's chart for a given renderer
pub fn chart_file_name(segment: &str, extension: &str) -> String {
    let safe: String = segment
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{}_iv_top.{}", safe, extension)
}

/// Highest-IV rows, descending; ties keep file order
fn top_features(mut rows: Vec<FeatureIv>, top_n: usize) -> Vec<FeatureIv> {
    rows.sort_by(|a, b| b.iv.total_cmp(&a.iv));
    rows.truncate(top_n);
    rows
}

/// Markdown lines for one segment
fn segment_section(
    output_dir: &Path,
    segment: &str,
    options: &ReportOptions,
    charts: Option<&dyn ChartRenderer>,
) -> Vec<String> {
    let top_n = options.top_n;
    let csv_path = artifact_path(output_dir, segment);
    let mut lines = vec![format!("## Segment: {}", segment)];

    let rows = match read_feature_iv(&csv_path) {
        Ok(rows) if !rows.is_empty() => rows,
        Ok(_) => {
            tracing::info!(segment = %segment, path = %csv_path.display(), "segment artifact is empty");
            lines.push(format!("- No IV data found at `{}`", csv_path.display()));
            lines.push(String::new());
            return lines;
        }
        Err(err) => {
            tracing::info!(segment = %segment, kind = err.kind(), error = %err, "no readable artifact for segment");
            lines.push(format!("- No IV data found at `{}`", csv_path.display()));
            lines.push(String::new());
            return lines;
        }
    };

    lines.push(format!("Source: `{}`", csv_path.display()));
    lines.push(String::new());

    let preview = top_features(rows, top_n);
    lines.push(format!("Top IV features (up to {}):", top_n));
    for row in &preview {
        lines.push(format!("- {}: {:.4}", row.feature, row.iv));
    }
    lines.push(String::new());

    if !options.generate_charts {
        return lines;
    }

    match charts {
        Some(renderer) => {
            let file_name = chart_file_name(segment, renderer.file_extension());
            let chart = BarChart::top_iv(segment, &preview);
            match renderer.render(&chart, &output_dir.join(&file_name)) {
                Ok(()) => lines.push(format!("![Top IV chart for {}]({})", segment, file_name)),
                Err(err) => {
                    tracing::warn!(segment = %segment, error = %err, "chart rendering failed");
                    lines.push("- Chart generation failed (skipped).".to_string());
                }
            }
            lines.push(String::new());
        }
        None => {
            tracing::debug!(segment = %segment, "no chart renderer available");
            lines.push("- Chart generation skipped (no chart renderer available).".to_string());
            lines.push(String::new());
        }
    }

    lines
}

/// Write the markdown report for `segments` and return its path.
///
/// Segments without a readable artifact get a notice instead of a ranking.
/// Chart problems never fail the report. With charts disabled in `options`
/// the renderer is ignored.
pub fn generate_report(
    output_dir: &Path,
    segments: &[String],
    options: &ReportOptions,
    charts: Option<&dyn ChartRenderer>,
) -> IvResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let mut lines = vec!["# Information Value Report".to_string(), String::new()];
    for segment in segments {
        lines.extend(segment_section(output_dir, segment, options, charts));
    }

    let report_path = output_dir.join(&options.report_name);
    std::fs::write(&report_path, lines.join("\n"))?;

    tracing::info!(
        path = %report_path.display(),
        segments = segments.len(),
        "report written"
    );
    Ok(report_path)
}
