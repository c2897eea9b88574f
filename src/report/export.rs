//! JSON export of evaluation results and zip bundling of report outputs

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::config::EvaluationConfig;
use crate::pipeline::evaluator::EvaluationResult;

use super::artifact::ARTIFACT_SUFFIX;

/// Metadata about the evaluation run
#[derive(Serialize)]
pub struct EvaluationMetadata {
    /// Timestamp of the evaluation (RFC 3339)
    pub timestamp: String,
    pub ivrank_version: String,
    pub input_file: String,
    /// Configuration the evaluation ran with
    pub config: EvaluationConfig,
}

/// Aggregate figures over the per-feature results
#[derive(Serialize)]
pub struct EvaluationSummary {
    pub features_evaluated: usize,
    pub total_bads: u64,
    pub total_goods: u64,
    pub max_iv: f64,
    pub avg_iv: f64,
}

#[derive(Serialize)]
pub struct EvaluationExport<'a> {
    pub metadata: EvaluationMetadata,
    pub summary: EvaluationSummary,
    #[serde(flatten)]
    pub result: &'a EvaluationResult,
}

/// Write an evaluation result plus run metadata as pretty JSON
pub fn export_evaluation_json(
    result: &EvaluationResult,
    config: &EvaluationConfig,
    input_file: &Path,
    output_path: &Path,
) -> Result<()> {
    let ivs: Vec<f64> = result
        .per_feature
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|f| f.iv)
        .collect();

    let avg_iv = if ivs.is_empty() {
        0.0
    } else {
        ivs.iter().sum::<f64>() / ivs.len() as f64
    };

    let export = EvaluationExport {
        metadata: EvaluationMetadata {
            timestamp: Utc::now().to_rfc3339(),
            ivrank_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: input_file.display().to_string(),
            config: config.clone(),
        },
        summary: EvaluationSummary {
            features_evaluated: ivs.len(),
            total_bads: result.total_bads,
            total_goods: result.total_goods,
            max_iv: ivs.iter().copied().fold(0.0, f64::max),
            avg_iv,
        },
        result,
    };

    let json = serde_json::to_string_pretty(&export).context("Failed to serialize evaluation to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write evaluation to {}", output_path.display()))?;

    Ok(())
}

/// Files in `output_dir` that belong to a report: the report itself, every
/// segment artifact and every segment chart. Sorted by file name.
pub fn report_files(output_dir: &Path, report_name: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries = std::fs::read_dir(output_dir)
        .with_context(|| format!("Failed to read directory: {}", output_dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name == report_name || name.ends_with(ARTIFACT_SUFFIX) || name.contains("_iv_top.") {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Bundle a report and its segment outputs into one zip archive.
///
/// The source files are left in place.
pub fn package_report(output_dir: &Path, report_name: &str, zip_path: &Path) -> Result<Vec<PathBuf>> {
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let files = report_files(output_dir, report_name)?;

    let zip_file = std::fs::File::create(zip_path)
        .with_context(|| format!("Failed to create zip file: {}", zip_path.display()))?;

    let mut zip = ZipWriter::new(zip_file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .unix_permissions(0o644);

    for path in &files {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(report_name);
        zip.start_file(filename, options)
            .with_context(|| format!("Failed to add {} to zip", filename))?;
        let mut content = Vec::new();
        std::fs::File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?
            .read_to_end(&mut content)?;
        zip.write_all(&content)?;
    }

    zip.finish().context("Failed to finalize zip file")?;

    tracing::info!(files = files.len(), path = %zip_path.display(), "report bundle written");
    Ok(files)
}
