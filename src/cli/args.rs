//! Command-line argument definitions using clap

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::pipeline::{
    BinningConfig, BinningMethod, EvaluationConfig, PositiveLabel, ReturnType, SegmentRunConfig,
    DEFAULT_INFER_SCHEMA_LENGTH,
};
use crate::report::{ChartFormat, ReportOptions, DEFAULT_REPORT_NAME};

/// ivrank - Rank features by Information Value, per data segment
#[derive(Parser, Debug)]
#[command(name = "ivrank")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (overridden by IVRANK_LOG)
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute per-bin and per-feature IV for a whole dataset
    Evaluate {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        binning: BinningArgs,

        /// Tables to produce: "bin", "feature" or "both"
        #[arg(long, default_value = "both", value_parser = parse_return_type)]
        return_type: ReturnType,

        /// Write the result with run metadata to this JSON file
        #[arg(long)]
        export_json: Option<PathBuf>,
    },

    /// Write one feature-IV CSV per segment
    Segments {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        binning: BinningArgs,

        #[command(flatten)]
        segments: SegmentArgs,
    },

    /// Build the markdown report from existing segment CSVs
    Report {
        /// Directory holding the segment CSVs; the report is written here too
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Segments to include, in report order (comma-separated)
        #[arg(long, value_delimiter = ',', required = true)]
        segments: Vec<String>,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Run segments, then build the report over them
    Run {
        #[command(flatten)]
        data: DataArgs,

        #[command(flatten)]
        binning: BinningArgs,

        #[command(flatten)]
        segments: SegmentArgs,

        #[command(flatten)]
        report: ReportArgs,
    },
}

/// Input table and column selection
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Label column holding the binary outcome
    #[arg(short = 't', long = "label")]
    pub label: String,

    /// Feature columns to evaluate (comma-separated).
    /// Defaults to every column except the label (and segment) column.
    #[arg(long, value_delimiter = ',')]
    pub features: Vec<String>,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value_t = DEFAULT_INFER_SCHEMA_LENGTH)]
    pub infer_schema_length: usize,
}

impl DataArgs {
    pub fn feature_cols(&self) -> Option<Vec<String>> {
        (!self.features.is_empty()).then(|| self.features.clone())
    }

    pub fn infer_schema_length(&self) -> Option<usize> {
        match self.infer_schema_length {
            0 => None,
            n => Some(n),
        }
    }
}

/// Binning strategy and label binarization
#[derive(Args, Debug, Clone)]
pub struct BinningArgs {
    /// Binning method: "quantile", "width" or "tree"
    #[arg(long, default_value = "quantile", value_parser = parse_method)]
    pub method: BinningMethod,

    /// Number of bins (maximum leaves for tree binning)
    #[arg(long, default_value = "10", value_parser = validate_bins)]
    pub bins: usize,

    /// Minimum leaf size as a fraction of valid rows (tree binning only, 0-1)
    #[arg(long, default_value = "0.05", value_parser = validate_min_leaf_frac)]
    pub min_leaf_frac: f64,

    /// Label value that marks the positive ("bad") class
    #[arg(long, default_value = "1")]
    pub positive_label: String,
}

impl BinningArgs {
    pub fn binning_config(&self) -> BinningConfig {
        BinningConfig::new(self.method, self.bins).with_min_leaf_frac(self.min_leaf_frac)
    }

    pub fn positive_label(&self) -> PositiveLabel {
        // Parsing a positive label never fails
        self.positive_label.parse().unwrap_or_default()
    }
}

/// Segment column, selection and output location
#[derive(Args, Debug, Clone)]
pub struct SegmentArgs {
    /// Segment column name
    #[arg(short = 's', long)]
    pub segment_col: String,

    /// Segment values to evaluate (comma-separated).
    /// If omitted, the distinct values of the segment column are offered.
    #[arg(long, value_delimiter = ',')]
    pub segments: Vec<String>,

    /// Output directory for the segment CSVs
    #[arg(short, long, default_value = "output")]
    pub output_dir: PathBuf,

    /// Skip interactive prompts (all segments are used when none are given)
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,
}

/// Markdown report options
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Report file name inside the output directory
    #[arg(long, default_value = DEFAULT_REPORT_NAME)]
    pub report_name: String,

    /// Number of top features listed per segment
    #[arg(long, default_value = "10", value_parser = validate_top_n)]
    pub top_n: usize,

    /// Chart image format: "png" or "svg"
    #[arg(long, default_value = "png", value_parser = parse_chart_format)]
    pub chart_format: ChartFormat,

    /// Do not render per-segment charts
    #[arg(long, default_value = "false")]
    pub no_charts: bool,

    /// Also bundle the report, segment CSVs and charts into a zip archive
    #[arg(long, default_value = "false")]
    pub bundle: bool,
}

impl ReportArgs {
    pub fn options(&self) -> ReportOptions {
        ReportOptions::default()
            .with_report_name(self.report_name.clone())
            .with_top_n(self.top_n)
            .with_charts(!self.no_charts)
    }

    /// Zip archive path next to the report: `report.md` gives `report.zip`
    pub fn bundle_path(&self, output_dir: &Path) -> PathBuf {
        let stem = Path::new(&self.report_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("report");
        output_dir.join(format!("{}.zip", stem))
    }
}

/// Evaluation settings from the evaluate subcommand
pub fn evaluation_config(data: &DataArgs, binning: &BinningArgs, return_type: ReturnType) -> EvaluationConfig {
    let mut config = EvaluationConfig::new(data.label.clone())
        .with_binning(binning.binning_config())
        .with_positive_label(binning.positive_label())
        .with_return_type(return_type);
    config.feature_cols = data.feature_cols();
    config
}

/// Segment run settings once the segment list is known
pub fn segment_run_config(
    data: &DataArgs,
    binning: &BinningArgs,
    segment_args: &SegmentArgs,
    segments: Vec<String>,
) -> SegmentRunConfig {
    let mut config = SegmentRunConfig::new(
        data.label.clone(),
        segment_args.segment_col.clone(),
        segments,
        segment_args.output_dir.clone(),
    )
    .with_binning(binning.binning_config())
    .with_positive_label(binning.positive_label());
    config.feature_cols = data.feature_cols();
    config
}

fn parse_method(s: &str) -> Result<BinningMethod, String> {
    s.parse::<BinningMethod>().map_err(|e| e.to_string())
}

fn parse_chart_format(s: &str) -> Result<ChartFormat, String> {
    s.parse::<ChartFormat>().map_err(|e| e.to_string())
}

fn parse_return_type(s: &str) -> Result<ReturnType, String> {
    s.parse::<ReturnType>().map_err(|e| e.to_string())
}

/// Validator for bins parameter
fn validate_bins(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid bin count", s))?;

    if value == 0 {
        Err("bins must be at least 1".to_string())
    } else {
        Ok(value)
    }
}

/// Validator for min_leaf_frac parameter
fn validate_min_leaf_frac(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!(
            "min_leaf_frac must be between 0.0 and 1.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}

/// Validator for top_n parameter
fn validate_top_n(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value == 0 {
        Err("top_n must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
