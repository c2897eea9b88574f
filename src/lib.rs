//! ivrank: Information Value ranking library
//!
//! Discretizes candidate features (quantile, equal-width or decision-tree
//! bins), computes Weight of Evidence and Information Value against a binary
//! label, runs the evaluation per data segment and renders a markdown report
//! over the per-segment results.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use pipeline::{
    evaluate, run_by_segments, BinningConfig, BinningMethod, EvaluationConfig, EvaluationResult, IvError,
    IvResult, SegmentRunConfig,
};
pub use report::{generate_report, ChartFormat, ChartRenderer, PngChartRenderer, ReportOptions, SvgChartRenderer};
