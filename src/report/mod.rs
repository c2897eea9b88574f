//! Report module - segment artifacts, markdown report, charts and exports

pub mod artifact;
pub mod chart;
pub mod export;
pub mod markdown;
pub mod summary;

pub use artifact::{artifact_file_name, artifact_path, read_feature_iv, write_feature_iv, ARTIFACT_SUFFIX};
pub use chart::{BarChart, ChartFormat, ChartRenderer, PngChartRenderer, SvgChartRenderer};
pub use export::{export_evaluation_json, package_report, report_files};
pub use markdown::{chart_file_name, generate_report, ReportOptions, DEFAULT_REPORT_NAME, DEFAULT_TOP_N};
pub use summary::*;
