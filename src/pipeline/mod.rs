//! Pipeline module - loading, binning, WoE/IV aggregation and segment runs

pub mod binning;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod loader;
pub mod segments;
pub mod target;
pub mod woe;

pub use binning::{bin_column, bin_values, FeatureBins, MISSING_BIN, SINGLE_BIN};
pub use config::*;
pub use error::{IvError, IvResult};
pub use evaluator::{evaluate, resolve_features, EvaluationResult};
pub use loader::*;
pub use segments::{distinct_segments, filter_segment, run_by_segments, run_segments_on_frame};
pub use target::*;
pub use woe::{calculate_woe_iv, BinStatistic, FeatureIv, IvTable, WoeAggregator, MIN_SHARE};
