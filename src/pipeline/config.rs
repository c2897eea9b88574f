//! Typed configuration for binning, evaluation and segment runs

use std::path::PathBuf;

use serde::Serialize;

use super::error::{IvError, IvResult};
use super::target::PositiveLabel;

/// Default number of bins (or maximum leaves for tree binning)
pub const DEFAULT_N_BINS: usize = 10;

/// Default minimum fraction of valid rows per tree leaf
pub const DEFAULT_MIN_LEAF_FRAC: f64 = 0.05;

/// Discretization strategy for a numeric feature
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinningMethod {
    /// Equal-frequency intervals from empirical quantiles
    #[default]
    Quantile,
    /// Equal-width intervals over the observed range
    Width,
    /// Leaves of a single-feature decision tree fitted against the label
    Tree,
}

impl BinningMethod {
    /// Whether the strategy needs the binarized label vector
    pub fn requires_label(&self) -> bool {
        matches!(self, BinningMethod::Tree)
    }
}

impl std::fmt::Display for BinningMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinningMethod::Quantile => write!(f, "quantile"),
            BinningMethod::Width => write!(f, "width"),
            BinningMethod::Tree => write!(f, "tree"),
        }
    }
}

impl std::str::FromStr for BinningMethod {
    type Err = IvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quantile" => Ok(BinningMethod::Quantile),
            "width" => Ok(BinningMethod::Width),
            "tree" => Ok(BinningMethod::Tree),
            _ => Err(IvError::invalid_config(format!(
                "Unsupported binning method: '{}'. Use 'quantile', 'width' or 'tree'.",
                s
            ))),
        }
    }
}

/// Binning strategy plus its parameters
#[derive(Debug, Clone, Serialize)]
pub struct BinningConfig {
    pub method: BinningMethod,
    /// Number of bins (quantile/width) or maximum leaves (tree)
    pub n_bins: usize,
    /// Minimum leaf size as a fraction of valid rows (tree only)
    pub min_leaf_frac: f64,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            method: BinningMethod::default(),
            n_bins: DEFAULT_N_BINS,
            min_leaf_frac: DEFAULT_MIN_LEAF_FRAC,
        }
    }
}

impl BinningConfig {
    pub fn new(method: BinningMethod, n_bins: usize) -> Self {
        Self {
            method,
            n_bins,
            ..Default::default()
        }
    }

    pub fn with_min_leaf_frac(mut self, min_leaf_frac: f64) -> Self {
        self.min_leaf_frac = min_leaf_frac;
        self
    }

    /// Reject parameter combinations no strategy can honour
    pub fn validate(&self) -> IvResult<()> {
        if self.n_bins == 0 {
            return Err(IvError::invalid_config("n_bins must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.min_leaf_frac) {
            return Err(IvError::invalid_config(format!(
                "min_leaf_frac must be between 0.0 and 1.0, got {}",
                self.min_leaf_frac
            )));
        }
        Ok(())
    }
}

/// Which result tables an evaluation should produce
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    /// Per-bin statistics only
    Bin,
    /// Per-feature IV summary only
    Feature,
    /// Both tables
    #[default]
    Both,
}

impl ReturnType {
    pub fn includes_bins(&self) -> bool {
        matches!(self, ReturnType::Bin | ReturnType::Both)
    }

    pub fn includes_features(&self) -> bool {
        matches!(self, ReturnType::Feature | ReturnType::Both)
    }
}

impl std::fmt::Display for ReturnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReturnType::Bin => write!(f, "bin"),
            ReturnType::Feature => write!(f, "feature"),
            ReturnType::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for ReturnType {
    type Err = IvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bin" => Ok(ReturnType::Bin),
            "feature" => Ok(ReturnType::Feature),
            "both" => Ok(ReturnType::Both),
            _ => Err(IvError::invalid_config(format!(
                "Unknown return type: '{}'. Use 'bin', 'feature' or 'both'.",
                s
            ))),
        }
    }
}

/// Everything the feature evaluator needs besides the table itself
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationConfig {
    pub label_col: String,
    /// Explicit feature columns; `None` means every column except the label
    pub feature_cols: Option<Vec<String>>,
    pub binning: BinningConfig,
    pub positive_label: PositiveLabel,
    pub return_type: ReturnType,
}

impl EvaluationConfig {
    pub fn new(label_col: impl Into<String>) -> Self {
        Self {
            label_col: label_col.into(),
            feature_cols: None,
            binning: BinningConfig::default(),
            positive_label: PositiveLabel::default(),
            return_type: ReturnType::default(),
        }
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.feature_cols = Some(features);
        self
    }

    pub fn with_binning(mut self, binning: BinningConfig) -> Self {
        self.binning = binning;
        self
    }

    pub fn with_positive_label(mut self, positive_label: PositiveLabel) -> Self {
        self.positive_label = positive_label;
        self
    }

    pub fn with_return_type(mut self, return_type: ReturnType) -> Self {
        self.return_type = return_type;
        self
    }
}

/// Configuration for a per-segment IV run over one input file
#[derive(Debug, Clone, Serialize)]
pub struct SegmentRunConfig {
    pub label_col: String,
    pub segment_col: String,
    /// Segment identifiers to evaluate, in output order
    pub segments: Vec<String>,
    /// Explicit feature columns; `None` means every column except label and segment
    pub feature_cols: Option<Vec<String>>,
    pub binning: BinningConfig,
    pub positive_label: PositiveLabel,
    pub output_dir: PathBuf,
}

impl SegmentRunConfig {
    pub fn new(
        label_col: impl Into<String>,
        segment_col: impl Into<String>,
        segments: Vec<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            label_col: label_col.into(),
            segment_col: segment_col.into(),
            segments,
            feature_cols: None,
            binning: BinningConfig::default(),
            positive_label: PositiveLabel::default(),
            output_dir: output_dir.into(),
        }
    }

    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.feature_cols = Some(features);
        self
    }

    pub fn with_binning(mut self, binning: BinningConfig) -> Self {
        self.binning = binning;
        self
    }

    pub fn with_positive_label(mut self, positive_label: PositiveLabel) -> Self {
        self.positive_label = positive_label;
        self
    }

    /// Evaluation settings applied to each segment (feature-only output)
    pub fn evaluation_config(&self, feature_cols: Vec<String>) -> EvaluationConfig {
        EvaluationConfig {
            label_col: self.label_col.clone(),
            feature_cols: Some(feature_cols),
            binning: self.binning.clone(),
            positive_label: self.positive_label.clone(),
            return_type: ReturnType::Feature,
        }
    }
}
