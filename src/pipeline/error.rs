//! Error types for the binning, WoE/IV and segment pipeline.
//!
//! Each variant of [`IvError`] maps to one failure kind that callers are
//! expected to surface to users. Polars, I/O, archive and image failures are
//! wrapped so the pipeline can use `?` throughout.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the IV pipeline.
#[derive(Debug, Error)]
pub enum IvError {
    /// Input path does not resolve to a file.
    #[error("Input file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Input file extension is neither CSV nor Parquet.
    #[error("Unsupported file format: '{0}'. Supported formats: csv, parquet, pq")]
    UnsupportedFormat(String),

    /// A required label, segment or feature column is absent.
    #[error("{role} column '{column}' not found. Available columns: {available:?}")]
    MissingColumn {
        /// What the column was needed for ("Label", "Segment", "Feature")
        role: &'static str,
        /// Name that was looked up
        column: String,
        /// Columns actually present in the table
        available: Vec<String>,
    },

    /// Unknown binning strategy, out-of-range parameters, or a tree
    /// strategy requested without a label vector.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The resolved feature-column list is empty.
    #[error("No features selected for IV calculation")]
    NoFeaturesSelected,

    /// All rows share one outcome class, IV is undefined.
    #[error("Cannot compute IV: {bads} bad and {goods} good observations (both classes are required)")]
    DegenerateLabelDistribution {
        /// Total positive-class observations
        bads: u64,
        /// Total negative-class observations
        goods: u64,
    },

    #[error(transparent)]
    Polars(#[from] polars::prelude::PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl IvError {
    /// Convenience constructor for [`IvError::InvalidConfiguration`].
    pub fn invalid_config(message: impl Into<String>) -> Self {
        IvError::InvalidConfiguration(message.into())
    }

    /// Stable, lowercase name of the error kind for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            IvError::FileNotFound(_) => "file_not_found",
            IvError::UnsupportedFormat(_) => "unsupported_format",
            IvError::MissingColumn { .. } => "missing_column",
            IvError::InvalidConfiguration(_) => "invalid_configuration",
            IvError::NoFeaturesSelected => "no_features_selected",
            IvError::DegenerateLabelDistribution { .. } => "degenerate_label_distribution",
            IvError::Polars(_) => "polars",
            IvError::Io(_) => "io",
            IvError::Zip(_) => "zip",
            IvError::Image(_) => "image",
        }
    }
}

/// Result alias used across the pipeline and report modules.
pub type IvResult<T> = Result<T, IvError>;
