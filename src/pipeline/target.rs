//! Label binarization
//!
//! The label column may hold integers, floats, booleans or text. A row is an
//! event ("bad", 1) when its raw label equals the configured positive value,
//! and a non-event ("good", 0) otherwise, including when the label is null.

use polars::prelude::*;
use serde::Serialize;

use super::error::IvResult;
use super::loader::require_column;

/// Raw label value that marks the positive ("bad"/event) class
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PositiveLabel {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl Default for PositiveLabel {
    fn default() -> Self {
        PositiveLabel::Number(1.0)
    }
}

impl std::fmt::Display for PositiveLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositiveLabel::Number(n) => write!(f, "{}", n),
            PositiveLabel::Bool(b) => write!(f, "{}", b),
            PositiveLabel::Text(s) => write!(f, "{}", s),
        }
    }
}

impl std::str::FromStr for PositiveLabel {
    type Err = std::convert::Infallible;

    /// `true`/`false` become booleans, anything numeric becomes a number,
    /// everything else is kept as text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return Ok(PositiveLabel::Bool(true));
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Ok(PositiveLabel::Bool(false));
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(PositiveLabel::Number(n)),
            _ => Ok(PositiveLabel::Text(s.to_string())),
        }
    }
}

impl PositiveLabel {
    fn matches_number(&self, value: f64) -> bool {
        match self {
            PositiveLabel::Number(n) => value == *n,
            PositiveLabel::Bool(b) => value == if *b { 1.0 } else { 0.0 },
            PositiveLabel::Text(_) => false,
        }
    }

    fn matches_bool(&self, value: bool) -> bool {
        match self {
            PositiveLabel::Bool(b) => value == *b,
            PositiveLabel::Number(n) => *n == if value { 1.0 } else { 0.0 },
            PositiveLabel::Text(_) => false,
        }
    }

    fn matches_text(&self, value: &str) -> bool {
        match self {
            PositiveLabel::Text(s) => value == s,
            PositiveLabel::Number(n) => value.trim().parse::<f64>().map(|v| v == *n).unwrap_or(false),
            PositiveLabel::Bool(b) => value.trim().eq_ignore_ascii_case(if *b { "true" } else { "false" }),
        }
    }
}

/// Binarize the label column: `true` marks the positive class.
///
/// Fails with `MissingColumn` when the label column is absent.
pub fn binarize_label(df: &DataFrame, label_col: &str, positive: &PositiveLabel) -> IvResult<Vec<bool>> {
    let col = require_column(df, label_col, "Label")?;

    let labels: Vec<bool> = match col.dtype() {
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| positive.matches_bool(b)).unwrap_or(false))
            .collect(),
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| positive.matches_text(s)).unwrap_or(false))
            .collect(),
        dtype if dtype.is_primitive_numeric() => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| positive.matches_number(n)).unwrap_or(false))
                .collect()
        }
        _ => {
            // Categorical, dates and friends are compared on their text form
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| positive.matches_text(s)).unwrap_or(false))
                .collect()
        }
    };

    Ok(labels)
}

/// Count positive and negative observations in a binarized label vector
pub fn count_label_classes(labels: &[bool]) -> (u64, u64) {
    let bads = labels.iter().filter(|&&b| b).count() as u64;
    (bads, labels.len() as u64 - bads)
}
