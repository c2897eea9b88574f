//! Feature evaluation: bin every feature, then aggregate WoE/IV against the label

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;

use super::binning::{bin_column, FeatureBins};
use super::config::EvaluationConfig;
use super::error::{IvError, IvResult};
use super::loader::require_column;
use super::target::{binarize_label, count_label_classes};
use super::woe::{BinStatistic, FeatureIv, WoeAggregator};

/// Tables produced by [`evaluate`], filled according to the requested return type
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_bin: Option<Vec<BinStatistic>>,
    /// Sorted by IV descending
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_feature: Option<Vec<FeatureIv>>,
    pub total_bads: u64,
    pub total_goods: u64,
}

/// Resolve the feature columns to evaluate.
///
/// An explicit list is checked against the table (`MissingColumn` for the
/// first absent name); otherwise every column not in `exclude` is used in
/// table order. An empty result is `NoFeaturesSelected`.
pub fn resolve_features(df: &DataFrame, requested: Option<&[String]>, exclude: &[&str]) -> IvResult<Vec<String>> {
    let features: Vec<String> = match requested {
        Some(names) => {
            for name in names {
                require_column(df, name, "Feature")?;
            }
            names.to_vec()
        }
        None => df
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .filter(|name| !exclude.contains(&name.as_str()))
            .collect(),
    };

    if features.is_empty() {
        return Err(IvError::NoFeaturesSelected);
    }
    Ok(features)
}

/// Compute per-bin and/or per-feature IV for one table.
///
/// Any feature that fails to bin aborts the whole evaluation.
pub fn evaluate(df: &DataFrame, config: &EvaluationConfig) -> IvResult<EvaluationResult> {
    let labels = binarize_label(df, &config.label_col, &config.positive_label)?;
    let features = resolve_features(df, config.feature_cols.as_deref(), &[config.label_col.as_str()])?;
    config.binning.validate()?;

    let (bads, goods) = count_label_classes(&labels);
    tracing::debug!(
        rows = df.height(),
        features = features.len(),
        bads,
        goods,
        method = %config.binning.method,
        n_bins = config.binning.n_bins,
        "evaluating features"
    );

    let tree_labels = config.binning.method.requires_label().then_some(labels.as_slice());

    // Binning is independent per feature; collect keeps column order
    let binned: Vec<FeatureBins> = features
        .par_iter()
        .map(|name| {
            let col = df.column(name)?;
            bin_column(col, tree_labels, &config.binning)
        })
        .collect::<IvResult<Vec<_>>>()?;

    let mut aggregator = WoeAggregator::new();
    for (name, bins) in features.iter().zip(&binned) {
        aggregator.add_feature(name, bins, &labels)?;
    }
    let table = aggregator.finish()?;

    if let Some(top) = table.features.first() {
        tracing::debug!(feature = %top.feature, iv = top.iv, "strongest feature");
    }

    Ok(EvaluationResult {
        per_bin: config.return_type.includes_bins().then_some(table.bins),
        per_feature: config.return_type.includes_features().then_some(table.features),
        total_bads: table.total_bads,
        total_goods: table.total_goods,
    })
}
