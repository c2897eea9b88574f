//! Feature discretization
//!
//! Turns one raw feature column into a bin label per row using one of three
//! strategies: equal-frequency (quantile), equal-width, or the leaves of a
//! single-feature decision tree fitted against the binary label. Values that
//! cannot be read as finite numbers always land in the reserved `MISSING` bin.

use polars::prelude::*;

use super::config::{BinningConfig, BinningMethod};
use super::error::{IvError, IvResult};
use super::loader::coerce_numeric;

/// Reserved bin for null / non-numeric values
pub const MISSING_BIN: &str = "MISSING";

/// Label used when every valid value is identical
pub const SINGLE_BIN: &str = "ALL";

/// Minimum impurity decrease for a tree split to be worth taking
const MIN_SPLIT_GAIN: f64 = 1e-12;

/// Decimal places used when rendering interval edges
const EDGE_PRECISION: usize = 6;

/// Bin assignment for every row of one feature
///
/// `labels` lists the observed bins: value bins in ascending order, then
/// `MISSING` if any row is missing. `assignments[row]` indexes into `labels`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureBins {
    labels: Vec<String>,
    assignments: Vec<usize>,
}

impl FeatureBins {
    /// Build from candidate labels and per-row candidate codes.
    ///
    /// Unobserved candidates are dropped and `None` rows go to `MISSING`.
    fn from_codes(candidates: Vec<String>, codes: Vec<Option<usize>>) -> Self {
        let mut observed = vec![false; candidates.len()];
        let mut any_missing = false;
        for code in &codes {
            match code {
                Some(c) => observed[*c] = true,
                None => any_missing = true,
            }
        }

        let mut remap = vec![usize::MAX; candidates.len()];
        let mut labels = Vec::new();
        for (idx, label) in candidates.into_iter().enumerate() {
            if observed[idx] {
                remap[idx] = labels.len();
                labels.push(label);
            }
        }

        let missing_idx = labels.len();
        if any_missing {
            labels.push(MISSING_BIN.to_string());
        }

        let assignments = codes
            .into_iter()
            .map(|code| code.map(|c| remap[c]).unwrap_or(missing_idx))
            .collect();

        Self { labels, assignments }
    }

    fn all_missing(rows: usize) -> Self {
        Self::from_codes(Vec::new(), vec![None; rows])
    }

    /// Observed bin labels
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Index into [`labels`](Self::labels) for every row
    pub fn assignments(&self) -> &[usize] {
        &self.assignments
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Number of observed bins, `MISSING` included
    pub fn bin_count(&self) -> usize {
        self.labels.len()
    }

    pub fn has_missing(&self) -> bool {
        self.labels.last().map(|l| l == MISSING_BIN).unwrap_or(false)
    }

    /// Number of observed bins holding valid values
    pub fn value_bin_count(&self) -> usize {
        self.labels.len() - usize::from(self.has_missing())
    }

    /// Bin label of one row
    pub fn label_of(&self, row: usize) -> &str {
        &self.labels[self.assignments[row]]
    }

    /// Bin label of every row, in row order
    pub fn row_labels(&self) -> Vec<&str> {
        self.assignments.iter().map(|&a| self.labels[a].as_str()).collect()
    }
}

/// Bin a raw feature column.
///
/// The column is coerced to numbers first; `labels` is the binarized label
/// vector and is only required by the tree strategy.
pub fn bin_column(col: &Column, labels: Option<&[bool]>, config: &BinningConfig) -> IvResult<FeatureBins> {
    let values = coerce_numeric(col)?;
    bin_values(&values, labels, config)
}

/// Bin already-coerced feature values.
pub fn bin_values(
    values: &[Option<f64>],
    labels: Option<&[bool]>,
    config: &BinningConfig,
) -> IvResult<FeatureBins> {
    config.validate()?;

    if config.method.requires_label() {
        match labels {
            None => {
                return Err(IvError::invalid_config(
                    "a label vector must be provided when method='tree'",
                ))
            }
            Some(labels) if labels.len() != values.len() => {
                return Err(IvError::invalid_config(format!(
                    "label vector has {} rows but the feature has {}",
                    labels.len(),
                    values.len()
                )))
            }
            Some(_) => {}
        }
    }

    let valid: Vec<(usize, f64)> = values
        .iter()
        .enumerate()
        .filter_map(|(row, v)| v.filter(|x| x.is_finite()).map(|x| (row, x)))
        .collect();

    if valid.is_empty() {
        return Ok(FeatureBins::all_missing(values.len()));
    }

    let (candidates, valid_codes) = match (config.method, labels) {
        (BinningMethod::Tree, Some(labels)) => {
            let min_samples_leaf = ((valid.len() as f64 * config.min_leaf_frac).floor() as usize).max(1);
            tree_bins(&valid, labels, config.n_bins, min_samples_leaf)
        }
        (BinningMethod::Width, _) => {
            let (min, max) = valid
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), (_, v)| (lo.min(*v), hi.max(*v)));
            let edges = width_edges(min, max, config.n_bins);
            interval_bins(&valid, &edges)
        }
        _ => {
            let mut sorted: Vec<f64> = valid.iter().map(|(_, v)| *v).collect();
            sorted.sort_by(|a, b| a.total_cmp(b));
            let edges = quantile_edges(&sorted, config.n_bins);
            interval_bins(&valid, &edges)
        }
    };

    let mut codes: Vec<Option<usize>> = vec![None; values.len()];
    for ((row, _), code) in valid.iter().zip(valid_codes) {
        codes[*row] = Some(code);
    }

    Ok(FeatureBins::from_codes(candidates, codes))
}

// ============================================================================
// Interval binning (quantile / width)
// ============================================================================

/// Empirical quantiles at `i / n_bins` with linear interpolation, deduplicated
fn quantile_edges(sorted: &[f64], n_bins: usize) -> Vec<f64> {
    let last = (sorted.len() - 1) as f64;
    let mut edges: Vec<f64> = (0..=n_bins)
        .map(|i| {
            let pos = last * i as f64 / n_bins as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        })
        .collect();
    edges.dedup();
    edges
}

/// `n_bins + 1` evenly spaced edges from `min` to `max`, deduplicated
fn width_edges(min: f64, max: f64, n_bins: usize) -> Vec<f64> {
    let step = (max - min) / n_bins as f64;
    let mut edges: Vec<f64> = (0..n_bins).map(|i| min + step * i as f64).collect();
    edges.push(max);
    edges.dedup();
    edges
}

/// Assign valid values to right-closed intervals between `edges`.
///
/// Fewer than two distinct edges means every valid value is identical and a
/// single `ALL` bin is produced.
fn interval_bins(valid: &[(usize, f64)], edges: &[f64]) -> (Vec<String>, Vec<usize>) {
    if edges.len() < 2 {
        tracing::debug!("all valid values identical, collapsing to a single bin");
        return (vec![SINGLE_BIN.to_string()], vec![0; valid.len()]);
    }

    // Right edges of every bin except the last; values above them fall through
    let inner = &edges[1..edges.len() - 1];
    let codes = valid
        .iter()
        .map(|(_, v)| inner.partition_point(|e| e < v))
        .collect();

    (interval_labels(edges), codes)
}

/// `[lo, hi]` for the first interval, `(lo, hi]` afterwards
fn interval_labels(edges: &[f64]) -> Vec<String> {
    let mut rendered: Vec<String> = edges.iter().map(|e| format_edge(*e)).collect();
    if rendered.windows(2).any(|w| w[0] == w[1]) {
        // Rounding merged two distinct edges; fall back to exact values
        rendered = edges.iter().map(|e| e.to_string()).collect();
    }

    rendered
        .windows(2)
        .enumerate()
        .map(|(i, w)| {
            let open = if i == 0 { '[' } else { '(' };
            format!("{}{}, {}]", open, w[0], w[1])
        })
        .collect()
}

fn format_edge(value: f64) -> String {
    let text = format!("{:.*}", EDGE_PRECISION, value);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

// ============================================================================
// Tree binning
// ============================================================================

/// Gini impurity of a node: 2 * p * (1 - p) for a binary outcome
fn gini_impurity(bads: f64, goods: f64) -> f64 {
    let total = bads + goods;
    if total == 0.0 {
        return 0.0;
    }
    let p = bads / total;
    2.0 * p * (1.0 - p)
}

/// Find the split of a value-sorted node that maximizes the Gini decrease.
///
/// Returns `(split_index, gain)` where `split_index` is where the right child
/// starts. Both children must hold at least `min_samples` rows and the split
/// must fall between two distinct values.
fn find_best_split(sorted_pairs: &[(f64, bool)], min_samples: usize) -> Option<(usize, f64)> {
    let n = sorted_pairs.len();
    if n < 2 * min_samples {
        return None;
    }

    let total_bads = sorted_pairs.iter().filter(|(_, bad)| *bad).count() as f64;
    let total_goods = n as f64 - total_bads;
    let parent_gini = gini_impurity(total_bads, total_goods);
    if parent_gini == 0.0 {
        return None;
    }

    let mut best_gain = MIN_SPLIT_GAIN;
    let mut best_split_idx = None;
    let mut left_bads = 0.0f64;

    for i in 0..n - 1 {
        if sorted_pairs[i].1 {
            left_bads += 1.0;
        }

        let left_count = i + 1;
        let right_count = n - left_count;
        if left_count < min_samples || right_count < min_samples {
            continue;
        }

        if sorted_pairs[i].0 == sorted_pairs[i + 1].0 {
            continue;
        }

        let left_goods = left_count as f64 - left_bads;
        let right_bads = total_bads - left_bads;
        let right_goods = total_goods - left_goods;

        let left_prop = left_count as f64 / n as f64;
        let right_prop = right_count as f64 / n as f64;
        let weighted_child_gini = left_prop * gini_impurity(left_bads, left_goods)
            + right_prop * gini_impurity(right_bads, right_goods);

        let gain = parent_gini - weighted_child_gini;
        if gain > best_gain {
            best_gain = gain;
            best_split_idx = Some(i + 1);
        }
    }

    best_split_idx.map(|idx| (idx, best_gain))
}

/// A tree node covering `sorted_pairs[start..end]`
#[derive(Debug, Clone)]
struct TreeNode {
    id: usize,
    start: usize,
    end: usize,
    /// Absolute split index and gain weighted by node size, if splittable
    split: Option<(usize, f64)>,
}

impl TreeNode {
    fn new(id: usize, start: usize, end: usize, sorted_pairs: &[(f64, bool)], min_samples: usize) -> Self {
        let split = find_best_split(&sorted_pairs[start..end], min_samples)
            .map(|(local, gain)| (start + local, gain * (end - start) as f64));
        Self { id, start, end, split }
    }
}

/// Grow a tree best-first and return its leaves in ascending value order.
///
/// The splittable leaf with the largest size-weighted impurity decrease is
/// expanded until `max_leaves` leaves exist or nothing can be split. Node ids
/// follow creation order: root is 0, each split creates the next two ids.
fn grow_tree(sorted_pairs: &[(f64, bool)], max_leaves: usize, min_samples: usize) -> Vec<TreeNode> {
    let mut leaves = vec![TreeNode::new(0, 0, sorted_pairs.len(), sorted_pairs, min_samples)];
    let mut next_id = 1;

    while leaves.len() < max_leaves {
        let mut best: Option<(usize, f64)> = None;
        for (idx, leaf) in leaves.iter().enumerate() {
            if let Some((_, gain)) = leaf.split {
                if best.map(|(_, g)| gain > g).unwrap_or(true) {
                    best = Some((idx, gain));
                }
            }
        }

        let Some((idx, _)) = best else { break };
        let parent = leaves.remove(idx);
        let Some((split_at, _)) = parent.split else { break };

        leaves.push(TreeNode::new(next_id, parent.start, split_at, sorted_pairs, min_samples));
        leaves.push(TreeNode::new(next_id + 1, split_at, parent.end, sorted_pairs, min_samples));
        next_id += 2;
    }

    leaves.sort_by_key(|leaf| leaf.start);
    leaves
}

/// Assign valid values to the leaves of a fitted single-feature tree
fn tree_bins(
    valid: &[(usize, f64)],
    labels: &[bool],
    max_leaves: usize,
    min_samples_leaf: usize,
) -> (Vec<String>, Vec<usize>) {
    // Stable sort keeps row order within equal values
    let mut order: Vec<usize> = (0..valid.len()).collect();
    order.sort_by(|&a, &b| valid[a].1.total_cmp(&valid[b].1));

    let sorted_pairs: Vec<(f64, bool)> = order
        .iter()
        .map(|&i| (valid[i].1, labels[valid[i].0]))
        .collect();

    let leaves = grow_tree(&sorted_pairs, max_leaves, min_samples_leaf);
    tracing::debug!(
        leaves = leaves.len(),
        max_leaves,
        min_samples_leaf,
        "tree binning fitted"
    );

    let mut codes = vec![0usize; valid.len()];
    for (leaf_idx, leaf) in leaves.iter().enumerate() {
        for &i in &order[leaf.start..leaf.end] {
            codes[i] = leaf_idx;
        }
    }

    let names = leaves.iter().map(|leaf| format!("leaf_{}", leaf.id)).collect();
    (names, codes)
}
