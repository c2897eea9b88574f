//! Weight of Evidence and Information Value aggregation
//!
//! Rows are grouped by (feature, bin) and counted per outcome class. The
//! bad/good totals used as denominators are taken over every grouped row of
//! the aggregation, so all features recorded into one [`WoeAggregator`]
//! share the same denominators and their IVs are directly comparable.

use std::collections::HashMap;

use serde::Serialize;

use super::binning::FeatureBins;
use super::error::{IvError, IvResult};

/// Floor applied to bad/good shares before taking the logarithm
pub const MIN_SHARE: f64 = 1e-6;

/// Statistics for one (feature, bin) group
#[derive(Debug, Clone, Serialize)]
pub struct BinStatistic {
    pub feature: String,
    pub bin: String,
    /// Rows in the bin
    pub count: u64,
    /// Positive-class rows in the bin
    pub bad_count: u64,
    /// Negative-class rows in the bin
    pub good_count: u64,
    /// bad_count / count
    pub bad_rate: f64,
    /// Share of the feature's rows falling in this bin
    pub count_pct: f64,
    /// Share of global goods, clipped to [`MIN_SHARE`]
    pub pct_goods: f64,
    /// Share of global bads, clipped to [`MIN_SHARE`]
    pub pct_bads: f64,
    /// ln(pct_goods / pct_bads)
    pub woe: f64,
    /// (pct_goods - pct_bads) * woe
    pub iv_contribution: f64,
}

/// Total Information Value of one feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureIv {
    pub feature: String,
    pub iv: f64,
}

/// Result of an aggregation
#[derive(Debug, Clone, Serialize)]
pub struct IvTable {
    /// Per-bin rows, feature by feature in recording order
    pub bins: Vec<BinStatistic>,
    /// Per-feature IV, descending; ties keep recording order
    pub features: Vec<FeatureIv>,
    /// Global positive-class total used as denominator
    pub total_bads: u64,
    /// Global negative-class total used as denominator
    pub total_goods: u64,
}

impl IvTable {
    /// IV of a feature by name
    pub fn feature_iv(&self, feature: &str) -> Option<f64> {
        self.features.iter().find(|f| f.feature == feature).map(|f| f.iv)
    }

    /// Per-bin rows of one feature
    pub fn bins_for<'a>(&'a self, feature: &'a str) -> impl Iterator<Item = &'a BinStatistic> + 'a {
        self.bins.iter().filter(move |b| b.feature == feature)
    }
}

#[derive(Debug, Default)]
struct BinCounts {
    label: String,
    count: u64,
    bads: u64,
}

#[derive(Debug)]
struct FeatureCounts {
    name: String,
    bins: Vec<BinCounts>,
    bin_index: HashMap<String, usize>,
}

impl FeatureCounts {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bins: Vec::new(),
            bin_index: HashMap::new(),
        }
    }

    fn bin_mut(&mut self, label: &str) -> &mut BinCounts {
        let idx = match self.bin_index.get(label) {
            Some(&idx) => idx,
            None => {
                let idx = self.bins.len();
                self.bins.push(BinCounts {
                    label: label.to_string(),
                    ..Default::default()
                });
                self.bin_index.insert(label.to_string(), idx);
                idx
            }
        };
        &mut self.bins[idx]
    }
}

/// Accumulates (feature, bin, outcome) observations
#[derive(Debug, Default)]
pub struct WoeAggregator {
    features: Vec<FeatureCounts>,
    feature_index: HashMap<String, usize>,
}

impl WoeAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    fn feature_mut(&mut self, feature: &str) -> &mut FeatureCounts {
        let idx = match self.feature_index.get(feature) {
            Some(&idx) => idx,
            None => {
                let idx = self.features.len();
                self.features.push(FeatureCounts::new(feature));
                self.feature_index.insert(feature.to_string(), idx);
                idx
            }
        };
        &mut self.features[idx]
    }

    /// Record a single observation
    pub fn record(&mut self, feature: &str, bin: &str, bad: bool) {
        let counts = self.feature_mut(feature).bin_mut(bin);
        counts.count += 1;
        counts.bads += u64::from(bad);
    }

    /// Record every row of a binned feature against the binarized label.
    ///
    /// Bins are registered in [`FeatureBins`] order so the per-bin output
    /// follows value order with `MISSING` last.
    pub fn add_feature(&mut self, feature: &str, bins: &FeatureBins, labels: &[bool]) -> IvResult<()> {
        if bins.len() != labels.len() {
            return Err(IvError::invalid_config(format!(
                "feature '{}' has {} binned rows but the label has {}",
                feature,
                bins.len(),
                labels.len()
            )));
        }

        let entry = self.feature_mut(feature);
        let slots: Vec<usize> = bins
            .labels()
            .iter()
            .map(|label| {
                entry.bin_mut(label);
                entry.bin_index[label.as_str()]
            })
            .collect();

        for (&code, &bad) in bins.assignments().iter().zip(labels) {
            let counts = &mut entry.bins[slots[code]];
            counts.count += 1;
            counts.bads += u64::from(bad);
        }
        Ok(())
    }

    /// Number of distinct features recorded so far
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Global (bads, goods) over every recorded row
    pub fn totals(&self) -> (u64, u64) {
        self.features
            .iter()
            .flat_map(|f| f.bins.iter())
            .fold((0, 0), |(bads, goods), b| (bads + b.bads, goods + b.count - b.bads))
    }

    /// Compute per-bin and per-feature statistics.
    ///
    /// Fails with `DegenerateLabelDistribution` when either global total is
    /// zero.
    pub fn finish(self) -> IvResult<IvTable> {
        let (total_bads, total_goods) = self.totals();
        if total_bads == 0 || total_goods == 0 {
            return Err(IvError::DegenerateLabelDistribution {
                bads: total_bads,
                goods: total_goods,
            });
        }

        let mut bins = Vec::new();
        let mut features = Vec::with_capacity(self.features.len());

        for feature in self.features {
            let feature_total: u64 = feature.bins.iter().map(|b| b.count).sum();
            let mut iv = 0.0;

            for counts in feature.bins {
                let goods = counts.count - counts.bads;
                let (pct_bads, pct_goods, woe, iv_contribution) =
                    calculate_woe_iv(counts.bads, goods, total_bads, total_goods);
                iv += iv_contribution;

                bins.push(BinStatistic {
                    feature: feature.name.clone(),
                    bin: counts.label,
                    count: counts.count,
                    bad_count: counts.bads,
                    good_count: goods,
                    bad_rate: ratio(counts.bads, counts.count),
                    count_pct: ratio(counts.count, feature_total),
                    pct_goods,
                    pct_bads,
                    woe,
                    iv_contribution,
                });
            }

            features.push(FeatureIv {
                feature: feature.name,
                iv,
            });
        }

        // Stable: equal IVs keep recording order
        features.sort_by(|a, b| b.iv.total_cmp(&a.iv));

        Ok(IvTable {
            bins,
            features,
            total_bads,
            total_goods,
        })
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Clipped shares, WoE and IV contribution of one bin.
///
/// Returns `(pct_bads, pct_goods, woe, iv_contribution)`.
pub fn calculate_woe_iv(bads: u64, goods: u64, total_bads: u64, total_goods: u64) -> (f64, f64, f64, f64) {
    let pct_bads = ratio(bads, total_bads).max(MIN_SHARE);
    let pct_goods = ratio(goods, total_goods).max(MIN_SHARE);

    // WoE = ln(%good / %bad), positive means lower risk
    let woe = (pct_goods / pct_bads).ln();
    let iv_contribution = (pct_goods - pct_bads) * woe;

    (pct_bads, pct_goods, woe, iv_contribution)
}
