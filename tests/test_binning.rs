//! Tests for the three binning strategies on table columns

use ivrank::pipeline::{
    bin_column, bin_values, binarize_label, BinningConfig, BinningMethod, IvError, PositiveLabel, MISSING_BIN, SINGLE_BIN,
};
use polars::prelude::*;

mod common;
use common::create_test_dataframe;

const METHODS: [BinningMethod; 3] = [BinningMethod::Quantile, BinningMethod::Width, BinningMethod::Tree];

#[test]
fn test_every_row_gets_one_bin_and_missing_iff_null() {
    let df = create_test_dataframe();
    let labels = binarize_label(&df, "label", &PositiveLabel::default()).unwrap();

    for method in METHODS {
        for feature in ["feature_signal", "feature_noise", "feature_missing", "feature_text"] {
            let col = df.column(feature).unwrap();
            let config = BinningConfig::new(method, 4).with_min_leaf_frac(0.1);
            let bins = bin_column(col, Some(&labels), &config).unwrap();

            assert_eq!(bins.len(), df.height(), "{} / {}", method, feature);

            let numeric = col.cast(&DataType::Float64).unwrap();
            for (row, value) in numeric.f64().unwrap().into_iter().enumerate() {
                assert_eq!(
                    bins.label_of(row) == MISSING_BIN,
                    value.is_none(),
                    "{} / {} row {}",
                    method,
                    feature,
                    row
                );
            }
        }
    }
}

#[test]
fn test_value_bins_never_exceed_requested() {
    let df = create_test_dataframe();
    let labels = binarize_label(&df, "label", &PositiveLabel::default()).unwrap();
    let col = df.column("feature_signal").unwrap();

    for method in METHODS {
        for k in 1..=6 {
            let bins = bin_column(col, Some(&labels), &BinningConfig::new(method, k).with_min_leaf_frac(0.0)).unwrap();
            assert!(bins.value_bin_count() <= k, "{} produced {} bins for k={}", method, bins.value_bin_count(), k);
            assert!(bins.value_bin_count() >= 1);
        }
    }
}

#[test]
fn test_quantile_bins_are_balanced() {
    let col = Column::new("x".into(), (1..=12).map(|v| v as f64).collect::<Vec<_>>());
    let bins = bin_column(&col, None, &BinningConfig::new(BinningMethod::Quantile, 4)).unwrap();

    let mut sizes = vec![0usize; bins.bin_count()];
    for &a in bins.assignments() {
        sizes[a] += 1;
    }
    assert_eq!(sizes, vec![3, 3, 3, 3]);
}

#[test]
fn test_identical_values_give_one_non_missing_bin() {
    let col = Column::new("x".into(), [Some(7i64), Some(7), None, Some(7)]);
    for method in [BinningMethod::Quantile, BinningMethod::Width] {
        let bins = bin_column(&col, None, &BinningConfig::new(method, 5)).unwrap();
        assert_eq!(bins.value_bin_count(), 1);
        assert_eq!(bins.labels()[0], SINGLE_BIN);
    }
}

#[test]
fn test_all_unparsable_values_map_to_missing() {
    let col = Column::new("x".into(), ["a", "b", "c"]);
    for method in [BinningMethod::Quantile, BinningMethod::Width] {
        let bins = bin_column(&col, None, &BinningConfig::new(method, 3)).unwrap();
        assert_eq!(bins.labels(), &[MISSING_BIN]);
    }
}

#[test]
fn test_tree_binning_separates_signal() {
    let df = create_test_dataframe();
    let labels = binarize_label(&df, "label", &PositiveLabel::default()).unwrap();
    let col = df.column("feature_signal").unwrap();

    let bins = bin_column(col, Some(&labels), &BinningConfig::new(BinningMethod::Tree, 4).with_min_leaf_frac(0.1)).unwrap();

    // Pure children stop growth after the first split
    assert_eq!(bins.value_bin_count(), 2);
    for (row, &bad) in labels.iter().enumerate() {
        let expected = if bad { "leaf_2" } else { "leaf_1" };
        assert_eq!(bins.label_of(row), expected);
    }
}

#[test]
fn test_tree_without_labels_is_invalid() {
    let df = create_test_dataframe();
    let col = df.column("feature_signal").unwrap();
    let err = bin_column(col, None, &BinningConfig::new(BinningMethod::Tree, 4)).unwrap_err();
    assert!(matches!(err, IvError::InvalidConfiguration(_)));
}

#[test]
fn test_unknown_method_name_is_invalid() {
    let err = "chimerge".parse::<BinningMethod>().unwrap_err();
    assert_eq!(err.kind(), "invalid_configuration");
}

#[test]
fn test_infinite_values_are_missing_for_interval_strategies() {
    let cases: [Vec<Option<f64>>; 2] = [
        vec![Some(1.0), Some(2.0), Some(f64::INFINITY), Some(3.0)],
        vec![Some(f64::NEG_INFINITY), Some(2.0), Some(f64::INFINITY), Some(3.0)],
    ];

    for method in [BinningMethod::Quantile, BinningMethod::Width] {
        for values in &cases {
            let bins = bin_values(values, None, &BinningConfig::new(method, 3)).unwrap();

            for (row, value) in values.iter().enumerate() {
                let finite = value.map(|v| v.is_finite()).unwrap_or(false);
                assert_eq!(bins.label_of(row) == MISSING_BIN, !finite, "{} row {}", method, row);
            }
            for label in bins.labels() {
                assert!(!label.contains("NaN") && !label.contains("inf"), "{} label {}", method, label);
            }
        }
    }

    let bins = bin_values(&cases[0], None, &BinningConfig::new(BinningMethod::Width, 3)).unwrap();
    assert_eq!(bins.value_bin_count(), 3);
    assert_eq!(bins.row_labels(), vec!["[1, 1.666667]", "(1.666667, 2.333333]", "MISSING", "(2.333333, 3]"]);
}

#[test]
fn test_infinite_text_cells_are_missing() {
    let col = Column::new("x".into(), ["1", "2", "inf", "3"]);
    let bins = bin_column(&col, None, &BinningConfig::new(BinningMethod::Width, 3)).unwrap();

    assert_eq!(bins.label_of(2), MISSING_BIN);
    assert_eq!(bins.value_bin_count(), 3);
}
