//! ivrank: Information Value ranking CLI
//!
//! Bins candidate features, computes WoE/IV against a binary label and
//! writes per-segment rankings plus a markdown report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;
use polars::prelude::DataFrame;

use ivrank::cli::{
    confirm_overwrite, evaluation_config, segment_run_config, select_segments, BinningArgs, Cli, Commands,
    DataArgs, ReportArgs, SegmentArgs,
};
use ivrank::pipeline::{
    dataset_stats, distinct_segments, evaluate, load_dataset, run_segments_on_frame, ReturnType,
};
use ivrank::report::{
    artifact_path, display_bin_statistics, display_feature_ranking, export_evaluation_json, generate_report,
    package_report, SegmentRunSummary,
};
use ivrank::utils::progress::{finish_with_success, loading_spinner};
use ivrank::utils::{init_tracing, styling::*};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Evaluate {
            data,
            binning,
            return_type,
            export_json,
        } => run_evaluate(&data, &binning, return_type, export_json.as_deref()),
        Commands::Segments {
            data,
            binning,
            segments,
        } => run_segments(&data, &binning, &segments).map(|_| ()),
        Commands::Report {
            output_dir,
            segments,
            report,
        } => run_report(&output_dir, &segments, &report),
        Commands::Run {
            data,
            binning,
            segments,
            report,
        } => match run_segments(&data, &binning, &segments)? {
            Some(requested) => run_report(&segments.output_dir, &requested, &report),
            None => Ok(()),
        },
    }
}

/// Load the input table behind a spinner and print its shape
fn load_table(data: &DataArgs) -> Result<DataFrame> {
    let started = Instant::now();
    let spinner = loading_spinner(&data.input);
    let df = load_dataset(&data.input, data.infer_schema_length())?.collect()?;
    finish_with_success(&spinner, &format!("Loaded in {:.1?}", started.elapsed()));

    let (rows, cols, memory_mb) = dataset_stats(&df);
    print_dataset_stats(rows, cols, memory_mb);
    tracing::info!(path = %data.input.display(), rows, cols, "dataset loaded");
    Ok(df)
}

fn run_evaluate(
    data: &DataArgs,
    binning: &BinningArgs,
    return_type: ReturnType,
    export_json: Option<&Path>,
) -> Result<()> {
    let config = evaluation_config(data, binning, return_type);

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&data.input, &data.label, export_json, &config.binning);

    print_step_header(1, "Load dataset");
    let df = load_table(data)?;

    print_step_header(2, "Bin features and compute IV");
    let started = Instant::now();
    let result = evaluate(&df, &config)?;
    print_success(&format!(
        "Evaluated with {} bads / {} goods in {:.1?}",
        result.total_bads,
        result.total_goods,
        started.elapsed()
    ));

    if let Some(bins) = &result.per_bin {
        display_bin_statistics(bins);
    }
    if let Some(features) = &result.per_feature {
        display_feature_ranking(features);
    }

    if let Some(path) = export_json {
        export_evaluation_json(&result, &config, &data.input, path)?;
        print_success(&format!("Results exported to {}", path.display()));
    }

    print_completion("IV evaluation complete!");
    Ok(())
}

/// Resolve the segment list, run it and return the requested segments.
///
/// `None` means the user cancelled.
fn run_segments(data: &DataArgs, binning: &BinningArgs, args: &SegmentArgs) -> Result<Option<Vec<String>>> {
    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(&data.input, &data.label, Some(&args.output_dir), &binning.binning_config());

    print_step_header(1, "Load dataset");
    let df = load_table(data)?;

    print_step_header(2, "Select segments");
    let segments = if !args.segments.is_empty() {
        args.segments.clone()
    } else {
        let available = distinct_segments(&df, &args.segment_col)?;
        print_info(&format!(
            "Found {} distinct value(s) in '{}'",
            available.len(),
            args.segment_col
        ));
        if args.no_confirm {
            available
        } else {
            select_segments(&available)?
        }
    };

    if segments.is_empty() {
        bail!("No segments selected");
    }

    let existing = segments
        .iter()
        .filter(|s| artifact_path(&args.output_dir, s).exists())
        .count();
    if existing > 0 && !args.no_confirm && !confirm_overwrite(existing)? {
        print_warning("Cancelled by user.");
        return Ok(None);
    }

    print_step_header(3, "Compute IV per segment");
    let config = segment_run_config(data, binning, args, segments.clone());
    let written = run_segments_on_frame(&df, &config)?;

    SegmentRunSummary::new(segments.clone(), written).display();
    print_completion("Segment run complete!");
    Ok(Some(segments))
}

fn run_report(output_dir: &Path, segments: &[String], args: &ReportArgs) -> Result<()> {
    print_step_header(4, "Generate report");

    let renderer = args.chart_format.renderer();
    let report_path = generate_report(output_dir, segments, &args.options(), Some(renderer.as_ref()))?;
    print_success(&format!("Report written to {}", report_path.display()));

    if args.bundle {
        let zip_path: PathBuf = args.bundle_path(output_dir);
        let files = package_report(output_dir, &args.report_name, &zip_path)?;
        print_success(&format!(
            "Bundled {} file(s) into {}",
            files.len(),
            zip_path.display()
        ));
    }

    Ok(())
}
