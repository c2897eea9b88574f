//! Terminal tables for IV rankings, per-bin statistics and segment runs

use std::path::PathBuf;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::woe::{BinStatistic, FeatureIv};

/// Conventional reading of an IV value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IvStrength {
    Useless,
    Weak,
    Medium,
    Strong,
    Suspicious,
}

impl IvStrength {
    pub fn from_iv(iv: f64) -> Self {
        if iv < 0.02 {
            IvStrength::Useless
        } else if iv < 0.1 {
            IvStrength::Weak
        } else if iv < 0.3 {
            IvStrength::Medium
        } else if iv <= 0.5 {
            IvStrength::Strong
        } else {
            IvStrength::Suspicious
        }
    }

    fn color(&self) -> Color {
        match self {
            IvStrength::Useless => Color::DarkGrey,
            IvStrength::Weak => Color::White,
            IvStrength::Medium => Color::Cyan,
            IvStrength::Strong => Color::Green,
            IvStrength::Suspicious => Color::Yellow,
        }
    }
}

impl std::fmt::Display for IvStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            IvStrength::Useless => "useless",
            IvStrength::Weak => "weak",
            IvStrength::Medium => "medium",
            IvStrength::Strong => "strong",
            IvStrength::Suspicious => "suspicious",
        };
        write!(f, "{}", label)
    }
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

fn print_section_title(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

/// Ranked feature table (rank, feature, IV, strength)
pub fn feature_iv_table(features: &[FeatureIv]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["#", "Feature", "IV", "Strength"]));

    for (rank, row) in features.iter().enumerate() {
        let strength = IvStrength::from_iv(row.iv);
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(&row.feature),
            Cell::new(format!("{:.4}", row.iv)).set_alignment(CellAlignment::Right),
            Cell::new(strength).fg(strength.color()),
        ]);
    }
    table
}

/// Per-bin statistics table
pub fn bin_statistics_table(bins: &[BinStatistic]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&[
        "Feature", "Bin", "Count", "Bads", "Goods", "Bad rate", "Pop %", "WoE", "IV contrib",
    ]));

    for bin in bins {
        let woe_color = if bin.woe < 0.0 { Color::Red } else { Color::Green };
        table.add_row(vec![
            Cell::new(&bin.feature),
            Cell::new(&bin.bin),
            Cell::new(bin.count).set_alignment(CellAlignment::Right),
            Cell::new(bin.bad_count).set_alignment(CellAlignment::Right),
            Cell::new(bin.good_count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", bin.bad_rate)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", bin.count_pct * 100.0)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", bin.woe))
                .fg(woe_color)
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", bin.iv_contribution)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn display_feature_ranking(features: &[FeatureIv]) {
    print_section_title("📊", "FEATURE IV RANKING");
    print_indented(&feature_iv_table(features));
}

pub fn display_bin_statistics(bins: &[BinStatistic]) {
    print_section_title("🧮", "PER-BIN STATISTICS");
    print_indented(&bin_statistics_table(bins));
}

/// Outcome of a segment run as shown to the user
#[derive(Debug, Default)]
pub struct SegmentRunSummary {
    pub requested: Vec<String>,
    pub artifacts: Vec<PathBuf>,
}

impl SegmentRunSummary {
    pub fn new(requested: Vec<String>, artifacts: Vec<PathBuf>) -> Self {
        Self { requested, artifacts }
    }

    pub fn skipped(&self) -> usize {
        self.requested.len().saturating_sub(self.artifacts.len())
    }

    pub fn display(&self) {
        print_section_title("📋", "SEGMENT RUN SUMMARY");

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(header(&["Metric", "Value"]));
        table.add_row(vec![Cell::new("🎯 Requested segments"), Cell::new(self.requested.len())]);
        table.add_row(vec![
            Cell::new("💾 Artifacts written"),
            Cell::new(self.artifacts.len())
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);
        table.add_row(vec![
            Cell::new("⏭️  Skipped"),
            Cell::new(self.skipped()).fg(if self.skipped() == 0 { Color::White } else { Color::Yellow }),
        ]);
        print_indented(&table);

        if !self.artifacts.is_empty() {
            println!();
            for path in &self.artifacts {
                println!("        {} {}", style("•").dim(), path.display());
            }
        }
    }
}
