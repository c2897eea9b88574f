//! Terminal styling for the ivrank CLI

use console::{style, Emoji};
use std::path::Path;

use crate::pipeline::BinningConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("ivrank").cyan().bold(),
        style("Information Value ranking by segment").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print the configuration card for a run
pub fn print_config(input: &Path, label: &str, output: Option<&Path>, binning: &BinningConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!("    │ {:<width$}│", style("⚙️  Configuration").cyan().bold(), width = box_width - 3);
    println!("    ├{}┤", line);
    println!("    │  {}Input:  {:<42}│", FOLDER, truncate_path(input, 40));
    println!("    │  {}Label:  {:<42}│", TARGET, truncate_string(label, 40));
    if let Some(output) = output {
        println!("    │  {}Output: {:<42}│", SAVE, truncate_path(output, 40));
    }
    println!("    ├{}┤", line);
    println!(
        "    │  {}Binning: {:<41}│",
        CHART,
        style(format!(
            "{} / {} bins / min leaf {:.0}%",
            binning.method,
            binning.n_bins,
            binning.min_leaf_frac * 100.0
        ))
        .yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {}{}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {}{}", WARN, style(message).yellow());
}

/// Print dataset shape after loading
pub fn print_dataset_stats(rows: usize, cols: usize, memory_mb: f64) {
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", style(rows).yellow().bold());
    println!("      Columns: {}", style(cols).yellow().bold());
    println!("      Estimated memory: {:.2} MB", memory_mb);
}

/// Print the final completion message
pub fn print_completion(message: &str) {
    println!();
    println!("    {}{}", ROCKET, style(message).green().bold());
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
