//! Progress indicators for dataset loading and segment runs (indicatif)

use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a dataset is read into memory
pub fn loading_spinner(path: &Path) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg} ({elapsed})")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(style);
    pb.set_message(format!("Loading {}", path.display()));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Bar ticking once per requested segment; the message shows the current one
pub fn segment_progress(segments: usize) -> ProgressBar {
    let pb = ProgressBar::new(segments as u64);
    let style = ProgressStyle::default_bar()
        .template("   Segments [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb
}

/// Finish a progress indicator with a success message
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✅ {}", message));
}

/// Finish a progress indicator with a warning message
pub fn finish_with_warning(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("⚠️  {}", message));
}
