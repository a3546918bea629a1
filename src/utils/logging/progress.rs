//! Progress reporting for the end-to-end run
//!
//! Uses the indicatif crate to show one tick per completed pipeline stage.

use indicatif::{ProgressBar, ProgressStyle};

/// Default style for the stage progress bar
pub const DEFAULT_STAGE_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress bar with one position per pipeline stage
#[must_use]
pub fn create_stage_progress_bar(stages: u64, label: Option<&str>) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template(DEFAULT_STAGE_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    let bar = ProgressBar::new(stages).with_style(style);
    if let Some(label) = label {
        bar.set_message(label.to_owned());
    }
    bar
}

/// Stop the bar, replacing its message when one is given
pub fn finish_progress_bar(bar: &ProgressBar, summary: Option<&str>) {
    match summary {
        Some(summary) => bar.finish_with_message(summary.to_owned()),
        None => bar.finish(),
    }
}
