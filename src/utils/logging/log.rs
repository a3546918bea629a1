//! Log lines shared by the pipeline stages
//!
//! Table reads and row filters are reported in one format, so the log of a
//! run reads as a sequence of table shapes.

use std::path::Path;
use std::time::Duration;

use crate::error::Stage;

/// Announce an operation on a file
pub fn log_operation_start(operation: &str, path: &Path) {
    log::info!("{operation} {}", path.display());
}

/// Report the row count of a completed operation on a file
pub fn log_operation_complete(operation: &str, path: &Path, rows: usize, elapsed: Option<Duration>) {
    match elapsed {
        Some(elapsed) => log::info!("{operation} {rows} rows from {} in {elapsed:.2?}", path.display()),
        None => log::info!("{operation} {rows} rows from {}", path.display()),
    }
}

/// Report rows removed by a filter; nothing is logged when none were removed
pub fn log_rows_dropped(stage: Stage, reason: &str, dropped: usize, before: usize) {
    if dropped > 0 {
        log::warn!("{stage}: dropped {dropped} of {before} rows ({reason})");
    }
}

/// Log the start of a numbered pipeline step
pub fn log_step(step: usize, total: usize, description: &str) {
    log::info!("[Step {step}/{total}] {description}");
}

/// Log a warning, naming the file it concerns if any
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => log::warn!("{message}: {}", path.display()),
        None => log::warn!("{message}"),
    }
}
