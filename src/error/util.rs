//! File access with path-aware errors
//!
//! Helpers that open, read and create files while attaching the file path
//! and purpose to any IO failure.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{PipelineError, Result};

/// Open an existing regular file, naming what it was needed for on failure
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    let kind = match fs::metadata(path) {
        Ok(meta) if meta.is_file() => None,
        Ok(_) => Some((io::ErrorKind::InvalidInput, "is not a regular file")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Some((io::ErrorKind::NotFound, "does not exist"))
        }
        Err(_) => None,
    };
    if let Some((kind, problem)) = kind {
        return Err(PipelineError::io(
            format!("{purpose} {problem}"),
            path,
            io::Error::from(kind),
        ));
    }

    fs::File::open(path).map_err(|e| PipelineError::io(format!("Cannot open {purpose}"), path, e))
}

/// Safely read a whole file into memory
///
/// Used for inputs that must be decoded before parsing, such as the
/// Latin-1 SIPRI export.
pub fn safe_read_bytes(path: &Path, purpose: &str) -> Result<Vec<u8>> {
    let mut file = safe_open_file(path, purpose)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)
        .map_err(|e| PipelineError::io(format!("Cannot read {purpose}"), path, e))?;
    Ok(content)
}

/// Create a file for writing, creating the parent directory when missing
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                PipelineError::io(format!("Cannot create the directory for {purpose}"), parent, e)
            })?;
        }
    }

    fs::File::create(path)
        .map_err(|e| PipelineError::io(format!("Cannot create {purpose}"), path, e))
}

/// Move a fully written temporary file to its final name
pub fn commit_file(temp_path: &Path, final_path: &Path) -> Result<()> {
    fs::rename(temp_path, final_path)
        .map_err(|e| PipelineError::io("Cannot move the finished output into place", final_path, e))
}
