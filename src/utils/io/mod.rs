//! IO utilities for file operations
//!
//! This module provides utilities for reading raw delimited extracts and
//! writing the pipeline's tables and reports.

pub mod tables;

// Re-export commonly used functions for convenience
pub use tables::{
    RawTable, decode_latin1, read_checked_records, read_latin1_table, read_records, skip_lines,
    write_batch, write_table, write_text,
};
