//! Console output utilities
//!
//! This module provides utilities for formatted console output.

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;

use crate::error::Result;

/// Format the first rows of a batch as a bordered table
pub fn format_head(batch: &RecordBatch, num_rows: usize) -> Result<String> {
    let head = batch.slice(0, num_rows.min(batch.num_rows()));
    Ok(pretty_format_batches(&[head])?.to_string())
}

/// Print the shape of a table and a preview of its first rows
pub fn print_table_preview(title: &str, batch: &RecordBatch, num_rows: usize) -> Result<()> {
    println!(
        "{title} shape: ({}, {})",
        batch.num_rows(),
        batch.num_columns()
    );
    println!("{}", format_head(batch, num_rows)?);
    Ok(())
}
