//! Shared utilities
//!
//! Text coercion for raw cells, delimited-table IO, and logging helpers.

pub mod io;
pub mod logging;
pub mod text;

pub use io::{RawTable, read_records, write_table, write_text};
pub use text::{extract_year, parse_numeric, parse_year};
