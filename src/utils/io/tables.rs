//! Delimited-text table operations
//!
//! Raw extracts are read into [`RawTable`]s whose columns are looked up by
//! header name, since the exports carry irregular, source-specific layouts.
//! Prepared tables are read back with serde by header name. Every table the
//! pipeline writes goes through Arrow: records become a `RecordBatch` and are
//! written by the Arrow CSV writer into a temporary sibling file that is
//! renamed into place once complete.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::csv::WriterBuilder;
use arrow::record_batch::RecordBatch;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::de::DeserializeOwned;

use crate::error::util::{commit_file, safe_create_file, safe_open_file, safe_read_bytes};
use crate::error::{PipelineError, Result, Stage};
use crate::models::ArrowSchema;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// A delimited table held as text cells
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Header labels, trimmed
    pub headers: Vec<String>,
    /// Data rows; rows may be shorter or longer than the header
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    /// Parse a table from any reader; the first row is the header
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::Headers)
            .from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').to_string())
            .collect();

        let rows = csv_reader
            .records()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;

        Ok(Self { headers, rows })
    }

    /// Parse a table from decoded text
    pub fn from_text(text: &str) -> Result<Self> {
        Self::from_reader(text.as_bytes())
    }

    /// Read a UTF-8 table from disk
    pub fn read(path: &Path, purpose: &str) -> Result<Self> {
        log_operation_start("Reading", path);
        let start = Instant::now();
        let file = safe_open_file(path, purpose)?;
        let table = Self::from_reader(file)?;
        log_operation_complete("Read", path, table.len(), Some(start.elapsed()));
        Ok(table)
    }

    /// Number of data rows
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a required column
    pub fn column_index(&self, name: &str, stage: Stage) -> Result<usize> {
        self.headers.iter().position(|h| h == name).ok_or_else(|| {
            PipelineError::parse(
                stage,
                format!(
                    "required column '{name}' not found (columns: {})",
                    self.headers.join(", ")
                ),
            )
        })
    }

    /// Cell of a row, treating cells past the end of a short row as blank
    #[must_use]
    pub fn cell<'a>(row: &'a StringRecord, index: usize) -> &'a str {
        row.get(index).unwrap_or("")
    }
}

/// Decode windows-1252 bytes into text
///
/// Windows-1252 is a superset of Latin-1 for printable text. It differs only
/// in 0x80-0x9F, which ISO-8859-1 leaves as C1 control characters.
#[must_use]
pub fn decode_latin1(bytes: &[u8]) -> String {
    let (text, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    text.into_owned()
}

/// Drop the first `count` non-blank lines of a text, and any blank lines
/// before the line that follows them
///
/// Blank lines do not count towards the preamble, so an export with an empty
/// line inside its preamble still finds its header row.
#[must_use]
pub fn skip_lines(text: &str, count: usize) -> &str {
    let mut rest = text;
    let mut skipped = 0;
    loop {
        let (line, tail) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], &rest[pos + 1..]),
            None => (rest, ""),
        };
        let blank = line.trim().is_empty();
        if !blank && skipped == count {
            return rest;
        }
        if rest.is_empty() {
            return "";
        }
        if !blank {
            skipped += 1;
        }
        rest = tail;
    }
}

/// Read a windows-1252 encoded export whose header follows a fixed preamble
pub fn read_latin1_table(path: &Path, preamble_lines: usize, purpose: &str) -> Result<RawTable> {
    log_operation_start("Reading", path);
    let start = Instant::now();
    let bytes = safe_read_bytes(path, purpose)?;
    let text = decode_latin1(&bytes);
    let table = RawTable::from_text(skip_lines(&text, preamble_lines))?;
    log_operation_complete("Read", path, table.len(), Some(start.elapsed()));
    Ok(table)
}

/// Read a prepared table into typed records, matching columns by header
pub fn read_records<T: DeserializeOwned>(path: &Path, purpose: &str) -> Result<Vec<T>> {
    read_checked_records(path, purpose, &[], Stage::Reporter)
}

/// Read typed records after checking that every `required` column is present
///
/// A missing column is a parse error of `stage`, since serde would otherwise
/// read an absent optional column as all-missing.
pub fn read_checked_records<T: DeserializeOwned>(
    path: &Path,
    purpose: &str,
    required: &[&str],
    stage: Stage,
) -> Result<Vec<T>> {
    log_operation_start("Reading", path);
    let start = Instant::now();
    let file = safe_open_file(path, purpose)?;
    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_reader(file);

    let headers = reader.headers()?.clone();
    if let Some(missing) = required
        .iter()
        .find(|name| !headers.iter().any(|h| h == **name))
    {
        return Err(PipelineError::parse(
            stage,
            format!(
                "required column '{missing}' not found in {} (columns: {})",
                path.display(),
                headers.iter().collect::<Vec<_>>().join(", ")
            ),
        ));
    }

    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, csv::Error>>()?;
    log_operation_complete("Read", path, records.len(), Some(start.elapsed()));
    Ok(records)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

/// Write a record batch as CSV with a header row
pub fn write_batch(batch: &RecordBatch, path: &Path) -> Result<()> {
    let temp = temp_path(path);
    {
        let file = safe_create_file(&temp, "writing table")?;
        let mut writer = WriterBuilder::new().with_header(true).build(file);
        writer.write(batch)?;
    }
    commit_file(&temp, path)
}

/// Write typed records as CSV, columns in struct field order
pub fn write_table<T: ArrowSchema>(records: &[T], path: &Path) -> Result<()> {
    let batch = T::to_record_batch(records)?;
    write_batch(&batch, path)?;
    log::info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Write a text report
pub fn write_text(content: &str, path: &Path) -> Result<()> {
    let temp = temp_path(path);
    {
        let mut file = safe_create_file(&temp, "writing report")?;
        file.write_all(content.as_bytes())
            .map_err(|e| PipelineError::io("Failed to write report", &temp, e))?;
    }
    commit_file(&temp, path)?;
    log::info!("Wrote {}", path.display());
    Ok(())
}
