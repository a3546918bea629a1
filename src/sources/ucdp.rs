//! UCDP conflict termination normalizer
//!
//! The termination dataset has one row per conflict episode. Episodes are
//! collapsed to country-years, where recurrence is 1 if any episode located
//! in that country-year recurred.

use std::collections::BTreeMap;

use crate::error::{PipelineError, Result, Stage};
use crate::models::UcdpRecord;
use crate::utils::io::RawTable;
use crate::utils::logging::log_rows_dropped;
use crate::utils::text::{parse_flag, parse_year};

pub const LOCATION_COLUMN: &str = "location";
pub const YEAR_COLUMN: &str = "year";
pub const RECUR_COLUMN: &str = "recur";

/// Normalize conflict episodes into one recurrence flag per country-year
pub fn normalize(table: &RawTable) -> Result<Vec<UcdpRecord>> {
    let stage = Stage::UcdpNormalizer;
    let location_idx = table.column_index(LOCATION_COLUMN, stage)?;
    let year_idx = table.column_index(YEAR_COLUMN, stage)?;
    let recur_idx = table.column_index(RECUR_COLUMN, stage)?;

    let mut groups: BTreeMap<(String, i32), Option<u8>> = BTreeMap::new();
    let mut missing_key = 0usize;

    for (line, row) in table.rows.iter().enumerate() {
        let location = RawTable::cell(row, location_idx).trim();
        let Some(year) = parse_year(RawTable::cell(row, year_idx)) else {
            missing_key += 1;
            continue;
        };
        if location.is_empty() {
            missing_key += 1;
            continue;
        }

        let recur = parse_flag(RawTable::cell(row, recur_idx))
            .map_err(|e| PipelineError::parse(stage, format!("row {}: {e}", line + 1)))?;
        let recur = match recur {
            Some(v) if v == 0.0 => Some(0u8),
            Some(v) if v == 1.0 => Some(1u8),
            Some(v) => {
                return Err(PipelineError::parse(
                    stage,
                    format!("row {}: recur must be 0 or 1, found {v}", line + 1),
                ));
            }
            None => None,
        };

        let entry = groups.entry((location.to_string(), year)).or_insert(None);
        *entry = (*entry).max(recur);
    }

    let grouped = groups.len();
    let records: Vec<UcdpRecord> = groups
        .into_iter()
        .filter_map(|((country, year), recurrence)| {
            recurrence.map(|recurrence| UcdpRecord {
                country,
                year,
                recurrence,
            })
        })
        .collect();

    log_rows_dropped(stage, "no location or year", missing_key, table.len());
    log_rows_dropped(
        stage,
        "no observed recurrence flag",
        grouped - records.len(),
        grouped,
    );
    log::info!(
        "UCDP: {} country-years from {} episodes",
        records.len(),
        table.len()
    );

    Ok(records)
}
