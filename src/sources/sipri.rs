//! SIPRI arms-transfer normalizer
//!
//! Each row of the trade register export is one delivery to a recipient.
//! Deliveries are classified as new or second-hand from their free-text
//! status, summed per recipient-year, and pivoted into one column per class.
//! The register has no import/export flag; every recipient is an importer.

use std::collections::BTreeMap;

use crate::error::{Result, Stage};
use crate::models::SipriRecord;
use crate::utils::io::RawTable;
use crate::utils::text::{extract_year, parse_numeric};

pub const RECIPIENT_COLUMN: &str = "Recipient";
pub const DELIVERY_YEAR_COLUMN: &str = "Year(s) of delivery";
pub const DELIVERED_TIV_COLUMN: &str = "SIPRI TIV of delivered weapons";
pub const STATUS_COLUMN: &str = "status";

/// Class of a delivery derived from its status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Newly produced weapons (flag 0)
    New,
    /// Second-hand weapons (flag 1)
    SecondHand,
    /// Neither; the delivery is excluded
    Unclassified,
}

impl StatusClass {
    /// The second-hand flag, undefined for unclassified deliveries
    #[must_use]
    pub fn flag(self) -> Option<u8> {
        match self {
            Self::New => Some(0),
            Self::SecondHand => Some(1),
            Self::Unclassified => None,
        }
    }
}

/// Classify a status field; "second hand" takes precedence over "new"
#[must_use]
pub fn classify_status(status: &str) -> StatusClass {
    let status = status.to_lowercase();
    if status.contains("second hand") {
        StatusClass::SecondHand
    } else if status.contains("new") {
        StatusClass::New
    } else {
        StatusClass::Unclassified
    }
}

/// Deliveries excluded during cleaning, counted by first failing field
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DroppedDeliveries {
    pub missing_recipient: usize,
    pub missing_year: usize,
    pub unclassified: usize,
    pub missing_tiv: usize,
    /// TIV carried by unclassified deliveries that had a numeric TIV
    pub unclassified_tiv: f64,
}

impl DroppedDeliveries {
    #[must_use]
    pub fn total(&self) -> usize {
        self.missing_recipient + self.missing_year + self.unclassified + self.missing_tiv
    }
}

/// Normalize a SIPRI export into delivered TIV per recipient-year
pub fn normalize(table: &RawTable) -> Result<Vec<SipriRecord>> {
    let (records, dropped) = normalize_with_report(table)?;

    if dropped.unclassified > 0 {
        log::warn!(
            "SIPRI: excluded {} deliveries with unclassified status (TIV {:.1}); totals may be understated",
            dropped.unclassified,
            dropped.unclassified_tiv
        );
    }
    log::info!(
        "SIPRI: {} recipient-years from {} deliveries ({} excluded: {} no recipient, {} no year, {} no TIV)",
        records.len(),
        table.len(),
        dropped.total(),
        dropped.missing_recipient,
        dropped.missing_year,
        dropped.missing_tiv
    );

    Ok(records)
}

/// Normalize a SIPRI export and report which deliveries were excluded
pub fn normalize_with_report(table: &RawTable) -> Result<(Vec<SipriRecord>, DroppedDeliveries)> {
    let stage = Stage::SipriNormalizer;
    let recipient_idx = table.column_index(RECIPIENT_COLUMN, stage)?;
    let year_idx = table.column_index(DELIVERY_YEAR_COLUMN, stage)?;
    let tiv_idx = table.column_index(DELIVERED_TIV_COLUMN, stage)?;
    let status_idx = table.column_index(STATUS_COLUMN, stage)?;

    // (importer, year) -> [new, second hand]
    let mut totals: BTreeMap<(String, i32), [f64; 2]> = BTreeMap::new();
    let mut dropped = DroppedDeliveries::default();

    for row in &table.rows {
        let importer = RawTable::cell(row, recipient_idx).trim();
        let year = extract_year(RawTable::cell(row, year_idx));
        let class = classify_status(RawTable::cell(row, status_idx));
        let tiv = parse_numeric(RawTable::cell(row, tiv_idx));

        if importer.is_empty() {
            dropped.missing_recipient += 1;
            continue;
        }
        let Some(year) = year else {
            dropped.missing_year += 1;
            continue;
        };
        let Some(flag) = class.flag() else {
            dropped.unclassified += 1;
            dropped.unclassified_tiv += tiv.unwrap_or(0.0);
            continue;
        };
        let Some(tiv) = tiv else {
            dropped.missing_tiv += 1;
            continue;
        };

        totals.entry((importer.to_string(), year)).or_insert([0.0; 2])[usize::from(flag)] += tiv;
    }

    let records = totals
        .into_iter()
        .map(|((country, year), [new, second_hand])| SipriRecord {
            country,
            year,
            new_arms_tiv: new,
            second_hand_arms_tiv: second_hand,
        })
        .collect();

    Ok((records, dropped))
}
