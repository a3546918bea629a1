//! World Bank WDI normalizer
//!
//! The WDI export is wide: one row per (country, series) and one column per
//! year, labelled like `2015 [YR2015]`. Only three series are kept. They are
//! melted into (country, series, year) cells and pivoted back so that each
//! indicator becomes a column of a (country, country code, year) table.

use std::collections::BTreeMap;

use crate::error::{PipelineError, Result, Stage};
use crate::models::WdiRecord;
use crate::utils::io::RawTable;
use crate::utils::text::{extract_year, parse_numeric};

pub const COUNTRY_NAME_COLUMN: &str = "Country Name";
pub const COUNTRY_CODE_COLUMN: &str = "Country Code";
pub const SERIES_NAME_COLUMN: &str = "Series Name";

pub const GOV_EFFECT_SERIES: &str = "Government Effectiveness: Estimate";
pub const GDP_PC_SERIES: &str = "GDP per capita (constant 2015 US$)";
pub const POPULATION_SERIES: &str = "Population, total";

/// The indicator series retained from the export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    GovEffect,
    GdpPerCapita,
    Population,
}

impl Indicator {
    /// Map a series name to its indicator; other series are not retained
    #[must_use]
    pub fn from_series_name(name: &str) -> Option<Self> {
        match name {
            GOV_EFFECT_SERIES => Some(Self::GovEffect),
            GDP_PC_SERIES => Some(Self::GdpPerCapita),
            POPULATION_SERIES => Some(Self::Population),
            _ => None,
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::GovEffect => 0,
            Self::GdpPerCapita => 1,
            Self::Population => 2,
        }
    }
}

/// Pivot cell accumulator; duplicate observations of a series are averaged
#[derive(Debug, Default, Clone, Copy)]
struct IndicatorCells {
    sums: [f64; 3],
    counts: [u32; 3],
}

impl IndicatorCells {
    fn add(&mut self, indicator: Indicator, value: f64) {
        let slot = indicator.slot();
        self.sums[slot] += value;
        self.counts[slot] += 1;
    }

    fn mean(&self, indicator: Indicator) -> Option<f64> {
        let slot = indicator.slot();
        (self.counts[slot] > 0).then(|| self.sums[slot] / f64::from(self.counts[slot]))
    }
}

/// Natural log of a strictly positive value
pub fn ln_checked(value: f64, column: &str, country: &str, year: i32) -> Result<f64> {
    if value > 0.0 && value.is_finite() {
        Ok(value.ln())
    } else {
        Err(PipelineError::domain(
            Stage::WdiNormalizer,
            format!("ln({column}) is undefined for {value} at ({country}, {year})"),
        ))
    }
}

/// Normalize a wide WDI export into one record per country-year
pub fn normalize(table: &RawTable) -> Result<Vec<WdiRecord>> {
    let stage = Stage::WdiNormalizer;
    let country_idx = table.column_index(COUNTRY_NAME_COLUMN, stage)?;
    let code_idx = table.column_index(COUNTRY_CODE_COLUMN, stage)?;
    let series_idx = table.column_index(SERIES_NAME_COLUMN, stage)?;

    // Every other column whose label carries a year is a value column
    let year_columns: Vec<(usize, i32)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| ![country_idx, code_idx, series_idx].contains(idx))
        .filter_map(|(idx, label)| extract_year(label).map(|year| (idx, year)))
        .collect();

    if year_columns.is_empty() {
        return Err(PipelineError::parse(
            stage,
            "no year columns found in WDI export",
        ));
    }

    let mut cells: BTreeMap<(String, String, i32), IndicatorCells> = BTreeMap::new();
    let mut series_rows = 0usize;

    for row in &table.rows {
        let series = RawTable::cell(row, series_idx).trim();
        let Some(indicator) = Indicator::from_series_name(series) else {
            continue;
        };
        series_rows += 1;

        let country = RawTable::cell(row, country_idx).trim();
        let code = RawTable::cell(row, code_idx).trim();

        for &(idx, year) in &year_columns {
            if let Some(value) = parse_numeric(RawTable::cell(row, idx)) {
                cells
                    .entry((country.to_string(), code.to_string(), year))
                    .or_default()
                    .add(indicator, value);
            }
        }
    }

    log::debug!(
        "Retained {series_rows} of {} WDI series rows across {} year columns",
        table.len(),
        year_columns.len()
    );

    let pivoted = cells.len();
    let mut records = Vec::with_capacity(pivoted);

    for ((country, country_code, year), cell) in cells {
        // Listwise deletion on the three indicators
        let (Some(gov_effect), Some(gdp_pc), Some(pop)) = (
            cell.mean(Indicator::GovEffect),
            cell.mean(Indicator::GdpPerCapita),
            cell.mean(Indicator::Population),
        ) else {
            continue;
        };

        let log_gdp_pc = ln_checked(gdp_pc, "gdp_pc", &country, year)?;
        let log_pop = ln_checked(pop, "pop", &country, year)?;

        records.push(WdiRecord {
            country,
            country_code,
            year,
            gov_effect,
            gdp_pc,
            pop,
            log_gdp_pc,
            log_pop,
        });
    }

    log::info!(
        "WDI: {} complete country-years of {pivoted} pivoted ({} dropped for missing indicators)",
        records.len(),
        pivoted - records.len()
    );

    Ok(records)
}
