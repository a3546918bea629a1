//! Panel assembly
//!
//! Inner-joins the normalized WDI, SIPRI and UCDP tables on (country, year).
//! A key survives only if all three sources carry it. An empty intersection
//! is a valid result and is surfaced through the reported shape.

use rustc_hash::FxHashMap;

use crate::error::{Result, Stage};
use crate::models::{CountryYear, PanelRow, SipriRecord, UcdpRecord, WdiRecord, ensure_unique_keys};

/// Number of columns of an assembled panel row
pub const PANEL_COLUMNS: usize = 11;

/// Index a table by its (country, year) key
fn index_by_key<T: CountryYear>(records: &[T]) -> FxHashMap<(&str, i32), &T> {
    records.iter().map(|r| (r.key(), r)).collect()
}

/// Join the three normalized tables, keeping WDI row order
pub fn assemble_panel(
    wdi: &[WdiRecord],
    sipri: &[SipriRecord],
    ucdp: &[UcdpRecord],
) -> Result<Vec<PanelRow>> {
    let stage = Stage::PanelAssembler;
    ensure_unique_keys(wdi, stage, "WDI")?;
    ensure_unique_keys(sipri, stage, "SIPRI")?;
    ensure_unique_keys(ucdp, stage, "UCDP")?;

    let sipri_by_key = index_by_key(sipri);
    let ucdp_by_key = index_by_key(ucdp);

    let panel: Vec<PanelRow> = wdi
        .iter()
        .filter_map(|w| {
            let arms = sipri_by_key.get(&w.key())?;
            let conflict = ucdp_by_key.get(&w.key())?;
            Some(PanelRow {
                country: w.country.clone(),
                country_code: w.country_code.clone(),
                year: w.year,
                gov_effect: w.gov_effect,
                gdp_pc: w.gdp_pc,
                pop: w.pop,
                log_gdp_pc: w.log_gdp_pc,
                log_pop: w.log_pop,
                new_arms_tiv: arms.new_arms_tiv,
                second_hand_arms_tiv: arms.second_hand_arms_tiv,
                recurrence: conflict.recurrence,
            })
        })
        .collect();

    log::info!("Panel shape: ({}, {PANEL_COLUMNS})", panel.len());
    if panel.is_empty() {
        log::warn!(
            "No country-year is present in all three sources (WDI {}, SIPRI {}, UCDP {})",
            wdi.len(),
            sipri.len(),
            ucdp.len()
        );
    }

    Ok(panel)
}
