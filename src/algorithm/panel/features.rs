//! Lagged feature construction
//!
//! Observations are ordered by (country, year) and the arms-transfer
//! predictors are lagged by one observation within each country. The lag is
//! positional: with years 2010, 2012 and 2014 the 2014 row takes the 2012
//! value. Rows lacking a lag, a control or the outcome are dropped.

use std::cmp::Ordering;

use itertools::Itertools;

use crate::error::{PipelineError, Result, Stage};
use crate::models::{ModelingRow, PanelObservation};
use crate::utils::logging::log_rows_dropped;

/// A value usable by the model; NaN and infinities count as missing
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn by_country_year(a: &&PanelObservation, b: &&PanelObservation) -> Ordering {
    a.country.cmp(&b.country).then(a.year.cmp(&b.year))
}

/// Coerce an outcome value to {0, 1}
fn outcome_flag(value: f64, observation: &PanelObservation) -> Result<u8> {
    if value == 0.0 {
        Ok(0)
    } else if value == 1.0 {
        Ok(1)
    } else {
        Err(PipelineError::invariant(
            Stage::FeatureBuilder,
            format!(
                "recurrence must be 0 or 1, found {value} at ({}, {})",
                observation.country, observation.year
            ),
        ))
    }
}

/// Build complete-case modeling rows with lagged arms predictors
pub fn build_features(observations: &[PanelObservation]) -> Result<Vec<ModelingRow>> {
    let mut sorted: Vec<&PanelObservation> = observations.iter().collect();
    sorted.sort_by(by_country_year);

    let mut rows = Vec::with_capacity(sorted.len());
    let mut countries = 0usize;

    for (_, group) in &sorted.into_iter().chunk_by(|o| o.country.clone()) {
        countries += 1;
        let mut previous: Option<&PanelObservation> = None;

        for observation in group {
            let new_lag = present(previous.and_then(|p| p.new_arms_tiv));
            let second_hand_lag = present(previous.and_then(|p| p.second_hand_arms_tiv));
            previous = Some(observation);

            let (
                Some(new_arms_tiv_lag),
                Some(second_hand_arms_tiv_lag),
                Some(gov_effect),
                Some(log_gdp_pc),
                Some(log_pop),
                Some(recurrence),
            ) = (
                new_lag,
                second_hand_lag,
                present(observation.gov_effect),
                present(observation.log_gdp_pc),
                present(observation.log_pop),
                present(observation.recurrence),
            )
            else {
                continue;
            };

            rows.push(ModelingRow {
                country: observation.country.clone(),
                year: observation.year,
                second_hand_arms_tiv_lag,
                new_arms_tiv_lag,
                gov_effect,
                log_gdp_pc,
                log_pop,
                recurrence: outcome_flag(recurrence, observation)?,
            });
        }
    }

    log_rows_dropped(
        Stage::FeatureBuilder,
        "missing lag, control or outcome",
        observations.len() - rows.len(),
        observations.len(),
    );
    log::info!(
        "Built {} modeling rows from {} observations across {countries} countries",
        rows.len(),
        observations.len()
    );

    Ok(rows)
}
