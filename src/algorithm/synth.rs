//! Synthetic modeling data
//!
//! Generates a seeded country-year dataset in the `synthbs.csv` layout. The
//! recurrence of each observation depends on the country's new arms
//! deliveries in the previous year, so a correctly lagged model recovers a
//! positive coefficient on `new_arms_tiv_lag`.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::logit::sigmoid;
use crate::models::PanelObservation;

/// Parameters of the synthetic data generator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthConfig {
    pub countries: usize,
    pub start_year: i32,
    pub years: usize,
    pub seed: u64,
    /// Log-odds change of recurrence per unit of last year's new arms TIV
    pub new_arms_effect: f64,
    /// Probability that any single covariate value is blanked out
    pub missing_rate: f64,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            countries: 40,
            start_year: 2000,
            years: 15,
            seed: 42,
            new_arms_effect: 0.08,
            missing_rate: 0.02,
        }
    }
}

impl fmt::Display for SynthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} countries x {} years from {}, seed {}, new arms effect {}",
            self.countries, self.years, self.start_year, self.seed, self.new_arms_effect
        )
    }
}

/// Mean of the uniform new arms TIV draw, used to center the effect
const MEAN_NEW_TIV: f64 = 20.0;

struct CountryProfile {
    gov_effect: f64,
    log_gdp_pc: f64,
    log_pop: f64,
}

fn maybe_missing(rng: &mut StdRng, value: f64, rate: f64) -> Option<f64> {
    if rng.random_bool(rate) { None } else { Some(value) }
}

/// Generate observations sorted by (country, year)
#[must_use]
pub fn generate_observations(config: &SynthConfig) -> Vec<PanelObservation> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let rate = config.missing_rate.clamp(0.0, 1.0);
    let mut observations = Vec::with_capacity(config.countries * config.years);

    for c in 0..config.countries {
        let country = format!("Country {c:03}");
        let profile = CountryProfile {
            gov_effect: rng.random_range(-2.0..1.5),
            log_gdp_pc: rng.random_range(5.5..10.5),
            log_pop: rng.random_range(13.0..19.0),
        };
        let mut previous_new = MEAN_NEW_TIV;

        for (offset, year) in (config.start_year..).take(config.years).enumerate() {
            let new_arms_tiv = if rng.random_bool(0.2) {
                0.0
            } else {
                rng.random_range(0.0..2.0 * MEAN_NEW_TIV)
            };
            let second_hand_arms_tiv = rng.random_range(0.0..15.0);
            let gov_effect = profile.gov_effect + rng.random_range(-0.2..0.2);
            let log_gdp_pc = profile.log_gdp_pc + 0.02 * offset as f64;
            let log_pop = profile.log_pop + 0.01 * offset as f64;

            let eta = -0.5 + config.new_arms_effect * (previous_new - MEAN_NEW_TIV)
                - 0.3 * gov_effect
                - 0.1 * (log_gdp_pc - 8.0);
            let recurrence = if rng.random_bool(sigmoid(eta)) { 1.0 } else { 0.0 };

            observations.push(PanelObservation {
                country: country.clone(),
                year,
                new_arms_tiv: maybe_missing(&mut rng, new_arms_tiv, rate),
                second_hand_arms_tiv: maybe_missing(&mut rng, second_hand_arms_tiv, rate),
                gov_effect: maybe_missing(&mut rng, gov_effect, rate),
                log_gdp_pc: maybe_missing(&mut rng, log_gdp_pc, rate),
                log_pop: Some(log_pop),
                recurrence: Some(recurrence),
            });
            previous_new = new_arms_tiv;
        }
    }

    log::info!(
        "Generated {} synthetic observations ({config})",
        observations.len()
    );

    observations
}
