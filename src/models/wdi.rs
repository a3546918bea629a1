//! World Bank WDI country-year model
//!
//! One row per (country, year) holding the three governance and economic
//! controls, together with their log transforms.

use serde::{Deserialize, Serialize};

use super::traits::{ArrowSchema, CountryYear};

/// Normalized WDI observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WdiRecord {
    pub country: String,
    pub country_code: String,
    pub year: i32,
    /// Government effectiveness estimate
    pub gov_effect: f64,
    /// GDP per capita, constant 2015 US$
    pub gdp_pc: f64,
    /// Total population
    pub pop: f64,
    /// Natural log of `gdp_pc`
    pub log_gdp_pc: f64,
    /// Natural log of `pop`
    pub log_pop: f64,
}

impl CountryYear for WdiRecord {
    fn country(&self) -> &str {
        &self.country
    }

    fn year(&self) -> i32 {
        self.year
    }
}

impl ArrowSchema for WdiRecord {}
