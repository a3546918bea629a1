//! UCDP conflict recurrence country-year model

use serde::{Deserialize, Serialize};

use super::traits::{ArrowSchema, CountryYear};

/// Whether any conflict located in a country recurred in a given year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UcdpRecord {
    pub country: String,
    pub year: i32,
    /// 1 if any conflict episode for the country-year recurred, else 0
    pub recurrence: u8,
}

impl CountryYear for UcdpRecord {
    fn country(&self) -> &str {
        &self.country
    }

    fn year(&self) -> i32 {
        self.year
    }
}

impl ArrowSchema for UcdpRecord {}
