//! SIPRI arms-import country-year model

use serde::{Deserialize, Serialize};

use super::traits::{ArrowSchema, CountryYear};

/// Delivered arms imports of one recipient in one year, split by weapon status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SipriRecord {
    /// Recipient country
    pub country: String,
    pub year: i32,
    /// Summed TIV of newly produced weapons
    pub new_arms_tiv: f64,
    /// Summed TIV of second-hand weapons
    pub second_hand_arms_tiv: f64,
}

impl CountryYear for SipriRecord {
    fn country(&self) -> &str {
        &self.country
    }

    fn year(&self) -> i32 {
        self.year
    }
}

impl ArrowSchema for SipriRecord {}
