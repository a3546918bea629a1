//! Analysis panel and modeling models
//!
//! The analysis panel is the inner join of the three normalized sources.
//! Panel observations are the modeling input, either converted from the
//! panel or read from a pre-built dataset in which any value may be missing.
//! Modeling rows add the lagged arms predictors and hold no missing values.

use std::fmt;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, FieldRef};

use serde::{Deserialize, Serialize};

use super::traits::{ArrowSchema, CountryYear};
use crate::error::Result;
use crate::utils::text::{deserialize_optional_flag, deserialize_optional_numeric, deserialize_year};

/// One country-year present in all three sources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRow {
    pub country: String,
    pub country_code: String,
    pub year: i32,
    pub gov_effect: f64,
    pub gdp_pc: f64,
    pub pop: f64,
    pub log_gdp_pc: f64,
    pub log_pop: f64,
    pub new_arms_tiv: f64,
    pub second_hand_arms_tiv: f64,
    pub recurrence: u8,
}

impl CountryYear for PanelRow {
    fn country(&self) -> &str {
        &self.country
    }

    fn year(&self) -> i32 {
        self.year
    }
}

impl ArrowSchema for PanelRow {}

/// Columns a modeling dataset file must carry
pub const MODEL_INPUT_COLUMNS: [&str; 8] = [
    "country",
    "year",
    "new_arms_tiv",
    "second_hand_arms_tiv",
    "gov_effect",
    "log_gdp_pc",
    "log_pop",
    "recurrence",
];

/// Modeling input row
///
/// Extra columns in a source file are ignored. Blank, `NA`, `NaN` and other
/// non-numeric cells are read as missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelObservation {
    pub country: String,
    #[serde(deserialize_with = "deserialize_year")]
    pub year: i32,
    #[serde(deserialize_with = "deserialize_optional_numeric", default)]
    pub new_arms_tiv: Option<f64>,
    #[serde(deserialize_with = "deserialize_optional_numeric", default)]
    pub second_hand_arms_tiv: Option<f64>,
    #[serde(deserialize_with = "deserialize_optional_numeric", default)]
    pub gov_effect: Option<f64>,
    #[serde(deserialize_with = "deserialize_optional_numeric", default)]
    pub log_gdp_pc: Option<f64>,
    #[serde(deserialize_with = "deserialize_optional_numeric", default)]
    pub log_pop: Option<f64>,
    /// Outcome flag, accepted as 0/1, 0.0/1.0 or true/false in source files
    #[serde(deserialize_with = "deserialize_optional_flag", default)]
    pub recurrence: Option<f64>,
}

impl From<&PanelRow> for PanelObservation {
    fn from(row: &PanelRow) -> Self {
        Self {
            country: row.country.clone(),
            year: row.year,
            new_arms_tiv: Some(row.new_arms_tiv),
            second_hand_arms_tiv: Some(row.second_hand_arms_tiv),
            gov_effect: Some(row.gov_effect),
            log_gdp_pc: Some(row.log_gdp_pc),
            log_pop: Some(row.log_pop),
            recurrence: Some(f64::from(row.recurrence)),
        }
    }
}

impl CountryYear for PanelObservation {
    fn country(&self) -> &str {
        &self.country
    }

    fn year(&self) -> i32 {
        self.year
    }
}

impl ArrowSchema for PanelObservation {
    /// Declared explicitly: the lenient year and flag parsers would trace as text
    fn fields() -> Result<Vec<FieldRef>> {
        let nullable_float = |name: &str| Arc::new(Field::new(name, DataType::Float64, true));
        Ok(vec![
            Arc::new(Field::new("country", DataType::Utf8, false)),
            Arc::new(Field::new("year", DataType::Int32, false)),
            nullable_float("new_arms_tiv"),
            nullable_float("second_hand_arms_tiv"),
            nullable_float("gov_effect"),
            nullable_float("log_gdp_pc"),
            nullable_float("log_pop"),
            nullable_float("recurrence"),
        ])
    }
}

/// Regressors of the recurrence model, in design-matrix order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    SecondHandArmsTivLag,
    NewArmsTivLag,
    GovEffect,
    LogGdpPc,
    LogPop,
}

impl Feature {
    /// All features in the order they enter the model
    pub const ALL: [Self; 5] = [
        Self::SecondHandArmsTivLag,
        Self::NewArmsTivLag,
        Self::GovEffect,
        Self::LogGdpPc,
        Self::LogPop,
    ];

    /// The lagged arms-transfer predictors
    pub const ARMS_LAGS: [Self; 2] = [Self::SecondHandArmsTivLag, Self::NewArmsTivLag];

    /// Column name of the feature
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::SecondHandArmsTivLag => "second_hand_arms_tiv_lag",
            Self::NewArmsTivLag => "new_arms_tiv_lag",
            Self::GovEffect => "gov_effect",
            Self::LogGdpPc => "log_gdp_pc",
            Self::LogPop => "log_pop",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Complete-case observation entering the logit model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelingRow {
    pub country: String,
    pub year: i32,
    /// Second-hand arms TIV of the country's previous observation
    pub second_hand_arms_tiv_lag: f64,
    /// New arms TIV of the country's previous observation
    pub new_arms_tiv_lag: f64,
    pub gov_effect: f64,
    pub log_gdp_pc: f64,
    pub log_pop: f64,
    pub recurrence: u8,
}

impl ModelingRow {
    /// Value of a regressor for this row
    #[must_use]
    pub fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::SecondHandArmsTivLag => self.second_hand_arms_tiv_lag,
            Feature::NewArmsTivLag => self.new_arms_tiv_lag,
            Feature::GovEffect => self.gov_effect,
            Feature::LogGdpPc => self.log_gdp_pc,
            Feature::LogPop => self.log_pop,
        }
    }
}

impl CountryYear for ModelingRow {
    fn country(&self) -> &str {
        &self.country
    }

    fn year(&self) -> i32 {
        self.year
    }
}

impl ArrowSchema for ModelingRow {}
