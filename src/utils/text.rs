//! Coercion of raw text cells into typed values
//!
//! Statistical exports mix numbers with placeholder tokens and free text.
//! These helpers map every cell that is not a clean value to `None` so the
//! normalizers can apply listwise deletion afterwards.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, de::Error as _};

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("valid year pattern"));

/// Token the World Bank uses for a missing observation
pub const MISSING_TOKEN: &str = "..";

/// Cell spellings read as missing, besides blanks and [`MISSING_TOKEN`]
const NA_TOKENS: [&str; 6] = ["na", "n/a", "nan", "null", "none", "<na>"];

/// Whether a cell holds no value
#[must_use]
pub fn is_missing(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || trimmed == MISSING_TOKEN
        || NA_TOKENS.iter().any(|token| trimmed.eq_ignore_ascii_case(token))
}

/// Extract the first run of four digits, e.g. `2015 [YR2015]` or `2017; 2018`
#[must_use]
pub fn extract_year(text: &str) -> Option<i32> {
    YEAR_PATTERN
        .find(text)
        .and_then(|m| m.as_str().parse::<i32>().ok())
}

/// Parse a numeric cell; missing tokens, text and non-finite values are `None`
#[must_use]
pub fn parse_numeric(text: &str) -> Option<f64> {
    if is_missing(text) {
        return None;
    }
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a year cell written either as an integer or an integral float
#[must_use]
pub fn parse_year(text: &str) -> Option<i32> {
    let trimmed = text.trim();
    if let Ok(year) = trimmed.parse::<i32>() {
        return Some(year);
    }
    let value = parse_numeric(trimmed)?;
    if value.fract() == 0.0 && value >= f64::from(i32::MIN) && value <= f64::from(i32::MAX) {
        Some(value as i32)
    } else {
        None
    }
}

/// Parse a binary flag cell
///
/// Blank cells are missing. Booleans map to 0/1 and numbers are returned
/// as-is so callers can reject values outside {0, 1} with their own stage.
pub fn parse_flag(text: &str) -> Result<Option<f64>, String> {
    if is_missing(text) {
        return Ok(None);
    }
    let trimmed = text.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "true" => return Ok(Some(1.0)),
        "false" => return Ok(Some(0.0)),
        _ => {}
    }
    trimmed
        .parse::<f64>()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .map_err(|_| format!("'{trimmed}' is not a binary flag"))
}

/// Serde adapter for year columns
pub fn deserialize_year<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_year(&raw).ok_or_else(|| D::Error::custom(format!("'{raw}' is not a year")))
}

/// Serde adapter for optional numeric columns, see [`parse_numeric`]
pub fn deserialize_optional_numeric<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_numeric))
}

/// Serde adapter for optional binary flag columns
pub fn deserialize_optional_flag<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        Some(text) => parse_flag(&text).map_err(D::Error::custom),
        None => Ok(None),
    }
}
