//! Domain models for the country-year panel
//!
//! Typed tables passed between pipeline stages. Each normalizer produces a
//! `Vec` of one source model; the panel assembler joins them into
//! [`PanelRow`]s and the feature builder turns [`PanelObservation`]s into
//! [`ModelingRow`]s.

pub mod panel;
pub mod sipri;
pub mod traits;
pub mod ucdp;
pub mod wdi;

// Re-export commonly used types
pub use panel::{Feature, MODEL_INPUT_COLUMNS, ModelingRow, PanelObservation, PanelRow};
pub use sipri::SipriRecord;
pub use traits::{ArrowSchema, CountryYear, ensure_unique_keys};
pub use ucdp::UcdpRecord;
pub use wdi::WdiRecord;
