//! Country-year panel construction and logit analysis of arms transfers and
//! conflict recurrence.
//!
//! Three source extracts (WDI indicators, SIPRI arms transfers and UCDP
//! conflict terminations) are normalized into tables keyed by country and
//! year, joined into an analysis panel, and used to estimate how lagged arms
//! deliveries relate to the recurrence of conflict.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod sources;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{LogitConfig, ModelSource, PipelineConfig, PlotConfig};
pub use error::{PipelineError, Result, Stage};

// Table models
pub use models::{
    ArrowSchema, CountryYear, Feature, ModelingRow, PanelObservation, PanelRow, SipriRecord,
    UcdpRecord, WdiRecord,
};

// Estimation
pub use algorithm::logit::{
    CoefficientEstimate, DesignMatrix, LogitModel, MarginalEffect, average_marginal_effects,
    fit_logit,
};
pub use algorithm::panel::{assemble_panel, build_features};
pub use algorithm::synth::{SynthConfig, generate_observations};

// Stage composition
pub use pipeline::{ModelOutputs, run_all, run_model};
