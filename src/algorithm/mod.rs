//! Algorithm implementations for the recurrence analysis
//!
//! Panel assembly and feature construction, the logit model, and a seeded
//! generator for synthetic modeling data.

pub mod logit;
pub mod panel;
pub mod synth;
