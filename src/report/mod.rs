//! Reporting of the fitted model
//!
//! Result tables, the descriptive statistics text and the diagnostic figures.

pub mod descriptive;
pub mod plots;
pub mod tables;

pub use descriptive::{Summary, descriptive_report, value_counts};
pub use plots::{
    GroupedDistribution, PredictedCurve, render_coefficient_plot, render_distributions,
    render_marginal_effects, render_predicted_curve,
};
pub use tables::{log_coefficients, write_coefficients, write_marginal_effects};
