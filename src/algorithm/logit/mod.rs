//! Logistic regression of conflict recurrence
//!
//! [`DesignMatrix`] turns modeling rows into regressors, [`fit_logit`]
//! estimates the coefficients and [`average_marginal_effects`] converts them
//! to the probability scale.

pub mod design;
pub mod fit;
pub mod margins;

pub use design::{DesignMatrix, INTERCEPT};
pub use fit::{CoefficientEstimate, FitSummary, LogitModel, Z_95, fit_logit, sigmoid, two_sided_p_value};
pub use margins::{MarginalEffect, average_marginal_effects};
