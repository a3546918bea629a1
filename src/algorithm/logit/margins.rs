//! Average marginal effects
//!
//! For a logit the marginal effect of regressor `j` at one observation is
//! `β_j · p(1 - p)`. Averaging over the estimation sample gives the AME.
//! Standard errors come from the delta method with the analytic Jacobian of
//! the AMEs with respect to every coefficient.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use super::design::DesignMatrix;
use super::fit::{LogitModel, Z_95, two_sided_p_value};
use crate::error::{PipelineError, Result};
use crate::models::ArrowSchema;

/// One row of the marginal-effects table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginalEffect {
    pub variable: String,
    /// Average derivative of the recurrence probability
    pub dydx: f64,
    pub std_err: f64,
    pub z: f64,
    pub pval: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl ArrowSchema for MarginalEffect {}

/// Average marginal effects of every regressor, intercept excluded
pub fn average_marginal_effects(
    model: &LogitModel,
    design: &DesignMatrix,
) -> Result<Vec<MarginalEffect>> {
    let n = design.n_obs();
    let k = design.n_params();
    if n == 0 {
        return Err(PipelineError::Model(
            "marginal effects need at least one observation".to_string(),
        ));
    }
    if model.params.len() != k {
        return Err(PipelineError::Model(format!(
            "model has {} coefficients but the design matrix has {k} columns",
            model.params.len()
        )));
    }

    let probabilities = model.fitted(design);
    let slopes = probabilities.map(|p| p * (1.0 - p));
    let curvature = probabilities.zip_map(&slopes, |p, s| s * (1.0 - 2.0 * p));

    let mean_slope = slopes.mean();
    // d mean(s) / d β, one entry per coefficient
    let slope_gradient = design.x.tr_mul(&curvature) / n as f64;

    // Row r of the Jacobian belongs to regressor r + 1
    let jacobian = DMatrix::from_fn(k - 1, k, |r, c| {
        let j = r + 1;
        let direct = if c == j { mean_slope } else { 0.0 };
        direct + model.params[j] * slope_gradient[c]
    });
    let covariance = &jacobian * &model.covariance * jacobian.transpose();

    (1..k)
        .map(|j| {
            let dydx = model.params[j] * mean_slope;
            let std_err = covariance[(j - 1, j - 1)].max(0.0).sqrt();
            let z = dydx / std_err;
            Ok(MarginalEffect {
                variable: model.names[j].clone(),
                dydx,
                std_err,
                z,
                pval: two_sided_p_value(z)?,
                ci_lower: dydx - Z_95 * std_err,
                ci_upper: dydx + Z_95 * std_err,
            })
        })
        .collect()
}
