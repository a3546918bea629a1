//! Maximum-likelihood logistic regression
//!
//! Newton-Raphson from a zero start. Each step solves `H * step = gradient`
//! with the Cholesky factor of the information matrix `XᵀWX`. The inverse of
//! that matrix at the optimum is the coefficient covariance.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use super::design::DesignMatrix;
use crate::config::LogitConfig;
use crate::error::{PipelineError, Result};
use crate::models::ArrowSchema;

/// Two-sided 95% normal critical value
pub const Z_95: f64 = 1.96;

/// Numerically stable logistic function
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let exp_x = x.exp();
        exp_x / (1.0 + exp_x)
    }
}

/// ln(1 + e^x) without overflow
fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Two-sided p-value of a z statistic under the standard normal
pub fn two_sided_p_value(z: f64) -> Result<f64> {
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| PipelineError::Model(format!("standard normal unavailable: {e}")))?;
    Ok(2.0 * normal.sf(z.abs()))
}

/// One row of the coefficient table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoefficientEstimate {
    pub variable: String,
    pub coef: f64,
    pub std_err: f64,
    pub z: f64,
    pub pval: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl CoefficientEstimate {
    /// Wald inference for an estimate with the given standard error
    pub fn from_estimate(variable: &str, coef: f64, std_err: f64) -> Result<Self> {
        let z = coef / std_err;
        Ok(Self {
            variable: variable.to_string(),
            coef,
            std_err,
            z,
            pval: two_sided_p_value(z)?,
            ci_lower: coef - Z_95 * std_err,
            ci_upper: coef + Z_95 * std_err,
        })
    }
}

impl ArrowSchema for CoefficientEstimate {}

/// Goodness-of-fit and convergence information
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub n_obs: usize,
    pub iterations: usize,
    pub converged: bool,
    pub log_likelihood: f64,
    /// Log-likelihood of the intercept-only model
    pub null_log_likelihood: f64,
    /// McFadden's pseudo R-squared
    pub pseudo_r2: f64,
}

/// A fitted logit model
#[derive(Debug, Clone, PartialEq)]
pub struct LogitModel {
    /// Coefficient names, intercept first
    pub names: Vec<String>,
    /// Point estimates
    pub params: DVector<f64>,
    /// Inverse information matrix at the estimate
    pub covariance: DMatrix<f64>,
    pub summary: FitSummary,
}

struct NewtonState {
    probabilities: DVector<f64>,
    information: DMatrix<f64>,
    gradient: DVector<f64>,
}

fn newton_state(design: &DesignMatrix, params: &DVector<f64>) -> NewtonState {
    let eta = &design.x * params;
    let probabilities = eta.map(sigmoid);
    let weights = probabilities.map(|p| p * (1.0 - p));

    let mut weighted = design.x.clone();
    for (i, mut row) in weighted.row_iter_mut().enumerate() {
        row *= weights[i];
    }

    NewtonState {
        information: design.x.tr_mul(&weighted),
        gradient: design.x.tr_mul(&(&design.y - &probabilities)),
        probabilities,
    }
}

fn log_likelihood(design: &DesignMatrix, params: &DVector<f64>) -> f64 {
    let eta = &design.x * params;
    eta.iter()
        .zip(design.y.iter())
        .map(|(&e, &y)| y * e - softplus(e))
        .sum()
}

fn null_log_likelihood(y: &DVector<f64>) -> f64 {
    let n = y.len() as f64;
    let mean = y.mean();
    let term = |p: f64, count: f64| if count > 0.0 { count * p.ln() } else { 0.0 };
    term(mean, mean * n) + term(1.0 - mean, (1.0 - mean) * n)
}

/// Fit the logit model by Newton-Raphson
pub fn fit_logit(design: &DesignMatrix, config: &LogitConfig) -> Result<LogitModel> {
    let n = design.n_obs();
    let k = design.n_params();

    if n == 0 {
        return Err(PipelineError::Model("no observations to fit".to_string()));
    }
    if n <= k {
        return Err(PipelineError::Model(format!(
            "{n} observations cannot identify {k} parameters"
        )));
    }
    let positives = design.y.sum();
    if positives == 0.0 || positives == n as f64 {
        return Err(PipelineError::Model(
            "outcome has no variation; every observation has the same recurrence".to_string(),
        ));
    }

    let mut params = DVector::zeros(k);
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iter {
        iterations += 1;
        let state = newton_state(design, &params);
        let cholesky = state.information.cholesky().ok_or_else(|| {
            PipelineError::Model(format!(
                "information matrix is singular at iteration {iterations}; regressors may be collinear or the outcome separated"
            ))
        })?;
        let step = cholesky.solve(&state.gradient);
        params += &step;

        log::debug!(
            "Newton iteration {iterations}: max |step| = {:e}, log-likelihood = {:.6}",
            step.amax(),
            log_likelihood(design, &params)
        );

        if !params.iter().all(|p| p.is_finite()) {
            return Err(PipelineError::Model(format!(
                "estimates diverged at iteration {iterations}"
            )));
        }
        if step.amax() < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        log::warn!(
            "Logit did not converge within {} iterations; estimates may be unreliable",
            config.max_iter
        );
    }

    let state = newton_state(design, &params);
    if state
        .probabilities
        .iter()
        .zip(design.y.iter())
        .all(|(p, y)| (p - y).abs() < 1e-8)
    {
        return Err(PipelineError::Model(
            "perfect separation: fitted probabilities reproduce the outcome".to_string(),
        ));
    }

    let covariance = state
        .information
        .cholesky()
        .ok_or_else(|| PipelineError::Model("information matrix is singular at the estimate".to_string()))?
        .inverse();

    let log_likelihood = log_likelihood(design, &params);
    let null_log_likelihood = null_log_likelihood(&design.y);
    let summary = FitSummary {
        n_obs: n,
        iterations,
        converged,
        log_likelihood,
        null_log_likelihood,
        pseudo_r2: 1.0 - log_likelihood / null_log_likelihood,
    };

    log::info!(
        "Logit fit: {n} observations, {iterations} iterations, converged = {converged}, log-likelihood = {log_likelihood:.4}, pseudo R² = {:.4}",
        summary.pseudo_r2
    );

    Ok(LogitModel {
        names: design.names.clone(),
        params,
        covariance,
        summary,
    })
}

impl LogitModel {
    /// Standard errors of the coefficients
    #[must_use]
    pub fn std_errors(&self) -> DVector<f64> {
        self.covariance.diagonal().map(f64::sqrt)
    }

    /// Coefficient table, intercept first
    pub fn coefficients(&self) -> Result<Vec<CoefficientEstimate>> {
        let std_errors = self.std_errors();
        self.names
            .iter()
            .enumerate()
            .map(|(j, name)| CoefficientEstimate::from_estimate(name, self.params[j], std_errors[j]))
            .collect()
    }

    /// Predicted recurrence probability for feature values in model order
    #[must_use]
    pub fn predict(&self, features: &[f64]) -> f64 {
        let eta = self.params[0]
            + features
                .iter()
                .zip(self.params.iter().skip(1))
                .map(|(x, b)| x * b)
                .sum::<f64>();
        sigmoid(eta)
    }

    /// Fitted probabilities for every row of a design matrix
    #[must_use]
    pub fn fitted(&self, design: &DesignMatrix) -> DVector<f64> {
        (&design.x * &self.params).map(sigmoid)
    }
}
