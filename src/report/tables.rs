//! Regression result tables

use std::path::Path;

use crate::algorithm::logit::{CoefficientEstimate, MarginalEffect};
use crate::error::Result;
use crate::utils::io::write_table;

/// Write the coefficient table, one row per coefficient with the intercept first
pub fn write_coefficients(coefficients: &[CoefficientEstimate], path: &Path) -> Result<()> {
    write_table(coefficients, path)
}

/// Write the average marginal effects table
pub fn write_marginal_effects(effects: &[MarginalEffect], path: &Path) -> Result<()> {
    write_table(effects, path)
}

/// Log the coefficient table in a readable layout
pub fn log_coefficients(coefficients: &[CoefficientEstimate]) {
    log::info!(
        "{:<26} {:>10} {:>10} {:>8} {:>8} {:>10} {:>10}",
        "variable", "coef", "std_err", "z", "P>|z|", "[0.025", "0.975]"
    );
    for c in coefficients {
        log::info!(
            "{:<26} {:>10.4} {:>10.4} {:>8.3} {:>8.3} {:>10.4} {:>10.4}",
            c.variable, c.coef, c.std_err, c.z, c.pval, c.ci_lower, c.ci_upper
        );
    }
}
