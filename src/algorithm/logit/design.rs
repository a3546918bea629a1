//! Design matrix for the recurrence logit
//!
//! Column 0 is the intercept, followed by the regressors in
//! [`Feature::ALL`] order. Building the matrix is the last point where a
//! missing value can be caught, so every cell is checked to be finite.

use nalgebra::{DMatrix, DVector};

use crate::error::{PipelineError, Result, Stage};
use crate::models::{Feature, ModelingRow};

/// Name of the intercept coefficient
pub const INTERCEPT: &str = "const";

/// Regressor matrix with intercept and binary outcome vector
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    /// Coefficient names, intercept first
    pub names: Vec<String>,
    /// n x (features + 1) regressors
    pub x: DMatrix<f64>,
    /// n outcomes in {0, 1}
    pub y: DVector<f64>,
}

impl DesignMatrix {
    /// Build the design matrix, failing fast on any residual missing value
    pub fn from_rows(rows: &[ModelingRow]) -> Result<Self> {
        for (index, row) in rows.iter().enumerate() {
            for feature in Feature::ALL {
                let value = row.feature(feature);
                if !value.is_finite() {
                    return Err(PipelineError::invariant(
                        Stage::ModelFitter,
                        format!(
                            "missing value remains in feature matrix: {feature} = {value} at row {index} ({}, {})",
                            row.country, row.year
                        ),
                    ));
                }
            }
            if row.recurrence > 1 {
                return Err(PipelineError::invariant(
                    Stage::ModelFitter,
                    format!(
                        "outcome must be 0 or 1, found {} at row {index} ({}, {})",
                        row.recurrence, row.country, row.year
                    ),
                ));
            }
        }

        let names = std::iter::once(INTERCEPT.to_string())
            .chain(Feature::ALL.iter().map(|f| f.name().to_string()))
            .collect();

        let x = DMatrix::from_fn(rows.len(), Feature::ALL.len() + 1, |i, j| {
            if j == 0 {
                1.0
            } else {
                rows[i].feature(Feature::ALL[j - 1])
            }
        });
        let y = DVector::from_iterator(rows.len(), rows.iter().map(|r| f64::from(r.recurrence)));

        Ok(Self { names, x, y })
    }

    /// Number of observations
    #[must_use]
    pub fn n_obs(&self) -> usize {
        self.x.nrows()
    }

    /// Number of coefficients including the intercept
    #[must_use]
    pub fn n_params(&self) -> usize {
        self.x.ncols()
    }

    /// Column index of a feature in the matrix
    #[must_use]
    pub fn column_of(feature: Feature) -> usize {
        Feature::ALL
            .iter()
            .position(|f| *f == feature)
            .map_or(0, |p| p + 1)
    }

    /// Sample mean of every feature column, intercept excluded
    #[must_use]
    pub fn feature_means(&self) -> Vec<f64> {
        (1..self.n_params()).map(|j| self.x.column(j).mean()).collect()
    }

    /// Observed (min, max) of a feature, or `None` for an empty sample
    #[must_use]
    pub fn feature_range(&self, feature: Feature) -> Option<(f64, f64)> {
        if self.n_obs() == 0 {
            return None;
        }
        let column = self.x.column(Self::column_of(feature));
        Some((column.min(), column.max()))
    }
}
