//! Diagnostic figures
//!
//! Every figure is a standalone PNG drawn with the `plotters` bitmap backend.
//! The data behind the probability curves and the boxplots is computed by
//! [`PredictedCurve`] and [`GroupedDistribution`], which do not render.

use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;

use plotters::prelude::*;

use crate::algorithm::logit::{CoefficientEstimate, DesignMatrix, INTERCEPT, LogitModel, MarginalEffect, Z_95};
use crate::config::PlotConfig;
use crate::error::{PipelineError, Result};
use crate::models::{Feature, ModelingRow};

const GREY: RGBColor = RGBColor(128, 128, 128);

/// Predicted recurrence probability along one feature, others at their sample means
#[derive(Debug, Clone, PartialEq)]
pub struct PredictedCurve {
    pub feature: Feature,
    /// (feature value, predicted probability), in increasing feature order
    pub points: Vec<(f64, f64)>,
}

impl PredictedCurve {
    /// Sweep `feature` over `n_points` evenly spaced values across its observed range
    pub fn compute(
        model: &LogitModel,
        design: &DesignMatrix,
        feature: Feature,
        n_points: usize,
    ) -> Result<Self> {
        let (min, max) = design
            .feature_range(feature)
            .ok_or_else(|| PipelineError::plot(format!("no observations to sweep {feature}")))?;

        let mut profile = design.feature_means();
        let index = DesignMatrix::column_of(feature) - 1;
        let steps = n_points.max(2) - 1;

        let points = (0..=steps)
            .map(|i| {
                let x = min + (max - min) * i as f64 / steps as f64;
                profile[index] = x;
                (x, model.predict(&profile))
            })
            .collect();

        Ok(Self { feature, points })
    }
}

/// Values of one feature split by outcome
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedDistribution {
    pub feature: Feature,
    /// Outcome value and the feature values observed with it, ascending by outcome
    pub groups: Vec<(u8, Vec<f64>)>,
}

impl GroupedDistribution {
    #[must_use]
    pub fn from_rows(rows: &[ModelingRow], feature: Feature) -> Self {
        let mut groups: BTreeMap<u8, Vec<f64>> = BTreeMap::new();
        for row in rows {
            groups.entry(row.recurrence).or_default().push(row.feature(feature));
        }
        Self {
            feature,
            groups: groups.into_iter().collect(),
        }
    }
}

/// Finite span of the values with 5% padding; degenerate spans are widened
fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return -1.0..1.0;
    }
    let span = hi - lo;
    if span < 1e-12 {
        let half = lo.abs().max(1.0) * 0.5;
        return (lo - half)..(hi + half);
    }
    (lo - 0.05 * span)..(hi + 0.05 * span)
}

fn segment_label(labels: &[&str], value: &SegmentValue<usize>) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).map(|s| (*s).to_string()).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Horizontal bars of the average marginal effects with 95% error bars
pub fn render_marginal_effects(
    effects: &[MarginalEffect],
    path: &Path,
    config: &PlotConfig,
) -> Result<()> {
    if effects.is_empty() {
        return Err(PipelineError::plot("no marginal effects to plot"));
    }
    let labels: Vec<&str> = effects.iter().map(|e| e.variable.as_str()).collect();
    let x_range = padded_range(
        effects
            .iter()
            .flat_map(|e| [e.dydx - Z_95 * e.std_err, e.dydx + Z_95 * e.std_err])
            .chain([0.0]),
    );

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(PipelineError::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Average marginal effects", ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(190)
        .build_cartesian_2d(x_range, (0..labels.len()).into_segmented())
        .map_err(PipelineError::plot)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("dy/dx")
        .y_label_formatter(&|v| segment_label(&labels, v))
        .draw()
        .map_err(PipelineError::plot)?;

    chart
        .draw_series(effects.iter().enumerate().map(|(i, e)| {
            let mut bar = Rectangle::new(
                [(0.0, SegmentValue::Exact(i)), (e.dydx, SegmentValue::Exact(i + 1))],
                BLUE.mix(0.5).filled(),
            );
            bar.set_margin(6, 6, 0, 0);
            bar
        }))
        .map_err(PipelineError::plot)?;

    chart
        .draw_series(effects.iter().enumerate().map(|(i, e)| {
            ErrorBar::new_horizontal(
                SegmentValue::CenterOf(i),
                e.dydx - Z_95 * e.std_err,
                e.dydx,
                e.dydx + Z_95 * e.std_err,
                BLACK.filled(),
                8,
            )
        }))
        .map_err(PipelineError::plot)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, SegmentValue::Exact(0)), (0.0, SegmentValue::Last)],
            RED.stroke_width(2),
        )))
        .map_err(PipelineError::plot)?;

    root.present().map_err(PipelineError::plot)?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// Predicted-probability curve of one feature
pub fn render_predicted_curve(curve: &PredictedCurve, path: &Path, config: &PlotConfig) -> Result<()> {
    let x_range = padded_range(curve.points.iter().map(|p| p.0));

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(PipelineError::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Predicted probability of recurrence by {}", curve.feature),
            ("sans-serif", 20),
        )
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, 0f64..1f64)
        .map_err(PipelineError::plot)?;

    chart
        .configure_mesh()
        .x_desc(curve.feature.name())
        .y_desc("Predicted probability of recurrence")
        .draw()
        .map_err(PipelineError::plot)?;

    chart
        .draw_series(LineSeries::new(curve.points.iter().copied(), BLUE.stroke_width(2)))
        .map_err(PipelineError::plot)?;

    root.present().map_err(PipelineError::plot)?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// Forest plot of the coefficients with 95% intervals, intercept excluded
pub fn render_coefficient_plot(
    coefficients: &[CoefficientEstimate],
    path: &Path,
    config: &PlotConfig,
) -> Result<()> {
    let shown: Vec<&CoefficientEstimate> = coefficients
        .iter()
        .filter(|c| c.variable != INTERCEPT)
        .collect();
    if shown.is_empty() {
        return Err(PipelineError::plot("no coefficients besides the intercept to plot"));
    }
    let labels: Vec<&str> = shown.iter().map(|c| c.variable.as_str()).collect();
    let x_range = padded_range(shown.iter().flat_map(|c| [c.ci_lower, c.ci_upper]).chain([0.0]));

    let root = BitMapBackend::new(path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(PipelineError::plot)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Logit coefficients with 95% confidence intervals", ("sans-serif", 20))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(190)
        .build_cartesian_2d(x_range, (0..labels.len()).into_segmented())
        .map_err(PipelineError::plot)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Coefficient")
        .y_label_formatter(&|v| segment_label(&labels, v))
        .draw()
        .map_err(PipelineError::plot)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, SegmentValue::Exact(0)), (0.0, SegmentValue::Last)],
            GREY.stroke_width(1),
        )))
        .map_err(PipelineError::plot)?;

    chart
        .draw_series(shown.iter().enumerate().map(|(i, c)| {
            ErrorBar::new_horizontal(
                SegmentValue::CenterOf(i),
                c.ci_lower,
                c.coef,
                c.ci_upper,
                BLUE.filled(),
                8,
            )
        }))
        .map_err(PipelineError::plot)?;

    chart
        .draw_series(
            shown
                .iter()
                .enumerate()
                .map(|(i, c)| Circle::new((c.coef, SegmentValue::CenterOf(i)), 4, BLUE.filled())),
        )
        .map_err(PipelineError::plot)?;

    root.present().map_err(PipelineError::plot)?;
    log::info!("Saved {}", path.display());
    Ok(())
}

/// Side-by-side boxplots of each distribution by outcome value
pub fn render_distributions(
    distributions: &[GroupedDistribution],
    path: &Path,
    config: &PlotConfig,
) -> Result<()> {
    if distributions.is_empty() || distributions.iter().any(|d| d.groups.is_empty()) {
        return Err(PipelineError::plot("no observations to summarize"));
    }

    let root = BitMapBackend::new(path, (config.width * 3 / 2, config.height)).into_drawing_area();
    root.fill(&WHITE).map_err(PipelineError::plot)?;
    let panels = root.split_evenly((1, distributions.len()));

    for (area, distribution) in panels.iter().zip(distributions) {
        let labels: Vec<String> = distribution.groups.iter().map(|(g, _)| g.to_string()).collect();
        let range = padded_range(distribution.groups.iter().flat_map(|(_, v)| v.iter().copied()));

        let mut chart = ChartBuilder::on(area)
            .caption(distribution.feature.name(), ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(35)
            .y_label_area_size(55)
            .build_cartesian_2d(labels[..].into_segmented(), range.start as f32..range.end as f32)
            .map_err(PipelineError::plot)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("recurrence")
            .y_desc("TIV")
            .draw()
            .map_err(PipelineError::plot)?;

        chart
            .draw_series(distribution.groups.iter().zip(&labels).map(|((_, values), label)| {
                Boxplot::new_vertical(SegmentValue::CenterOf(label), &Quartiles::new(values.as_slice()))
                    .width(40)
                    .style(BLUE)
            }))
            .map_err(PipelineError::plot)?;
    }

    root.present().map_err(PipelineError::plot)?;
    log::info!("Saved {}", path.display());
    Ok(())
}
