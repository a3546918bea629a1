//! Descriptive statistics of the modeling sample
//!
//! Summaries of the lagged arms predictors and the outcome frequencies,
//! rendered as the plain-text report written to `descriptive_stats.txt`.

use std::fmt::Write as _;

use itertools::Itertools;
use rustc_hash::FxHashMap;

use crate::models::{Feature, ModelingRow};

/// Count, moments and quartiles of one numeric column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Row labels of a summary column
const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Quantile of sorted values by linear interpolation between order statistics
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    sorted[lower] + (sorted[upper] - sorted[lower]) * (position - lower as f64)
}

impl Summary {
    /// Summarize the finite values of a column; `None` when there are none
    #[must_use]
    pub fn of(values: &[f64]) -> Option<Self> {
        let sorted: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .sorted_by(f64::total_cmp)
            .collect();
        let count = sorted.len();
        if count == 0 {
            return None;
        }

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count > 1 {
            let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (count - 1) as f64).sqrt()
        } else {
            f64::NAN
        };

        Some(Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }

    /// Values in [`STAT_LABELS`] order
    fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Outcome values with their frequencies, most frequent first
#[must_use]
pub fn value_counts(rows: &[ModelingRow]) -> Vec<(u8, usize)> {
    let mut counts: FxHashMap<u8, usize> = FxHashMap::default();
    for row in rows {
        *counts.entry(row.recurrence).or_default() += 1;
    }
    counts
        .into_iter()
        .sorted_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)))
        .collect()
}

/// Render the descriptive statistics report
#[must_use]
pub fn descriptive_report(rows: &[ModelingRow]) -> String {
    let columns: Vec<(Feature, Option<Summary>)> = Feature::ARMS_LAGS
        .iter()
        .map(|&feature| {
            let values: Vec<f64> = rows.iter().map(|r| r.feature(feature)).collect();
            (feature, Summary::of(&values))
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .map(|(feature, _)| feature.name().len().max(12))
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "Descriptive statistics of lagged arms transfers");
    let _ = write!(out, "{:<6}", "");
    for ((feature, _), width) in columns.iter().zip(widths.iter().copied()) {
        let _ = write!(out, "  {:>width$}", feature.name());
    }
    out.push('\n');

    for (stat, label) in STAT_LABELS.iter().enumerate() {
        let _ = write!(out, "{label:<6}");
        for ((_, summary), width) in columns.iter().zip(widths.iter().copied()) {
            let value = summary.map_or(f64::NAN, |s| s.values()[stat]);
            let _ = write!(out, "  {value:>width$.6}");
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\nRecurrence frequencies");
    for (value, count) in value_counts(rows) {
        let _ = writeln!(out, "{value:<6}  {count}");
    }

    out
}
