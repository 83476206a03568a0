//! Curve assembly: aligned, sweep-ordered series ready for rendering.

use crate::model::AggregatedPoint;
use serde::Serialize;
use std::collections::BTreeMap;

/// A named y series, index-aligned with its curve's `x_values`.
#[derive(Debug, Clone, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

/// The artifact handed to the rendering boundary: the sweep's x values and
/// one aligned series per requested metric.
#[derive(Debug, Clone, Serialize)]
pub struct Curve {
    pub x_values: Vec<u64>,
    pub series: Vec<Series>,
}

/// Assembles aligned series over a fixed sweep.
///
/// `x_values` is the declared sweep order, verbatim; it is never sorted.
/// Every added series gets exactly one slot per x value, so a key without
/// an aggregated point fills 0.0 rather than shrinking its sequence.
#[derive(Debug)]
pub struct CurveBuilder {
    x_values: Vec<u64>,
    series: Vec<Series>,
}

impl CurveBuilder {
    pub fn new(sweep: &[u64]) -> CurveBuilder {
        CurveBuilder {
            x_values: sweep.to_vec(),
            series: Vec::new(),
        }
    }

    /// Add one series: `metric` evaluated on each sweep key's point, in
    /// sweep order.
    pub fn series<F>(
        mut self,
        name: &str,
        points: &BTreeMap<u64, AggregatedPoint>,
        metric: F,
    ) -> CurveBuilder
    where
        F: Fn(&AggregatedPoint) -> f64,
    {
        let values = self
            .x_values
            .iter()
            .map(|key| points.get(key).map(&metric).unwrap_or(0.0))
            .collect();
        self.series.push(Series {
            name: name.to_string(),
            values,
        });
        self
    }

    pub fn build(self) -> Curve {
        Curve {
            x_values: self.x_values,
            series: self.series,
        }
    }
}
