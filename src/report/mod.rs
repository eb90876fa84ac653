//! Reporting utilities: residuals, rankings, parameter checks, and formatted
//! terminal output.

pub mod format;

pub use format::*;

use crate::domain::{CurveConfig, CurveParams, DatasetStats, FitResult, PairResidual, Point};
use crate::error::AppError;
use crate::fit::Objective;
use crate::math::linspace;
use crate::models::{evaluate, evaluate_many};

/// Curve parameter values probed by `check`.
pub const PROBE_TS: [f64; 5] = [6.0, 15.0, 30.0, 45.0, 60.0];

/// Dense sampling used to measure the curve's extent.
const CHECK_GRID_POINTS: usize = 1000;

/// Per-pair residuals at the fitted parameters, in x-rank order.
pub fn compute_residuals(points: &[Point], fit: &FitResult, curve: &CurveConfig) -> Result<Vec<PairResidual>, AppError> {
    let residuals = Objective::new(points, curve).pair_residuals(&fit.params)?;
    if residuals.iter().any(|r| !r.distance.is_finite()) {
        return Err(AppError::new(4, "Non-finite residual during residual computation."));
    }
    Ok(residuals)
}

/// The `top_n` pairs with the largest Euclidean gap, largest first.
pub fn rank_worst(residuals: &[PairResidual], top_n: usize) -> Vec<PairResidual> {
    let mut sorted = residuals.to_vec();
    sorted.sort_by(|a, b| b.distance.partial_cmp(&a.distance).unwrap_or(std::cmp::Ordering::Equal));
    sorted.truncate(top_n);
    sorted
}

/// How a given parameter tuple lines up with the data.
#[derive(Debug, Clone)]
pub struct CheckReport {
    pub params: CurveParams,
    pub curve_extent: DatasetStats,
    pub data_extent: DatasetStats,
    pub probes: Vec<(f64, Point)>,
    pub squared_error: f64,
    pub l1_distance: f64,
}

/// Evaluate `params` against `points` without searching.
pub fn check_params(points: &[Point], params: &CurveParams, curve: &CurveConfig) -> Result<CheckReport, AppError> {
    crate::fit::validate_points(points)?;
    curve.validate()?;

    let dense = evaluate_many(&linspace(curve.t_min, curve.t_max, CHECK_GRID_POINTS), params, curve);
    let curve_extent = DatasetStats::from_points(&dense)
        .ok_or_else(|| AppError::new(4, "Curve grid is empty."))?;
    let data_extent = DatasetStats::from_points(points)
        .ok_or_else(|| AppError::new(3, "No data points to check."))?;

    let probes = PROBE_TS.iter().map(|&t| (t, evaluate(t, params, curve))).collect();

    let objective = Objective::new(points, curve);
    Ok(CheckReport {
        params: *params,
        curve_extent,
        data_extent,
        probes,
        squared_error: objective.squared_error(params)?,
        l1_distance: objective.l1_distance(params)?,
    })
}
