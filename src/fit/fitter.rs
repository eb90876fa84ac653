//! End-to-end fit of `(theta, M, X)` to an observed point cloud.
//!
//! Given:
//! - observed points (unordered)
//! - curve constants (`y_offset`, `omega`, `[t_min, t_max]`)
//! - parameter bounds and search settings
//!
//! we:
//! - reject precondition violations before any search work
//! - minimise the squared-error objective with the two-stage search
//! - score the winner once more for the reported squared error and L1 distance

use log::info;
use nalgebra::Vector3;

use crate::domain::{CurveConfig, CurveParams, FitResult, ParamBounds, Point, SearchConfig};
use crate::error::{FitError, Result};
use crate::fit::objective::Objective;
use crate::fit::search::search;

/// Check the observed set: non-empty and finite.
pub fn validate_points(points: &[Point]) -> Result<()> {
    if points.is_empty() {
        return Err(FitError::EmptyPointSet);
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(FitError::NonFiniteInput { index });
    }
    Ok(())
}

/// Fit the curve to `points`.
pub fn fit_curve(
    points: &[Point],
    curve: &CurveConfig,
    bounds: &ParamBounds,
    config: &SearchConfig,
) -> Result<FitResult> {
    validate_points(points)?;
    curve.validate()?;
    bounds.validate()?;
    config.validate()?;

    info!(
        "Fitting {} points: t=[{}, {}] seed={} max_iter={} popsize={}",
        points.len(),
        curve.t_min,
        curve.t_max,
        config.seed,
        config.max_iter,
        config.popsize
    );

    let objective = Objective::new(points, curve);
    // Overflowing parameter tuples score +inf and lose every comparison.
    let score = |v: &Vector3<f64>| {
        objective
            .squared_error(&CurveParams::from_vector(v))
            .unwrap_or(f64::INFINITY)
    };
    let outcome = search(&score, bounds, config)?;

    let squared_error = objective.squared_error(&outcome.params)?;
    let l1_distance = objective.l1_distance(&outcome.params)?;

    Ok(FitResult {
        params: outcome.params,
        squared_error,
        l1_distance,
        converged: outcome.converged,
        generations: outcome.generations,
        evaluations: outcome.evaluations,
        n_points: points.len(),
    })
}
