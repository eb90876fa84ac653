//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{FitError, Result};

/// A 2-D point, either observed (CSV) or sampled from the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The three shape parameters `(theta, M, X)` recovered by the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveParams {
    /// Rotation angle in radians.
    pub theta: f64,
    /// Growth rate of the `exp(M·|t|)` envelope.
    pub m: f64,
    /// Horizontal offset.
    pub x_offset: f64,
}

impl CurveParams {
    pub fn new(theta: f64, m: f64, x_offset: f64) -> Self {
        Self { theta, m, x_offset }
    }

    pub fn theta_degrees(&self) -> f64 {
        self.theta.to_degrees()
    }

    /// Parameter vector in search order `[theta, m, x_offset]`.
    pub fn to_vector(self) -> Vector3<f64> {
        Vector3::new(self.theta, self.m, self.x_offset)
    }

    pub fn from_vector(v: &Vector3<f64>) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// Fixed constants of the curve family.
///
/// `y_offset` and `omega` are dictated by the target rubric; `[t_min, t_max]`
/// is the curve-parameter domain sampled for each objective evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveConfig {
    pub y_offset: f64,
    pub omega: f64,
    pub t_min: f64,
    pub t_max: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            y_offset: 42.0,
            omega: 0.3,
            t_min: 6.0,
            t_max: 60.0,
        }
    }
}

impl CurveConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.y_offset.is_finite() && self.omega.is_finite()) {
            return Err(FitError::InvalidCurveConfig(
                "y_offset and omega must be finite".to_string(),
            ));
        }
        if !(self.t_min.is_finite() && self.t_max.is_finite() && self.t_min < self.t_max) {
            return Err(FitError::InvalidCurveConfig(format!(
                "t domain [{}, {}] must be finite with t_min < t_max",
                self.t_min, self.t_max
            )));
        }
        Ok(())
    }
}

/// Closed search interval per shape parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamBounds {
    pub theta: (f64, f64),
    pub m: (f64, f64),
    pub x_offset: (f64, f64),
}

impl Default for ParamBounds {
    fn default() -> Self {
        Self::from_degrees((0.1, 49.9), (-0.049, 0.049), (0.1, 99.9))
    }
}

impl ParamBounds {
    /// Build bounds with `theta` given in degrees.
    pub fn from_degrees(theta_deg: (f64, f64), m: (f64, f64), x_offset: (f64, f64)) -> Self {
        Self {
            theta: (theta_deg.0.to_radians(), theta_deg.1.to_radians()),
            m,
            x_offset,
        }
    }

    pub fn lower(&self) -> Vector3<f64> {
        Vector3::new(self.theta.0, self.m.0, self.x_offset.0)
    }

    pub fn upper(&self) -> Vector3<f64> {
        Vector3::new(self.theta.1, self.m.1, self.x_offset.1)
    }

    /// Reject degenerate or non-finite intervals.
    pub fn validate(&self) -> Result<()> {
        for (axis, (lower, upper)) in [("theta", self.theta), ("m", self.m), ("x_offset", self.x_offset)] {
            if !(lower.is_finite() && upper.is_finite() && lower < upper) {
                return Err(FitError::InvalidBounds { axis, lower, upper });
            }
        }
        Ok(())
    }

    pub fn contains(&self, p: &CurveParams) -> bool {
        let inside = |v: f64, (lo, hi): (f64, f64)| v >= lo && v <= hi;
        inside(p.theta, self.theta) && inside(p.m, self.m) && inside(p.x_offset, self.x_offset)
    }
}

/// Knobs for the two-stage parameter search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Seed for the population RNG.
    pub seed: u64,
    /// Generation ceiling for the global stage.
    pub max_iter: usize,
    /// Population multiplier; population size is `popsize * 3`.
    pub popsize: usize,
    /// Relative convergence tolerance on the population energy spread.
    pub tol: f64,
    /// Absolute convergence tolerance on the population energy spread.
    pub atol: f64,
    /// Dither range for the mutation factor, drawn once per generation.
    pub mutation: (f64, f64),
    /// Crossover probability.
    pub recombination: f64,
    /// Run the local refinement stage after the global search.
    pub polish: bool,
    pub polish_max_iter: usize,
    pub polish_xatol: f64,
    pub polish_fatol: f64,
    /// Number of simplex rebuilds around the current best point.
    pub polish_restarts: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            max_iter: 1000,
            popsize: 30,
            tol: 0.01,
            atol: 0.0,
            mutation: (0.5, 1.0),
            recombination: 0.7,
            polish: true,
            polish_max_iter: 3000,
            polish_xatol: 1e-10,
            polish_fatol: 1e-14,
            polish_restarts: 2,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.popsize == 0 {
            return Err(FitError::InvalidSearchConfig("popsize must be > 0".to_string()));
        }
        let (lo, hi) = self.mutation;
        if !(lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi && hi <= 2.0) {
            return Err(FitError::InvalidSearchConfig(format!(
                "mutation range ({lo}, {hi}) must satisfy 0 <= lo <= hi <= 2"
            )));
        }
        if !(0.0..=1.0).contains(&self.recombination) {
            return Err(FitError::InvalidSearchConfig(format!(
                "recombination {} must lie in [0, 1]",
                self.recombination
            )));
        }
        if !(self.tol.is_finite() && self.atol.is_finite() && self.tol >= 0.0 && self.atol >= 0.0) {
            return Err(FitError::InvalidSearchConfig(
                "tolerances must be finite and >= 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Final output of a fit. Built once at the end of the search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub params: CurveParams,
    /// Sum of per-axis squared differences (the minimised objective).
    pub squared_error: f64,
    /// Sum of per-pair Manhattan distances (reported only).
    pub l1_distance: f64,
    /// `true` when the global stage met its spread criterion before `max_iter`.
    pub converged: bool,
    pub generations: usize,
    pub evaluations: usize,
    pub n_points: usize,
}

/// Summary stats about the points actually used for fitting.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DatasetStats {
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut stats = DatasetStats {
            n_points: points.len(),
            x_min: first.x,
            x_max: first.x,
            y_min: first.y,
            y_max: first.y,
        };
        for p in &points[1..] {
            stats.x_min = stats.x_min.min(p.x);
            stats.x_max = stats.x_max.max(p.x);
            stats.y_min = stats.y_min.min(p.y);
            stats.y_max = stats.y_max.max(p.y);
        }
        Some(stats)
    }
}

/// One resolved pair with its Euclidean gap (for diagnostics).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairResidual {
    /// Rank of the pair in x-sorted order.
    pub rank: usize,
    pub observed: Point,
    pub fitted: Point,
    pub distance: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub csv_path: PathBuf,
    pub curve: CurveConfig,
    pub bounds: ParamBounds,
    pub search: SearchConfig,

    pub top_n: usize,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    /// Decimal places used in the Desmos expression.
    pub precision: usize,

    pub export_curve: Option<PathBuf>,
    pub export_residuals: Option<PathBuf>,
}

/// Settings for synthetic point-cloud generation.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub params: CurveParams,
    pub curve: CurveConfig,
    pub count: usize,
    pub seed: u64,
    /// Standard deviation of the Gaussian noise added to each coordinate.
    pub noise_sigma: f64,
    /// Shuffle the output so the cloud carries no ordering information.
    pub shuffle: bool,
}

/// A saved curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveFile {
    pub tool: String,
    pub generated: DateTime<Utc>,
    pub source: Option<String>,
    pub curve: CurveConfig,
    pub params: CurveParams,
    pub theta_degrees: f64,
    pub fit: FitResult,
    pub grid: CurveGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveGrid {
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bounds_are_in_radians() {
        let b = ParamBounds::default();
        assert!((b.theta.0 - 0.1_f64.to_radians()).abs() < 1e-15);
        assert!((b.theta.1 - 49.9_f64.to_radians()).abs() < 1e-15);
        assert!(b.validate().is_ok());
    }

    #[test]
    fn degenerate_bounds_are_rejected() {
        let mut b = ParamBounds::default();
        b.m = (0.01, 0.01);
        assert_eq!(
            b.validate(),
            Err(FitError::InvalidBounds { axis: "m", lower: 0.01, upper: 0.01 })
        );
    }

    #[test]
    fn params_vector_roundtrip_keeps_order() {
        let p = CurveParams::new(0.5, 0.02, 50.0);
        let v = p.to_vector();
        assert_eq!(v[1], 0.02);
        assert_eq!(CurveParams::from_vector(&v), p);
    }

    #[test]
    fn stats_cover_all_points() {
        let pts = [Point::new(1.0, 5.0), Point::new(-2.0, 7.0), Point::new(3.0, 4.0)];
        let s = DatasetStats::from_points(&pts).unwrap();
        assert_eq!((s.x_min, s.x_max, s.y_min, s.y_max), (-2.0, 3.0, 4.0, 7.0));
        assert!(DatasetStats::from_points(&[]).is_none());
    }
}
