//! Rotated, exponentially modulated sinusoid.
//!
//! For curve parameter `t` and shape parameters `(theta, M, X)`:
//!
//! ```text
//! x(t) = t·cos(theta) − exp(M·|t|)·sin(omega·t)·sin(theta) + X
//! y(t) = y_offset + t·sin(theta) + exp(M·|t|)·sin(omega·t)·cos(theta)
//! ```
//!
//! The fitter relies on two primitive operations:
//! - evaluate the curve at arbitrary `t` (plots, checks)
//! - sample it on the `[t_min, t_max]` grid with a finiteness guarantee (objective)

use crate::domain::{CurveConfig, CurveParams, Point};
use crate::error::{FitError, Result};
use crate::math::linspace;

/// Evaluate the curve at a single `t`.
///
/// Pure: identical inputs give bit-identical outputs.
pub fn evaluate(t: f64, params: &CurveParams, curve: &CurveConfig) -> Point {
    let (sin_theta, cos_theta) = params.theta.sin_cos();
    let wave = (params.m * t.abs()).exp() * (curve.omega * t).sin();
    Point {
        x: t * cos_theta - wave * sin_theta + params.x_offset,
        y: curve.y_offset + t * sin_theta + wave * cos_theta,
    }
}

/// Evaluate the curve elementwise over `ts`.
pub fn evaluate_many(ts: &[f64], params: &CurveParams, curve: &CurveConfig) -> Vec<Point> {
    ts.iter().map(|&t| evaluate(t, params, curve)).collect()
}

/// Sample `n` points on `linspace(t_min, t_max, n)`.
///
/// Returns `FitError::NonFinite` at the first `t` whose point is not finite,
/// so an overflowing growth term never reaches the objective as `inf`/`NaN`.
pub fn sample_curve(params: &CurveParams, curve: &CurveConfig, n: usize) -> Result<Vec<Point>> {
    let ts = linspace(curve.t_min, curve.t_max, n);
    let mut out = Vec::with_capacity(n);
    for t in ts {
        let p = evaluate(t, params, curve);
        if !p.is_finite() {
            return Err(FitError::NonFinite { t });
        }
        out.push(p);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn evaluate_is_bit_deterministic() {
        let curve = CurveConfig::default();
        let params = CurveParams::new(0.525193, 0.029880, 55.013785);
        let ts = linspace(6.0, 60.0, 200);
        let a = evaluate_many(&ts, &params, &curve);
        let b = evaluate_many(&ts, &params, &curve);
        for (p, q) in a.iter().zip(b.iter()) {
            assert_eq!(p.x.to_bits(), q.x.to_bits());
            assert_eq!(p.y.to_bits(), q.y.to_bits());
        }
    }

    #[test]
    fn zero_growth_reduces_to_plain_sinusoid() {
        let curve = CurveConfig::default();
        for &theta in &[0.0, 0.3, 0.87] {
            for &x_offset in &[0.1, 50.0, 99.9] {
                let params = CurveParams::new(theta, 0.0, x_offset);
                for &t in &[6.0, 13.7, 33.3, 60.0] {
                    let p = evaluate(t, &params, &curve);
                    let s = (0.3 * t).sin();
                    assert_relative_eq!(p.x, t * theta.cos() - s * theta.sin() + x_offset, epsilon = 1e-12);
                    assert_relative_eq!(p.y, 42.0 + t * theta.sin() + s * theta.cos(), epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn growth_uses_absolute_t() {
        let curve = CurveConfig::default();
        let params = CurveParams::new(0.0, 0.04, 0.0);
        // theta = 0: y - 42 = exp(M|t|) sin(0.3 t), odd in t.
        let a = evaluate(10.0, &params, &curve);
        let b = evaluate(-10.0, &params, &curve);
        assert_relative_eq!(a.y - 42.0, -(b.y - 42.0), epsilon = 1e-12);
    }

    #[test]
    fn sample_curve_spans_domain() {
        let curve = CurveConfig::default();
        let params = CurveParams::new(0.0, 0.0, 0.0);
        let pts = sample_curve(&params, &curve, 10).unwrap();
        assert_eq!(pts.len(), 10);
        assert_relative_eq!(pts[0].x, 6.0, epsilon = 1e-12);
        assert_relative_eq!(pts[9].x, 60.0, epsilon = 1e-12);
    }

    #[test]
    fn sample_curve_reports_overflow() {
        let curve = CurveConfig::default();
        // exp(20 * 60) overflows f64.
        let params = CurveParams::new(0.3, 20.0, 10.0);
        match sample_curve(&params, &curve, 50) {
            Err(FitError::NonFinite { t }) => assert!(t > 6.0 && t <= 60.0),
            other => panic!("expected NonFinite, got {other:?}"),
        }
    }

    #[test]
    fn search_range_growth_stays_finite() {
        let curve = CurveConfig::default();
        for &m in &[-0.049, 0.049] {
            let params = CurveParams::new(0.87, m, 99.9);
            assert!(sample_curve(&params, &curve, 1000).is_ok());
        }
    }
}
