//! Scores built on top of a resolved pairing.
//!
//! - `squared_error`: Σ (Δx² + Δy²), accumulated per axis. Smooth almost
//!   everywhere; this is what the search minimises.
//! - `l1_distance`: Σ (|Δx| + |Δy|). Reported only.
//!
//! `Objective` wraps both for a fixed observed set. Every call re-samples the
//! curve and re-resolves the pairing, so concurrent calls share nothing
//! mutable.

use crate::domain::{CurveConfig, CurveParams, PairResidual, Point};
use crate::error::Result;
use crate::fit::correspondence::{Pairing, resolve};
use crate::models::sample_curve;

/// Sum of squared per-axis differences over the paired points.
pub fn squared_error(observed: &[Point], sampled: &[Point], pairing: &Pairing) -> f64 {
    pairing
        .pairs(observed, sampled)
        .map(|(o, s)| {
            let dx = o.x - s.x;
            let dy = o.y - s.y;
            dx * dx + dy * dy
        })
        .sum()
}

/// Sum of per-pair Manhattan distances.
pub fn l1_distance(observed: &[Point], sampled: &[Point], pairing: &Pairing) -> f64 {
    pairing
        .pairs(observed, sampled)
        .map(|(o, s)| (o.x - s.x).abs() + (o.y - s.y).abs())
        .sum()
}

/// Pure scorer for a fixed observed point set.
#[derive(Debug, Clone, Copy)]
pub struct Objective<'a> {
    observed: &'a [Point],
    curve: &'a CurveConfig,
}

impl<'a> Objective<'a> {
    pub fn new(observed: &'a [Point], curve: &'a CurveConfig) -> Self {
        Self { observed, curve }
    }

    pub fn observed(&self) -> &'a [Point] {
        self.observed
    }

    /// Sample the curve at `params` and pair it with the observed set.
    pub fn resolve(&self, params: &CurveParams) -> Result<(Vec<Point>, Pairing)> {
        let sampled = sample_curve(params, self.curve, self.observed.len())?;
        let pairing = resolve(self.observed, &sampled)?;
        Ok((sampled, pairing))
    }

    pub fn squared_error(&self, params: &CurveParams) -> Result<f64> {
        let (sampled, pairing) = self.resolve(params)?;
        Ok(squared_error(self.observed, &sampled, &pairing))
    }

    pub fn l1_distance(&self, params: &CurveParams) -> Result<f64> {
        let (sampled, pairing) = self.resolve(params)?;
        Ok(l1_distance(self.observed, &sampled, &pairing))
    }

    /// Per-pair Euclidean gaps in rank order.
    pub fn pair_residuals(&self, params: &CurveParams) -> Result<Vec<PairResidual>> {
        let (sampled, pairing) = self.resolve(params)?;
        Ok(pairing
            .pairs(self.observed, &sampled)
            .enumerate()
            .map(|(rank, (o, s))| PairResidual {
                rank,
                observed: *o,
                fitted: *s,
                distance: ((o.x - s.x).powi(2) + (o.y - s.y).powi(2)).sqrt(),
            })
            .collect())
    }
}
