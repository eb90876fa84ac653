//! Two-stage parameter search: coarse global search, then local refinement.
//!
//! The stages meet at two small traits so either can be replaced without
//! touching the objective or the correspondence logic:
//!
//! - `GlobalSearch`: bounded, derivative-free, population based
//! - `LocalRefine`: polishes a single starting point inside the bounds
//!
//! Objectives are plain closures over a parameter vector
//! `[theta, m, x_offset]`. Non-finite values are treated as `+inf`, so a
//! parameter tuple that overflows is rejected rather than compared.

use log::{info, warn};
use nalgebra::Vector3;

use crate::domain::{CurveParams, ParamBounds, SearchConfig};
use crate::error::Result;
use crate::fit::evolution::DifferentialEvolution;
use crate::fit::polish::NelderMead;

/// Result of a single search stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome {
    pub x: Vector3<f64>,
    pub score: f64,
    pub iterations: usize,
    pub evaluations: usize,
    /// Whether the stage met its own stopping tolerance.
    pub converged: bool,
}

/// Population-based search over the full bounded box.
pub trait GlobalSearch {
    fn minimize<F>(&self, objective: &F, bounds: &ParamBounds) -> StageOutcome
    where
        F: Fn(&Vector3<f64>) -> f64 + Sync;
}

/// Local improvement of one candidate.
pub trait LocalRefine {
    fn refine<F>(&self, objective: &F, bounds: &ParamBounds, start: &Vector3<f64>, start_score: f64) -> StageOutcome
    where
        F: Fn(&Vector3<f64>) -> f64;
}

/// Terminal state of the search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub params: CurveParams,
    pub score: f64,
    /// Genuine convergence of the global stage, as opposed to hitting `max_iter`.
    pub converged: bool,
    pub generations: usize,
    pub evaluations: usize,
}

/// Global stage followed by an optional local stage.
#[derive(Debug, Clone)]
pub struct TwoStageSearch<G, L> {
    pub global: G,
    pub local: Option<L>,
}

impl TwoStageSearch<DifferentialEvolution, NelderMead> {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            global: DifferentialEvolution::from_config(config),
            local: config.polish.then(|| NelderMead::from_config(config)),
        }
    }
}

impl<G: GlobalSearch, L: LocalRefine> TwoStageSearch<G, L> {
    pub fn run<F>(&self, objective: &F, bounds: &ParamBounds) -> SearchOutcome
    where
        F: Fn(&Vector3<f64>) -> f64 + Sync,
    {
        let coarse = self.global.minimize(objective, bounds);
        info!(
            "Global search finished: score={:.6e} generations={} evaluations={} converged={}",
            coarse.score, coarse.iterations, coarse.evaluations, coarse.converged
        );
        if !coarse.converged {
            warn!(
                "Global search hit its generation ceiling ({}) without meeting the spread criterion.",
                coarse.iterations
            );
        }

        let mut best_x = coarse.x;
        let mut best_score = coarse.score;
        let mut evaluations = coarse.evaluations;

        if let Some(local) = &self.local {
            let refined = local.refine(objective, bounds, &coarse.x, coarse.score);
            evaluations += refined.evaluations;
            info!(
                "Local refinement: score {:.6e} -> {:.6e} ({} iterations)",
                coarse.score, refined.score, refined.iterations
            );
            if refined.score < best_score {
                best_x = refined.x;
                best_score = refined.score;
            }
        }

        SearchOutcome {
            params: CurveParams::from_vector(&best_x),
            score: best_score,
            converged: coarse.converged,
            generations: coarse.iterations,
            evaluations,
        }
    }
}

/// Validate inputs and run the default two-stage search.
pub fn search<F>(objective: &F, bounds: &ParamBounds, config: &SearchConfig) -> Result<SearchOutcome>
where
    F: Fn(&Vector3<f64>) -> f64 + Sync,
{
    bounds.validate()?;
    config.validate()?;
    Ok(TwoStageSearch::from_config(config).run(objective, bounds))
}

/// Map non-finite scores to `+inf`.
pub(crate) fn penalize(score: f64) -> f64 {
    if score.is_finite() { score } else { f64::INFINITY }
}

/// Unit-cube <-> parameter-space mapping for a set of bounds.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UnitScale {
    lower: Vector3<f64>,
    span: Vector3<f64>,
}

impl UnitScale {
    pub(crate) fn new(bounds: &ParamBounds) -> Self {
        let lower = bounds.lower();
        Self {
            lower,
            span: bounds.upper() - lower,
        }
    }

    pub(crate) fn to_params(&self, u: &Vector3<f64>) -> Vector3<f64> {
        self.lower + u.component_mul(&self.span)
    }

    pub(crate) fn to_unit(&self, x: &Vector3<f64>) -> Vector3<f64> {
        (x - self.lower).component_div(&self.span)
    }
}
