//! Bounded Nelder–Mead refinement.
//!
//! Runs in unit-cube coordinates so the simplex is well shaped even though
//! the raw parameters differ by orders of magnitude (`M` ~ 1e-2, `X` ~ 1e2).
//! Points are projected back onto `[0, 1]^3` after every move.
//!
//! After the simplex collapses it is rebuilt around the best vertex up to
//! `restarts` times; a collapse that does not improve on the previous one
//! ends the search early.

use log::debug;
use nalgebra::Vector3;

use crate::domain::{ParamBounds, SearchConfig};
use crate::fit::search::{LocalRefine, StageOutcome, UnitScale, penalize};

const DIMS: usize = 3;

/// Initial simplex edge in unit coordinates.
const INITIAL_STEP: f64 = 0.05;

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

#[derive(Debug, Clone)]
pub struct NelderMead {
    pub max_iter: usize,
    pub xatol: f64,
    pub fatol: f64,
    pub restarts: usize,
}

impl NelderMead {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            max_iter: config.polish_max_iter,
            xatol: config.polish_xatol,
            fatol: config.polish_fatol,
            restarts: config.polish_restarts,
        }
    }
}

struct Simplex {
    vertices: [Vector3<f64>; DIMS + 1],
    scores: [f64; DIMS + 1],
}

impl Simplex {
    fn around<F: Fn(&Vector3<f64>) -> f64>(start: Vector3<f64>, start_score: f64, eval: &F) -> Self {
        let mut vertices = [start; DIMS + 1];
        let mut scores = [start_score; DIMS + 1];
        for d in 0..DIMS {
            let mut v = start;
            v[d] = if v[d] + INITIAL_STEP <= 1.0 { v[d] + INITIAL_STEP } else { v[d] - INITIAL_STEP };
            vertices[d + 1] = v;
            scores[d + 1] = eval(&v);
        }
        Self { vertices, scores }
    }

    fn order(&mut self) {
        let mut idx = [0, 1, 2, 3];
        idx.sort_by(|&a, &b| self.scores[a].total_cmp(&self.scores[b]));
        let vertices = idx.map(|i| self.vertices[i]);
        let scores = idx.map(|i| self.scores[i]);
        self.vertices = vertices;
        self.scores = scores;
    }

    fn collapsed(&self, xatol: f64, fatol: f64) -> bool {
        let best = self.vertices[0];
        let f0 = self.scores[0];
        let x_spread = self.vertices[1..].iter().map(|v| (v - best).amax()).fold(0.0, f64::max);
        let f_spread = self.scores[1..].iter().map(|f| (f - f0).abs()).fold(0.0, f64::max);
        x_spread <= xatol && f_spread <= fatol
    }

    fn centroid(&self) -> Vector3<f64> {
        self.vertices[..DIMS].iter().fold(Vector3::zeros(), |acc, v| acc + v) / DIMS as f64
    }
}

fn project(v: Vector3<f64>) -> Vector3<f64> {
    v.map(|c| c.clamp(0.0, 1.0))
}

impl LocalRefine for NelderMead {
    fn refine<F>(&self, objective: &F, bounds: &ParamBounds, start: &Vector3<f64>, start_score: f64) -> StageOutcome
    where
        F: Fn(&Vector3<f64>) -> f64,
    {
        let scale = UnitScale::new(bounds);
        let evaluations = std::cell::Cell::new(0usize);
        let eval = |u: &Vector3<f64>| {
            evaluations.set(evaluations.get() + 1);
            penalize(objective(&scale.to_params(u)))
        };

        let mut best = project(scale.to_unit(start));
        let mut best_score = penalize(start_score);
        let mut iterations = 0;
        let mut converged = false;

        for round in 0..=self.restarts {
            let mut simplex = Simplex::around(best, best_score, &eval);
            let mut collapsed = false;

            while iterations < self.max_iter {
                simplex.order();
                if simplex.collapsed(self.xatol, self.fatol) {
                    collapsed = true;
                    break;
                }
                iterations += 1;
                step(&mut simplex, &eval);
            }
            simplex.order();

            let improved = simplex.scores[0] < best_score;
            if improved {
                best = simplex.vertices[0];
                best_score = simplex.scores[0];
            }
            debug!("Nelder-Mead round {round}: best={best_score:.6e} iterations={iterations}");

            converged = collapsed;
            if !collapsed || !improved {
                break;
            }
        }

        StageOutcome {
            x: scale.to_params(&best),
            score: best_score,
            iterations,
            evaluations: evaluations.get(),
            converged,
        }
    }
}

/// One reflect / expand / contract / shrink move on an ordered simplex.
fn step<F: Fn(&Vector3<f64>) -> f64>(simplex: &mut Simplex, eval: &F) {
    let worst = DIMS;
    let centroid = simplex.centroid();
    let f_best = simplex.scores[0];
    let f_second_worst = simplex.scores[DIMS - 1];
    let f_worst = simplex.scores[worst];

    let reflected = project(centroid + (centroid - simplex.vertices[worst]) * REFLECT);
    let f_reflected = eval(&reflected);

    if f_reflected < f_best {
        let expanded = project(centroid + (reflected - centroid) * EXPAND);
        let f_expanded = eval(&expanded);
        if f_expanded < f_reflected {
            simplex.vertices[worst] = expanded;
            simplex.scores[worst] = f_expanded;
        } else {
            simplex.vertices[worst] = reflected;
            simplex.scores[worst] = f_reflected;
        }
        return;
    }

    if f_reflected < f_second_worst {
        simplex.vertices[worst] = reflected;
        simplex.scores[worst] = f_reflected;
        return;
    }

    // Outside contraction when the reflection beat the worst vertex, inside otherwise.
    let (contracted, threshold) = if f_reflected < f_worst {
        (centroid + (reflected - centroid) * CONTRACT, f_reflected)
    } else {
        (centroid + (simplex.vertices[worst] - centroid) * CONTRACT, f_worst)
    };
    let contracted = project(contracted);
    let f_contracted = eval(&contracted);
    if f_contracted <= threshold {
        simplex.vertices[worst] = contracted;
        simplex.scores[worst] = f_contracted;
        return;
    }

    let anchor = simplex.vertices[0];
    for i in 1..=DIMS {
        let v = anchor + (simplex.vertices[i] - anchor) * SHRINK;
        simplex.vertices[i] = v;
        simplex.scores[i] = eval(&v);
    }
}
