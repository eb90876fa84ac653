//! Differential evolution (best/1/bin) over the unit cube.
//!
//! Members live in `[0, 1]^3` and are mapped onto the bounds only for
//! evaluation. Each generation:
//!
//! 1. draw one dithered mutation factor `F`
//! 2. build every trial vector sequentially from the seeded RNG
//! 3. score all trials in parallel (rayon, order-preserving collect)
//! 4. replace members whose trial scored strictly lower
//!
//! Because trials are built before any are scored, results are identical for
//! any thread count.
//!
//! The run stops early when the population energies satisfy
//! `std <= atol + tol * |mean|`.

use log::debug;
use nalgebra::Vector3;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand::seq::index;
use rayon::prelude::*;

use crate::domain::{ParamBounds, SearchConfig};
use crate::fit::search::{GlobalSearch, StageOutcome, UnitScale, penalize};

const DIMS: usize = 3;

/// Smallest population the mutation scheme can work with.
const MIN_POPULATION: usize = 5;

/// Generations between progress log lines.
const LOG_EVERY: usize = 50;

#[derive(Debug, Clone)]
pub struct DifferentialEvolution {
    pub seed: u64,
    pub max_iter: usize,
    pub popsize: usize,
    pub tol: f64,
    pub atol: f64,
    pub mutation: (f64, f64),
    pub recombination: f64,
}

impl DifferentialEvolution {
    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            seed: config.seed,
            max_iter: config.max_iter,
            popsize: config.popsize,
            tol: config.tol,
            atol: config.atol,
            mutation: config.mutation,
            recombination: config.recombination,
        }
    }

    pub fn population_size(&self) -> usize {
        (self.popsize * DIMS).max(MIN_POPULATION)
    }

    fn draw_mutation(&self, rng: &mut StdRng) -> f64 {
        let (lo, hi) = self.mutation;
        if hi > lo { rng.gen_range(lo..hi) } else { lo }
    }

    fn trial(&self, rng: &mut StdRng, population: &[Vector3<f64>], best: usize, candidate: usize, f: f64) -> Vector3<f64> {
        let (r0, r1) = pick_two_others(rng, population.len(), candidate);
        let mutant = population[best] + (population[r0] - population[r1]) * f;

        let mut trial = population[candidate];
        let forced = rng.gen_range(0..DIMS);
        for j in 0..DIMS {
            if j == forced || rng.gen_range(0.0..1.0) < self.recombination {
                trial[j] = mutant[j];
            }
        }
        for j in 0..DIMS {
            if !(0.0..=1.0).contains(&trial[j]) {
                trial[j] = rng.gen_range(0.0..1.0);
            }
        }
        trial
    }

    fn spread_converged(&self, energies: &[f64]) -> bool {
        if !energies.iter().all(|e| e.is_finite()) {
            return false;
        }
        let n = energies.len() as f64;
        let mean = energies.iter().sum::<f64>() / n;
        let var = energies.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / n;
        var.sqrt() <= self.atol + self.tol * mean.abs()
    }
}

impl GlobalSearch for DifferentialEvolution {
    fn minimize<F>(&self, objective: &F, bounds: &ParamBounds) -> StageOutcome
    where
        F: Fn(&Vector3<f64>) -> f64 + Sync,
    {
        let scale = UnitScale::new(bounds);
        let n_pop = self.population_size();
        let mut rng = StdRng::seed_from_u64(self.seed);

        let mut population = latin_hypercube(&mut rng, n_pop);
        let mut energies = score_all(objective, &scale, &population);
        let mut evaluations = n_pop;
        let mut best = argmin(&energies);

        let mut generations = 0;
        let mut converged = false;
        while generations < self.max_iter {
            generations += 1;

            let f = self.draw_mutation(&mut rng);
            let trials: Vec<Vector3<f64>> = (0..n_pop)
                .map(|i| self.trial(&mut rng, &population, best, i, f))
                .collect();
            let trial_energies = score_all(objective, &scale, &trials);
            evaluations += n_pop;

            for (i, (trial, energy)) in trials.into_iter().zip(trial_energies).enumerate() {
                if energy < energies[i] {
                    population[i] = trial;
                    energies[i] = energy;
                }
            }
            best = argmin(&energies);

            if generations % LOG_EVERY == 0 {
                debug!("DE generation {generations}: best={:.6e}", energies[best]);
            }
            if self.spread_converged(&energies) {
                converged = true;
                break;
            }
        }

        StageOutcome {
            x: scale.to_params(&population[best]),
            score: energies[best],
            iterations: generations,
            evaluations,
            converged,
        }
    }
}

/// Stratified initial population: each axis is cut into `n` equal slices and
/// every slice holds exactly one member.
fn latin_hypercube(rng: &mut StdRng, n: usize) -> Vec<Vector3<f64>> {
    let segment = 1.0 / n as f64;
    let mut population = vec![Vector3::zeros(); n];
    for d in 0..DIMS {
        let mut column: Vec<f64> = (0..n).map(|k| (k as f64 + rng.gen_range(0.0..1.0)) * segment).collect();
        column.shuffle(rng);
        for (member, value) in population.iter_mut().zip(column) {
            member[d] = value;
        }
    }
    population
}

/// Two distinct member indices, both different from `candidate`.
fn pick_two_others(rng: &mut StdRng, n: usize, candidate: usize) -> (usize, usize) {
    let picks = index::sample(rng, n - 1, 2);
    let shift = |k: usize| if k >= candidate { k + 1 } else { k };
    (shift(picks.index(0)), shift(picks.index(1)))
}

fn score_all<F>(objective: &F, scale: &UnitScale, members: &[Vector3<f64>]) -> Vec<f64>
where
    F: Fn(&Vector3<f64>) -> f64 + Sync,
{
    members
        .par_iter()
        .map(|u| penalize(objective(&scale.to_params(u))))
        .collect()
}

/// Index of the lowest energy; the earliest index wins ties.
fn argmin(energies: &[f64]) -> usize {
    let mut best = 0;
    for (i, e) in energies.iter().enumerate().skip(1) {
        if *e < energies[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn de(config: SearchConfig) -> DifferentialEvolution {
        DifferentialEvolution::from_config(&config)
    }

    #[test]
    fn latin_hypercube_fills_every_slice() {
        let mut rng = StdRng::seed_from_u64(7);
        let pop = latin_hypercube(&mut rng, 20);
        for d in 0..DIMS {
            let mut slices: Vec<usize> = pop.iter().map(|m| (m[d] * 20.0).floor() as usize).collect();
            slices.sort_unstable();
            assert_eq!(slices, (0..20).collect::<Vec<_>>());
        }
    }

    #[test]
    fn picked_indices_avoid_candidate() {
        let mut rng = StdRng::seed_from_u64(3);
        for candidate in 0..6 {
            for _ in 0..50 {
                let (a, b) = pick_two_others(&mut rng, 6, candidate);
                assert!(a != b && a != candidate && b != candidate && a < 6 && b < 6);
            }
        }
    }

    #[test]
    fn finds_shifted_sphere_minimum() {
        let bounds = ParamBounds::default();
        let target = Vector3::new(0.6, 0.01, 25.0);
        let objective = |x: &Vector3<f64>| {
            let d = (x - target).component_div(&(bounds.upper() - bounds.lower()));
            d.norm_squared()
        };
        let out = de(SearchConfig { popsize: 15, ..SearchConfig::default() }).minimize(&objective, &bounds);
        assert!(out.score < 1e-4, "score={}", out.score);
        assert!((out.x[2] - 25.0).abs() < 2.0);
    }

    #[test]
    fn same_seed_same_outcome() {
        let bounds = ParamBounds::default();
        let objective = |x: &Vector3<f64>| (x[0] - 0.3).powi(2) + (x[1] * 10.0).sin().abs() + (x[2] - 70.0).abs();
        let config = SearchConfig { popsize: 8, max_iter: 60, ..SearchConfig::default() };
        let a = de(config).minimize(&objective, &bounds);
        let b = de(config).minimize(&objective, &bounds);
        assert_eq!(a, b);

        let c = de(SearchConfig { seed: 43, ..config }).minimize(&objective, &bounds);
        assert_ne!(a.x, c.x);
    }

    #[test]
    fn non_finite_region_is_avoided() {
        let bounds = ParamBounds::default();
        // Half of the box overflows; the optimum sits right next to it.
        let objective = |x: &Vector3<f64>| {
            if x[1] > 0.0 { f64::NAN } else { (x[1] + 0.001).powi(2) + (x[0] - 0.5).powi(2) }
        };
        let out = de(SearchConfig { popsize: 10, max_iter: 200, ..SearchConfig::default() }).minimize(&objective, &bounds);
        assert!(out.score.is_finite());
        assert!(out.x[1] <= 0.0);
    }

    #[test]
    fn generation_ceiling_reports_not_converged() {
        let bounds = ParamBounds::default();
        let objective = |x: &Vector3<f64>| x.norm_squared() + 1.0;
        let out = de(SearchConfig { popsize: 5, max_iter: 1, tol: 0.0, ..SearchConfig::default() }).minimize(&objective, &bounds);
        assert!(!out.converged);
        assert_eq!(out.iterations, 1);
        assert_eq!(out.evaluations, 2 * 15);
    }

    #[test]
    fn flat_objective_converges_immediately() {
        let bounds = ParamBounds::default();
        let objective = |_: &Vector3<f64>| 3.0;
        let out = de(SearchConfig::default()).minimize(&objective, &bounds);
        assert!(out.converged);
        assert_eq!(out.iterations, 1);
    }
}
