//! Annealing execution loop.

use super::config::AnnealConfig;
use rand::{Rng, RngCore};
use std::f64::consts::TAU;

/// The problem being annealed: `nodes` phase variables on a graph of the
/// given connectivity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealProblem {
    /// Number of decision variables. Non-positive values yield an empty
    /// parameter vector.
    pub nodes: i64,

    /// Connectivity proxy, nominally in `[0, 1]`.
    pub density: f64,
}

impl AnnealProblem {
    pub fn new(nodes: i64, density: f64) -> Self {
        Self { nodes, density }
    }

    /// The noiseless optimum `-(nodes * density)`.
    pub fn ground_energy(&self) -> f64 {
        -(self.nodes as f64 * self.density)
    }

    /// Length of the candidate parameter vector.
    pub fn dimension(&self) -> usize {
        usize::try_from(self.nodes).unwrap_or(0)
    }
}

/// Result of an annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult {
    /// Phase angles in `[0, 2π)` sampled at the best trial.
    pub best_parameters: Vec<f64>,

    /// Lowest trial energy observed.
    pub best_energy: f64,

    /// Iteration at which `best_energy` was observed.
    pub best_iteration: usize,

    /// Total trials evaluated.
    pub iterations: usize,

    /// Number of trials that improved on the best so far.
    pub improving_moves: usize,

    /// Every trial energy, in iteration order. Empty unless
    /// [`AnnealConfig::record_trials`] is set.
    pub trial_energies: Vec<f64>,
}

/// Executes the annealing search.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs with an RNG derived from `config.seed`.
    pub fn run(problem: &AnnealProblem, config: &AnnealConfig) -> Result<AnnealResult, String> {
        let mut rng = crate::rng::rng_from(config.seed);
        Self::run_with_rng(problem, config, &mut rng)
    }

    /// Runs with a caller-supplied RNG.
    ///
    /// At iteration `i` of `T` the trial energy is
    /// `ground + U(-1, 1) * (1 - i/T)`. Whenever a trial beats the best so
    /// far, a fresh vector of phase angles is sampled for it.
    pub fn run_with_rng(
        problem: &AnnealProblem,
        config: &AnnealConfig,
        rng: &mut dyn RngCore,
    ) -> Result<AnnealResult, String> {
        config.validate()?;
        if !problem.density.is_finite() {
            return Err(format!("density must be finite, got {}", problem.density));
        }

        let total = config.iterations;
        let ground = problem.ground_energy();
        if !ground.is_finite() {
            return Err(format!(
                "nodes {} with density {} overflows the energy",
                problem.nodes, problem.density
            ));
        }
        let dim = problem.dimension();

        let mut best_energy = f64::INFINITY;
        let mut best_parameters = Vec::new();
        let mut best_iteration = 0usize;
        let mut improving_moves = 0usize;
        let mut trial_energies = Vec::new();

        for i in 0..total {
            let fluctuation = rng.random_range(-1.0_f64..1.0) * cooling_factor(i, total);
            let energy = ground + fluctuation;
            if config.record_trials {
                trial_energies.push(energy);
            }

            if energy < best_energy {
                best_energy = energy;
                best_parameters = sample_phases(dim, rng);
                best_iteration = i;
                improving_moves += 1;
            }
        }

        Ok(AnnealResult {
            best_parameters,
            best_energy,
            best_iteration,
            iterations: total,
            improving_moves,
            trial_energies,
        })
    }
}

/// Linear schedule: 1 at the first iteration, approaching 0 at the last.
pub fn cooling_factor(iteration: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    1.0 - iteration as f64 / total as f64
}

fn sample_phases(dim: usize, rng: &mut dyn RngCore) -> Vec<f64> {
    (0..dim).map(|_| rng.random_range(0.0..TAU)).collect()
}
