//! [`Backend`] implementation for the annealing search.

use super::config::AnnealConfig;
use super::runner::{AnnealProblem, AnnealRunner};
use crate::backend::{Backend, BackendId, Solution};
use crate::confidence::annealing_confidence;
use crate::envelope::OptimizationRequest;
use crate::error::{OptimizeError, Result};
use crate::params;
use rand::RngCore;
use tracing::debug;

/// Annealing-style stochastic search over `nodes` phase parameters.
///
/// Reads `nodes` (integer) and `density` (number) from an object-valued
/// `parameters`. A non-positive `nodes` is accepted and yields an empty
/// parameter vector.
#[derive(Debug, Clone, Default)]
pub struct AnnealingBackend {
    config: AnnealConfig,
}

impl AnnealingBackend {
    pub fn new(config: AnnealConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnnealConfig {
        &self.config
    }

    /// Parses the request parameters into a problem instance.
    pub fn problem_from(&self, request: &OptimizationRequest) -> Result<AnnealProblem> {
        let map = params::as_object(&request.parameters)?;
        let nodes = params::integer(map, "nodes", self.config.default_nodes)?;
        let density = params::number(map, "density", self.config.default_density)?;
        if nodes > self.config.max_nodes as i64 {
            return Err(OptimizeError::parameter(
                "nodes",
                format!("{nodes} exceeds the limit of {}", self.config.max_nodes),
            ));
        }
        let problem = AnnealProblem::new(nodes, density);
        let ground = problem.ground_energy();
        if !ground.is_finite() {
            return Err(OptimizeError::parameter(
                "density",
                format!("{density} with {nodes} nodes overflows the energy ({ground})"),
            ));
        }
        Ok(problem)
    }
}

impl Backend for AnnealingBackend {
    fn id(&self) -> BackendId {
        BackendId::Annealing
    }

    fn solve(&self, request: &OptimizationRequest, rng: &mut dyn RngCore) -> Result<Solution> {
        let problem = self.problem_from(request)?;
        let result =
            AnnealRunner::run_with_rng(&problem, &self.config, rng).map_err(OptimizeError::Internal)?;

        debug!(
            nodes = problem.nodes,
            density = problem.density,
            iterations = result.iterations,
            improving_moves = result.improving_moves,
            best_iteration = result.best_iteration,
            best_energy = result.best_energy,
            "annealing finished"
        );

        Ok(Solution {
            optimal_parameters: result.best_parameters,
            energy: result.best_energy,
            confidence: annealing_confidence(rng),
            message: format!(
                "Optimized {} for {} nodes.",
                request.problem_type, problem.nodes
            ),
        })
    }
}
