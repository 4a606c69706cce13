//! Annealing configuration.

/// Configuration for the annealing backend.
///
/// # Examples
///
/// ```
/// use optiroute::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_iterations(250)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AnnealConfig {
    /// Number of trial evaluations. The cooling factor decays linearly
    /// from 1 to 0 across this budget.
    pub iterations: usize,

    /// Largest accepted `iterations`. Bounds the run time of one request.
    pub max_iterations: usize,

    /// Keep every trial energy in [`AnnealResult::trial_energies`](super::AnnealResult::trial_energies).
    /// Off by default; the history grows with `iterations`.
    pub record_trials: bool,

    /// `nodes` used when the request does not supply one.
    pub default_nodes: i64,

    /// `density` used when the request does not supply one.
    pub default_density: f64,

    /// Largest accepted `nodes`. Guards the parameter vector allocation.
    pub max_nodes: usize,

    /// Random seed for standalone runs via [`AnnealRunner::run`](super::AnnealRunner::run).
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            max_iterations: 10_000_000,
            record_trials: false,
            default_nodes: 10,
            default_density: 0.5,
            max_nodes: 1_000_000,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    pub fn with_max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn with_record_trials(mut self, record: bool) -> Self {
        self.record_trials = record;
        self
    }

    pub fn with_default_nodes(mut self, nodes: i64) -> Self {
        self.default_nodes = nodes;
        self
    }

    pub fn with_default_density(mut self, density: f64) -> Self {
        self.default_density = density;
        self
    }

    pub fn with_max_nodes(mut self, n: usize) -> Self {
        self.max_nodes = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.iterations == 0 {
            return Err("iterations must be at least 1".into());
        }
        if self.iterations > self.max_iterations {
            return Err(format!(
                "iterations {} exceeds max_iterations {}",
                self.iterations, self.max_iterations
            ));
        }
        if self.max_nodes == 0 {
            return Err("max_nodes must be at least 1".into());
        }
        if !self.default_density.is_finite() {
            return Err(format!(
                "default_density must be finite, got {}",
                self.default_density
            ));
        }
        if self.default_nodes > self.max_nodes as i64 {
            return Err(format!(
                "default_nodes {} exceeds max_nodes {}",
                self.default_nodes, self.max_nodes
            ));
        }
        Ok(())
    }
}
