//! Service configuration.

use crate::anneal::AnnealConfig;
use crate::backend::BackendId;
use crate::variational::VariationalConfig;

/// Configuration for [`OptimizationService`](super::OptimizationService).
///
/// # Examples
///
/// ```
/// use optiroute::backend::BackendId;
/// use optiroute::service::ServiceConfig;
///
/// let config = ServiceConfig::default()
///     .with_default_backend(BackendId::Annealing)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub anneal: AnnealConfig,
    pub variational: VariationalConfig,

    /// Backend used when neither `backend` nor `problem_type` picks one.
    pub default_backend: BackendId,

    /// When set, every call draws from a fresh RNG seeded with this value,
    /// so identical requests produce identical envelopes.
    pub seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            anneal: AnnealConfig::default(),
            variational: VariationalConfig::default(),
            default_backend: BackendId::Annealing,
            seed: None,
        }
    }
}

impl ServiceConfig {
    pub fn with_anneal(mut self, anneal: AnnealConfig) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn with_variational(mut self, variational: VariationalConfig) -> Self {
        self.variational = variational;
        self
    }

    pub fn with_default_backend(mut self, id: BackendId) -> Self {
        self.default_backend = id;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates this and every nested configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.anneal
            .validate()
            .map_err(|e| format!("anneal: {e}"))?;
        self.variational
            .validate()
            .map_err(|e| format!("variational: {e}"))?;
        Ok(())
    }
}
