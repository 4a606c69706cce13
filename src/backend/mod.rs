//! The backend abstraction shared by every optimization strategy.
//!
//! A backend turns an [`OptimizationRequest`] into a [`Solution`]; the
//! provided [`Backend::optimize`] wraps that into a [`ResultEnvelope`] so
//! every strategy produces the same output shape.
//!
//! Which backends exist in a given build is decided once, by
//! [`Capabilities::probe`], and the [`BackendRegistry`] only holds those.

mod registry;

pub use registry::BackendRegistry;

use crate::envelope::{OptimizationRequest, ResultEnvelope};
use crate::error::{OptimizeError, Result};
use rand::RngCore;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Identifier of a concrete backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BackendId {
    /// Classical annealing-style stochastic search.
    Annealing,
    /// Feature map + variational layer evaluated on a statevector.
    Variational,
}

impl BackendId {
    pub const ALL: [BackendId; 2] = [BackendId::Annealing, BackendId::Variational];

    /// Name reported in `backend_used`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Annealing => "simulated_annealer_cpu",
            BackendId::Variational => "variational_qnn_statevector",
        }
    }

    /// Optional library the backend needs, with a remediation hint.
    pub fn dependency(&self) -> Option<(&'static str, &'static str)> {
        match self {
            BackendId::Annealing => None,
            BackendId::Variational => Some((
                "num-complex",
                "Rebuild with `cargo build --features variational` to enable statevector simulation.",
            )),
        }
    }

    /// Maps a `problem_type` label to the backend it implies, if any.
    pub fn hinted_by(problem_type: &str) -> Option<BackendId> {
        match problem_type.trim().to_ascii_lowercase().as_str() {
            "qnn" | "qml" | "variational" => Some(BackendId::Variational),
            _ => None,
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendId {
    type Err = OptimizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annealing" | "anneal" | "sa" | "simulated_annealer_cpu" => Ok(BackendId::Annealing),
            "variational" | "qnn" | "qml" | "variational_qnn_statevector" => {
                Ok(BackendId::Variational)
            }
            other => Err(OptimizeError::InvalidInput(format!(
                "unknown backend `{other}`; expected one of: annealing, variational"
            ))),
        }
    }
}

/// The raw outcome of a backend run, before envelope construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub optimal_parameters: Vec<f64>,
    pub energy: f64,
    pub confidence: f64,
    pub message: String,
}

impl Solution {
    /// Wraps the solution in a success envelope tagged with `backend`.
    pub fn into_envelope(self, backend: BackendId) -> ResultEnvelope {
        ResultEnvelope::success(
            backend.as_str(),
            self.optimal_parameters,
            self.energy,
            self.confidence,
            self.message,
        )
    }
}

/// A concrete optimization strategy.
///
/// Randomness is injected so callers control reproducibility.
pub trait Backend: Send + Sync {
    /// Which backend this is.
    fn id(&self) -> BackendId;

    /// Runs the strategy.
    fn solve(&self, request: &OptimizationRequest, rng: &mut dyn RngCore) -> Result<Solution>;

    /// Runs the strategy and normalizes the outcome into an envelope.
    ///
    /// Never fails: errors become `status = "error"` envelopes.
    fn optimize(&self, request: &OptimizationRequest, rng: &mut dyn RngCore) -> ResultEnvelope {
        match self.solve(request, rng) {
            Ok(solution) => solution.into_envelope(self.id()),
            Err(e) => ResultEnvelope::from_error(&e).with_backend_used(self.id().as_str()),
        }
    }
}

/// The set of backends usable in this build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    available: BTreeSet<BackendId>,
}

impl Capabilities {
    /// Determines which backends this build can run.
    ///
    /// The annealing backend is always present. The variational backend
    /// needs the `variational` feature (and with it `num-complex`).
    pub fn probe() -> Self {
        let mut available = BTreeSet::new();
        available.insert(BackendId::Annealing);
        if cfg!(feature = "variational") {
            available.insert(BackendId::Variational);
        }
        tracing::info!(
            backends = ?available.iter().map(BackendId::as_str).collect::<Vec<_>>(),
            "probed backend capabilities"
        );
        Self { available }
    }

    /// A fixed capability set, mostly useful in tests.
    ///
    /// Backends that this build cannot construct are dropped.
    pub fn only(ids: impl IntoIterator<Item = BackendId>) -> Self {
        let buildable = Self::probe();
        Self {
            available: ids
                .into_iter()
                .filter(|id| buildable.contains(*id))
                .collect(),
        }
    }

    /// Marks a backend as available.
    pub fn insert(&mut self, id: BackendId) {
        self.available.insert(id);
    }

    pub fn contains(&self, id: BackendId) -> bool {
        self.available.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = BackendId> + '_ {
        self.available.iter().copied()
    }

    /// Returns `Ok` when `id` is usable, otherwise a dependency error.
    pub fn ensure(&self, id: BackendId) -> Result<()> {
        if self.contains(id) {
            return Ok(());
        }
        let (dependency, remediation) = id
            .dependency()
            .unwrap_or(("backend support", "Enable the backend in the service capabilities."));
        Err(OptimizeError::DependencyUnavailable {
            backend: id.as_str().to_string(),
            dependency: dependency.to_string(),
            remediation: remediation.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_id_aliases() {
        assert_eq!("sa".parse::<BackendId>().unwrap(), BackendId::Annealing);
        assert_eq!(
            "Simulated_Annealer_CPU".parse::<BackendId>().unwrap(),
            BackendId::Annealing
        );
        assert_eq!("qnn".parse::<BackendId>().unwrap(), BackendId::Variational);
        assert!("gpu".parse::<BackendId>().is_err());
    }

    #[test]
    fn test_display_matches_backend_used() {
        for id in BackendId::ALL {
            assert_eq!(id.to_string(), id.as_str());
            assert_eq!(id.as_str().parse::<BackendId>().unwrap(), id);
        }
    }

    #[test]
    fn test_problem_type_hint() {
        assert_eq!(BackendId::hinted_by("QNN"), Some(BackendId::Variational));
        assert_eq!(BackendId::hinted_by("maxcut"), None);
        assert_eq!(BackendId::hinted_by("generic"), None);
    }

    #[test]
    fn test_probe_always_has_annealing() {
        let caps = Capabilities::probe();
        assert!(caps.contains(BackendId::Annealing));
        assert_eq!(
            caps.contains(BackendId::Variational),
            cfg!(feature = "variational")
        );
    }

    #[test]
    fn test_ensure_missing_names_dependency() {
        let caps = Capabilities::only([BackendId::Annealing]);
        assert!(caps.ensure(BackendId::Annealing).is_ok());
        let err = caps.ensure(BackendId::Variational).unwrap_err();
        assert_eq!(err.kind(), "dependency");
        assert!(err.to_string().contains("num-complex"));
        assert!(err.to_string().contains("--features variational"));
    }
}
