//! Request orchestration: routing, dispatch, envelope construction.
//!
//! [`OptimizationService`] is the single failure boundary of the crate.
//! Whatever goes wrong while parsing, routing or running a backend
//! (including a panic inside a backend) comes back as a well-formed
//! `status = "error"` envelope.

mod config;

pub use config::ServiceConfig;

use crate::backend::{Backend, BackendId, BackendRegistry, Capabilities};
use crate::envelope::{OptimizationRequest, ResultEnvelope, Status};
use crate::error::{OptimizeError, Result};
use crate::router::{BackendRouter, RoutingDecision, Tool};
use rand::RngCore;
use serde_json::Value;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Message used when the caller supplies no request at all.
pub const NO_INPUT: &str = "No input provided";

/// The entry point for optimization requests.
///
/// Holds no per-call state: every call builds its own RNG and leaves
/// nothing behind, so a shared reference can serve concurrent callers.
pub struct OptimizationService {
    config: ServiceConfig,
    registry: BackendRegistry,
    router: BackendRouter,
}

impl OptimizationService {
    /// Builds a service with every backend this build supports.
    pub fn new(config: ServiceConfig) -> Result<Self> {
        Self::with_capabilities(config, Capabilities::probe())
    }

    /// Builds a service restricted to the given capability set.
    pub fn with_capabilities(config: ServiceConfig, capabilities: Capabilities) -> Result<Self> {
        config
            .validate()
            .map_err(|e| OptimizeError::InvalidInput(format!("invalid service config: {e}")))?;
        let registry = BackendRegistry::new(capabilities, &config.anneal, &config.variational);
        info!(
            backends = ?registry.ids().iter().map(BackendId::as_str).collect::<Vec<_>>(),
            default_backend = %config.default_backend,
            "optimization service ready"
        );
        Ok(Self {
            config,
            registry,
            router: BackendRouter::default(),
        })
    }

    /// Installs a custom backend under its own id.
    pub fn with_backend(mut self, backend: Box<dyn Backend>) -> Self {
        self.registry.register(backend);
        self
    }

    /// Replaces the intent router.
    pub fn with_router(mut self, router: BackendRouter) -> Self {
        self.router = router;
        self
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        self.registry.capabilities()
    }

    /// Classifies an intent with the service's router.
    pub fn classify(&self, intent: &str) -> RoutingDecision {
        self.router.classify(intent)
    }

    /// Runs a problem with the given parameters.
    pub fn run(&self, problem_type: &str, parameters: Value) -> ResultEnvelope {
        self.run_request(&OptimizationRequest::new(problem_type, parameters))
    }

    /// Parses and runs a raw JSON request. `None` means no input arrived.
    pub fn run_json(&self, input: Option<&str>) -> ResultEnvelope {
        let start = Instant::now();
        let envelope = match input {
            None => ResultEnvelope::from_error(&OptimizeError::InvalidInput(NO_INPUT.into())),
            Some(text) => match OptimizationRequest::from_json(text) {
                Ok(request) => return self.run_request(&request),
                Err(e) => {
                    warn!(kind = e.kind(), error = %e, "rejected request");
                    ResultEnvelope::from_error(&e)
                }
            },
        };
        envelope.with_execution_time_ms(elapsed_ms(start))
    }

    /// Runs a parsed request.
    pub fn run_request(&self, request: &OptimizationRequest) -> ResultEnvelope {
        let mut rng = crate::rng::rng_from(self.config.seed);
        self.run_with_rng(request, &mut rng)
    }

    /// Runs a parsed request with a caller-supplied RNG.
    pub fn run_with_rng(
        &self,
        request: &OptimizationRequest,
        rng: &mut dyn RngCore,
    ) -> ResultEnvelope {
        let start = Instant::now();
        if request.shots.is_some() {
            debug!(shots = ?request.shots, "ignoring shots; evaluation is exact");
        }

        let envelope = match self.select_backend(request) {
            Ok(id) => self.dispatch(id, request, rng),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "request not dispatched");
                ResultEnvelope::from_error(&e)
            }
        };
        envelope.with_execution_time_ms(elapsed_ms(start))
    }

    /// Decides which backend serves `request`.
    ///
    /// 1. An `intent`, if present, must route to `quantum_optimize`.
    /// 2. An explicit `backend` name wins.
    /// 3. Otherwise `problem_type` may hint a backend (`qnn`, `qml`,
    ///    `variational`), falling back to the configured default.
    ///
    /// The chosen backend must be in the capability set.
    pub fn select_backend(&self, request: &OptimizationRequest) -> Result<BackendId> {
        if let Some(intent) = &request.intent {
            let decision = self.router.classify(intent);
            info!(
                tool = %decision.tool,
                confidence = decision.confidence,
                reasoning = %decision.reasoning,
                "classified intent"
            );
            if !decision.routes_to(Tool::QuantumOptimize) {
                return Err(OptimizeError::InvalidInput(format!(
                    "intent routed to `{}` ({}), which is not served by the optimization service",
                    decision.tool, decision.reasoning
                )));
            }
        }

        let id = match &request.backend {
            Some(name) => name.parse::<BackendId>()?,
            None => BackendId::hinted_by(&request.problem_type)
                .unwrap_or(self.config.default_backend),
        };
        self.registry.capabilities().ensure(id)?;
        Ok(id)
    }

    fn dispatch(
        &self,
        id: BackendId,
        request: &OptimizationRequest,
        rng: &mut dyn RngCore,
    ) -> ResultEnvelope {
        let backend = match self.registry.get(id) {
            Ok(backend) => backend,
            Err(e) => return ResultEnvelope::from_error(&e),
        };
        info!(backend = %id, problem_type = %request.problem_type, "dispatching");

        let outcome = catch_unwind(AssertUnwindSafe(|| backend.optimize(request, rng)));
        let envelope = match outcome {
            Ok(envelope) => envelope,
            Err(payload) => {
                let detail = panic_message(payload.as_ref());
                let e = OptimizeError::Internal(format!("{id} backend panicked: {detail}"));
                warn!(error = %e, "backend fault");
                return ResultEnvelope::from_error(&e).with_backend_used(id.as_str());
            }
        };

        match envelope.status {
            Status::Success if !numeric_fields_finite(&envelope) => {
                let e = OptimizeError::Internal(format!("{id} backend produced a non-finite result"));
                warn!(error = %e, "backend fault");
                ResultEnvelope::from_error(&e).with_backend_used(id.as_str())
            }
            Status::Success => envelope,
            Status::Error => {
                warn!(backend = %id, message = %envelope.message, "backend reported an error");
                envelope
            }
        }
    }

    /// Runs independent requests on the rayon thread pool.
    ///
    /// Each request gets its own RNG; results keep input order.
    #[cfg(feature = "parallel")]
    pub fn run_batch(&self, requests: &[OptimizationRequest]) -> Vec<ResultEnvelope> {
        use rayon::prelude::*;
        requests
            .par_iter()
            .enumerate()
            .map(|(i, request)| {
                let mut rng = match self.config.seed {
                    Some(seed) => crate::rng::create_rng(seed.wrapping_add(i as u64)),
                    None => crate::rng::rng_from(None),
                };
                self.run_with_rng(request, &mut rng)
            })
            .collect()
    }
}

impl Default for OptimizationService {
    fn default() -> Self {
        let config = ServiceConfig::default();
        let registry = BackendRegistry::new(Capabilities::probe(), &config.anneal, &config.variational);
        Self {
            config,
            registry,
            router: BackendRouter::default(),
        }
    }
}

fn numeric_fields_finite(envelope: &ResultEnvelope) -> bool {
    envelope.energy.is_some_and(f64::is_finite)
        && envelope.confidence.is_some_and(f64::is_finite)
        && envelope.optimal_parameters.iter().all(|p| p.is_finite())
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
