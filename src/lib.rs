//! Request-routed optimization service.
//!
//! Accepts a described optimization problem, picks a backend, runs a
//! bounded search or evaluation, and returns a normalized
//! [`ResultEnvelope`]:
//!
//! - **Annealing** ([`anneal`]): stochastic search with a linearly decaying
//!   temperature over `nodes` phase parameters.
//! - **Variational** ([`variational`]): ZZ feature map + one real-amplitudes
//!   layer, evaluated exactly on a dense statevector. Requires the
//!   `variational` feature.
//! - **Routing** ([`router`]): ordered keyword classification of free-text
//!   intents into downstream tools.
//! - **Service** ([`service`]): routing, dispatch and the error boundary
//!   that turns every fault into an error envelope.
//!
//! # Example
//!
//! ```
//! use optiroute::service::{OptimizationService, ServiceConfig};
//! use serde_json::json;
//!
//! let service = OptimizationService::new(ServiceConfig::default().with_seed(1)).unwrap();
//! let envelope = service.run("maxcut", json!({"nodes": 8, "density": 0.4}));
//! assert!(envelope.is_success());
//! assert_eq!(envelope.optimal_parameters.len(), 8);
//! ```
//!
//! # Features
//!
//! - `variational` (default): statevector backend, pulls in `num-complex`.
//! - `parallel`: [`service::OptimizationService::run_batch`] on rayon.

pub mod anneal;
pub mod backend;
pub mod confidence;
pub mod envelope;
pub mod error;
pub mod params;
pub mod rng;
pub mod router;
pub mod service;
pub mod variational;

pub use backend::{Backend, BackendId, Capabilities};
pub use envelope::{OptimizationRequest, ResultEnvelope, Status};
pub use error::{OptimizeError, Result};
pub use router::{BackendRouter, RoutingDecision};
pub use service::{OptimizationService, ServiceConfig};
