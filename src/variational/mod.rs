//! Variational circuit evaluator.
//!
//! Encodes two numeric features with a ZZ feature map, applies one
//! real-amplitudes layer with randomly sampled weights, and returns the
//! exact parity expectation computed on a dense statevector.
//!
//! The evaluator itself needs complex arithmetic from `num-complex` and is
//! only compiled with the `variational` feature. Configuration and circuit
//! structure are always available so callers can describe the backend
//! even when it cannot run.

mod circuit;
mod config;
#[cfg(feature = "variational")]
mod runner;
#[cfg(feature = "variational")]
mod statevector;

pub use circuit::{Angle, Circuit, Gate};
pub use config::{VariationalConfig, FEATURE_KEYS, NUM_QUBITS};
#[cfg(feature = "variational")]
pub use runner::{EstimatorQnn, VariationalBackend};
#[cfg(feature = "variational")]
pub use statevector::Statevector;
