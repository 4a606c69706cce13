//! Heuristic confidence scores reported in result envelopes.
//!
//! These are synthesized, not measured: the annealing score ignores search
//! quality entirely and the variational score grows without bound in
//! `|energy|`. They live here so a calibrated model can replace them
//! without touching the search or evaluation code.

use rand::{Rng, RngCore};

/// Lower bound of the annealing confidence band.
pub const ANNEALING_BASE: f64 = 0.95;

/// Width of the annealing confidence band.
pub const ANNEALING_SPREAD: f64 = 0.04;

/// Variational confidence at zero energy.
pub const VARIATIONAL_BASE: f64 = 0.85;

/// Variational confidence gained per unit of `|energy|`.
pub const VARIATIONAL_SLOPE: f64 = 0.1;

/// `0.95 + U(0, 0.04)`, independent of the search outcome.
pub fn annealing_confidence(rng: &mut dyn RngCore) -> f64 {
    ANNEALING_BASE + rng.random::<f64>() * ANNEALING_SPREAD
}

/// `0.85 + |energy| * 0.1`. Not clamped to 1.
pub fn variational_confidence(energy: f64) -> f64 {
    VARIATIONAL_BASE + energy.abs() * VARIATIONAL_SLOPE
}
