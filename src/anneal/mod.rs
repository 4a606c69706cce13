//! Annealing-style stochastic search.
//!
//! Approximates an energy-minimization process: each trial perturbs the
//! noiseless optimum `-(nodes * density)` by uniform noise scaled with a
//! linearly decaying temperature, and the lowest trial wins. Improving
//! trials resample a vector of phase angles in `[0, 2π)`.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

mod backend;
mod config;
mod runner;

pub use backend::AnnealingBackend;
pub use config::AnnealConfig;
pub use runner::{cooling_factor, AnnealProblem, AnnealResult, AnnealRunner};
