//! Dense statevector simulation.
//!
//! Basis states are indexed little-endian: qubit `q` is bit `q` of the
//! index.

use super::circuit::{Circuit, Gate};
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

type Matrix2 = [[Complex64; 2]; 2];

/// Amplitudes of an `n`-qubit pure state.
#[derive(Debug, Clone, PartialEq)]
pub struct Statevector {
    num_qubits: usize,
    amplitudes: Vec<Complex64>,
}

impl Statevector {
    /// The all-zeros state `|0…0⟩`.
    pub fn zero(num_qubits: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            num_qubits,
            amplitudes,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Sum of squared magnitudes. 1 for a normalized state.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Applies every gate of `circuit` with angles bound to the given values.
    pub fn evolve(&mut self, circuit: &Circuit, features: &[f64], weights: &[f64]) {
        for gate in circuit.gates() {
            match *gate {
                Gate::H(q) => self.apply_single(q, hadamard()),
                Gate::P(q, angle) => self.apply_single(q, phase(angle.resolve(features, weights))),
                Gate::Ry(q, angle) => self.apply_single(q, ry(angle.resolve(features, weights))),
                Gate::Cx(c, t) => self.apply_cx(c, t),
            }
        }
    }

    /// Applies a 2×2 unitary to qubit `q`.
    pub fn apply_single(&mut self, q: usize, m: Matrix2) {
        let bit = 1usize << q;
        for k in 0..self.amplitudes.len() {
            if k & bit != 0 {
                continue;
            }
            let a0 = self.amplitudes[k];
            let a1 = self.amplitudes[k | bit];
            self.amplitudes[k] = m[0][0] * a0 + m[0][1] * a1;
            self.amplitudes[k | bit] = m[1][0] * a0 + m[1][1] * a1;
        }
    }

    /// Flips `target` on every basis state where `control` is set.
    pub fn apply_cx(&mut self, control: usize, target: usize) {
        let cbit = 1usize << control;
        let tbit = 1usize << target;
        for k in 0..self.amplitudes.len() {
            if k & cbit != 0 && k & tbit == 0 {
                self.amplitudes.swap(k, k | tbit);
            }
        }
    }

    /// Exact expectation of `Z ⊗ … ⊗ Z`: `Σ |a_k|² · (-1)^popcount(k)`.
    pub fn expectation_parity(&self) -> f64 {
        self.amplitudes
            .iter()
            .enumerate()
            .map(|(k, a)| {
                let sign = if k.count_ones() % 2 == 0 { 1.0 } else { -1.0 };
                sign * a.norm_sqr()
            })
            .sum()
    }
}

fn hadamard() -> Matrix2 {
    let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
    [[h, h], [h, -h]]
}

fn phase(lambda: f64) -> Matrix2 {
    let one = Complex64::new(1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);
    [[one, zero], [zero, Complex64::from_polar(1.0, lambda)]]
}

fn ry(theta: f64) -> Matrix2 {
    let (s, c) = (theta / 2.0).sin_cos();
    [
        [Complex64::new(c, 0.0), Complex64::new(-s, 0.0)],
        [Complex64::new(s, 0.0), Complex64::new(c, 0.0)],
    ]
}
