//! Parameterized circuit structure.
//!
//! A [`Circuit`] is a flat gate list whose rotation angles are bound late:
//! each angle refers either to an input feature or to a trainable weight,
//! and is resolved against concrete values at evaluation time.

use std::f64::consts::PI;

/// Where a gate angle comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Angle {
    /// `2 * x_i`.
    Feature(usize),
    /// `2 * (π - x_i) * (π - x_j)`, the pairwise ZZ interaction term.
    FeaturePair(usize, usize),
    /// `θ_i`, a variational weight.
    Weight(usize),
}

impl Angle {
    /// Resolves the angle against concrete features and weights.
    pub fn resolve(&self, features: &[f64], weights: &[f64]) -> f64 {
        match *self {
            Angle::Feature(i) => 2.0 * features[i],
            Angle::FeaturePair(i, j) => 2.0 * (PI - features[i]) * (PI - features[j]),
            Angle::Weight(i) => weights[i],
        }
    }
}

/// A single gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    /// Hadamard on a qubit.
    H(usize),
    /// Phase gate `diag(1, e^{iλ})`.
    P(usize, Angle),
    /// Y rotation.
    Ry(usize, Angle),
    /// Controlled-NOT `(control, target)`.
    Cx(usize, usize),
}

/// An ordered gate list over a fixed number of qubits.
#[derive(Debug, Clone, PartialEq)]
pub struct Circuit {
    num_qubits: usize,
    num_features: usize,
    num_weights: usize,
    gates: Vec<Gate>,
}

impl Circuit {
    /// An empty circuit.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            num_features: 0,
            num_weights: 0,
            gates: Vec::new(),
        }
    }

    /// ZZ feature map with one repetition and full entanglement.
    ///
    /// `H` and `P(2·x_i)` on every qubit, then for every pair `i < j`:
    /// `CX(i, j) · P(2·(π − x_i)(π − x_j)) on j · CX(i, j)`.
    pub fn zz_feature_map(num_qubits: usize) -> Self {
        let mut c = Self::new(num_qubits);
        for q in 0..num_qubits {
            c.push(Gate::H(q));
            c.push(Gate::P(q, Angle::Feature(q)));
        }
        for i in 0..num_qubits {
            for j in (i + 1)..num_qubits {
                c.push(Gate::Cx(i, j));
                c.push(Gate::P(j, Angle::FeaturePair(i, j)));
                c.push(Gate::Cx(i, j));
            }
        }
        c
    }

    /// One real-amplitudes layer: `RY(θ_q)` on every qubit followed by a
    /// linear `CX` entangling chain. Has `num_qubits` weights.
    pub fn real_amplitudes_layer(num_qubits: usize) -> Self {
        let mut c = Self::new(num_qubits);
        for q in 0..num_qubits {
            c.push(Gate::Ry(q, Angle::Weight(q)));
        }
        for q in 0..num_qubits.saturating_sub(1) {
            c.push(Gate::Cx(q, q + 1));
        }
        c
    }

    /// Appends a gate, growing the feature/weight counts as needed.
    pub fn push(&mut self, gate: Gate) {
        let angle = match gate {
            Gate::P(_, a) | Gate::Ry(_, a) => Some(a),
            Gate::H(_) | Gate::Cx(_, _) => None,
        };
        match angle {
            Some(Angle::Feature(i)) => self.num_features = self.num_features.max(i + 1),
            Some(Angle::FeaturePair(i, j)) => {
                self.num_features = self.num_features.max(i.max(j) + 1)
            }
            Some(Angle::Weight(i)) => self.num_weights = self.num_weights.max(i + 1),
            None => {}
        }
        self.gates.push(gate);
    }

    /// Appends every gate of `other`. Both circuits share qubit indices,
    /// feature indices and weight indices.
    pub fn compose(mut self, other: &Circuit) -> Self {
        self.num_qubits = self.num_qubits.max(other.num_qubits);
        for gate in &other.gates {
            self.push(*gate);
        }
        self
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_weights(&self) -> usize {
        self.num_weights
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// First angle that resolves to a non-finite value, if any.
    pub fn non_finite_angle(&self, features: &[f64], weights: &[f64]) -> Option<(Angle, f64)> {
        self.gates.iter().find_map(|gate| match *gate {
            Gate::P(_, a) | Gate::Ry(_, a) => {
                let value = a.resolve(features, weights);
                (!value.is_finite()).then_some((a, value))
            }
            Gate::H(_) | Gate::Cx(_, _) => None,
        })
    }
}
