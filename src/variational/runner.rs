//! Forward evaluation of the feature-map + variational-layer network.

use super::circuit::{Angle, Circuit};
use super::config::{VariationalConfig, FEATURE_KEYS, NUM_QUBITS};
use super::statevector::Statevector;
use crate::backend::{Backend, BackendId, Solution};
use crate::confidence::variational_confidence;
use crate::envelope::OptimizationRequest;
use crate::error::{OptimizeError, Result};
use crate::params;
use rand::{Rng, RngCore};
use tracing::debug;

/// An estimator-style network: data encoding followed by a trainable
/// layer, read out through the all-qubit parity observable.
#[derive(Debug, Clone)]
pub struct EstimatorQnn {
    circuit: Circuit,
    num_features: usize,
    num_weights: usize,
}

impl EstimatorQnn {
    /// ZZ feature map composed with one real-amplitudes layer.
    pub fn new(num_qubits: usize) -> Self {
        let feature_map = Circuit::zz_feature_map(num_qubits);
        let ansatz = Circuit::real_amplitudes_layer(num_qubits);
        let num_features = feature_map.num_features();
        let num_weights = ansatz.num_weights();
        Self {
            circuit: feature_map.compose(&ansatz),
            num_features,
            num_weights,
        }
    }

    pub fn num_qubits(&self) -> usize {
        self.circuit.num_qubits()
    }

    pub fn num_features(&self) -> usize {
        self.num_features
    }

    pub fn num_weights(&self) -> usize {
        self.num_weights
    }

    /// Exact expectation value for one `(features, weights)` pair.
    pub fn forward(&self, features: &[f64], weights: &[f64]) -> Result<f64> {
        if features.len() != self.num_features {
            return Err(OptimizeError::Internal(format!(
                "expected {} features, got {}",
                self.num_features,
                features.len()
            )));
        }
        if weights.len() != self.num_weights {
            return Err(OptimizeError::Internal(format!(
                "expected {} weights, got {}",
                self.num_weights,
                weights.len()
            )));
        }
        if let Some((angle, value)) = self.circuit.non_finite_angle(features, weights) {
            return Err(OptimizeError::parameter(
                angle_source(angle),
                format!("encodes to a non-finite rotation angle ({value})"),
            ));
        }
        let mut state = Statevector::zero(self.num_qubits());
        state.evolve(&self.circuit, features, weights);
        let expectation = state.expectation_parity();
        if !expectation.is_finite() {
            return Err(OptimizeError::parameter(
                FEATURE_KEYS.join(", "),
                format!("produce a non-finite expectation ({expectation})"),
            ));
        }
        Ok(expectation)
    }

    /// Samples weights uniformly from `[0, 1)`.
    pub fn sample_weights(&self, rng: &mut dyn RngCore) -> Vec<f64> {
        (0..self.num_weights).map(|_| rng.random::<f64>()).collect()
    }
}

fn feature_name(i: usize) -> String {
    FEATURE_KEYS
        .get(i)
        .map_or_else(|| format!("features[{i}]"), |k| k.to_string())
}

/// Names the input(s) an angle is computed from.
fn angle_source(angle: Angle) -> String {
    match angle {
        Angle::Feature(i) => feature_name(i),
        Angle::FeaturePair(i, j) => format!("{}, {}", feature_name(i), feature_name(j)),
        Angle::Weight(i) => format!("weights[{i}]"),
    }
}

/// Variational forward-pass evaluator.
///
/// No training happens: weights are resampled on every call and reported
/// back as `optimal_parameters`.
#[derive(Debug, Clone)]
pub struct VariationalBackend {
    config: VariationalConfig,
    qnn: EstimatorQnn,
}

impl VariationalBackend {
    pub fn new(config: VariationalConfig) -> Self {
        Self {
            config,
            qnn: EstimatorQnn::new(NUM_QUBITS),
        }
    }

    pub fn qnn(&self) -> &EstimatorQnn {
        &self.qnn
    }

    /// Extracts the two input features from the request parameters.
    pub fn features_from(&self, request: &OptimizationRequest) -> Result<Vec<f64>> {
        params::feature_vector(
            &request.parameters,
            &FEATURE_KEYS,
            &self.config.default_features,
            &self.config.fallback_features,
        )
    }
}

impl Default for VariationalBackend {
    fn default() -> Self {
        Self::new(VariationalConfig::default())
    }
}

impl Backend for VariationalBackend {
    fn id(&self) -> BackendId {
        BackendId::Variational
    }

    fn solve(&self, request: &OptimizationRequest, rng: &mut dyn RngCore) -> Result<Solution> {
        let features = self.features_from(request)?;
        let weights = self.qnn.sample_weights(rng);
        let energy = self.qnn.forward(&features, &weights)?;

        debug!(?features, ?weights, energy, "variational forward pass");

        Ok(Solution {
            optimal_parameters: weights,
            energy,
            confidence: variational_confidence(energy),
            message: "Executed Quantum Neural Network forward pass.".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Status;
    use crate::rng::create_rng;
    use serde_json::json;

    #[test]
    fn test_qnn_shape() {
        let qnn = EstimatorQnn::new(2);
        assert_eq!(qnn.num_qubits(), 2);
        assert_eq!(qnn.num_features(), 2);
        assert_eq!(qnn.num_weights(), 2);
    }

    #[test]
    fn test_forward_reference_values() {
        let qnn = EstimatorQnn::new(2);
        let e = qnn.forward(&[0.5, 0.5], &[0.3, 0.7]).unwrap();
        assert!((e - (-0.0627067666004681)).abs() < 1e-9, "got {e}");
        let e = qnn.forward(&[0.1, 0.2], &[0.5, 0.5]).unwrap();
        assert!((e - (-0.2549514400416605)).abs() < 1e-9, "got {e}");
    }

    #[test]
    fn test_forward_rejects_wrong_lengths() {
        let qnn = EstimatorQnn::new(2);
        assert!(qnn.forward(&[0.5], &[0.1, 0.2]).is_err());
        assert!(qnn.forward(&[0.5, 0.5], &[0.1]).is_err());
    }

    #[test]
    fn test_backend_default_point() {
        let backend = VariationalBackend::default();
        let mut rng = create_rng(42);
        let req = OptimizationRequest::new("qnn", json!({"x": 0.5, "y": 0.5}));
        let env = backend.optimize(&req, &mut rng);

        assert_eq!(env.status, Status::Success);
        assert_eq!(env.optimal_parameters.len(), 2);
        assert!(env.optimal_parameters.iter().all(|w| (0.0..1.0).contains(w)));
        let energy = env.energy.unwrap();
        assert!(energy.is_finite() && (-1.0..=1.0).contains(&energy));
        let expected = 0.85 + energy.abs() * 0.1;
        assert!((env.confidence.unwrap() - expected).abs() < 1e-12);
        assert_eq!(
            env.backend_used.as_deref(),
            Some("variational_qnn_statevector")
        );
        assert!(env.check_invariants().is_ok());
    }

    #[test]
    fn test_energy_matches_reported_weights() {
        let backend = VariationalBackend::default();
        let mut rng = create_rng(9);
        let req = OptimizationRequest::new("qnn", json!([0.2, 0.9, 4.0]));
        let env = backend.optimize(&req, &mut rng);

        let again = backend
            .qnn()
            .forward(&[0.2, 0.9], &env.optimal_parameters)
            .unwrap();
        assert!((env.energy.unwrap() - again).abs() < 1e-12);
    }

    #[test]
    fn test_features_from_variants() {
        let backend = VariationalBackend::default();
        let f = backend
            .features_from(&OptimizationRequest::new("qnn", json!({"y": "0.25"})))
            .unwrap();
        assert_eq!(f, vec![0.5, 0.25]);
        let f = backend
            .features_from(&OptimizationRequest::new("qnn", json!([3])))
            .unwrap();
        assert_eq!(f, vec![3.0, 0.0]);
        let f = backend
            .features_from(&OptimizationRequest::new("qnn", json!("text")))
            .unwrap();
        assert_eq!(f, vec![0.1, 0.2]);
    }

    #[test]
    fn test_non_numeric_features_error_envelope() {
        let backend = VariationalBackend::default();
        let mut rng = create_rng(1);
        let req = OptimizationRequest::new("qnn", json!({"x": "abc"}));
        let env = backend.optimize(&req, &mut rng);
        assert_eq!(env.status, Status::Error);
        assert!(env.message.contains("`x`"));
        assert!(env.energy.is_none());
    }

    #[test]
    fn test_overflowing_features_rejected() {
        let qnn = EstimatorQnn::new(2);
        let err = qnn.forward(&[1e200, 1e200], &[0.3, 0.7]).unwrap_err();
        assert_eq!(err.kind(), "parameter");
        assert!(err.to_string().contains("`x, y`"), "{err}");

        let err = qnn.forward(&[0.5, 0.5], &[f64::NAN, 0.7]).unwrap_err();
        assert!(err.to_string().contains("weights[0]"));
    }

    #[test]
    fn test_overflowing_features_error_envelope() {
        let backend = VariationalBackend::default();
        let mut rng = create_rng(3);
        let req = OptimizationRequest::new("qnn", json!({"x": 1e200, "y": 1e200}));
        let env = backend.optimize(&req, &mut rng);

        assert_eq!(env.status, Status::Error);
        assert!(env.message.contains("invalid parameter"));
        assert!(env.energy.is_none() && env.confidence.is_none());
        assert!(env.check_invariants().is_ok());
        let back: crate::envelope::ResultEnvelope =
            serde_json::from_str(&env.to_json_line().unwrap()).unwrap();
        assert_eq!(back.status, Status::Error);
    }
}
