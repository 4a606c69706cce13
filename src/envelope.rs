//! Request and result shapes shared by every backend.

use crate::error::{OptimizeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_problem_type() -> String {
    "generic".to_string()
}

fn empty_parameters() -> Value {
    Value::Object(serde_json::Map::new())
}

/// A single optimization request as received from the caller.
///
/// `parameters` is kept as raw JSON: each backend interprets it on its own
/// terms (see [`crate::params`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    /// Free-form problem label.
    #[serde(default = "default_problem_type")]
    pub problem_type: String,

    /// Backend-specific parameters, usually an object or a flat array.
    #[serde(default = "empty_parameters")]
    pub parameters: Value,

    /// Explicit backend name. Overrides intent and problem-type hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,

    /// Free-text intent, classified by the router before dispatch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    /// Sampling shots. Accepted for compatibility; evaluation is exact.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shots: Option<u32>,
}

impl OptimizationRequest {
    /// Creates a request with the given problem type and parameters.
    pub fn new(problem_type: impl Into<String>, parameters: Value) -> Self {
        Self {
            problem_type: problem_type.into(),
            parameters,
            backend: None,
            intent: None,
            shots: None,
        }
    }

    pub fn with_backend(mut self, backend: impl Into<String>) -> Self {
        self.backend = Some(backend.into());
        self
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    /// Parses a request from its JSON text.
    ///
    /// The top level must be a JSON object.
    pub fn from_json(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        if !value.is_object() {
            return Err(OptimizeError::InvalidInput(
                "request must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Outcome of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// The normalized result returned for every request, whichever backend ran.
///
/// On error only `status`, `message` and (when known) `backend_used` and
/// `execution_time_ms` are populated; numeric fields are absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub status: Status,

    /// Best parameters found, or the sampled variational weights.
    #[serde(default)]
    pub optimal_parameters: Vec<f64>,

    /// Objective value. Lower is better.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy: Option<f64>,

    /// Heuristic quality signal, not a calibrated probability.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_used: Option<String>,

    #[serde(default)]
    pub message: String,

    /// Wall-clock time spent inside the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ResultEnvelope {
    /// Builds a success envelope.
    pub fn success(
        backend_used: impl Into<String>,
        optimal_parameters: Vec<f64>,
        energy: f64,
        confidence: f64,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status: Status::Success,
            optimal_parameters,
            energy: Some(energy),
            confidence: Some(confidence),
            backend_used: Some(backend_used.into()),
            message: message.into(),
            execution_time_ms: None,
        }
    }

    /// Builds an error envelope with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.is_empty() {
            message = "unknown error".to_string();
        }
        Self {
            status: Status::Error,
            optimal_parameters: Vec::new(),
            energy: None,
            confidence: None,
            backend_used: None,
            message,
            execution_time_ms: None,
        }
    }

    /// Builds an error envelope from a typed error.
    pub fn from_error(err: &OptimizeError) -> Self {
        Self::error(err.to_string())
    }

    pub fn with_backend_used(mut self, backend: impl Into<String>) -> Self {
        self.backend_used = Some(backend.into());
        self
    }

    pub fn with_execution_time_ms(mut self, ms: u64) -> Self {
        self.execution_time_ms = Some(ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Checks the envelope contract.
    ///
    /// A success must carry a non-empty parameter vector and a finite
    /// energy; an error must carry a message and no numeric fields.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        match self.status {
            Status::Success => {
                if self.optimal_parameters.is_empty() {
                    return Err("success envelope has no optimal_parameters".into());
                }
                match self.energy {
                    Some(e) if e.is_finite() => {}
                    Some(e) => return Err(format!("success envelope has non-finite energy {e}")),
                    None => return Err("success envelope has no energy".into()),
                }
                if self.confidence.is_none_or(|c| !c.is_finite()) {
                    return Err("success envelope has no finite confidence".into());
                }
                Ok(())
            }
            Status::Error => {
                if self.message.is_empty() {
                    return Err("error envelope has an empty message".into());
                }
                if !self.optimal_parameters.is_empty()
                    || self.energy.is_some()
                    || self.confidence.is_some()
                {
                    return Err("error envelope carries numeric fields".into());
                }
                Ok(())
            }
        }
    }

    /// Serializes the envelope as a single JSON line.
    pub fn to_json_line(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| OptimizeError::Internal(format!("failed to serialize envelope: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_defaults() {
        let req = OptimizationRequest::from_json("{}").unwrap();
        assert_eq!(req.problem_type, "generic");
        assert_eq!(req.parameters, json!({}));
        assert!(req.backend.is_none());
        assert!(req.intent.is_none());
    }

    #[test]
    fn test_request_full() {
        let req = OptimizationRequest::from_json(
            r#"{"problem_type":"maxcut","parameters":{"nodes":4},"backend":"sa","intent":"optimize it","shots":1024}"#,
        )
        .unwrap();
        assert_eq!(req.problem_type, "maxcut");
        assert_eq!(req.parameters["nodes"], json!(4));
        assert_eq!(req.backend.as_deref(), Some("sa"));
        assert_eq!(req.shots, Some(1024));
    }

    #[test]
    fn test_request_rejects_non_object() {
        let err = OptimizationRequest::from_json("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), "input");
        let err = OptimizationRequest::from_json("not json").unwrap_err();
        assert_eq!(err.kind(), "input");
    }

    #[test]
    fn test_error_envelope_shape() {
        let env = ResultEnvelope::error("boom");
        let v: Value = serde_json::from_str(&env.to_json_line().unwrap()).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "boom");
        assert_eq!(v["optimal_parameters"], json!([]));
        assert!(v.get("energy").is_none());
        assert!(v.get("confidence").is_none());
        assert!(env.check_invariants().is_ok());
    }

    #[test]
    fn test_error_envelope_never_empty_message() {
        let env = ResultEnvelope::error("");
        assert!(!env.message.is_empty());
    }

    #[test]
    fn test_success_roundtrip_keeps_invariants() {
        let env = ResultEnvelope::success("simulated_annealer_cpu", vec![0.1, 0.2], -5.0, 0.97, "ok")
            .with_execution_time_ms(3);
        let line = env.to_json_line().unwrap();
        let back: ResultEnvelope = serde_json::from_str(&line).unwrap();
        assert_eq!(back, env);
        assert!(back.check_invariants().is_ok());
        assert!(line.contains(r#""status":"success""#));
    }

    #[test]
    fn test_invariants_reject_empty_success() {
        let env = ResultEnvelope::success("x", vec![], -1.0, 0.9, "degenerate");
        assert!(env.check_invariants().is_err());
    }

    #[test]
    fn test_invariants_reject_non_finite_energy() {
        let env = ResultEnvelope::success("x", vec![1.0], f64::INFINITY, 0.9, "bad");
        assert!(env.check_invariants().is_err());
    }
}
