//! Tensor-shaped routing boundary for model-serving runtimes.
//!
//! The router is exposed to an inference server as a model with one
//! `BYTES` input named `intent` and three outputs: `tool` (`BYTES`),
//! `confidence` (`FP32`) and `reasoning` (`BYTES`). The JSON shapes here
//! follow the server's v2 inference protocol.

use super::rules::{BackendRouter, RoutingDecision};
use crate::error::{OptimizeError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INTENT_INPUT: &str = "intent";
pub const TOOL_OUTPUT: &str = "tool";
pub const CONFIDENCE_OUTPUT: &str = "confidence";
pub const REASONING_OUTPUT: &str = "reasoning";

/// One named tensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    pub name: String,
    pub shape: Vec<i64>,
    pub datatype: String,
    pub data: Vec<Value>,
}

impl Tensor {
    pub fn bytes(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            shape: vec![1],
            datatype: "BYTES".to_string(),
            data: vec![Value::String(value.to_string())],
        }
    }

    pub fn fp32(name: &str, value: f32) -> Self {
        Self {
            name: name.to_string(),
            shape: vec![1],
            datatype: "FP32".to_string(),
            data: vec![serde_json::json!(value)],
        }
    }

    /// First scalar element, looking through nested row-major arrays.
    pub fn first(&self) -> Option<&Value> {
        let mut v = self.data.first()?;
        while let Value::Array(items) = v {
            v = items.first()?;
        }
        Some(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferRequest {
    pub inputs: Vec<Tensor>,
}

impl InferRequest {
    /// A `[1, 1]` `BYTES` request carrying one intent.
    pub fn for_intent(intent: &str) -> Self {
        let mut tensor = Tensor::bytes(INTENT_INPUT, intent);
        tensor.shape = vec![1, 1];
        Self {
            inputs: vec![tensor],
        }
    }

    /// The intent string, taken from the first element of any shape.
    pub fn intent(&self) -> Result<&str> {
        let tensor = self
            .inputs
            .iter()
            .find(|t| t.name == INTENT_INPUT)
            .ok_or_else(|| OptimizeError::InvalidInput("missing `intent` input tensor".into()))?;
        tensor
            .first()
            .and_then(Value::as_str)
            .ok_or_else(|| OptimizeError::InvalidInput("`intent` tensor has no string element".into()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferResponse {
    pub outputs: Vec<Tensor>,
}

impl From<&RoutingDecision> for InferResponse {
    fn from(d: &RoutingDecision) -> Self {
        Self {
            outputs: vec![
                Tensor::bytes(TOOL_OUTPUT, &d.tool),
                Tensor::fp32(CONFIDENCE_OUTPUT, d.confidence as f32),
                Tensor::bytes(REASONING_OUTPUT, &d.reasoning),
            ],
        }
    }
}

impl InferResponse {
    /// Reads a decision back out of the output tensors.
    ///
    /// Missing or mistyped outputs fall back to `unknown`, `0.0` and `none`.
    pub fn decision(&self) -> RoutingDecision {
        let mut decision = RoutingDecision {
            tool: "unknown".to_string(),
            confidence: 0.0,
            reasoning: "none".to_string(),
        };
        for output in &self.outputs {
            let Some(value) = output.first() else {
                continue;
            };
            match output.name.as_str() {
                TOOL_OUTPUT => decision.tool = value.as_str().unwrap_or("unknown").to_string(),
                CONFIDENCE_OUTPUT => decision.confidence = value.as_f64().unwrap_or(0.0),
                REASONING_OUTPUT => {
                    decision.reasoning = value.as_str().unwrap_or("none").to_string()
                }
                _ => {}
            }
        }
        decision
    }
}

/// Runs the router over a tensor request.
pub fn infer(router: &BackendRouter, request: &InferRequest) -> Result<InferResponse> {
    let intent = request.intent()?;
    let decision = router.classify(intent);
    tracing::debug!(tool = %decision.tool, confidence = decision.confidence, "routed intent");
    Ok(InferResponse::from(&decision))
}
