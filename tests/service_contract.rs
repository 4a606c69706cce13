//! End-to-end checks of the request/response contract.

use optiroute::backend::{BackendId, Capabilities};
use optiroute::envelope::{OptimizationRequest, Status};
use optiroute::router::tensor::{infer, InferRequest};
use optiroute::router::{BackendRouter, Tool};
use optiroute::service::{OptimizationService, ServiceConfig};
use serde_json::{json, Value};
use std::process::Command;

fn seeded() -> OptimizationService {
    OptimizationService::new(ServiceConfig::default().with_seed(2024)).unwrap()
}

#[test]
fn test_annealing_request_from_json() {
    let env = seeded().run_json(Some(
        r#"{"problem_type":"maxcut","parameters":{"nodes":12,"density":0.25}}"#,
    ));
    assert_eq!(env.status, Status::Success);
    assert_eq!(env.optimal_parameters.len(), 12);
    assert_eq!(env.message, "Optimized maxcut for 12 nodes.");
    let energy = env.energy.unwrap();
    assert!((-4.0..-2.0).contains(&energy), "energy {energy}");
}

#[test]
fn test_missing_parameters_use_defaults() {
    let env = seeded().run_json(Some(r#"{"problem_type":"generic"}"#));
    assert_eq!(env.status, Status::Success);
    assert_eq!(env.optimal_parameters.len(), 10);
}

#[test]
fn test_non_numeric_nodes_error_envelope() {
    let env = seeded().run("generic", json!({"nodes": "many"}));
    assert_eq!(env.status, Status::Error);
    assert!(env.message.contains("`nodes`"));
    assert!(env.check_invariants().is_ok());
}

#[test]
fn test_no_input_never_raises() {
    let env = seeded().run_json(None);
    assert_eq!(env.status, Status::Error);
    assert_eq!(env.message, "No input provided");
}

#[test]
fn test_variational_missing_dependency_envelope() {
    let service = OptimizationService::with_capabilities(
        ServiceConfig::default(),
        Capabilities::only([BackendId::Annealing]),
    )
    .unwrap();
    let req = OptimizationRequest::new("generic", json!({"x": 0.5, "y": 0.5}))
        .with_backend("variational");
    let env = service.run_request(&req);
    assert_eq!(env.status, Status::Error);
    assert!(env.message.contains("num-complex"));
    assert!(env.optimal_parameters.is_empty());
    assert!(env.energy.is_none());
}

#[cfg(feature = "variational")]
#[test]
fn test_variational_default_point() {
    let env = seeded().run("qnn", json!({"x": 0.5, "y": 0.5}));
    assert_eq!(env.status, Status::Success);
    assert_eq!(env.optimal_parameters.len(), 2);
    assert!(env.energy.unwrap().is_finite());
    assert_eq!(
        env.backend_used.as_deref(),
        Some("variational_qnn_statevector")
    );
    assert_eq!(env.message, "Executed Quantum Neural Network forward pass.");
}

#[cfg(feature = "variational")]
#[test]
fn test_variational_flat_sequence() {
    let req = OptimizationRequest::new("generic", json!([0.3])).with_backend("qnn");
    let env = seeded().run_request(&req);
    assert_eq!(env.status, Status::Success);
    assert_eq!(env.optimal_parameters.len(), 2);
}

#[test]
fn test_router_precedence_examples() {
    let router = BackendRouter::default();

    let d = router.classify("please research quantum computing");
    assert!(d.routes_to(Tool::DeepResearch));
    assert!((d.confidence - 0.96).abs() < 1e-9);

    let d = router.classify("encrypt and optimize this");
    assert!(d.routes_to(Tool::QuantumOptimize));
}

#[test]
fn test_intent_selects_optimization() {
    let req = OptimizationRequest::new("generic", json!({"nodes": 4}))
        .with_intent("run a quantum optimization");
    let env = seeded().run_request(&req);
    assert_eq!(env.status, Status::Success);
    assert_eq!(env.optimal_parameters.len(), 4);
}

#[test]
fn test_tensor_boundary() {
    let resp = infer(
        &BackendRouter::default(),
        &InferRequest::for_intent("please sign this document"),
    )
    .unwrap();
    let d = resp.decision();
    assert_eq!(d.tool, "crypto_service");
    assert!((d.confidence - 0.91).abs() < 1e-6);
}

fn run_cli(args: &[&str]) -> (Option<i32>, Value) {
    let output = Command::new(env!("CARGO_BIN_EXE_optiroute"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run optiroute binary");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 1, "stdout: {stdout}");
    (output.status.code(), serde_json::from_str(stdout.trim()).unwrap())
}

#[test]
fn test_cli_missing_input() {
    let (code, v) = run_cli(&[]);
    assert_eq!(code, Some(1));
    assert_eq!(v, json!({"error": "No input provided"}));
}

#[test]
fn test_cli_success_line() {
    let (code, v) = run_cli(&["--seed", "5", r#"{"problem_type":"tsp","parameters":{"nodes":3}}"#]);
    assert_eq!(code, Some(0));
    assert_eq!(v["status"], "success");
    assert_eq!(v["optimal_parameters"].as_array().unwrap().len(), 3);
    assert_eq!(v["backend_used"], "simulated_annealer_cpu");
}

#[test]
fn test_cli_fault_is_error_status_with_zero_exit() {
    let (code, v) = run_cli(&["{not json"]);
    assert_eq!(code, Some(0));
    assert_eq!(v["status"], "error");
    assert!(v["message"].as_str().unwrap().contains("malformed"));
}

#[test]
fn test_cli_classify() {
    let (code, v) = run_cli(&["--classify", "optimize"]);
    assert_eq!(code, Some(0));
    assert_eq!(v["tool"], "quantum_optimize");
}

#[test]
fn test_cli_iteration_budget_over_limit_is_error_line() {
    let (code, v) = run_cli(&[
        "--iterations",
        "10000000000000",
        r#"{"parameters":{"nodes":2}}"#,
    ]);
    assert_eq!(code, Some(0));
    assert_eq!(v["status"], "error");
    assert!(v["message"].as_str().unwrap().contains("max_iterations"));
}

#[test]
fn test_overflowing_inputs_are_parameter_errors() {
    let env = seeded().run("maxcut", json!({"nodes": 10, "density": 1e308}));
    assert_eq!(env.status, Status::Error);
    assert!(env.message.contains("`density`"), "{}", env.message);
    assert!(!env.message.contains("internal"));
}
