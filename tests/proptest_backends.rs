//! Property-based tests for the backends, router and envelope contract.

use optiroute::anneal::{AnnealConfig, AnnealProblem, AnnealRunner, AnnealingBackend};
use optiroute::backend::Backend;
use optiroute::envelope::{OptimizationRequest, ResultEnvelope, Status};
use optiroute::rng::create_rng;
use optiroute::router::{BackendRouter, Tool};
use optiroute::service::{OptimizationService, ServiceConfig};
use proptest::prelude::*;
use serde_json::json;
use std::f64::consts::TAU;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_annealing_parameter_length_and_range(
        nodes in 1i64..200,
        density in 0.0f64..=1.0,
        seed in any::<u64>()
    ) {
        let backend = AnnealingBackend::default();
        let req = OptimizationRequest::new("generic", json!({"nodes": nodes, "density": density}));
        let env = backend.optimize(&req, &mut create_rng(seed));

        prop_assert_eq!(env.status, Status::Success);
        prop_assert_eq!(env.optimal_parameters.len(), nodes as usize);
        for p in &env.optimal_parameters {
            prop_assert!((0.0..TAU).contains(p), "angle {} out of range", p);
        }
        let c = env.confidence.unwrap();
        prop_assert!((0.95..=0.99).contains(&c), "confidence {}", c);
    }

    #[test]
    fn test_annealing_energy_is_minimum(
        nodes in 1i64..50,
        density in 0.0f64..=1.0,
        iterations in 1usize..300,
        seed in any::<u64>()
    ) {
        let config = AnnealConfig::default()
            .with_iterations(iterations)
            .with_seed(seed)
            .with_record_trials(true);
        let result = AnnealRunner::run(&AnnealProblem::new(nodes, density), &config).unwrap();

        prop_assert_eq!(result.trial_energies.len(), iterations);
        for &e in &result.trial_energies {
            prop_assert!(result.best_energy <= e);
        }
        prop_assert!(result.best_energy.is_finite());
    }

    #[test]
    fn test_successful_envelopes_survive_roundtrip(
        nodes in 1i64..64,
        seed in any::<u64>()
    ) {
        let service = OptimizationService::new(ServiceConfig::default().with_seed(seed)).unwrap();
        let env = service.run("maxcut", json!({"nodes": nodes}));
        prop_assert!(env.is_success());

        let line = env.to_json_line().unwrap();
        let back: ResultEnvelope = serde_json::from_str(&line).unwrap();
        prop_assert!(back.check_invariants().is_ok());
        prop_assert_eq!(back.optimal_parameters.len(), env.optimal_parameters.len());
        for (a, b) in back.optimal_parameters.iter().zip(&env.optimal_parameters) {
            prop_assert!((a - b).abs() < 1e-12);
        }
        prop_assert!((back.energy.unwrap() - env.energy.unwrap()).abs() < 1e-12);
        prop_assert_eq!(back.backend_used, env.backend_used);
    }

    #[test]
    fn test_router_never_panics_and_scores_are_known(intent in ".{0,80}") {
        let d = BackendRouter::default().classify(&intent);
        let base = [0.95, 0.98, 0.90, 0.5];
        let bonus = if intent.chars().count() > 20 { 0.01 } else { 0.0 };
        prop_assert!(
            base.iter().any(|b| (b + bonus - d.confidence).abs() < 1e-9),
            "unexpected confidence {}", d.confidence
        );
        prop_assert!(d.known_tool().is_some());
    }

    #[test]
    fn test_research_keyword_always_wins(prefix in "[a-z ]{0,10}", suffix in "[a-z ]{0,10}") {
        let intent = format!("{prefix}research{suffix} quantum encrypt");
        let d = BackendRouter::default().classify(&intent);
        prop_assert!(d.routes_to(Tool::DeepResearch));
    }

    #[test]
    fn test_service_never_panics_on_arbitrary_text(input in ".{0,64}") {
        let service = OptimizationService::default();
        let env = service.run_json(Some(&input));
        if env.status == Status::Error || !env.optimal_parameters.is_empty() {
            prop_assert!(env.check_invariants().is_ok(), "{:?}", env);
        }
    }
}

#[cfg(feature = "variational")]
mod variational {
    use super::*;
    use optiroute::variational::VariationalBackend;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn test_variational_energy_bounded(
            x in -10.0f64..10.0,
            y in -10.0f64..10.0,
            seed in any::<u64>()
        ) {
            let backend = VariationalBackend::default();
            let req = OptimizationRequest::new("qnn", json!({"x": x, "y": y}));
            let env = backend.optimize(&req, &mut create_rng(seed));

            prop_assert_eq!(env.status, Status::Success);
            prop_assert_eq!(env.optimal_parameters.len(), 2);
            let e = env.energy.unwrap();
            prop_assert!(e.is_finite() && (-1.0 - 1e-9..=1.0 + 1e-9).contains(&e));
            let c = env.confidence.unwrap();
            prop_assert!((c - (0.85 + e.abs() * 0.1)).abs() < 1e-12);
        }
    }
}
