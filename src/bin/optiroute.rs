// src/bin/optiroute.rs
//
// Process-style entry point: one JSON request in, one JSON line out.
// Logs go to stderr so stdout carries only the response.

use anyhow::Result;
use clap::Parser;
use optiroute::anneal::AnnealConfig;
use optiroute::backend::BackendId;
use optiroute::envelope::ResultEnvelope;
use optiroute::service::{OptimizationService, ServiceConfig, NO_INPUT};
use std::io::{self, Read, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "optiroute",
    version,
    about = "Run one optimization request and print the result envelope as JSON"
)]
struct Args {
    /// Request JSON, e.g. '{"problem_type":"maxcut","parameters":{"nodes":8}}'. Use "-" for stdin.
    input: Option<String>,

    /// Classify an intent instead of optimizing, and print the routing decision.
    #[arg(long, value_name = "INTENT")]
    classify: Option<String>,

    /// Seed every run for reproducible output.
    #[arg(long, env = "OPTIROUTE_SEED")]
    seed: Option<u64>,

    /// Annealing iterations.
    #[arg(long, env = "OPTIROUTE_ITERATIONS", default_value_t = 100)]
    iterations: usize,

    /// Backend used when the request does not pick one.
    #[arg(long, env = "OPTIROUTE_BACKEND", default_value = "annealing")]
    backend: String,

    /// Log filter when RUST_LOG is unset.
    #[arg(long, env = "OPTIROUTE_LOG", default_value = "warn")]
    log_level: String,
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn build_service(args: &Args) -> optiroute::Result<OptimizationService> {
    let mut config = ServiceConfig::default()
        .with_anneal(AnnealConfig::default().with_iterations(args.iterations))
        .with_default_backend(args.backend.parse::<BackendId>()?);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    OptimizationService::new(config)
}

fn read_input(arg: &str) -> io::Result<String> {
    if arg == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(arg.to_string())
    }
}

fn emit(line: &str) -> Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{line}")?;
    out.flush()?;
    Ok(())
}

fn emit_envelope(envelope: &ResultEnvelope) -> Result<()> {
    match envelope.to_json_line() {
        Ok(line) => emit(&line),
        Err(e) => emit(&serde_json::json!({"status": "error", "message": e.to_string()}).to_string()),
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let service = match build_service(&args) {
        Ok(service) => service,
        Err(e) => {
            emit_envelope(&ResultEnvelope::from_error(&e))?;
            return Ok(ExitCode::SUCCESS);
        }
    };

    if let Some(intent) = &args.classify {
        let decision = service.classify(intent);
        emit(&serde_json::to_string(&decision)?)?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(input) = args.input.as_deref() else {
        emit(&serde_json::json!({ "error": NO_INPUT }).to_string())?;
        return Ok(ExitCode::FAILURE);
    };

    let envelope = match read_input(input) {
        Ok(text) => service.run_json(Some(&text)),
        Err(e) => ResultEnvelope::error(format!("failed to read stdin: {e}")),
    };
    emit_envelope(&envelope)?;
    Ok(ExitCode::SUCCESS)
}
