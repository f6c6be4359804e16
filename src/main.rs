// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::time::Instant;

use anyhow::Context;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use inverter::backends::EngineSet;
use inverter::config::{load_and_validate_config, Config};
use inverter::io::Port;
use inverter::parallel::run_all;
use inverter::traits::Entity;
use inverter::{Controller, Inverter, RunResult, SignalSource};

/// Number of aligned samples printed per model
const PREVIEW: usize = 20;

/// Everything the self-test produced, as printed with `--json`.
#[derive(Serialize)]
struct Report {
    input: Vec<i64>,
    results: Vec<RunResult>,
    failures: Vec<Failure>,
}

#[derive(Serialize)]
struct Failure {
    entity: String,
    model: String,
    error: String,
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [config.yaml] [--json]", program);
    eprintln!("Example: {} configs/selftest.yaml", program);
    eprintln!("Without a configuration only the native model runs.");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("inverter-selftest");
    let mut config_file = None;
    let mut json = false;
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "-h" | "--help" => {
                print_usage(program);
                return Ok(());
            }
            path if config_file.is_none() => config_file = Some(path.to_string()),
            _ => {
                print_usage(program);
                std::process::exit(1);
            }
        }
    }

    let config = match &config_file {
        Some(path) => load_and_validate_config(path)
            .with_context(|| format!("Failed to load configuration '{}'", path))?,
        None => Config::default(),
    };

    let report = run_selftest(&config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&config, &report);
    }

    if !report.failures.is_empty() {
        std::process::exit(2);
    }
    Ok(())
}

/// Drives every configured model with the same random stimulus.
async fn run_selftest(config: &Config) -> anyhow::Result<Report> {
    let start_time = Instant::now();

    let mut controller = Controller::new();
    controller.set_property("rs", config.rs)?;
    controller.reset();
    controller.start_datafeed();

    let mut source = SignalSource::with_parent(&controller)?.with_length(config.length);
    if let Some(seed) = config.seed {
        source = source.with_seed(seed);
    }
    source.run()?;
    let data = source
        .data()
        .context("Signal source produced no data")?
        .values()
        .to_vec();
    let clk = source
        .clk()
        .context("Signal source produced no clock")?
        .values()
        .to_vec();

    let engines = EngineSet::from_config(config);
    let mut inverters = Vec::with_capacity(config.models.len());
    for &model in &config.models {
        let mut inverter = Inverter::with_parent(&controller)?
            .with_engines(engines.clone())
            .with_model(model);
        inverter.apply_config(config)?;
        inverter.connect_control(controller.control_write());
        inverter.set_input("A", data.clone())?;
        inverter.set_input("CLK", clk.clone())?;
        inverters.push(inverter);
    }

    let completed = run_all(inverters).await;
    tracing::info!(
        models = config.models.len(),
        published = completed.results.len(),
        duration_ms = start_time.elapsed().as_millis() as u64,
        "Self-test finished"
    );

    let mut results = completed.results;
    results.sort_by_key(|r| r.model);
    let failures = completed
        .failures
        .into_iter()
        .map(|(entity, model, error)| Failure {
            entity,
            model: model.to_string(),
            error: error.to_string(),
        })
        .collect();

    Ok(Report {
        input: data,
        results,
        failures,
    })
}

fn preview(samples: &[i64]) -> String {
    samples
        .iter()
        .take(PREVIEW)
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_report(config: &Config, report: &Report) {
    println!("🔌 Inverter self-test");
    println!("═══════════════════════════════════");
    println!("Models:  {}", config.models.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", "));
    println!("Samples: {} at {:e} Hz", report.input.len(), config.rs);
    println!();

    println!("{:<12} {}", "A", preview(&report.input));
    for result in &report.results {
        let Some(z) = result.ios.get("Z").and_then(Port::samples) else {
            continue;
        };
        // Aligned so every row lines up with the input above.
        println!("{:<12} {}", format!("Z {}", result.model), preview(z.aligned()));
    }

    for failure in &report.failures {
        println!();
        println!("❌ {} ({}) failed: {}", failure.entity, failure.model, failure.error);
    }
}
