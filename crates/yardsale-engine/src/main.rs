//! Headless driver for the Yardsale wealth-exchange simulation.
//!
//! Loads configuration, builds and resets an engine, runs it in batches
//! until the round limit or the terminal state, and optionally writes the
//! final results snapshot as JSON.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `yardsale-config.yaml` (or `YARDSALE_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Build and reset the simulation engine
//! 4. Run the batch loop with periodic progress logging
//! 5. Log the result and export the results snapshot

mod error;
mod progress;

use std::path::{Path, PathBuf};

use tracing::info;
use tracing_subscriber::EnvFilter;
use yardsale_core::config::LoggingConfig;
use yardsale_core::runner::{self, RunBounds};
use yardsale_core::{Simulation, SimulationConfig};
use yardsale_types::{DEFAULT_MAX_CHART_POINTS, ResultsView};

use crate::error::EngineError;
use crate::progress::ProgressCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "yardsale-config.yaml";

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the results cannot be
/// written.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let config_path = config_path();
    let (config, loaded_from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("yardsale-engine starting");
    if loaded_from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }
    info!(
        n_agents = config.population.n_agents,
        initial_wealth = config.population.initial_wealth,
        greedy_ratio = config.population.greedy_ratio,
        neutral_ratio = config.population.neutral_ratio,
        contrarian_ratio = config.contrarian_ratio(),
        rich_bias = config.exchange.rich_bias,
        min_wealth = config.exchange.min_wealth,
        seed = ?config.run.seed,
        policies = ?config.active_policies(),
        "Simulation parameters"
    );

    // 3. Build and reset the engine.
    let bounds = RunBounds::from_config(&config.run);
    let results_path = config.output.results_path.clone();
    let mut callback = ProgressCallback::new(config.logging.report_interval);
    let mut sim = Simulation::new(config).map_err(EngineError::from)?;
    sim.reset();

    // 4. Run.
    let result = runner::run_simulation(&mut sim, bounds, &mut callback);

    // 5. Log and export.
    runner::log_run_end(&result, &sim);

    if let Some(path) = results_path {
        let view = sim.snapshot().downsampled(DEFAULT_MAX_CHART_POINTS);
        write_results(&path, &view)?;
        info!(path = %path.display(), "Results written");
    }

    info!(
        end_reason = ?result.end_reason,
        rounds_executed = result.rounds_executed,
        "yardsale-engine shutdown complete"
    );

    Ok(())
}

/// Install the tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Resolve the configuration path from `YARDSALE_CONFIG`, falling back to
/// [`DEFAULT_CONFIG_PATH`].
fn config_path() -> PathBuf {
    std::env::var_os("YARDSALE_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

/// Load the simulation configuration, falling back to defaults when the
/// file does not exist. The flag reports whether the file was read.
fn load_config(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        let config = SimulationConfig::from_file(path)?;
        Ok((config, true))
    } else {
        let mut config = SimulationConfig::default();
        config.run.apply_env_overrides();
        Ok((config, false))
    }
}

/// Write the results snapshot as pretty-printed JSON.
fn write_results(path: &Path, view: &ResultsView) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(view)?;
    std::fs::write(path, json).map_err(|source| EngineError::Output {
        path: path.to_path_buf(),
        source,
    })
}
