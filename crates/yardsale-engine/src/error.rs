//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, the run itself, and results export.

use std::path::PathBuf;

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: yardsale_core::ConfigError,
    },

    /// The simulation engine could not be built.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: yardsale_core::SimulationError,
    },

    /// The results snapshot could not be serialized.
    #[error("failed to serialize results: {source}")]
    Serialize {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The results file could not be written.
    #[error("failed to write results to {}: {source}", path.display())]
    Output {
        /// Destination that was being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}
