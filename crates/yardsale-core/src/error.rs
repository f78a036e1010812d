//! Error types for engine construction.

use yardsale_agents::AgentError;

use crate::config::ConfigError;

/// Errors that can occur when building a [`Simulation`].
///
/// Once constructed, an engine never fails: stepping past the terminal
/// state is a logged no-op rather than an error.
///
/// [`Simulation`]: crate::engine::Simulation
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// The configuration was rejected by validation.
    #[error("configuration error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The population model rejected a parameter.
    #[error("population error: {source}")]
    Population {
        /// The underlying population error.
        #[from]
        source: AgentError,
    },
}
