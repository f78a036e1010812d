//! Error types for the yardsale-agents crate.
//!
//! All operations that can fail return typed errors rather than panicking.

use yardsale_types::AgentId;

/// Errors that can occur during population operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A style ratio lies outside `[0, 1]` or is not a finite number.
    #[error("style ratio {name} must be within [0, 1], got {value}")]
    InvalidRatio {
        /// Which ratio was rejected (`greedy_ratio` or `neutral_ratio`).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Agent with the given ID does not exist in the population.
    #[error("agent not found: {0}")]
    AgentNotFound(AgentId),

    /// An exchange pair named the same agent twice.
    #[error("agent {0} cannot exchange with itself")]
    SelfExchange(AgentId),
}
