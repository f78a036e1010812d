//! Type-safe identifier for agents.
//!
//! Agent identifiers are dense integers assigned in creation order, so the
//! identifier doubles as the agent's position in the population. They are
//! immutable for the lifetime of a population and reassigned from zero on
//! every reset.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique identifier for an agent within one population.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct AgentId(pub u32);

impl AgentId {
    /// Create an identifier from its raw value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Return the identifier as a population index.
    pub fn index(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

impl core::fmt::Display for AgentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
