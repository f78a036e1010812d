//! Shared type definitions for the Yardsale simulation.
//!
//! This crate is the single source of truth for the data that crosses the
//! engine boundary. Types defined here flow downstream to `TypeScript` via
//! `ts-rs` for whatever dashboard renders the results.
//!
//! # Modules
//!
//! - [`ids`] -- Stable integer identifier for agents
//! - [`enums`] -- Behavioral styles and their stake-fraction lookup table
//! - [`structs`] -- Agents, redistribution counters, and the results snapshot

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::AgentStyle;
pub use ids::AgentId;
pub use structs::{
    Agent, DEFAULT_MAX_CHART_POINTS, RedistributionTotals, ResultsView, StyleBreakdown,
    downsample,
};
