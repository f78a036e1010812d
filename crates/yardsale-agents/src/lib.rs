//! Agent population model for the Yardsale simulation.
//!
//! This crate contains the agent-local logic -- everything that operates on
//! agents without knowing about rounds, policies, or statistics. It sits
//! between `yardsale-types` (which defines the data structures) and
//! `yardsale-core` (which orchestrates rounds).
//!
//! # Modules
//!
//! - [`bankruptcy`] -- The irreversible bankruptcy rule ([`apply_bankruptcy`])
//! - [`error`] -- Error types for population operations ([`AgentError`])
//! - [`population`] -- Agent storage in id order ([`Population`])
//! - [`style`] -- Style ratios and the weighted style draw ([`StyleRatios`])

pub mod bankruptcy;
pub mod error;
pub mod population;
pub mod style;

// Re-export primary types at crate root for convenience.
pub use bankruptcy::{Bankruptcy, apply_bankruptcy, is_insolvent};
pub use error::AgentError;
pub use population::Population;
pub use style::StyleRatios;
