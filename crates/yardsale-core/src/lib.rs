//! Core simulation engine for the Yardsale wealth-exchange model.
//!
//! This crate owns the round loop: pairwise yard-sale exchanges, the three
//! redistribution policies, inequality statistics, and the batch runner that
//! drives an engine until a bound or the terminal state is reached.
//!
//! # Modules
//!
//! - [`config`] -- Typed configuration loaded from `yardsale-config.yaml`
//! - [`engine`] -- The [`Simulation`] state machine (`reset`/`step`/`snapshot`)
//! - [`error`] -- Engine construction errors ([`SimulationError`])
//! - [`exchange`] -- The biased yard-sale exchange between two agents
//! - [`history`] -- Per-round statistics series
//! - [`metrics`] -- Gini coefficient and top-share measures
//! - [`policy`] -- Wealth tax, universal basic income, and safety net
//! - [`runner`] -- Batch execution and the run loop with callbacks
//! - [`snapshot`] -- Read-only projection of engine state into a [`ResultsView`]
//!
//! [`ResultsView`]: yardsale_types::ResultsView

pub mod config;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod history;
pub mod metrics;
pub mod policy;
pub mod runner;
pub mod snapshot;

pub use config::{ConfigError, SimulationConfig};
pub use engine::{EnginePhase, RoundSummary, Simulation};
pub use error::SimulationError;
pub use exchange::ExchangeOutcome;
pub use runner::{
    BatchReport, MAX_BATCH_SIZE, NoOpCallback, RoundCallback, RunBounds, RunEndReason, RunResult,
    run_batch, run_simulation,
};
