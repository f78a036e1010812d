//! Batch execution and the bounded run loop.
//!
//! A display layer advances the engine a batch of rounds at a time and
//! refreshes between batches. This module provides both pieces:
//!
//! - [`run_batch`] -- execute up to `batch_size` rounds (capped at
//!   [`MAX_BATCH_SIZE`]), stopping early on the terminal state
//! - [`run_simulation`] -- loop batches until `max_rounds` or the terminal
//!   state, invoking a [`RoundCallback`] after every batch

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::info;

use crate::config::RunConfig;
use crate::engine::Simulation;

/// Upper bound on rounds executed per batch.
pub const MAX_BATCH_SIZE: u32 = 100;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// The configured round limit was reached.
    MaxRoundsReached,
    /// Fewer than two agents are active; no more exchanges are possible.
    TooFewActiveAgents,
}

/// Result of one batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Rounds that actually ran.
    pub rounds_executed: u32,
    /// Whether the run cannot continue (fewer than two active agents).
    pub halted: bool,
}

/// Limits for [`run_simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBounds {
    /// Stop once this many rounds have run. 0 means no limit.
    pub max_rounds: u64,
    /// Rounds per batch.
    pub batch_size: u32,
}

impl RunBounds {
    /// Take the bounds from the `run` section of the configuration.
    pub const fn from_config(run: &RunConfig) -> Self {
        Self {
            max_rounds: run.max_rounds,
            batch_size: run.batch_size,
        }
    }
}

/// Result of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    /// Why the run ended.
    pub end_reason: RunEndReason,
    /// Rounds executed by this run.
    pub rounds_executed: u64,
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run.
    pub finished_at: DateTime<Utc>,
}

/// Callback invoked after each batch completes.
///
/// Implementations can use this to log progress, refresh a display, or
/// export intermediate snapshots.
pub trait RoundCallback<R: Rng> {
    /// Called after every batch, including the last one.
    fn on_batch(&mut self, report: &BatchReport, sim: &Simulation<R>);
}

/// A no-op round callback for testing.
pub struct NoOpCallback;

impl<R: Rng> RoundCallback<R> for NoOpCallback {
    fn on_batch(&mut self, _report: &BatchReport, _sim: &Simulation<R>) {}
}

/// Execute up to `batch_size` rounds, capped at [`MAX_BATCH_SIZE`].
///
/// Stops early when a step reports the terminal state. The batch is also
/// reported as halted when it leaves fewer than two active agents behind.
pub fn run_batch<R: Rng>(sim: &mut Simulation<R>, batch_size: u32) -> BatchReport {
    let mut rounds_executed: u32 = 0;
    let mut halted = false;

    for _ in 0..batch_size.min(MAX_BATCH_SIZE) {
        if !sim.step() {
            halted = true;
            break;
        }
        rounds_executed = rounds_executed.saturating_add(1);
    }

    if sim.active_count() < 2 {
        halted = true;
    }

    BatchReport {
        rounds_executed,
        halted,
    }
}

/// Run batches until the round limit or the terminal state.
///
/// The engine must already be reset. The final batch is shortened so the
/// run never exceeds `max_rounds`.
pub fn run_simulation<R: Rng>(
    sim: &mut Simulation<R>,
    bounds: RunBounds,
    callback: &mut dyn RoundCallback<R>,
) -> RunResult {
    let started_at = Utc::now();
    let mut rounds_executed: u64 = 0;

    info!(
        max_rounds = bounds.max_rounds,
        batch_size = bounds.batch_size,
        agents = sim.agents().len(),
        "Simulation starting"
    );

    let end_reason = loop {
        if bounds.max_rounds > 0 && rounds_executed >= bounds.max_rounds {
            info!(round = sim.round(), max_rounds = bounds.max_rounds, "Round limit reached");
            break RunEndReason::MaxRoundsReached;
        }

        let remaining = if bounds.max_rounds == 0 {
            u64::from(MAX_BATCH_SIZE)
        } else {
            bounds.max_rounds.saturating_sub(rounds_executed)
        };
        let batch = u32::try_from(remaining)
            .unwrap_or(MAX_BATCH_SIZE)
            .min(bounds.batch_size.max(1));

        let report = run_batch(sim, batch);
        rounds_executed = rounds_executed.saturating_add(u64::from(report.rounds_executed));
        callback.on_batch(&report, sim);

        if report.halted {
            info!(
                round = sim.round(),
                active = sim.active_count(),
                "Too few active agents -- simulation halted"
            );
            break RunEndReason::TooFewActiveAgents;
        }
    };

    RunResult {
        end_reason,
        rounds_executed,
        started_at,
        finished_at: Utc::now(),
    }
}

/// Log the end of a run together with the final state of the engine.
pub fn log_run_end<R: Rng>(result: &RunResult, sim: &Simulation<R>) {
    let elapsed_ms = result
        .finished_at
        .signed_duration_since(result.started_at)
        .num_milliseconds();
    let totals = sim.totals();
    info!(
        reason = ?result.end_reason,
        rounds_executed = result.rounds_executed,
        final_round = sim.round(),
        active = sim.active_count(),
        bankrupt = sim.population().bankrupt_count(),
        final_gini = sim.history().gini.last().copied().unwrap_or(0.0),
        taxes_collected = totals.taxes_collected,
        ubi_distributed = totals.ubi_distributed,
        safety_net_interventions = totals.safety_net_interventions,
        elapsed_ms,
        "Simulation ended"
    );
}
