//! Round callback that logs periodic progress lines.
//!
//! Batches are small, so the callback only logs once the engine has crossed
//! the next multiple of the configured report interval.

use rand::Rng;
use tracing::{debug, info};
use yardsale_core::{BatchReport, RoundCallback, Simulation};

/// Callback that logs inequality statistics every `interval` rounds.
pub struct ProgressCallback {
    interval: u64,
    next_report: u64,
}

impl ProgressCallback {
    /// Create a callback reporting every `interval` rounds. An interval of
    /// zero disables progress lines.
    pub const fn new(interval: u64) -> Self {
        Self {
            interval,
            next_report: interval,
        }
    }

    /// Whether a progress line is due at `round`. Advances the schedule
    /// past `round` when it is.
    const fn due(&mut self, round: u64) -> bool {
        if self.interval == 0 || round < self.next_report {
            return false;
        }
        while self.next_report <= round {
            self.next_report = self.next_report.saturating_add(self.interval);
        }
        true
    }
}

impl<R: Rng> RoundCallback<R> for ProgressCallback {
    fn on_batch(&mut self, report: &BatchReport, sim: &Simulation<R>) {
        debug!(
            round = sim.round(),
            rounds_executed = report.rounds_executed,
            halted = report.halted,
            "Batch complete"
        );

        if !self.due(sim.round()) {
            return;
        }

        let history = sim.history();
        info!(
            round = sim.round(),
            active = sim.active_count(),
            bankrupt = sim.population().bankrupt_count(),
            gini = history.gini.last().copied().unwrap_or(0.0),
            top_10_share = history.top_10_share.last().copied().unwrap_or(0.0),
            top_1_share = history.top_1_share.last().copied().unwrap_or(0.0),
            "Progress"
        );
    }
}
