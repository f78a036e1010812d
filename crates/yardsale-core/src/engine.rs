//! The simulation engine: one yard-sale round per [`Simulation::step`].
//!
//! Each round runs these phases in strict order:
//!
//! 1. **Continuation** -- with fewer than two active agents the engine turns
//!    terminal and the round does not run.
//! 2. **Pairing** -- two distinct active agents are drawn uniformly.
//! 3. **Exchange** -- the biased yard-sale exchange; the loser may go
//!    bankrupt.
//! 4. **Wealth tax** -- if enabled, the richest fraction pays; bankruptcy is
//!    re-applied to every taxed agent.
//! 5. **UBI** -- if enabled, a flat payment to every active agent.
//! 6. **Safety net** -- if enabled, active agents below the floor are raised
//!    to it.
//! 7. **Record** -- inequality statistics over the post-round active
//!    wealths are appended to the history.
//!
//! Every random draw goes through the engine's single generator, so a
//! seeded engine replays the same run.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};
use yardsale_agents::{Bankruptcy, Population, StyleRatios};
use yardsale_types::{Agent, AgentId, RedistributionTotals, ResultsView};

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::exchange::{self, ExchangeOutcome};
use crate::history::RoundHistory;
use crate::policy;
use crate::snapshot;

/// Lifecycle phase of a [`Simulation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnginePhase {
    /// Constructed but never reset; there are no agents yet.
    Uninitialized,
    /// Agents exist and rounds can be run.
    Ready,
    /// Fewer than two agents are active; only a reset can continue.
    Terminal,
}

/// What happened in one completed round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    /// Rounds completed including this one.
    pub round: u64,
    /// Outcome of the round's exchange.
    pub exchange: ExchangeOutcome,
    /// Wealth collected by the tax this round.
    pub taxes_collected: f64,
    /// Wealth paid out as UBI this round.
    pub ubi_distributed: f64,
    /// Agents lifted to the safety-net floor this round.
    pub safety_net_interventions: u64,
    /// Agents that went bankrupt this round.
    pub bankruptcies: Vec<Bankruptcy>,
    /// Active agents at the end of the round.
    pub active_agents: u32,
    /// Gini coefficient at the end of the round.
    pub gini: f64,
}

/// Redistribution totals for one round.
#[derive(Debug, Clone, Copy, Default)]
struct Transfers {
    taxes_collected: f64,
    ubi_distributed: f64,
    safety_net_interventions: u64,
}

/// A single, exclusively owned simulation run.
///
/// Construct with [`Simulation::new`] (or [`Simulation::with_rng`] to inject
/// a generator), call [`reset`](Self::reset) once, then
/// [`step`](Self::step) until it returns `false`.
#[derive(Debug)]
pub struct Simulation<R = StdRng> {
    config: SimulationConfig,
    ratios: StyleRatios,
    rng: R,
    phase: EnginePhase,
    population: Population,
    round: u64,
    totals: RedistributionTotals,
    history: RoundHistory,
    last_round: Option<RoundSummary>,
}

impl Simulation<StdRng> {
    /// Create an engine seeded from `run.seed`, or from the OS when unset.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] if the configuration fails
    /// validation.
    pub fn new(config: SimulationConfig) -> Result<Self, SimulationError> {
        let rng = match config.run.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> Simulation<R> {
    /// Create an engine that draws from the given generator.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::Config`] if the configuration fails
    /// validation.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Result<Self, SimulationError> {
        config.validate()?;
        let ratios = StyleRatios::new(
            config.population.greedy_ratio,
            config.population.neutral_ratio,
        )?;

        Ok(Self {
            config,
            ratios,
            rng,
            phase: EnginePhase::Uninitialized,
            population: Population::new(),
            round: 0,
            totals: RedistributionTotals::default(),
            history: RoundHistory::new(),
            last_round: None,
        })
    }

    /// Discard all state and start a fresh run.
    ///
    /// Styles are re-drawn, every agent gets the initial wealth back, and the
    /// round-0 statistics sample is recorded. Safe to call at any time.
    pub fn reset(&mut self) {
        let population = &self.config.population;
        self.population = Population::spawn(
            population.n_agents,
            population.initial_wealth,
            &self.ratios,
            &mut self.rng,
        );
        self.round = 0;
        self.totals = RedistributionTotals::default();
        self.history.clear();
        self.last_round = None;
        self.history.record(self.population.active_wealths());
        self.phase = EnginePhase::Ready;

        info!(
            agents = population.n_agents,
            initial_wealth = population.initial_wealth,
            rich_bias = self.config.exchange.rich_bias,
            policies = ?self.config.active_policies(),
            "Simulation reset"
        );
    }

    /// Run one round.
    ///
    /// Returns `false` without touching any agent when fewer than two agents
    /// are active, or when the engine has not been reset.
    pub fn step(&mut self) -> bool {
        match self.phase {
            EnginePhase::Uninitialized => {
                warn!("Step requested before reset; no agents to exchange");
                return false;
            }
            EnginePhase::Terminal => {
                warn!(round = self.round, "Step requested on a terminal simulation");
                return false;
            }
            EnginePhase::Ready => {}
        }

        // --- Continuation and pairing ---
        let Some((a, b)) = self.draw_pair() else {
            self.phase = EnginePhase::Terminal;
            info!(
                round = self.round,
                active = self.population.active_count(),
                "Fewer than two active agents remain"
            );
            return false;
        };

        // --- Exchange ---
        let exchange_cfg = &self.config.exchange;
        let outcome = match self.population.pair_mut(a, b) {
            Ok((agent_a, agent_b)) => exchange::execute_exchange(
                agent_a,
                agent_b,
                exchange_cfg.rich_bias,
                exchange_cfg.min_wealth,
                &mut self.rng,
            ),
            Err(err) => {
                warn!(%err, "Drawn pair could not be borrowed");
                return false;
            }
        };

        let mut bankruptcies = Vec::new();
        if let ExchangeOutcome::Transferred {
            bankruptcy: Some(record),
            ..
        } = outcome
        {
            bankruptcies.push(record);
        }

        // --- Redistribution ---
        let transfers = self.redistribute(&mut bankruptcies);
        self.totals.taxes_collected += transfers.taxes_collected;
        self.totals.ubi_distributed += transfers.ubi_distributed;
        self.totals.safety_net_interventions = self
            .totals
            .safety_net_interventions
            .saturating_add(transfers.safety_net_interventions);

        // --- Record ---
        let sample = self.history.record(self.population.active_wealths());
        self.round = self.round.saturating_add(1);

        for record in &bankruptcies {
            debug!(
                round = self.round,
                agent_id = %record.agent_id,
                style = %record.style,
                forfeited = record.forfeited_wealth,
                "Agent bankrupt"
            );
        }
        debug!(
            round = self.round,
            stake = outcome.transferred(),
            taxes_collected = transfers.taxes_collected,
            ubi_distributed = transfers.ubi_distributed,
            safety_net_interventions = transfers.safety_net_interventions,
            active = sample.active,
            gini = sample.gini,
            "Round complete"
        );

        self.last_round = Some(RoundSummary {
            round: self.round,
            exchange: outcome,
            taxes_collected: transfers.taxes_collected,
            ubi_distributed: transfers.ubi_distributed,
            safety_net_interventions: transfers.safety_net_interventions,
            bankruptcies,
            active_agents: sample.active,
            gini: sample.gini,
        });
        true
    }

    /// Apply the enabled policies in order: tax, UBI, safety net.
    ///
    /// Bankruptcies caused by the tax are appended to `bankruptcies`.
    fn redistribute(&mut self, bankruptcies: &mut Vec<Bankruptcy>) -> Transfers {
        let mut transfers = Transfers::default();

        let tax = &self.config.wealth_tax;
        if tax.enabled {
            let outcome = policy::apply_wealth_tax(
                &mut self.population,
                tax.threshold,
                tax.rate,
                self.config.exchange.min_wealth,
            );
            transfers.taxes_collected = outcome.collected;
            bankruptcies.extend(outcome.bankruptcies);
        }

        if self.config.ubi.enabled {
            transfers.ubi_distributed =
                policy::distribute_ubi(&mut self.population, self.config.ubi.amount);
        }

        if self.config.safety_net.enabled {
            transfers.safety_net_interventions =
                policy::apply_safety_net(&mut self.population, self.config.safety_net.floor);
        }

        transfers
    }

    /// Draw two distinct active agents uniformly, or `None` if fewer than
    /// two are active.
    fn draw_pair(&mut self) -> Option<(AgentId, AgentId)> {
        let active = self.population.active_ids();
        let n = active.len();
        if n < 2 {
            return None;
        }
        let first = self.rng.random_range(0..n);
        let mut second = self.rng.random_range(0..n.saturating_sub(1));
        if second >= first {
            second = second.saturating_add(1);
        }
        Some((*active.get(first)?, *active.get(second)?))
    }

    /// Project the current state into an owned [`ResultsView`].
    pub fn snapshot(&self) -> ResultsView {
        snapshot::results_view(&self.population, &self.history, self.totals, self.round)
    }

    /// The configuration this engine was built with.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current lifecycle phase.
    pub const fn phase(&self) -> EnginePhase {
        self.phase
    }

    /// Rounds completed since the last reset.
    pub const fn round(&self) -> u64 {
        self.round
    }

    /// Cumulative redistribution counters since the last reset.
    pub const fn totals(&self) -> RedistributionTotals {
        self.totals
    }

    /// Statistics history since the last reset.
    pub const fn history(&self) -> &RoundHistory {
        &self.history
    }

    /// Summary of the most recent completed round.
    pub const fn last_round(&self) -> Option<&RoundSummary> {
        self.last_round.as_ref()
    }

    /// All agents in id order.
    pub fn agents(&self) -> &[Agent] {
        self.population.agents()
    }

    /// The agent population.
    pub const fn population(&self) -> &Population {
        &self.population
    }

    /// Number of agents still active.
    pub fn active_count(&self) -> usize {
        self.population.active_count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::arithmetic_side_effects)]
mod tests {
    use rand::rngs::SmallRng;

    use super::*;

    fn engine(config: SimulationConfig) -> Simulation<SmallRng> {
        Simulation::with_rng(config, SmallRng::seed_from_u64(42)).unwrap()
    }

    #[test]
    fn new_engine_is_uninitialized_and_empty() {
        let mut sim = engine(SimulationConfig::default());
        assert_eq!(sim.phase(), EnginePhase::Uninitialized);
        assert!(sim.agents().is_empty());
        assert!(!sim.step());

        let view = sim.snapshot();
        assert_eq!(view.rounds_completed, 0);
        assert!(view.gini_history.is_empty());
        assert_eq!(view.bankrupt_count, 0);
    }

    #[test]
    fn reset_records_initial_sample() {
        let mut sim = engine(SimulationConfig::default());
        sim.reset();
        assert_eq!(sim.phase(), EnginePhase::Ready);
        assert_eq!(sim.agents().len(), 100);
        assert_eq!(sim.history().len(), 1);
        assert_eq!(sim.history().gini, vec![0.0]);
        assert_eq!(sim.history().active_count, vec![100]);
        assert_eq!(sim.history().top_10_share, vec![10.0]);
        assert_eq!(sim.round(), 0);
        assert!(sim.last_round().is_none());
    }

    #[test]
    fn step_appends_one_history_entry() {
        let mut sim = engine(SimulationConfig::default());
        sim.reset();
        for expected in 1..=25_u64 {
            assert!(sim.step());
            assert_eq!(sim.round(), expected);
            assert_eq!(sim.history().len(), usize::try_from(expected).unwrap() + 1);
            assert_eq!(sim.last_round().map(|s| s.round), Some(expected));
        }
    }

    #[test]
    fn single_agent_is_terminal() {
        let mut config = SimulationConfig::default();
        config.population.n_agents = 1;
        let mut sim = engine(config);
        sim.reset();
        assert!(!sim.step());
        assert_eq!(sim.phase(), EnginePhase::Terminal);
        assert_eq!(sim.agents().first().map(|a| a.wealth), Some(100.0));
        assert_eq!(sim.history().len(), 1);
        // Repeated calls stay safe.
        assert!(!sim.step());
        assert_eq!(sim.round(), 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SimulationConfig::default();
        config.population.greedy_ratio = 0.8;
        config.population.neutral_ratio = 0.8;
        let result = Simulation::with_rng(config, SmallRng::seed_from_u64(1));
        assert!(matches!(result, Err(SimulationError::Config { .. })));
    }

    #[test]
    fn same_seed_replays_the_same_run() {
        let mut config = SimulationConfig::default();
        config.run.seed = Some(7);
        let mut a = Simulation::new(config.clone()).unwrap();
        let mut b = Simulation::new(config).unwrap();
        a.reset();
        b.reset();
        for _ in 0..200 {
            assert_eq!(a.step(), b.step());
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn counters_accumulate_across_rounds() {
        let mut config = SimulationConfig::default();
        config.population.n_agents = 10;
        config.ubi.enabled = true;
        config.ubi.amount = 0.5;
        config.exchange.min_wealth = 0.0;
        let mut sim = engine(config);
        sim.reset();
        for _ in 0..4 {
            assert!(sim.step());
        }
        assert!((sim.totals().ubi_distributed - 20.0).abs() < 1e-9);
        assert_eq!(sim.totals().taxes_collected, 0.0);
    }
}
