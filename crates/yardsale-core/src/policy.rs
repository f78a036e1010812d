//! Redistribution policies applied after each exchange.
//!
//! Policies run in a fixed order each round: wealth tax, then universal
//! basic income, then the safety net. They only ever touch active agents.
//! UBI is funded independently of the tax revenue collected in the same
//! round.

use yardsale_agents::{Bankruptcy, Population, apply_bankruptcy};
use yardsale_types::AgentId;

use crate::metrics::top_count;

/// Result of one wealth-tax pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaxOutcome {
    /// Total wealth removed from taxed agents.
    pub collected: f64,
    /// Number of agents taxed.
    pub taxed: usize,
    /// Agents pushed below the minimum wealth by the tax.
    pub bankruptcies: Vec<Bankruptcy>,
}

/// Tax the richest `threshold` fraction of active agents at `rate`.
///
/// At least one agent is taxed whenever any agent is active. Each taxed
/// agent pays `rate` times its pre-tax wealth. The bankruptcy rule is
/// re-applied to every taxed agent afterwards.
pub fn apply_wealth_tax(
    population: &mut Population,
    threshold: f64,
    rate: f64,
    min_wealth: f64,
) -> TaxOutcome {
    let mut ranked: Vec<(AgentId, f64)> = population
        .iter()
        .filter(|a| a.active)
        .map(|a| (a.id, a.wealth))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(top_count(ranked.len(), threshold));

    let mut outcome = TaxOutcome::default();
    for (id, _) in ranked {
        let Some(agent) = population.get_mut(id) else {
            continue;
        };
        let tax = agent.wealth * rate;
        agent.wealth -= tax;
        outcome.collected += tax;
        outcome.taxed = outcome.taxed.saturating_add(1);
        if let Some(record) = apply_bankruptcy(agent, min_wealth) {
            outcome.bankruptcies.push(record);
        }
    }
    outcome
}

/// Pay `amount` to every active agent. Returns the total paid.
pub fn distribute_ubi(population: &mut Population, amount: f64) -> f64 {
    let mut total = 0.0;
    for agent in population.active_mut() {
        agent.wealth += amount;
        total += amount;
    }
    total
}

/// Raise every active agent below `floor` to exactly `floor`.
///
/// Returns the number of agents raised.
pub fn apply_safety_net(population: &mut Population, floor: f64) -> u64 {
    let mut interventions: u64 = 0;
    for agent in population.active_mut() {
        if agent.wealth < floor {
            agent.wealth = floor;
            interventions = interventions.saturating_add(1);
        }
    }
    interventions
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use yardsale_types::{Agent, AgentStyle};

    use super::*;

    fn population(wealths: &[f64]) -> Population {
        Population::from_agents(
            wealths
                .iter()
                .map(|&w| Agent::new(AgentId::default(), AgentStyle::Neutral, w)),
        )
    }

    fn bankrupt(population: &mut Population, id: u32) {
        if let Some(agent) = population.get_mut(AgentId::new(id)) {
            agent.wealth = 0.0;
            agent.active = false;
        }
    }

    #[test]
    fn tax_hits_richest_decile() {
        let mut wealths = vec![10.0; 18];
        wealths.push(500.0);
        wealths.push(300.0);
        let mut pop = population(&wealths);

        let outcome = apply_wealth_tax(&mut pop, 0.10, 0.02, 0.1);
        assert_eq!(outcome.taxed, 2);
        assert!((outcome.collected - 16.0).abs() < 1e-9);
        assert!((pop.get(AgentId::new(18)).map_or(0.0, |a| a.wealth) - 490.0).abs() < 1e-9);
        assert!((pop.get(AgentId::new(19)).map_or(0.0, |a| a.wealth) - 294.0).abs() < 1e-9);
        assert_eq!(pop.get(AgentId::new(0)).map(|a| a.wealth), Some(10.0));
        assert!(outcome.bankruptcies.is_empty());
    }

    #[test]
    fn tax_takes_at_least_one_agent() {
        let mut pop = population(&[5.0, 50.0, 20.0]);
        let outcome = apply_wealth_tax(&mut pop, 0.10, 0.10, 0.0);
        assert_eq!(outcome.taxed, 1);
        assert!((outcome.collected - 5.0).abs() < 1e-12);
        assert_eq!(pop.get(AgentId::new(1)).map(|a| a.wealth), Some(45.0));
    }

    #[test]
    fn tax_conserves_wealth() {
        let mut pop = population(&[5.0, 50.0, 20.0, 80.0, 1.0]);
        let before = pop.total_wealth();
        let outcome = apply_wealth_tax(&mut pop, 0.5, 0.2, 0.0);
        assert!((before - outcome.collected - pop.total_wealth()).abs() < 1e-9);
    }

    #[test]
    fn tax_skips_bankrupt_agents() {
        let mut pop = population(&[100.0, 40.0]);
        bankrupt(&mut pop, 0);
        let outcome = apply_wealth_tax(&mut pop, 0.5, 0.5, 0.0);
        assert_eq!(outcome.taxed, 1);
        assert_eq!(pop.get(AgentId::new(0)).map(|a| a.wealth), Some(0.0));
        assert_eq!(pop.get(AgentId::new(1)).map(|a| a.wealth), Some(20.0));
    }

    #[test]
    fn tax_reapplies_bankruptcy() {
        let mut pop = population(&[1.0, 0.9]);
        let outcome = apply_wealth_tax(&mut pop, 1.0, 0.6, 0.5);
        assert_eq!(outcome.taxed, 2);
        assert_eq!(outcome.bankruptcies.len(), 2);
        assert_eq!(pop.active_count(), 0);
        assert_eq!(pop.total_wealth(), 0.0);
    }

    #[test]
    fn tax_on_empty_population_is_noop() {
        let mut pop = Population::new();
        assert_eq!(apply_wealth_tax(&mut pop, 0.1, 0.02, 0.1), TaxOutcome::default());
    }

    #[test]
    fn ubi_pays_active_agents_only() {
        let mut pop = population(&[1.0, 2.0, 3.0]);
        bankrupt(&mut pop, 1);
        let paid = distribute_ubi(&mut pop, 1.5);
        assert_eq!(paid, 3.0);
        assert_eq!(pop.get(AgentId::new(0)).map(|a| a.wealth), Some(2.5));
        assert_eq!(pop.get(AgentId::new(1)).map(|a| a.wealth), Some(0.0));
        assert_eq!(pop.get(AgentId::new(2)).map(|a| a.wealth), Some(4.5));
    }

    #[test]
    fn safety_net_raises_to_floor_exactly() {
        let mut pop = population(&[3.0, 10.0, 25.0, 9.99]);
        let interventions = apply_safety_net(&mut pop, 10.0);
        assert_eq!(interventions, 2);
        let wealths: Vec<f64> = pop.iter().map(|a| a.wealth).collect();
        assert_eq!(wealths, vec![10.0, 10.0, 25.0, 10.0]);
    }

    #[test]
    fn safety_net_ignores_bankrupt_agents() {
        let mut pop = population(&[3.0, 4.0]);
        bankrupt(&mut pop, 0);
        assert_eq!(apply_safety_net(&mut pop, 10.0), 1);
        assert_eq!(pop.get(AgentId::new(0)).map(|a| a.wealth), Some(0.0));
        assert!(pop.get(AgentId::new(0)).is_some_and(|a| !a.active));
    }
}
