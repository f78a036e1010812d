//! Agent storage for one simulation run.
//!
//! A [`Population`] owns every agent, active or bankrupt, in id order. An
//! agent's id is its index into the population, so lookups never search.

use rand::Rng;
use tracing::debug;
use yardsale_types::{Agent, AgentId, AgentStyle};

use crate::error::AgentError;
use crate::style::StyleRatios;

/// All agents of a run, indexed by [`AgentId`].
#[derive(Debug, Clone, Default)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    /// Create an empty population.
    pub const fn new() -> Self {
        Self { agents: Vec::new() }
    }

    /// Create `count` agents with ids `0..count`, each holding
    /// `initial_wealth` and a style drawn independently from `ratios`.
    pub fn spawn<R: Rng + ?Sized>(
        count: u32,
        initial_wealth: f64,
        ratios: &StyleRatios,
        rng: &mut R,
    ) -> Self {
        let agents: Vec<Agent> = (0..count)
            .map(|i| Agent::new(AgentId::new(i), ratios.draw(rng), initial_wealth))
            .collect();

        debug!(
            agents = agents.len(),
            initial_wealth,
            greedy = agents.iter().filter(|a| a.style == AgentStyle::Greedy).count(),
            neutral = agents.iter().filter(|a| a.style == AgentStyle::Neutral).count(),
            contrarian = agents.iter().filter(|a| a.style == AgentStyle::Contrarian).count(),
            "Population spawned"
        );

        Self { agents }
    }

    /// Build a population from explicit agents.
    ///
    /// Agents are re-numbered so that each id matches its position.
    pub fn from_agents(agents: impl IntoIterator<Item = Agent>) -> Self {
        let agents = agents
            .into_iter()
            .zip(0_u32..)
            .map(|(agent, i)| Agent {
                id: AgentId::new(i),
                ..agent
            })
            .collect();
        Self { agents }
    }

    /// All agents in id order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Iterate over all agents in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    /// Look up an agent by id.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    /// Look up an agent by id for mutation.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.get_mut(id.index())
    }

    /// Iterate mutably over the agents that are still active.
    pub fn active_mut(&mut self) -> impl Iterator<Item = &mut Agent> {
        self.agents.iter_mut().filter(|a| a.active)
    }

    /// Ids of active agents, ascending.
    pub fn active_ids(&self) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|a| a.active)
            .map(|a| a.id)
            .collect()
    }

    /// Wealth of each active agent, in id order.
    pub fn active_wealths(&self) -> Vec<f64> {
        self.agents
            .iter()
            .filter(|a| a.active)
            .map(|a| a.wealth)
            .collect()
    }

    /// Number of active agents.
    pub fn active_count(&self) -> usize {
        self.agents.iter().filter(|a| a.active).count()
    }

    /// Number of bankrupt agents.
    pub fn bankrupt_count(&self) -> usize {
        self.agents.iter().filter(|a| !a.active).count()
    }

    /// Sum of all wealth held. Bankrupt agents hold zero.
    pub fn total_wealth(&self) -> f64 {
        self.agents.iter().map(|a| a.wealth).sum()
    }

    /// Borrow two distinct agents mutably at once, in the order requested.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::SelfExchange`] if `a == b`, or
    /// [`AgentError::AgentNotFound`] if either id is out of range.
    pub fn pair_mut(
        &mut self,
        a: AgentId,
        b: AgentId,
    ) -> Result<(&mut Agent, &mut Agent), AgentError> {
        if a == b {
            return Err(AgentError::SelfExchange(a));
        }
        let (low, high) = if a < b { (a, b) } else { (b, a) };
        if high.index() >= self.agents.len() {
            return Err(AgentError::AgentNotFound(high));
        }

        let (left, right) = self.agents.split_at_mut(high.index());
        let first = left
            .get_mut(low.index())
            .ok_or(AgentError::AgentNotFound(low))?;
        let second = right
            .first_mut()
            .ok_or(AgentError::AgentNotFound(high))?;

        if a < b {
            Ok((first, second))
        } else {
            Ok((second, first))
        }
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    fn spawn(count: u32) -> Population {
        let ratios = StyleRatios::new(0.33, 0.33).unwrap();
        let mut rng = SmallRng::seed_from_u64(42);
        Population::spawn(count, 100.0, &ratios, &mut rng)
    }

    #[test]
    fn spawn_assigns_sequential_ids_and_equal_wealth() {
        let population = spawn(25);
        assert_eq!(population.agents().len(), 25);
        for (i, agent) in population.iter().enumerate() {
            assert_eq!(agent.id.index(), i);
            assert_eq!(agent.wealth, 100.0);
            assert!(agent.active);
        }
        assert_eq!(population.active_count(), 25);
        assert_eq!(population.bankrupt_count(), 0);
        assert!((population.total_wealth() - 2500.0).abs() < 1e-9);
    }

    #[test]
    fn spawn_with_same_seed_is_reproducible() {
        let a = spawn(50);
        let b = spawn(50);
        let styles_a: Vec<_> = a.iter().map(|x| x.style).collect();
        let styles_b: Vec<_> = b.iter().map(|x| x.style).collect();
        assert_eq!(styles_a, styles_b);
    }

    #[test]
    fn active_views_skip_bankrupt_agents() {
        let mut population = spawn(4);
        let agent = population.get_mut(AgentId::new(1)).unwrap();
        agent.wealth = 0.0;
        agent.active = false;

        assert_eq!(
            population.active_ids(),
            vec![AgentId::new(0), AgentId::new(2), AgentId::new(3)]
        );
        assert_eq!(population.active_wealths(), vec![100.0, 100.0, 100.0]);
        assert_eq!(population.active_count(), 3);
        assert_eq!(population.bankrupt_count(), 1);
        assert_eq!(population.active_mut().count(), 3);
    }

    #[test]
    fn pair_mut_preserves_requested_order() {
        let mut population = spawn(5);
        {
            let (a, b) = population.pair_mut(AgentId::new(3), AgentId::new(1)).unwrap();
            assert_eq!(a.id, AgentId::new(3));
            assert_eq!(b.id, AgentId::new(1));
            a.wealth += 10.0;
            b.wealth -= 10.0;
        }
        assert_eq!(population.get(AgentId::new(3)).unwrap().wealth, 110.0);
        assert_eq!(population.get(AgentId::new(1)).unwrap().wealth, 90.0);
    }

    #[test]
    fn pair_mut_rejects_self_and_missing() {
        let mut population = spawn(3);
        assert!(matches!(
            population.pair_mut(AgentId::new(1), AgentId::new(1)),
            Err(AgentError::SelfExchange(_))
        ));
        assert!(matches!(
            population.pair_mut(AgentId::new(0), AgentId::new(9)),
            Err(AgentError::AgentNotFound(id)) if id == AgentId::new(9)
        ));
    }

    #[test]
    fn from_agents_renumbers_ids() {
        let population = Population::from_agents(vec![
            Agent::new(AgentId::new(7), AgentStyle::Greedy, 5.0),
            Agent::new(AgentId::new(2), AgentStyle::Contrarian, 6.0),
        ]);
        assert_eq!(population.get(AgentId::new(0)).unwrap().style, AgentStyle::Greedy);
        assert_eq!(population.get(AgentId::new(1)).unwrap().wealth, 6.0);
        assert!(population.get(AgentId::new(2)).is_none());
    }

    #[test]
    fn empty_population() {
        let population = Population::new();
        assert!(population.agents().is_empty());
        assert_eq!(population.active_count(), 0);
        assert_eq!(population.total_wealth(), 0.0);
    }
}
