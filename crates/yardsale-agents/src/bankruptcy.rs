//! The bankruptcy rule.
//!
//! An active agent whose wealth drops below the minimum-wealth threshold is
//! bankrupt: its remaining wealth is forfeited (set to exactly zero) and it
//! is deactivated permanently. The rule is purely agent-local and must be
//! applied right after any operation that can reduce an agent's wealth.

use yardsale_types::{Agent, AgentId, AgentStyle};

/// Data emitted when an agent goes bankrupt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bankruptcy {
    /// The agent that went bankrupt.
    pub agent_id: AgentId,
    /// The agent's behavioral style.
    pub style: AgentStyle,
    /// Wealth the agent held when it was deactivated.
    pub forfeited_wealth: f64,
}

/// Check whether an agent meets the bankruptcy condition.
///
/// Only inspects the agent -- it does not mutate anything. Agents that are
/// already inactive never qualify.
pub const fn is_insolvent(agent: &Agent, min_wealth: f64) -> bool {
    agent.active && agent.wealth < min_wealth
}

/// Apply the bankruptcy rule to an agent.
///
/// Returns `Some` if the agent was deactivated by this call, `None` if it
/// was left untouched (solvent, or already bankrupt).
pub const fn apply_bankruptcy(agent: &mut Agent, min_wealth: f64) -> Option<Bankruptcy> {
    if !is_insolvent(agent, min_wealth) {
        return None;
    }

    let forfeited_wealth = agent.wealth;
    agent.wealth = 0.0;
    agent.active = false;

    Some(Bankruptcy {
        agent_id: agent.id,
        style: agent.style,
        forfeited_wealth,
    })
}
