//! Core entity structs for the Yardsale simulation.
//!
//! Covers the [`Agent`] record, the cumulative [`RedistributionTotals`], and
//! the read-only [`ResultsView`] projection handed to display layers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::AgentStyle;
use crate::ids::AgentId;

/// Maximum number of points per chart series the original dashboard drew.
pub const DEFAULT_MAX_CHART_POINTS: usize = 500;

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

/// One economic actor in the population.
///
/// `id` and `style` are fixed at creation. `wealth` is never negative, and
/// once `active` turns false the agent is bankrupt for good: its wealth is
/// exactly zero and it takes no further part in exchanges or redistribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Agent {
    /// Stable identifier, equal to the agent's position in the population.
    pub id: AgentId,
    /// Behavioral style drawn at creation.
    pub style: AgentStyle,
    /// Current wealth.
    pub wealth: f64,
    /// Whether the agent is still solvent.
    pub active: bool,
}

impl Agent {
    /// Create a solvent agent with the given starting wealth.
    pub const fn new(id: AgentId, style: AgentStyle, wealth: f64) -> Self {
        Self {
            id,
            style,
            wealth,
            active: true,
        }
    }

    /// Wealth this agent is willing to put at stake in one exchange.
    pub const fn stake(&self) -> f64 {
        self.style.risk_stake_fraction() * self.wealth
    }
}

// ---------------------------------------------------------------------------
// Redistribution counters
// ---------------------------------------------------------------------------

/// Cumulative redistribution activity since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RedistributionTotals {
    /// Total wealth removed by the wealth tax.
    pub taxes_collected: f64,
    /// Total wealth paid out as universal basic income.
    pub ubi_distributed: f64,
    /// Number of times an agent was lifted to the safety-net floor.
    pub safety_net_interventions: u64,
}

// ---------------------------------------------------------------------------
// Results snapshot
// ---------------------------------------------------------------------------

/// Per-style survival and wealth breakdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StyleBreakdown {
    /// Agents of this style in the population, bankrupt or not.
    pub total: u32,
    /// Agents of this style that are still active.
    pub active: u32,
    /// `active / total`, or 0 when there are no agents of this style.
    pub survival_rate: f64,
    /// Mean wealth of the active agents of this style, or 0 when none remain.
    pub mean_wealth: f64,
}

/// Read-only projection of the simulation state for display layers.
///
/// All history series are parallel: index `i` describes the state after
/// round `i`, with index 0 recorded at reset before any exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ResultsView {
    /// Gini coefficient of active wealth per round.
    pub gini_history: Vec<f64>,
    /// Number of active agents per round.
    pub active_count_history: Vec<u32>,
    /// Percentage of active wealth held by the top 10% per round.
    pub top_10_percent_history: Vec<f64>,
    /// Percentage of active wealth held by the top 1% per round.
    pub top_1_percent_history: Vec<f64>,
    /// Active agents' wealth values per round.
    pub wealth_history: Vec<Vec<f64>>,
    /// Survival and wealth breakdown for every style.
    pub results_by_style: BTreeMap<AgentStyle, StyleBreakdown>,
    /// Wealth of every currently active agent, in id order.
    pub current_wealths: Vec<f64>,
    /// Every agent in the population, in id order.
    pub agents: Vec<Agent>,
    /// Number of rounds completed since the last reset.
    pub rounds_completed: u64,
    /// Number of bankrupt agents.
    pub bankrupt_count: u32,
    /// Cumulative redistribution counters.
    pub redistribution: RedistributionTotals,
}

impl ResultsView {
    /// Return a copy with every history series thinned to at most
    /// `max_points` entries using the same stride, so the series stay
    /// aligned with each other.
    #[must_use]
    pub fn downsampled(&self, max_points: usize) -> Self {
        Self {
            gini_history: downsample(&self.gini_history, max_points),
            active_count_history: downsample(&self.active_count_history, max_points),
            top_10_percent_history: downsample(&self.top_10_percent_history, max_points),
            top_1_percent_history: downsample(&self.top_1_percent_history, max_points),
            wealth_history: downsample(&self.wealth_history, max_points),
            ..self.clone()
        }
    }

    /// Latest Gini coefficient, or 0 before any statistics were recorded.
    pub fn latest_gini(&self) -> f64 {
        self.gini_history.last().copied().unwrap_or(0.0)
    }
}

/// Thin a series to at most `max_points` entries by keeping every n-th value.
///
/// The stride is `ceil(len / max_points)`, starting from the first element.
/// This intentionally differs from a floor stride (`len / max_points`),
/// which can leave up to twice `max_points` entries; the ceiling keeps the
/// result within the limit. Series that already fit are returned unchanged.
pub fn downsample<T: Clone>(series: &[T], max_points: usize) -> Vec<T> {
    if max_points == 0 {
        return Vec::new();
    }
    if series.len() <= max_points {
        return series.to_vec();
    }
    let stride = series.len().div_ceil(max_points);
    series.iter().step_by(stride).cloned().collect()
}
