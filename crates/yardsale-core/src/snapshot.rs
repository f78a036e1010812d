//! Read-only projection of engine state into a [`ResultsView`].
//!
//! Nothing here mutates state; every call builds a fresh, owned view that
//! a dashboard or exporter can hold on to while the engine keeps running.

use std::collections::BTreeMap;

use yardsale_agents::Population;
use yardsale_types::{AgentStyle, RedistributionTotals, ResultsView, StyleBreakdown};

use crate::history::RoundHistory;

/// Assemble the results view for the current state.
pub fn results_view(
    population: &Population,
    history: &RoundHistory,
    totals: RedistributionTotals,
    rounds_completed: u64,
) -> ResultsView {
    let results_by_style = AgentStyle::ALL
        .into_iter()
        .map(|style| (style, style_breakdown(population, style)))
        .collect::<BTreeMap<_, _>>();

    ResultsView {
        gini_history: history.gini.clone(),
        active_count_history: history.active_count.clone(),
        top_10_percent_history: history.top_10_share.clone(),
        top_1_percent_history: history.top_1_share.clone(),
        wealth_history: history.wealth.clone(),
        results_by_style,
        current_wealths: population.active_wealths(),
        agents: population.agents().to_vec(),
        rounds_completed,
        bankrupt_count: u32::try_from(population.bankrupt_count()).unwrap_or(u32::MAX),
        redistribution: totals,
    }
}

/// Survival and wealth statistics for the agents of one style.
///
/// Survival rate and mean wealth are zero when the style has no agents, or
/// no active agents, respectively.
pub fn style_breakdown(population: &Population, style: AgentStyle) -> StyleBreakdown {
    let mut total: u32 = 0;
    let mut active: u32 = 0;
    let mut active_wealth = 0.0;

    for agent in population.iter().filter(|a| a.style == style) {
        total = total.saturating_add(1);
        if agent.active {
            active = active.saturating_add(1);
            active_wealth += agent.wealth;
        }
    }

    let survival_rate = if total == 0 {
        0.0
    } else {
        f64::from(active) / f64::from(total)
    };
    let mean_wealth = if active == 0 {
        0.0
    } else {
        active_wealth / f64::from(active)
    };

    StyleBreakdown {
        total,
        active,
        survival_rate,
        mean_wealth,
    }
}
