//! Enumeration types for the Yardsale simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Agent behavioral style
// ---------------------------------------------------------------------------

/// The behavioral style of an agent, fixed for its lifetime.
///
/// The style determines which fraction of its current wealth an agent is
/// willing to put at stake in a single exchange.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AgentStyle {
    /// Stakes 30% of its wealth.
    Greedy,
    /// Stakes 20% of its wealth.
    Neutral,
    /// Stakes 10% of its wealth.
    Contrarian,
}

impl AgentStyle {
    /// Every style, in declaration order.
    pub const ALL: [Self; 3] = [Self::Greedy, Self::Neutral, Self::Contrarian];

    /// Fraction of current wealth this style puts at stake in an exchange.
    pub const fn risk_stake_fraction(self) -> f64 {
        match self {
            Self::Greedy => 0.30,
            Self::Neutral => 0.20,
            Self::Contrarian => 0.10,
        }
    }

    /// Lowercase label used in logs and serialized output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Neutral => "neutral",
            Self::Contrarian => "contrarian",
        }
    }
}

impl core::fmt::Display for AgentStyle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
