//! The yard-sale exchange between two agents.
//!
//! Both agents put up a style-dependent fraction of their wealth; the
//! smaller of the two offers is the stake. The richer agent wins the stake
//! with probability `0.5 + rich_bias`. The transfer is zero-sum and only
//! the loser can go bankrupt.

use rand::Rng;
use yardsale_agents::{Bankruptcy, apply_bankruptcy};
use yardsale_types::{Agent, AgentId};

/// Stakes below this are too small to trade; the exchange is skipped.
pub const STAKE_EPSILON: f64 = 0.001;

/// What happened in one exchange.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExchangeOutcome {
    /// The stake fell below [`STAKE_EPSILON`]; no wealth moved.
    Skipped {
        /// The stake that was too small.
        stake: f64,
    },
    /// The stake moved from the loser to the winner.
    Transferred {
        /// Agent that gained the stake.
        winner: AgentId,
        /// Agent that paid the stake.
        loser: AgentId,
        /// Amount transferred.
        stake: f64,
        /// Set if the loser went bankrupt as a result.
        bankruptcy: Option<Bankruptcy>,
    },
}

impl ExchangeOutcome {
    /// Amount of wealth that changed hands (zero when skipped).
    pub const fn transferred(&self) -> f64 {
        match self {
            Self::Skipped { .. } => 0.0,
            Self::Transferred { stake, .. } => *stake,
        }
    }
}

/// The stake two agents would play for: the smaller of their offers.
pub fn stake_between(a: &Agent, b: &Agent) -> f64 {
    a.stake().min(b.stake())
}

/// Run one exchange between `a` and `b`.
///
/// On equal wealth `a` counts as the richer party.
pub fn execute_exchange<R: Rng + ?Sized>(
    a: &mut Agent,
    b: &mut Agent,
    rich_bias: f64,
    min_wealth: f64,
    rng: &mut R,
) -> ExchangeOutcome {
    let stake = stake_between(a, b);
    if stake < STAKE_EPSILON {
        return ExchangeOutcome::Skipped { stake };
    }

    let (richer, poorer) = if a.wealth >= b.wealth { (a, b) } else { (b, a) };
    let richer_wins = rng.random::<f64>() < 0.5 + rich_bias;
    let (winner, loser) = if richer_wins {
        (richer, poorer)
    } else {
        (poorer, richer)
    };

    winner.wealth += stake;
    loser.wealth -= stake;
    let bankruptcy = apply_bankruptcy(loser, min_wealth);

    ExchangeOutcome::Transferred {
        winner: winner.id,
        loser: loser.id,
        stake,
        bankruptcy,
    }
}
