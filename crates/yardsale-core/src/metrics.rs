//! Inequality measures over a wealth vector.
//!
//! All measures degrade to `0.0` on an empty or all-zero vector. A
//! population wiped out by a bankruptcy cascade is a legitimate state, not
//! an error.

/// Fraction of agents counted as the top decile.
pub const TOP_DECILE: f64 = 0.10;

/// Fraction of agents counted as the top percentile.
pub const TOP_PERCENTILE: f64 = 0.01;

/// Gini coefficient of a wealth distribution.
///
/// Uses the sorted-rank formula
/// `(2 * Σ(i * w_i) - (n + 1) * T) / (n * T)` with 1-based ranks over
/// ascending wealths. An all-equal vector short-circuits to exactly zero,
/// since the formula leaves rounding residue for values that are not
/// exactly representable. The result is clamped to `[0, 1]`.
#[allow(clippy::cast_precision_loss)]
pub fn gini_coefficient(wealths: &[f64]) -> f64 {
    if wealths.is_empty() {
        return 0.0;
    }

    let mut sorted = wealths.to_vec();
    sorted.sort_by(f64::total_cmp);

    if sorted.first() == sorted.last() {
        return 0.0;
    }

    let total: f64 = sorted.iter().sum();
    if total <= 0.0 {
        return 0.0;
    }

    let n = sorted.len() as f64;
    let weighted_sum: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &w)| (i as f64 + 1.0) * w)
        .sum();

    let gini = 2.0_f64.mul_add(weighted_sum, -(n + 1.0) * total) / (n * total);
    gini.clamp(0.0, 1.0)
}

/// Percentage (0 to 100) of total wealth held by the richest `fraction`
/// of agents.
///
/// At least one agent always counts as "the top", so a single agent holds
/// 100% of a positive total.
pub fn top_wealth_share(wealths: &[f64], fraction: f64) -> f64 {
    let total: f64 = wealths.iter().sum();
    if wealths.is_empty() || total <= 0.0 {
        return 0.0;
    }

    let mut sorted = wealths.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let top: f64 = sorted.iter().take(top_count(sorted.len(), fraction)).sum();
    (top / total * 100.0).clamp(0.0, 100.0)
}

/// Number of agents in the top `fraction` of a population of `n`:
/// `max(1, floor(n * fraction))`, capped at `n`. Zero only when `n` is.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn top_count(n: usize, fraction: f64) -> usize {
    if n == 0 {
        return 0;
    }
    let k = (n as f64 * fraction).floor().max(0.0) as usize;
    k.clamp(1, n)
}

/// Inequality statistics for one observation of the active population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InequalitySample {
    /// Number of active agents observed.
    pub active: u32,
    /// Gini coefficient.
    pub gini: f64,
    /// Share of wealth held by the top 10%.
    pub top_10_share: f64,
    /// Share of wealth held by the top 1%.
    pub top_1_share: f64,
}

impl InequalitySample {
    /// Measure the given active-agent wealth vector.
    pub fn measure(wealths: &[f64]) -> Self {
        Self {
            active: u32::try_from(wealths.len()).unwrap_or(u32::MAX),
            gini: gini_coefficient(wealths),
            top_10_share: top_wealth_share(wealths, TOP_DECILE),
            top_1_share: top_wealth_share(wealths, TOP_PERCENTILE),
        }
    }
}
