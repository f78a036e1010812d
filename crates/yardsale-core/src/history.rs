//! Per-round statistics series.
//!
//! One entry is appended to every series per observation (the initial
//! sample at reset, then one per completed round), so all series always
//! have the same length.

use crate::metrics::InequalitySample;

/// Parallel time series of inequality statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundHistory {
    /// Gini coefficient per observation.
    pub gini: Vec<f64>,
    /// Active-agent count per observation.
    pub active_count: Vec<u32>,
    /// Top-10% wealth share per observation.
    pub top_10_share: Vec<f64>,
    /// Top-1% wealth share per observation.
    pub top_1_share: Vec<f64>,
    /// Active agents' wealth values per observation.
    pub wealth: Vec<Vec<f64>>,
}

impl RoundHistory {
    /// Create an empty history.
    pub const fn new() -> Self {
        Self {
            gini: Vec::new(),
            active_count: Vec::new(),
            top_10_share: Vec::new(),
            top_1_share: Vec::new(),
            wealth: Vec::new(),
        }
    }

    /// Measure `active_wealths` and append one entry to every series.
    pub fn record(&mut self, active_wealths: Vec<f64>) -> InequalitySample {
        let sample = InequalitySample::measure(&active_wealths);
        self.gini.push(sample.gini);
        self.active_count.push(sample.active);
        self.top_10_share.push(sample.top_10_share);
        self.top_1_share.push(sample.top_1_share);
        self.wealth.push(active_wealths);
        sample
    }

    /// Number of observations recorded.
    pub fn len(&self) -> usize {
        self.gini.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.gini.is_empty()
    }

    /// Drop every recorded observation.
    pub fn clear(&mut self) {
        self.gini.clear();
        self.active_count.clear();
        self.top_10_share.clear();
        self.top_1_share.clear();
        self.wealth.clear();
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn record_keeps_series_aligned() {
        let mut history = RoundHistory::new();
        history.record(vec![100.0, 100.0]);
        history.record(vec![150.0, 50.0]);
        history.record(Vec::new());

        assert_eq!(history.len(), 3);
        assert_eq!(history.active_count, vec![2, 2, 0]);
        assert_eq!(history.top_10_share.len(), 3);
        assert_eq!(history.top_1_share.len(), 3);
        assert_eq!(history.wealth.len(), 3);
        assert_eq!(history.gini.first().copied(), Some(0.0));
        assert_eq!(history.gini.last().copied(), Some(0.0));
    }

    #[test]
    fn record_returns_the_sample() {
        let mut history = RoundHistory::new();
        let sample = history.record(vec![150.0, 50.0]);
        assert!((sample.gini - 0.25).abs() < 1e-12);
        assert_eq!(sample.top_10_share, 75.0);
    }

    #[test]
    fn clear_empties_all_series() {
        let mut history = RoundHistory::new();
        history.record(vec![1.0]);
        history.clear();
        assert!(history.is_empty());
        assert!(history.wealth.is_empty());
        assert!(history.active_count.is_empty());
    }
}
