//! Behavioral style ratios and the weighted style draw.
//!
//! Each agent's style is drawn independently: a uniform `r` in `[0, 1)`
//! maps to [`AgentStyle::Greedy`] below `greedy`, to
//! [`AgentStyle::Neutral`] below `greedy + neutral`, and to
//! [`AgentStyle::Contrarian`] otherwise. Ratios summing above one are a
//! caller error and are not rejected here.

use rand::Rng;
use yardsale_types::AgentStyle;

use crate::error::AgentError;

/// Population mix of behavioral styles.
///
/// The contrarian share is implied: whatever the greedy and neutral ratios
/// leave over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyleRatios {
    greedy: f64,
    neutral: f64,
}

impl StyleRatios {
    /// Create a style mix, checking that each ratio lies within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::InvalidRatio`] if either ratio is outside
    /// `[0, 1]` or not finite.
    pub fn new(greedy: f64, neutral: f64) -> Result<Self, AgentError> {
        check_unit_interval("greedy_ratio", greedy)?;
        check_unit_interval("neutral_ratio", neutral)?;
        Ok(Self { greedy, neutral })
    }

    /// Implied share of contrarian agents (`1 - greedy - neutral`).
    pub const fn contrarian(&self) -> f64 {
        1.0 - self.greedy - self.neutral
    }

    /// Map a uniform draw in `[0, 1)` to a style.
    pub const fn style_for_draw(&self, r: f64) -> AgentStyle {
        if r < self.greedy {
            AgentStyle::Greedy
        } else if r < self.greedy + self.neutral {
            AgentStyle::Neutral
        } else {
            AgentStyle::Contrarian
        }
    }

    /// Draw a style at random according to the ratios.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> AgentStyle {
        self.style_for_draw(rng.random::<f64>())
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<(), AgentError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(AgentError::InvalidRatio { name, value })
    }
}
