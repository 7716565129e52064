//! Score types for representing solution quality.
//!
//! A score has a hard level (feasibility) and a soft level (quality).
//! Both are accumulated as signed sums of constraint contributions.

mod hard_soft;

#[cfg(test)]
mod tests;

use std::fmt;

pub use hard_soft::HardSoftScore;

/// Which level of the score a constraint contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScoreLevel {
    Hard,
    Soft,
}

impl fmt::Display for ScoreLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreLevel::Hard => write!(f, "hard"),
            ScoreLevel::Soft => write!(f, "soft"),
        }
    }
}

/// Error when parsing a score from string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Score parse error: {message}")]
pub struct ScoreParseError {
    pub message: String,
}
