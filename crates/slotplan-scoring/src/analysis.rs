//! Score analysis: per-constraint breakdown and per-order indictments.

use std::fmt;

use slotplan_core::{ConstraintRef, HardSoftScore, ScoreLevel};

/// One constraint's contribution to the total score.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintAnalysis {
    pub constraint_ref: ConstraintRef,
    pub level: ScoreLevel,
    pub score: HardSoftScore,
    /// Number of orders, groups or pairs with a non-zero contribution.
    pub match_count: usize,
}

impl ConstraintAnalysis {
    pub fn name(&self) -> &str {
        &self.constraint_ref.name
    }

    pub fn is_hard(&self) -> bool {
        self.level == ScoreLevel::Hard
    }
}

/// The score contribution that disappears when one order is unassigned.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderIndictment {
    pub order_index: usize,
    pub order_id: String,
    pub score: HardSoftScore,
}

/// Total score with a per-constraint breakdown.
///
/// The breakdown always sums to `score`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreExplanation {
    pub score: HardSoftScore,
    pub constraints: Vec<ConstraintAnalysis>,
}

impl ScoreExplanation {
    pub fn new(constraints: Vec<ConstraintAnalysis>) -> Self {
        let score = constraints.iter().map(|c| c.score).sum();
        Self { score, constraints }
    }

    /// Looks up a constraint by name.
    pub fn get(&self, name: &str) -> Option<&ConstraintAnalysis> {
        self.constraints.iter().find(|c| c.name() == name)
    }

    /// Score of the named constraint, zero if absent.
    pub fn score_of(&self, name: &str) -> HardSoftScore {
        self.get(name).map_or(HardSoftScore::ZERO, |c| c.score)
    }

    pub fn hard_constraints(&self) -> impl Iterator<Item = &ConstraintAnalysis> {
        self.constraints.iter().filter(|c| c.is_hard())
    }

    pub fn soft_constraints(&self) -> impl Iterator<Item = &ConstraintAnalysis> {
        self.constraints.iter().filter(|c| !c.is_hard())
    }

    /// Constraints that currently affect the score.
    pub fn broken(&self) -> impl Iterator<Item = &ConstraintAnalysis> {
        self.constraints.iter().filter(|c| !c.score.is_zero())
    }
}

impl fmt::Display for ScoreExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Score: {}", self.score)?;
        for c in &self.constraints {
            writeln!(
                f,
                "  [{:>4}] {:<52} {:>16} ({} matches)",
                c.level.to_string(),
                c.name(),
                c.score.to_string(),
                c.match_count
            )?;
        }
        Ok(())
    }
}
