//! Termination conditions for solver phases.
//!
//! Every condition is evaluated against a [`PhaseScope`]; a
//! [`TerminationLevel`] says whether its budget counts from the solve start or
//! from the phase start.

mod best_score;
mod composite;
mod step_count;
mod time;
mod unimproved;

#[cfg(test)]
mod tests;

use std::fmt::Debug;

use slotplan_config::{ConfigError, TerminationConfig};

use crate::scope::PhaseScope;

pub use best_score::BestScoreTermination;
pub use composite::OrTermination;
pub use step_count::StepCountTermination;
pub use time::TimeTermination;
pub use unimproved::UnimprovedTimeTermination;

/// Trait for determining when to stop solving.
pub trait Termination: Send + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, phase_scope: &PhaseScope<'_>) -> bool;
}

/// What a termination budget is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationLevel {
    /// From the start of the solve.
    Solver,
    /// From the start of the current phase.
    Phase,
}

/// Builds the disjunction of every limit set in `config`.
///
/// Returns `None` when no limit is set.
pub fn build_termination(
    config: &TerminationConfig,
    level: TerminationLevel,
) -> Result<Option<Box<dyn Termination>>, ConfigError> {
    let mut terminations: Vec<Box<dyn Termination>> = Vec::new();

    if let Some(limit) = config.time_limit() {
        terminations.push(Box::new(TimeTermination::new(limit, level)));
    }
    if let Some(limit) = config.unimproved_time_limit() {
        terminations.push(Box::new(UnimprovedTimeTermination::new(limit, level)));
    }
    if let Some(target) = config.best_score_limit()? {
        terminations.push(Box::new(BestScoreTermination::new(target)));
    }
    if let Some(limit) = config.step_count_limit {
        terminations.push(Box::new(StepCountTermination::new(limit, level)));
    }

    Ok(match terminations.len() {
        0 => None,
        1 => terminations.pop(),
        _ => Some(Box::new(OrTermination::new(terminations))),
    })
}
