//! Best score termination.

use slotplan_core::HardSoftScore;

use super::Termination;
use crate::scope::PhaseScope;
use crate::SearchScore;

/// Terminates when the best score reaches a target.
///
/// The target is only reached by a fully assigned schedule.
#[derive(Debug, Clone)]
pub struct BestScoreTermination {
    target: SearchScore,
}

impl BestScoreTermination {
    pub fn new(target: HardSoftScore) -> Self {
        Self {
            target: SearchScore::initialized(target),
        }
    }

    /// Stops at the first fully assigned schedule without hard penalties.
    pub fn feasible() -> Self {
        Self::new(HardSoftScore::of(0, i64::MIN))
    }
}

impl Termination for BestScoreTermination {
    fn is_terminated(&self, phase_scope: &PhaseScope<'_>) -> bool {
        phase_scope
            .solver_scope()
            .best_score()
            .is_some_and(|best| best >= self.target)
    }
}
