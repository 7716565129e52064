//! Step count termination.

use super::{Termination, TerminationLevel};
use crate::scope::PhaseScope;

/// Terminates after a fixed number of steps.
#[derive(Debug, Clone)]
pub struct StepCountTermination {
    limit: u64,
    level: TerminationLevel,
}

impl StepCountTermination {
    pub fn new(limit: u64, level: TerminationLevel) -> Self {
        Self { limit, level }
    }
}

impl Termination for StepCountTermination {
    fn is_terminated(&self, phase_scope: &PhaseScope<'_>) -> bool {
        phase_scope.step_count_at(self.level) >= self.limit
    }
}
