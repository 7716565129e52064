//! Step-level scope.

use super::PhaseScope;
use crate::SearchScore;

/// Scope for a single step within a phase.
pub struct StepScope<'a, 'b> {
    phase_scope: &'a mut PhaseScope<'b>,
    step_index: u64,
    step_score: Option<SearchScore>,
}

impl<'a, 'b> StepScope<'a, 'b> {
    pub fn new(phase_scope: &'a mut PhaseScope<'b>) -> Self {
        let step_index = phase_scope.step_count();
        Self {
            phase_scope,
            step_index,
            step_score: None,
        }
    }

    /// Index of this step within the phase (0-based).
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    pub fn step_score(&self) -> Option<SearchScore> {
        self.step_score
    }

    pub fn set_step_score(&mut self, score: SearchScore) {
        self.step_score = Some(score);
    }

    pub fn phase_scope(&self) -> &PhaseScope<'b> {
        self.phase_scope
    }

    pub fn phase_scope_mut(&mut self) -> &mut PhaseScope<'b> {
        self.phase_scope
    }

    /// Marks this step as complete and increments counters.
    pub fn complete(self) -> Option<SearchScore> {
        self.phase_scope.increment_step_count();
        self.step_score
    }
}
