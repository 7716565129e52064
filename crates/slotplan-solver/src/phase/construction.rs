//! First-fit construction heuristic.

use std::fmt::Debug;

use slotplan_core::SlotPlanError;
use slotplan_scoring::ScoreDirector;
use tracing::trace;

use super::Phase;
use crate::scope::{PhaseScope, SolverScope, StepScope};
use crate::termination::Termination;

/// Greedy construction: one step per unassigned order.
///
/// Orders are visited by ascending id. Each goes into the first bucket, in
/// bucket order, that falls on one of its allowed days and whose insertion
/// leaves the hard score where it was. Orders with no such bucket stay
/// unassigned; orders that arrive already assigned are left alone.
#[derive(Default)]
pub struct FirstFitPhase {
    termination: Option<Box<dyn Termination>>,
}

impl FirstFitPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_termination(mut self, termination: Box<dyn Termination>) -> Self {
        self.termination = Some(termination);
        self
    }
}

impl Debug for FirstFitPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstFitPhase")
            .field("termination", &self.termination)
            .finish()
    }
}

impl Phase for FirstFitPhase {
    fn solve(
        &mut self,
        solver_scope: &mut SolverScope,
        phase_index: usize,
    ) -> Result<(), SlotPlanError> {
        let mut phase_scope = PhaseScope::new(solver_scope, phase_index, self.phase_type_name());
        let queue = phase_scope.solver_scope().working_schedule().order_indices_by_id();

        for order in queue {
            if phase_scope.is_terminated(self.termination.as_deref()) {
                break;
            }
            if phase_scope
                .solver_scope()
                .working_schedule()
                .assigned_bucket(order)
                .is_some()
            {
                continue;
            }

            let mut step_scope = StepScope::new(&mut phase_scope);
            let placed = place_first_fit(step_scope.phase_scope_mut(), order);
            let score = step_scope.phase_scope_mut().search_score();
            step_scope.set_step_score(score);
            step_scope.phase_scope_mut().solver_scope_mut().assert_score_consistent()?;

            trace!(event = "step", order, bucket = ?placed, score = %score);
            step_scope.complete();
        }

        phase_scope.update_best_solution();
        phase_scope.finish();
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "ConstructionHeuristic"
    }
}

/// Assigns `order` to its first fitting bucket and returns it.
fn place_first_fit(phase_scope: &mut PhaseScope<'_>, order: usize) -> Option<usize> {
    let base_hard = phase_scope.search_score().score().hard();
    let bucket_count = phase_scope.solver_scope().working_schedule().bucket_count();

    for bucket in 0..bucket_count {
        let schedule = phase_scope.solver_scope().working_schedule();
        if !schedule.order(order).is_allowed_on(schedule.bucket(bucket).date()) {
            continue;
        }

        let director = phase_scope.solver_scope_mut().score_director_mut();
        director.change_bucket(order, Some(bucket));
        let fits = phase_scope.search_score().score().hard() >= base_hard;
        phase_scope.record_move(fits);
        if fits {
            return Some(bucket);
        }
        phase_scope
            .solver_scope_mut()
            .score_director_mut()
            .change_bucket(order, None);
    }
    None
}
