//! Local search phase implementation.

use std::fmt::Debug;

use rayon::prelude::*;
use slotplan_core::SlotPlanError;
use slotplan_scoring::{RecordingScoreDirector, ScoreDirector};
use tracing::trace;

use super::{AcceptedCountForager, Acceptor};
use crate::heuristic::{Move, MoveSelector, SlotMove};
use crate::phase::Phase;
use crate::scope::{PhaseScope, SolverScope, StepScope};
use crate::termination::Termination;
use crate::{SearchScore, SlotDirector};

/// Moves evaluated between two termination checks inside a step.
const TERMINATION_CHECK_INTERVAL: usize = 16;

/// Moves each worker scores per parallel batch. Every batch clones the
/// director once per worker, so batches stay well above the check interval.
const PARALLEL_BATCH_PER_THREAD: usize = 256;

/// Local search phase that improves an existing assignment.
///
/// Each step:
/// 1. Generates candidate moves
/// 2. Scores each one, undoing it right after
/// 3. Feeds accepted moves to the forager
/// 4. Applies the forager's pick
///
/// With `move_thread_count > 1`, step 2 runs on rayon over private clones of
/// the working director; acceptance and the apply step stay sequential.
pub struct LocalSearchPhase {
    move_selector: MoveSelector,
    acceptor: Box<dyn Acceptor>,
    forager: AcceptedCountForager,
    termination: Option<Box<dyn Termination>>,
    move_thread_count: usize,
    moves: Vec<SlotMove>,
}

impl LocalSearchPhase {
    pub fn new(
        move_selector: MoveSelector,
        acceptor: Box<dyn Acceptor>,
        forager: AcceptedCountForager,
    ) -> Self {
        Self {
            move_selector,
            acceptor,
            forager,
            termination: None,
            move_thread_count: 1,
            moves: Vec::new(),
        }
    }

    /// Hill climbing over the default neighborhood.
    pub fn hill_climbing(move_selector: MoveSelector) -> Self {
        let acceptor = super::HillClimbingAcceptor::new();
        let forager = AcceptedCountForager::new(acceptor.default_accepted_count_limit());
        Self::new(move_selector, Box::new(acceptor), forager)
    }

    /// Tabu search over the default neighborhood.
    pub fn tabu_search(move_selector: MoveSelector, tabu_tenure: usize) -> Self {
        let acceptor = super::TabuSearchAcceptor::new(tabu_tenure);
        let forager = AcceptedCountForager::new(acceptor.default_accepted_count_limit());
        Self::new(move_selector, Box::new(acceptor), forager)
    }

    pub fn with_termination(mut self, termination: Box<dyn Termination>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn with_move_thread_count(mut self, count: usize) -> Self {
        self.move_thread_count = count.max(1);
        self
    }
}

impl Debug for LocalSearchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSearchPhase")
            .field("move_selector", &self.move_selector)
            .field("acceptor", &self.acceptor)
            .field("forager", &self.forager)
            .field("termination", &self.termination)
            .field("move_thread_count", &self.move_thread_count)
            .finish()
    }
}

impl Phase for LocalSearchPhase {
    fn solve(
        &mut self,
        solver_scope: &mut SolverScope,
        phase_index: usize,
    ) -> Result<(), SlotPlanError> {
        let mut phase_scope = PhaseScope::new(solver_scope, phase_index, self.phase_type_name());
        let mut last_step_score = phase_scope.search_score();
        self.acceptor.phase_started(last_step_score);

        while !phase_scope.is_terminated(self.termination.as_deref()) {
            let mut step_scope = StepScope::new(&mut phase_scope);
            self.forager.step_started();
            {
                let (schedule, rng) = step_scope
                    .phase_scope_mut()
                    .solver_scope_mut()
                    .schedule_and_rng();
                self.move_selector.select_moves(schedule, rng, &mut self.moves);
            }

            let interrupted = if self.move_thread_count > 1 {
                evaluate_parallel(
                    &self.moves,
                    self.acceptor.as_ref(),
                    &mut self.forager,
                    step_scope.phase_scope_mut(),
                    last_step_score,
                    self.move_thread_count,
                    self.termination.as_deref(),
                )
            } else {
                evaluate_sequential(
                    &self.moves,
                    self.acceptor.as_ref(),
                    &mut self.forager,
                    step_scope.phase_scope_mut(),
                    last_step_score,
                    self.termination.as_deref(),
                )
            };
            if interrupted {
                break;
            }

            let Some((index, score)) = self.forager.pick_move_index() else {
                step_scope.complete();
                if self.move_selector.is_exhaustive() {
                    // Every neighbor was rejected: local optimum.
                    break;
                }
                continue;
            };

            let selected = self.moves[index];
            let solver_scope = step_scope.phase_scope_mut().solver_scope_mut();
            let changes = selected.changes(solver_scope.working_schedule());
            selected.do_move(solver_scope.score_director_mut());

            if solver_scope.is_full_assert() {
                solver_scope.assert_score_consistent()?;
                let actual = solver_scope.search_score();
                if actual != score {
                    return Err(SlotPlanError::InvalidState(format!(
                        "step score {} differs from the evaluated move score {} for {:?}",
                        actual, score, selected
                    )));
                }
            }

            self.acceptor.step_ended(&changes, score);
            last_step_score = score;
            step_scope.set_step_score(score);
            step_scope.phase_scope_mut().update_best_solution();

            trace!(
                event = "step",
                step = step_scope.step_index(),
                score = %score,
                accepted = self.forager.accepted_count(),
                candidate = ?selected,
            );
            step_scope.complete();
        }

        self.acceptor.phase_ended();
        phase_scope.finish();
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "LocalSearch"
    }
}

fn score_move<D: ScoreDirector>(director: &mut D, m: &SlotMove) -> SearchScore {
    let mut recording = RecordingScoreDirector::new(director);
    m.do_move(&mut recording);
    let score = SearchScore::of(&mut recording);
    recording.undo_changes();
    score
}

/// Scores and judges moves one by one. Returns true if termination fired
/// before the step could finish.
fn evaluate_sequential(
    moves: &[SlotMove],
    acceptor: &dyn Acceptor,
    forager: &mut AcceptedCountForager,
    phase_scope: &mut PhaseScope<'_>,
    last_step_score: SearchScore,
    termination: Option<&dyn Termination>,
) -> bool {
    for (i, m) in moves.iter().enumerate() {
        if i > 0 && i % TERMINATION_CHECK_INTERVAL == 0 && phase_scope.is_terminated(termination) {
            return true;
        }

        let solver_scope = phase_scope.solver_scope_mut();
        let changes = m.changes(solver_scope.working_schedule());
        let move_score = score_move(solver_scope.score_director_mut(), m);
        solver_scope.statistics().record_score_calculation();

        let accepted = acceptor.is_accepted(last_step_score, move_score, &changes);
        phase_scope.record_move(accepted);
        if accepted {
            forager.add_move_index(i, move_score);
            if forager.is_quit_early() {
                break;
            }
        }
    }
    false
}

/// Scores moves on rayon one batch at a time, then judges each batch in
/// candidate order. Termination is checked between batches, so a stop request
/// waits for at most one batch. Returns true if termination fired before the
/// step could finish.
fn evaluate_parallel(
    moves: &[SlotMove],
    acceptor: &dyn Acceptor,
    forager: &mut AcceptedCountForager,
    phase_scope: &mut PhaseScope<'_>,
    last_step_score: SearchScore,
    thread_count: usize,
    termination: Option<&dyn Termination>,
) -> bool {
    let batch_size = thread_count * PARALLEL_BATCH_PER_THREAD;
    for (batch_index, batch) in moves.chunks(batch_size).enumerate() {
        if batch_index > 0 && phase_scope.is_terminated(termination) {
            return true;
        }

        let scores = score_moves_parallel(
            phase_scope.solver_scope().score_director(),
            batch,
            thread_count,
        );
        phase_scope
            .solver_scope()
            .statistics()
            .record_score_calculations(scores.len() as u64);

        let offset = batch_index * batch_size;
        for (i, (m, move_score)) in batch.iter().zip(scores).enumerate() {
            let changes = m.changes(phase_scope.solver_scope().working_schedule());
            let accepted = acceptor.is_accepted(last_step_score, move_score, &changes);
            phase_scope.record_move(accepted);
            if accepted {
                forager.add_move_index(offset + i, move_score);
                if forager.is_quit_early() {
                    return false;
                }
            }
        }
    }
    false
}

/// Scores every move against a snapshot of the working director.
///
/// Moves are split into `thread_count` chunks; each chunk gets its own clone
/// of the director so no state is shared between workers.
pub(crate) fn score_moves_parallel(
    director: &SlotDirector,
    moves: &[SlotMove],
    thread_count: usize,
) -> Vec<SearchScore> {
    if moves.is_empty() {
        return Vec::new();
    }
    let chunk_size = moves.len().div_ceil(thread_count.max(1));
    moves
        .par_chunks(chunk_size)
        .map(|chunk| {
            let mut local = director.clone();
            chunk
                .iter()
                .map(|m| score_move(&mut local, m))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}
