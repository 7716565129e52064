//! Phase-level scope.

use std::time::{Duration, Instant};

use tracing::info;

use super::SolverScope;
use crate::statistics::PhaseStatistics;
use crate::termination::{Termination, TerminationLevel};
use crate::SearchScore;

/// Scope for a single phase of solving.
///
/// Creating one logs `phase_start`; [`PhaseScope::finish`] logs `phase_end`
/// and records the phase statistics.
pub struct PhaseScope<'a> {
    solver_scope: &'a mut SolverScope,
    phase_index: usize,
    phase_type: &'static str,
    starting_score: Option<SearchScore>,
    step_count: u64,
    moves_evaluated: u64,
    moves_accepted: u64,
    start_time: Instant,
}

impl<'a> PhaseScope<'a> {
    pub fn new(solver_scope: &'a mut SolverScope, phase_index: usize, phase_type: &'static str) -> Self {
        let starting_score = solver_scope.best_score();
        info!(
            event = "phase_start",
            phase = phase_type,
            phase_index,
            score = %starting_score.map(|s| s.to_string()).unwrap_or_default(),
        );
        Self {
            solver_scope,
            phase_index,
            phase_type,
            starting_score,
            step_count: 0,
            moves_evaluated: 0,
            moves_accepted: 0,
            start_time: Instant::now(),
        }
    }

    pub fn phase_index(&self) -> usize {
        self.phase_index
    }

    pub fn phase_type(&self) -> &'static str {
        self.phase_type
    }

    /// Best score when this phase started.
    pub fn starting_score(&self) -> Option<SearchScore> {
        self.starting_score
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn moves_evaluated(&self) -> u64 {
        self.moves_evaluated
    }

    /// Increments the phase and solver step counts.
    pub fn increment_step_count(&mut self) -> u64 {
        self.step_count += 1;
        self.solver_scope.increment_step_count();
        self.step_count
    }

    /// Time spent at the given level.
    pub fn elapsed_at(&self, level: TerminationLevel) -> Duration {
        match level {
            TerminationLevel::Solver => self.solver_scope.elapsed(),
            TerminationLevel::Phase => self.elapsed(),
        }
    }

    /// Time since the best score last improved, counted from the start of
    /// the given level at the earliest.
    pub fn unimproved_at(&self, level: TerminationLevel) -> Duration {
        let last = self.solver_scope.last_improvement();
        match level {
            TerminationLevel::Solver => last.elapsed(),
            TerminationLevel::Phase => last.max(self.start_time).elapsed(),
        }
    }

    pub fn step_count_at(&self, level: TerminationLevel) -> u64 {
        match level {
            TerminationLevel::Solver => self.solver_scope.total_step_count(),
            TerminationLevel::Phase => self.step_count,
        }
    }

    pub fn solver_scope(&self) -> &SolverScope {
        self.solver_scope
    }

    pub fn solver_scope_mut(&mut self) -> &mut SolverScope {
        self.solver_scope
    }

    pub fn search_score(&mut self) -> SearchScore {
        self.solver_scope.search_score()
    }

    pub fn update_best_solution(&mut self) -> bool {
        self.solver_scope.update_best_solution()
    }

    pub fn record_move(&mut self, accepted: bool) {
        self.moves_evaluated += 1;
        if accepted {
            self.moves_accepted += 1;
        }
        self.solver_scope.record_move(accepted);
    }

    /// Checks the external flag, the solver termination and the phase's own.
    pub fn is_terminated(&self, phase_termination: Option<&dyn Termination>) -> bool {
        self.solver_scope.is_terminate_early()
            || self
                .solver_scope
                .termination()
                .is_some_and(|t| t.is_terminated(self))
            || phase_termination.is_some_and(|t| t.is_terminated(self))
    }

    /// Logs the phase summary and records its statistics.
    pub fn finish(self) -> PhaseStatistics {
        let duration = self.start_time.elapsed();
        let ending_score = self.solver_scope.best_score();
        info!(
            event = "phase_end",
            phase = self.phase_type,
            phase_index = self.phase_index,
            duration_ms = duration.as_millis() as u64,
            steps = self.step_count,
            moves_evaluated = self.moves_evaluated,
            score = %ending_score.map(|s| s.to_string()).unwrap_or_default(),
        );
        let stats = PhaseStatistics {
            phase_index: self.phase_index,
            phase_type: self.phase_type.to_string(),
            duration,
            step_count: self.step_count,
            moves_evaluated: self.moves_evaluated,
            moves_accepted: self.moves_accepted,
            starting_score: self.starting_score,
            ending_score,
        };
        self.solver_scope.statistics().end_phase(stats.clone());
        stats
    }
}
