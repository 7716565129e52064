//! Solver implementation.

use std::fmt::Debug;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use slotplan_config::EnvironmentMode;
use slotplan_core::{HardSoftScore, Schedule, SlotPlanError};
use slotplan_scoring::{OrderIndictment, ScoreDirector, ScoreExplanation};
use tracing::info;

use crate::event::{BestSolutionCallback, BestSolutionEvent};
use crate::phase::Phase;
use crate::scope::SolverScope;
use crate::statistics::{SolverStatistics, StatisticsCollector};
use crate::termination::Termination;
use crate::SlotDirector;

/// Seed used by reproducible runs that do not set one.
pub const REPRODUCIBLE_SEED: u64 = 0;

/// Result of a solve.
#[derive(Debug, Clone)]
pub struct SolveResult {
    /// Best schedule found, with its score set.
    pub schedule: Schedule,
    pub score: HardSoftScore,
    /// Orders the best schedule leaves without a bucket.
    pub unassigned: usize,
    /// Per-constraint breakdown of `score`.
    pub explanation: ScoreExplanation,
    /// Per-order share of `score`, most penalized first.
    pub indictments: Vec<OrderIndictment>,
    pub statistics: SolverStatistics,
    /// True if an external stop request ended the solve.
    pub terminated_early: bool,
}

impl SolveResult {
    pub fn is_feasible(&self) -> bool {
        self.score.is_feasible()
    }
}

/// Runs phases in sequence and returns the best schedule seen.
///
/// # Example
///
/// ```
/// use slotplan_solver::{FirstFitPhase, Phase, Solver};
/// use slotplan_test::scenarios;
///
/// let phases: Vec<Box<dyn Phase>> = vec![Box::new(FirstFitPhase::new())];
/// let result = Solver::new(phases)
///     .with_random_seed(7)
///     .solve(scenarios::over_subscribed_day())
///     .unwrap();
///
/// assert_eq!(result.unassigned, 1);
/// assert!(result.is_feasible());
/// ```
pub struct Solver {
    phases: Vec<Box<dyn Phase>>,
    termination: Option<Box<dyn Termination>>,
    environment_mode: EnvironmentMode,
    random_seed: Option<u64>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    listeners: Vec<BestSolutionCallback>,
}

impl Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("phases", &self.phases)
            .field("termination", &self.termination)
            .field("environment_mode", &self.environment_mode)
            .field("random_seed", &self.random_seed)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Solver {
    pub fn new(phases: Vec<Box<dyn Phase>>) -> Self {
        Self {
            phases,
            termination: None,
            environment_mode: EnvironmentMode::default(),
            random_seed: None,
            terminate_early_flag: None,
            listeners: Vec::new(),
        }
    }

    /// Sets the termination every phase checks in addition to its own.
    pub fn with_termination(mut self, termination: Box<dyn Termination>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Stops the solve at the next check once the flag is set.
    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    /// Adds a listener called synchronously on every new best solution.
    pub fn with_best_solution_listener<F>(mut self, listener: F) -> Self
    where
        F: FnMut(&BestSolutionEvent<'_>) + Send + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Solves `schedule`.
    ///
    /// # Errors
    ///
    /// Fails before any search if the schedule has dangling assignments, and
    /// during search only when `FullAssert` detects a score drift. An
    /// infeasible result is not an error. A stop flag that is already set
    /// skips every phase and returns the input schedule, scored.
    pub fn solve(mut self, schedule: Schedule) -> Result<SolveResult, SlotPlanError> {
        let director = SlotDirector::for_schedule(schedule)?;

        let schedule = director.working_schedule();
        info!(
            event = "solve_start",
            order_count = schedule.order_count(),
            bucket_count = schedule.bucket_count(),
            rider_count = schedule.rider_count(),
            phase_count = self.phases.len(),
            environment_mode = ?self.environment_mode,
        );

        let statistics = Arc::new(StatisticsCollector::new());
        let mut scope = SolverScope::new(director)
            .with_statistics(Arc::clone(&statistics))
            .with_environment_mode(self.environment_mode)
            .with_listeners(std::mem::take(&mut self.listeners));
        let seed = match (self.random_seed, self.environment_mode) {
            (Some(seed), _) => Some(seed),
            (None, EnvironmentMode::NonReproducible) => None,
            (None, _) => Some(REPRODUCIBLE_SEED),
        };
        if let Some(seed) = seed {
            scope = scope.with_seed(seed);
        }
        if let Some(flag) = self.terminate_early_flag.take() {
            scope = scope.with_terminate_early_flag(flag);
        }
        if let Some(termination) = self.termination.take() {
            scope = scope.with_termination(termination);
        }

        scope.start_solving();
        scope.assert_score_consistent()?;
        scope.update_best_solution();

        if scope.working_schedule().order_count() > 0 {
            for (index, phase) in self.phases.iter_mut().enumerate() {
                if scope.is_terminate_early() {
                    break;
                }
                phase.solve(&mut scope, index)?;
            }
        }

        let terminated_early = scope.is_terminate_early();
        let duration = scope.elapsed();
        scope.restore_best_solution()?;
        let best = scope.search_score();

        let director = scope.into_score_director();
        let explanation = director.explain();
        let indictments = director.indictments();
        let schedule = director.take_schedule();
        let statistics = Arc::try_unwrap(statistics)
            .map(StatisticsCollector::into_statistics)
            .unwrap_or_else(|shared| shared.snapshot());

        info!(
            event = "solve_end",
            score = %best,
            unassigned = best.unassigned(),
            duration_ms = duration.as_millis() as u64,
            steps = statistics.total_step_count,
            moves_evaluated = statistics.total_moves_evaluated,
            terminated_early,
        );

        Ok(SolveResult {
            schedule,
            score: best.score(),
            unassigned: best.unassigned(),
            explanation,
            indictments,
            statistics,
            terminated_early,
        })
    }
}
