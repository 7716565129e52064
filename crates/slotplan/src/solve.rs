//! Solve entry points.

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use slotplan_config::SolverConfig;
use slotplan_core::{HardSoftScore, Schedule, SlotPlanError};
use slotplan_scoring::{OrderIndictment, ScoreExplanation};
use slotplan_solver::{BestSolutionCallback, ProgressTracker, SolveResult, Solver, SolverStatistics};

use crate::summary::ScheduleSummary;

/// Hooks into a running solve.
#[derive(Default)]
pub struct SolveOptions {
    /// Called synchronously each time the tracked best improves.
    pub on_best_solution: Option<BestSolutionCallback>,
    /// Setting the flag stops the solve at its next check; the best
    /// schedule found so far is still returned.
    pub terminate_flag: Option<Arc<AtomicBool>>,
}

impl fmt::Debug for SolveOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolveOptions")
            .field("on_best_solution", &self.on_best_solution.is_some())
            .field("terminate_flag", &self.terminate_flag)
            .finish()
    }
}

/// Best schedule of a solve with its score breakdown.
#[derive(Debug, Clone)]
pub struct SolvedSchedule {
    /// Orders carry their final bucket, `None` when left unassigned.
    pub schedule: Schedule,
    pub score: HardSoftScore,
    pub explanation: ScoreExplanation,
    pub indictments: Vec<OrderIndictment>,
    pub summary: ScheduleSummary,
    pub statistics: SolverStatistics,
    pub terminated_early: bool,
}

impl SolvedSchedule {
    pub fn is_feasible(&self) -> bool {
        self.score.is_feasible()
    }

    /// Id of the bucket `order_id` ended up in.
    pub fn bucket_of(&self, order_id: &str) -> Option<&str> {
        let order = self.schedule.find_order(order_id)?;
        let bucket = self.schedule.assigned_bucket(order)?;
        Some(self.schedule.bucket(bucket).id())
    }
}

impl From<SolveResult> for SolvedSchedule {
    fn from(result: SolveResult) -> Self {
        let summary = ScheduleSummary::of(&result.schedule);
        Self {
            schedule: result.schedule,
            score: result.score,
            explanation: result.explanation,
            indictments: result.indictments,
            summary,
            statistics: result.statistics,
            terminated_early: result.terminated_early,
        }
    }
}

/// Solves `schedule` with `config`.
///
/// # Errors
///
/// Invalid configuration and invalid assignments are rejected before any
/// search. An infeasible result is not an error.
pub fn solve(schedule: Schedule, config: &SolverConfig) -> Result<SolvedSchedule, SlotPlanError> {
    solve_with(schedule, config, SolveOptions::default())
}

/// Solves `schedule` with a best solution callback and a stop flag.
pub fn solve_with(
    schedule: Schedule,
    config: &SolverConfig,
    options: SolveOptions,
) -> Result<SolvedSchedule, SlotPlanError> {
    #[cfg(feature = "console")]
    slotplan_console::init();

    let mut tracker = ProgressTracker::new();
    let mut callback = options.on_best_solution;
    let mut solver = Solver::from_config(config)?.with_best_solution_listener(move |event| {
        tracker.on_best_solution(event);
        if let Some(callback) = callback.as_mut() {
            callback(event);
        }
    });
    if let Some(flag) = options.terminate_flag {
        solver = solver.with_terminate_early_flag(flag);
    }

    solver.solve(schedule).map(SolvedSchedule::from)
}
