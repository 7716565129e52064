//! Progress reporting on best solution events.

use tracing::debug;

use crate::event::{BestSolutionCallback, BestSolutionEvent};
use crate::SearchScore;

/// Best solutions between two summaries.
pub const DEFAULT_SUMMARY_INTERVAL: u64 = 10;

/// Periodic summary of solving progress.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub solution_count: u64,
    pub assigned: usize,
    pub total: usize,
    /// Assigned orders in percent.
    pub assignment_rate: f64,
    pub unassigned: usize,
    pub solutions_per_second: f64,
    pub best_score: SearchScore,
}

/// Best solution listener that logs every improvement and a summary every
/// few improvements.
///
/// ```
/// use slotplan_solver::{FirstFitPhase, Phase, ProgressTracker, Solver};
/// use slotplan_test::scenarios;
///
/// let phases: Vec<Box<dyn Phase>> = vec![Box::new(FirstFitPhase::new())];
/// let result = Solver::new(phases)
///     .with_best_solution_listener(ProgressTracker::new().into_listener())
///     .solve(scenarios::mixed_week())
///     .unwrap();
/// assert!(result.statistics.improvement_count() >= 1);
/// ```
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    solution_count: u64,
    previous: Option<SearchScore>,
    summary_interval: u64,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            solution_count: 0,
            previous: None,
            summary_interval: DEFAULT_SUMMARY_INTERVAL,
        }
    }

    pub fn with_summary_interval(mut self, interval: u64) -> Self {
        self.summary_interval = interval.max(1);
        self
    }

    pub fn solution_count(&self) -> u64 {
        self.solution_count
    }

    pub fn best_score(&self) -> Option<SearchScore> {
        self.previous
    }

    /// Records one best solution. Returns the summary when one is due.
    pub fn on_best_solution(&mut self, event: &BestSolutionEvent<'_>) -> Option<ProgressSummary> {
        self.solution_count += 1;
        let elapsed_ms = event.elapsed.as_millis() as u64;
        match self.previous {
            Some(previous) => debug!(
                event = "progress",
                solution = self.solution_count,
                score = %event.score,
                elapsed_ms,
                improvement = %(event.score.score() - previous.score()),
                newly_assigned = previous.unassigned() as i64 - event.score.unassigned() as i64,
            ),
            None => debug!(
                event = "progress",
                solution = self.solution_count,
                score = %event.score,
                elapsed_ms,
            ),
        }
        self.previous = Some(event.score);

        if self.solution_count % self.summary_interval != 0 {
            return None;
        }

        let total = event.schedule.order_count();
        let unassigned = event.score.unassigned();
        let assigned = total - unassigned;
        let assignment_rate = if total == 0 {
            100.0
        } else {
            assigned as f64 * 100.0 / total as f64
        };
        let secs = event.elapsed.as_secs_f64();
        let solutions_per_second = if secs > 0.0 {
            self.solution_count as f64 / secs
        } else {
            0.0
        };

        let summary = ProgressSummary {
            solution_count: self.solution_count,
            assigned,
            total,
            assignment_rate,
            unassigned,
            solutions_per_second,
            best_score: event.score,
        };
        debug!(
            event = "progress_summary",
            solutions = summary.solution_count,
            assigned = summary.assigned,
            total = summary.total,
            assignment_rate = format!("{:.1}%", summary.assignment_rate),
            unassigned = summary.unassigned,
            solutions_per_second = format!("{:.2}", summary.solutions_per_second),
            best = %summary.best_score,
        );
        Some(summary)
    }

    /// Boxes this tracker as a solver listener.
    pub fn into_listener(mut self) -> BestSolutionCallback {
        Box::new(move |event| {
            self.on_best_solution(event);
        })
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
