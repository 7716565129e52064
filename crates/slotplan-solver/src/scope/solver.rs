//! Solver-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use slotplan_config::EnvironmentMode;
use slotplan_core::{Schedule, SlotPlanError};
use slotplan_scoring::ScoreDirector;
use tracing::debug;

use crate::event::{BestSolutionCallback, BestSolutionEvent};
use crate::statistics::StatisticsCollector;
use crate::termination::Termination;
use crate::{SearchScore, SlotDirector};

/// Top-level scope for the entire solving process.
///
/// Owns the working director. The best solution is kept as an assignment
/// snapshot, which is all that differs between states.
pub struct SolverScope {
    score_director: SlotDirector,
    best_assignments: Option<Vec<Option<usize>>>,
    best_score: Option<SearchScore>,
    rng: StdRng,
    start_time: Instant,
    last_improvement: Instant,
    total_step_count: u64,
    improvement_count: u64,
    environment_mode: EnvironmentMode,
    statistics: Arc<StatisticsCollector>,
    terminate_early_flag: Option<Arc<AtomicBool>>,
    termination: Option<Box<dyn Termination>>,
    listeners: Vec<BestSolutionCallback>,
}

impl SolverScope {
    pub fn new(score_director: SlotDirector) -> Self {
        let now = Instant::now();
        Self {
            score_director,
            best_assignments: None,
            best_score: None,
            rng: StdRng::from_os_rng(),
            start_time: now,
            last_improvement: now,
            total_step_count: 0,
            improvement_count: 0,
            environment_mode: EnvironmentMode::default(),
            statistics: Arc::new(StatisticsCollector::new()),
            terminate_early_flag: None,
            termination: None,
            listeners: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_environment_mode(mut self, mode: EnvironmentMode) -> Self {
        self.environment_mode = mode;
        self
    }

    pub fn with_statistics(mut self, collector: Arc<StatisticsCollector>) -> Self {
        self.statistics = collector;
        self
    }

    pub fn with_terminate_early_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.terminate_early_flag = Some(flag);
        self
    }

    /// Sets the termination checked by every phase in addition to its own.
    pub fn with_termination(mut self, termination: Box<dyn Termination>) -> Self {
        self.termination = Some(termination);
        self
    }

    pub fn with_listeners(mut self, listeners: Vec<BestSolutionCallback>) -> Self {
        self.listeners = listeners;
        self
    }

    pub fn start_solving(&mut self) {
        let now = Instant::now();
        self.start_time = now;
        self.last_improvement = now;
        self.total_step_count = 0;
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// When the best score last improved, or the solve start.
    pub fn last_improvement(&self) -> Instant {
        self.last_improvement
    }

    pub fn score_director(&self) -> &SlotDirector {
        &self.score_director
    }

    pub fn score_director_mut(&mut self) -> &mut SlotDirector {
        &mut self.score_director
    }

    pub fn working_schedule(&self) -> &Schedule {
        self.score_director.working_schedule()
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Working schedule and rng at once, for move selection.
    pub fn schedule_and_rng(&mut self) -> (&Schedule, &mut StdRng) {
        (self.score_director.working_schedule(), &mut self.rng)
    }

    /// Current score of the working schedule.
    pub fn search_score(&mut self) -> SearchScore {
        self.statistics.record_score_calculation();
        SearchScore::of(&mut self.score_director)
    }

    pub fn best_score(&self) -> Option<SearchScore> {
        self.best_score
    }

    pub fn improvement_count(&self) -> u64 {
        self.improvement_count
    }

    /// Snapshots the working schedule if it beats the best so far.
    ///
    /// Listeners are called synchronously with the new best. Returns true
    /// on improvement.
    pub fn update_best_solution(&mut self) -> bool {
        let current = self.search_score();
        if self.best_score.is_some_and(|best| current <= best) {
            return false;
        }

        self.best_score = Some(current);
        self.best_assignments = Some(self.score_director.working_schedule().assignments());
        self.last_improvement = Instant::now();
        self.improvement_count += 1;
        self.statistics.record_improvement(current);

        let elapsed = self.start_time.elapsed();
        debug!(
            event = "new_best",
            score = %current,
            improvement = self.improvement_count,
            elapsed_ms = elapsed.as_millis() as u64,
            steps = self.total_step_count,
        );

        let event = BestSolutionEvent {
            schedule: self.score_director.working_schedule(),
            score: current,
            elapsed,
            improvement_count: self.improvement_count,
        };
        for listener in &mut self.listeners {
            listener(&event);
        }
        true
    }

    /// Puts the best snapshot back into the working director.
    pub fn restore_best_solution(&mut self) -> Result<(), SlotPlanError> {
        if let Some(best) = &self.best_assignments {
            if *best != self.score_director.working_schedule().assignments() {
                self.score_director.restore_assignments(best)?;
            }
        }
        Ok(())
    }

    pub fn total_step_count(&self) -> u64 {
        self.total_step_count
    }

    pub fn increment_step_count(&mut self) -> u64 {
        self.total_step_count += 1;
        self.statistics.record_step();
        self.total_step_count
    }

    pub fn environment_mode(&self) -> EnvironmentMode {
        self.environment_mode
    }

    pub fn is_full_assert(&self) -> bool {
        self.environment_mode == EnvironmentMode::FullAssert
    }

    /// Under `FullAssert`, fails if the incremental score drifted.
    pub fn assert_score_consistent(&mut self) -> Result<(), SlotPlanError> {
        if self.is_full_assert() {
            self.score_director.assert_score_consistent()?;
        }
        Ok(())
    }

    pub fn statistics(&self) -> &Arc<StatisticsCollector> {
        &self.statistics
    }

    pub fn record_move(&self, accepted: bool) {
        self.statistics.record_move(accepted);
    }

    /// True once an external caller asked to stop.
    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn termination(&self) -> Option<&dyn Termination> {
        self.termination.as_deref()
    }

    /// Consumes the scope, returning the working director.
    pub fn into_score_director(self) -> SlotDirector {
        self.score_director
    }
}

impl std::fmt::Debug for SolverScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolverScope")
            .field("best_score", &self.best_score)
            .field("total_step_count", &self.total_step_count)
            .field("environment_mode", &self.environment_mode)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
