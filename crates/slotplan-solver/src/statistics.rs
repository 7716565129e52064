//! Counters gathered while a schedule is solved.
//!
//! Phases and the local search workers all record into one shared
//! [`StatisticsCollector`]; the solver turns it into [`SolverStatistics`]
//! when the run ends.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::SearchScore;

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// What one phase did.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseStatistics {
    pub phase_index: usize,
    /// `"ConstructionHeuristic"` or `"LocalSearch"`.
    pub phase_type: String,
    pub duration: Duration,
    pub step_count: u64,
    /// Candidate placements scored, whether or not they were kept.
    pub moves_evaluated: u64,
    pub moves_accepted: u64,
    /// Best schedule score when the phase began and when it ended.
    pub starting_score: Option<SearchScore>,
    pub ending_score: Option<SearchScore>,
}

impl PhaseStatistics {
    pub fn new(phase_index: usize, phase_type: impl Into<String>) -> Self {
        Self {
            phase_index,
            phase_type: phase_type.into(),
            duration: Duration::ZERO,
            step_count: 0,
            moves_evaluated: 0,
            moves_accepted: 0,
            starting_score: None,
            ending_score: None,
        }
    }

    /// Share of scored moves the acceptor let through, 0 when none were scored.
    pub fn acceptance_rate(&self) -> f64 {
        ratio(self.moves_accepted, self.moves_evaluated)
    }

    pub fn avg_time_per_step(&self) -> Duration {
        if self.step_count == 0 {
            Duration::ZERO
        } else {
            self.duration.div_f64(self.step_count as f64)
        }
    }
}

/// A new best schedule, stamped with when it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreImprovement {
    /// Offset from the start of the solve.
    pub time_offset: Duration,
    /// Steps completed across all phases at that point.
    pub step_count: u64,
    pub score: SearchScore,
}

/// Totals for a finished solve, plus the per-phase breakdown and the
/// sequence of best scores in the order they were found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverStatistics {
    pub total_duration: Duration,
    pub total_step_count: u64,
    pub total_moves_evaluated: u64,
    pub total_moves_accepted: u64,
    /// Includes moves scored in parallel batches that were never judged.
    pub score_calculation_count: u64,
    pub phase_statistics: Vec<PhaseStatistics>,
    pub score_history: Vec<ScoreImprovement>,
}

impl SolverStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acceptance_rate(&self) -> f64 {
        ratio(self.total_moves_accepted, self.total_moves_evaluated)
    }

    pub fn phase_count(&self) -> usize {
        self.phase_statistics.len()
    }

    /// The last recorded best, which is the score the solve returned.
    pub fn best_score(&self) -> Option<&SearchScore> {
        self.score_history.last().map(|s| &s.score)
    }

    pub fn improvement_count(&self) -> usize {
        self.score_history.len()
    }

    pub fn moves_per_second(&self) -> f64 {
        let secs = self.total_duration.as_secs_f64();
        if secs == 0.0 {
            0.0
        } else {
            self.total_moves_evaluated as f64 / secs
        }
    }
}

/// Shared sink for the counters of a running solve.
///
/// Counters are relaxed atomics. Phase records and the best score history sit
/// behind mutexes since they are only touched at phase ends and on
/// improvements.
#[derive(Debug)]
pub struct StatisticsCollector {
    start_time: Instant,
    moves_evaluated: AtomicU64,
    moves_accepted: AtomicU64,
    step_count: AtomicU64,
    score_calculations: AtomicU64,
    phases: Mutex<Vec<PhaseStatistics>>,
    score_history: Mutex<Vec<ScoreImprovement>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl StatisticsCollector {
    /// Starts the clock.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            moves_evaluated: AtomicU64::new(0),
            moves_accepted: AtomicU64::new(0),
            step_count: AtomicU64::new(0),
            score_calculations: AtomicU64::new(0),
            phases: Mutex::new(Vec::new()),
            score_history: Mutex::new(Vec::new()),
        }
    }

    pub fn record_move(&self, accepted: bool) {
        self.moves_evaluated.fetch_add(1, Ordering::Relaxed);
        if accepted {
            self.moves_accepted.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_step(&self) {
        self.step_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_score_calculation(&self) {
        self.score_calculations.fetch_add(1, Ordering::Relaxed);
    }

    /// Bulk form used after a parallel batch.
    pub fn record_score_calculations(&self, count: u64) {
        self.score_calculations.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_improvement(&self, score: SearchScore) {
        let improvement = ScoreImprovement {
            time_offset: self.start_time.elapsed(),
            step_count: self.step_count.load(Ordering::Relaxed),
            score,
        };
        lock(&self.score_history).push(improvement);
    }

    pub fn end_phase(&self, phase: PhaseStatistics) {
        lock(&self.phases).push(phase);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn current_step_count(&self) -> u64 {
        self.step_count.load(Ordering::Relaxed)
    }

    pub fn current_moves_evaluated(&self) -> u64 {
        self.moves_evaluated.load(Ordering::Relaxed)
    }

    pub fn current_moves_accepted(&self) -> u64 {
        self.moves_accepted.load(Ordering::Relaxed)
    }

    pub fn current_score_calculations(&self) -> u64 {
        self.score_calculations.load(Ordering::Relaxed)
    }

    /// Final totals, once no phase holds the collector anymore.
    pub fn into_statistics(self) -> SolverStatistics {
        SolverStatistics {
            total_duration: self.start_time.elapsed(),
            total_step_count: self.step_count.into_inner(),
            total_moves_evaluated: self.moves_evaluated.into_inner(),
            total_moves_accepted: self.moves_accepted.into_inner(),
            score_calculation_count: self.score_calculations.into_inner(),
            phase_statistics: self
                .phases
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
            score_history: self
                .score_history
                .into_inner()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Totals so far, for callers that still share the collector.
    pub fn snapshot(&self) -> SolverStatistics {
        SolverStatistics {
            total_duration: self.start_time.elapsed(),
            total_step_count: self.current_step_count(),
            total_moves_evaluated: self.current_moves_evaluated(),
            total_moves_accepted: self.current_moves_accepted(),
            score_calculation_count: self.current_score_calculations(),
            phase_statistics: lock(&self.phases).clone(),
            score_history: lock(&self.score_history).clone(),
        }
    }
}

impl Default for StatisticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotplan_core::HardSoftScore;

    fn score(soft: i64) -> SearchScore {
        SearchScore::initialized(HardSoftScore::of(0, soft))
    }

    #[test]
    fn test_empty_statistics() {
        let stats = SolverStatistics::new();
        assert_eq!(stats.phase_count(), 0);
        assert_eq!(stats.acceptance_rate(), 0.0);
        assert_eq!(stats.moves_per_second(), 0.0);
        assert!(stats.best_score().is_none());
    }

    #[test]
    fn test_collector_record_move() {
        let collector = StatisticsCollector::new();

        collector.record_move(true);
        collector.record_move(false);
        collector.record_move(true);

        assert_eq!(collector.current_moves_evaluated(), 3);
        assert_eq!(collector.current_moves_accepted(), 2);
    }

    #[test]
    fn test_collector_record_improvement() {
        let collector = StatisticsCollector::new();

        collector.record_step();
        collector.record_improvement(score(-10));
        collector.record_step();
        collector.record_improvement(score(-5));

        let stats = collector.into_statistics();
        assert_eq!(stats.improvement_count(), 2);
        assert_eq!(stats.best_score(), Some(&score(-5)));
        assert_eq!(stats.score_history[0].step_count, 1);
        assert_eq!(stats.score_history[1].step_count, 2);
    }

    #[test]
    fn test_collector_phases() {
        let collector = StatisticsCollector::new();

        collector.end_phase(PhaseStatistics {
            duration: Duration::from_millis(100),
            step_count: 5,
            moves_evaluated: 10,
            moves_accepted: 5,
            ending_score: Some(score(-5)),
            ..PhaseStatistics::new(0, "ConstructionHeuristic")
        });
        collector.end_phase(PhaseStatistics {
            duration: Duration::from_millis(200),
            step_count: 20,
            moves_evaluated: 100,
            moves_accepted: 50,
            ..PhaseStatistics::new(1, "LocalSearch")
        });

        let stats = collector.into_statistics();
        assert_eq!(stats.phase_count(), 2);
        assert_eq!(stats.phase_statistics[0].phase_type, "ConstructionHeuristic");
        assert_eq!(
            stats.phase_statistics[0].avg_time_per_step(),
            Duration::from_millis(20)
        );
        assert!((stats.phase_statistics[1].acceptance_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_collector_snapshot() {
        let collector = StatisticsCollector::new();
        collector.record_step();
        collector.record_step();

        let snapshot = collector.snapshot();
        assert_eq!(snapshot.total_step_count, 2);

        collector.record_step();
        assert_eq!(collector.current_step_count(), 3);
    }

    #[test]
    fn test_collector_thread_safety() {
        let collector = StatisticsCollector::new();

        rayon::scope(|s| {
            for _ in 0..4 {
                s.spawn(|_| {
                    for _ in 0..1000 {
                        collector.record_move(false);
                        collector.record_score_calculation();
                    }
                });
            }
        });

        assert_eq!(collector.current_moves_evaluated(), 4000);
        assert_eq!(collector.current_score_calculations(), 4000);
    }

    #[test]
    fn test_snapshot_matches_final_totals() {
        let collector = StatisticsCollector::new();
        collector.record_move(true);
        collector.record_score_calculations(64);
        collector.record_step();
        collector.record_improvement(score(-3));

        let snapshot = collector.snapshot();
        let last = collector.into_statistics();
        assert_eq!(snapshot.total_moves_accepted, last.total_moves_accepted);
        assert_eq!(last.score_calculation_count, 64);
        assert_eq!(snapshot.score_history, last.score_history);
        assert_eq!(last.acceptance_rate(), 1.0);
    }
}
