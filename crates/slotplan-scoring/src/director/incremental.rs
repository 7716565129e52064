//! Incremental score director backed by a [`ConstraintSet`].

use std::fmt;

use slotplan_core::{DomainError, HardSoftScore, Schedule, SlotPlanError};
use tracing::trace;

use super::ScoreDirector;
use crate::analysis::{OrderIndictment, ScoreExplanation};
use crate::constraint_set::{slot_constraints, ConstraintSet, SlotConstraints};

/// Score director that maintains the score through constraint deltas.
///
/// Constraints are initialized lazily on the first `calculate_score`; after
/// that each bucket change costs one retract and one insert per constraint.
#[derive(Clone)]
pub struct IncrementalScoreDirector<C: ConstraintSet = SlotConstraints> {
    working_schedule: Schedule,
    constraints: C,
    cached_score: HardSoftScore,
    unassigned: usize,
    initialized: bool,
    calculation_count: u64,
}

impl IncrementalScoreDirector<SlotConstraints> {
    /// Creates a director running the standard slot assignment rules.
    pub fn for_schedule(schedule: Schedule) -> Result<Self, DomainError> {
        Self::new(schedule, slot_constraints())
    }
}

impl<C: ConstraintSet> IncrementalScoreDirector<C> {
    /// Creates a director, refusing schedules with dangling assignments.
    pub fn new(schedule: Schedule, constraints: C) -> Result<Self, DomainError> {
        schedule.validate_assignments()?;
        let unassigned = schedule.unassigned_count();
        Ok(Self {
            working_schedule: schedule,
            constraints,
            cached_score: HardSoftScore::ZERO,
            unassigned,
            initialized: false,
            calculation_count: 0,
        })
    }

    /// Returns the cached score without recalculation.
    ///
    /// Zero until the first `calculate_score`.
    #[inline]
    pub fn score(&self) -> HardSoftScore {
        self.cached_score
    }

    /// Recomputes the score from scratch, ignoring incremental state.
    pub fn full_score(&self) -> HardSoftScore {
        self.constraints.evaluate_all(&self.working_schedule)
    }

    /// Fails if the incremental score differs from a full recalculation.
    pub fn assert_score_consistent(&mut self) -> Result<(), SlotPlanError> {
        let incremental = self.calculate_score();
        let full = self.full_score();
        if incremental != full {
            return Err(SlotPlanError::InvalidState(format!(
                "incremental score {} drifted from full score {}",
                incremental, full
            )));
        }
        Ok(())
    }

    /// Per-constraint breakdown of the current assignments.
    pub fn explain(&self) -> ScoreExplanation {
        ScoreExplanation::new(self.constraints.evaluate_each(&self.working_schedule))
    }

    /// Score each assigned order is responsible for, most penalized first.
    ///
    /// An order's share is the score lost by retracting it alone.
    pub fn indictments(&self) -> Vec<OrderIndictment> {
        let schedule = &self.working_schedule;
        let mut scratch = self.constraints.clone();
        scratch.initialize_all(schedule);

        let mut indictments: Vec<OrderIndictment> = schedule
            .orders()
            .iter()
            .enumerate()
            .filter_map(|(i, order)| {
                let bucket = order.assigned_bucket()?;
                let delta = scratch.on_retract_all(schedule, i, bucket);
                scratch.on_insert_all(schedule, i, bucket);
                Some(OrderIndictment {
                    order_index: i,
                    order_id: order.id().to_string(),
                    score: -delta,
                })
            })
            .collect();
        indictments.sort_by(|a, b| a.score.cmp(&b.score));
        indictments
    }

    pub fn constraints(&self) -> &C {
        &self.constraints
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.constraint_count()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Number of score calculations served so far.
    pub fn calculation_count(&self) -> u64 {
        self.calculation_count
    }

    /// Drops incremental state; the next `calculate_score` starts from scratch.
    pub fn reset(&mut self) {
        self.constraints.reset_all();
        self.initialized = false;
        self.cached_score = HardSoftScore::ZERO;
    }

    /// Replaces all assignments at once and resets incremental state.
    pub fn restore_assignments(&mut self, assignments: &[Option<usize>]) -> Result<(), DomainError> {
        self.working_schedule.restore_assignments(assignments)?;
        self.unassigned = self.working_schedule.unassigned_count();
        self.reset();
        Ok(())
    }

    /// Consumes the director, returning the schedule with its score set.
    pub fn take_schedule(mut self) -> Schedule {
        let score = self.calculate_score();
        self.working_schedule.set_score(Some(score));
        self.working_schedule
    }
}

impl<C: ConstraintSet> ScoreDirector for IncrementalScoreDirector<C> {
    fn working_schedule(&self) -> &Schedule {
        &self.working_schedule
    }

    fn calculate_score(&mut self) -> HardSoftScore {
        if !self.initialized {
            self.cached_score = self.constraints.initialize_all(&self.working_schedule);
            self.initialized = true;
        }
        self.calculation_count += 1;
        self.cached_score
    }

    fn unassigned_count(&self) -> usize {
        self.unassigned
    }

    fn change_bucket(&mut self, order: usize, bucket: Option<usize>) -> Option<usize> {
        let previous = self.working_schedule.assigned_bucket(order);
        if previous == bucket {
            return previous;
        }

        if self.initialized {
            if let Some(b) = previous {
                let delta = self
                    .constraints
                    .on_retract_all(&self.working_schedule, order, b);
                self.cached_score += delta;
            }
        }

        self.working_schedule.set_assigned_bucket(order, bucket);
        match (previous, bucket) {
            (Some(_), None) => self.unassigned += 1,
            (None, Some(_)) => self.unassigned -= 1,
            _ => {}
        }

        if self.initialized {
            if let Some(b) = bucket {
                let delta = self
                    .constraints
                    .on_insert_all(&self.working_schedule, order, b);
                self.cached_score += delta;
            }
        }

        trace!(order, ?previous, ?bucket, score = %self.cached_score, "bucket changed");
        previous
    }
}

impl<C: ConstraintSet> fmt::Debug for IncrementalScoreDirector<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncrementalScoreDirector")
            .field("initialized", &self.initialized)
            .field("cached_score", &self.cached_score)
            .field("unassigned", &self.unassigned)
            .field("constraint_count", &self.constraints.constraint_count())
            .finish()
    }
}
