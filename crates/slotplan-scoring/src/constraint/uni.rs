//! Per-order constraints.

use std::fmt;

use slotplan_core::{ConstraintRef, HardSoftScore, ImpactType, Order, Schedule, ScoreLevel, ShiftBucket};

use super::IncrementalConstraint;

/// Weight function of an order in a bucket. Returns a non-negative magnitude.
pub type OrderWeight = fn(&Order, &ShiftBucket) -> i64;

/// A constraint whose contribution is a sum over assigned orders.
///
/// Each order's weight depends only on the order and its bucket, so the
/// constraint needs no state between calls.
#[derive(Clone)]
pub struct UniOrderConstraint {
    constraint_ref: ConstraintRef,
    level: ScoreLevel,
    impact: ImpactType,
    weight: OrderWeight,
}

impl UniOrderConstraint {
    pub fn new(
        constraint_ref: ConstraintRef,
        level: ScoreLevel,
        impact: ImpactType,
        weight: OrderWeight,
    ) -> Self {
        Self {
            constraint_ref,
            level,
            impact,
            weight,
        }
    }

    #[inline]
    fn score_of(&self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore {
        let magnitude = (self.weight)(schedule.order(order), schedule.bucket(bucket));
        self.impact.apply(self.level, magnitude)
    }
}

impl fmt::Debug for UniOrderConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniOrderConstraint")
            .field("name", &self.constraint_ref.name)
            .field("level", &self.level)
            .field("impact", &self.impact)
            .finish()
    }
}

impl IncrementalConstraint for UniOrderConstraint {
    fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    fn level(&self) -> ScoreLevel {
        self.level
    }

    fn evaluate(&self, schedule: &Schedule) -> HardSoftScore {
        schedule
            .orders()
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.assigned_bucket().map(|b| self.score_of(schedule, i, b)))
            .sum()
    }

    fn match_count(&self, schedule: &Schedule) -> usize {
        schedule
            .orders()
            .iter()
            .filter_map(|o| o.assigned_bucket().map(|b| (self.weight)(o, schedule.bucket(b))))
            .filter(|&w| w != 0)
            .count()
    }

    fn initialize(&mut self, schedule: &Schedule) -> HardSoftScore {
        self.evaluate(schedule)
    }

    #[inline]
    fn on_insert(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore {
        self.score_of(schedule, order, bucket)
    }

    #[inline]
    fn on_retract(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore {
        -self.score_of(schedule, order, bucket)
    }

    fn reset(&mut self) {}
}
