//! Constraints over per-group totals.

use std::fmt;

use slotplan_core::{ConstraintRef, HardSoftScore, ImpactType, Order, Schedule, ScoreLevel};

use super::IncrementalConstraint;

/// What an order's bucket is grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// One group per bucket.
    Bucket,
    /// One group per rider, across all of the rider's days.
    Rider,
}

impl GroupKey {
    #[inline]
    fn key(self, schedule: &Schedule, bucket: usize) -> usize {
        match self {
            GroupKey::Bucket => bucket,
            GroupKey::Rider => schedule.rider_of_bucket(bucket),
        }
    }

    fn group_count(self, schedule: &Schedule) -> usize {
        match self {
            GroupKey::Bucket => schedule.bucket_count(),
            GroupKey::Rider => schedule.rider_count(),
        }
    }
}

/// Value an order adds to its group total.
pub type Collector = fn(&Order) -> i64;

/// Penalty magnitude of a group given its key and collected total.
pub type GroupPenalty = fn(&Schedule, usize, i64) -> i64;

/// Groups assigned orders, collects a total per group and weighs each group.
///
/// A group only exists while at least one order belongs to it, so an empty
/// bucket or an idle rider never contributes.
#[derive(Clone)]
pub struct GroupedConstraint {
    constraint_ref: ConstraintRef,
    level: ScoreLevel,
    impact: ImpactType,
    key: GroupKey,
    collector: Collector,
    penalty: GroupPenalty,
    totals: Vec<i64>,
    members: Vec<usize>,
}

impl GroupedConstraint {
    pub fn new(
        constraint_ref: ConstraintRef,
        level: ScoreLevel,
        impact: ImpactType,
        key: GroupKey,
        collector: Collector,
        penalty: GroupPenalty,
    ) -> Self {
        Self {
            constraint_ref,
            level,
            impact,
            key,
            collector,
            penalty,
            totals: Vec::new(),
            members: Vec::new(),
        }
    }

    #[inline]
    fn group_score(&self, schedule: &Schedule, group: usize, total: i64, members: usize) -> HardSoftScore {
        if members == 0 {
            return HardSoftScore::ZERO;
        }
        self.impact
            .apply(self.level, (self.penalty)(schedule, group, total))
    }

    fn collect(&self, schedule: &Schedule) -> (Vec<i64>, Vec<usize>) {
        let groups = self.key.group_count(schedule);
        let mut totals = vec![0; groups];
        let mut members = vec![0; groups];
        for order in schedule.orders() {
            if let Some(b) = order.assigned_bucket() {
                let g = self.key.key(schedule, b);
                totals[g] += (self.collector)(order);
                members[g] += 1;
            }
        }
        (totals, members)
    }

    fn ensure_state(&mut self, schedule: &Schedule) {
        let groups = self.key.group_count(schedule);
        if self.totals.len() != groups {
            self.totals = vec![0; groups];
            self.members = vec![0; groups];
        }
    }

    fn shift(&mut self, schedule: &Schedule, order: usize, bucket: usize, sign: i64) -> HardSoftScore {
        self.ensure_state(schedule);
        let g = self.key.key(schedule, bucket);
        let before = self.group_score(schedule, g, self.totals[g], self.members[g]);

        self.totals[g] += sign * (self.collector)(schedule.order(order));
        self.members[g] = if sign > 0 {
            self.members[g] + 1
        } else {
            self.members[g].saturating_sub(1)
        };

        let after = self.group_score(schedule, g, self.totals[g], self.members[g]);
        after - before
    }
}

impl fmt::Debug for GroupedConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupedConstraint")
            .field("name", &self.constraint_ref.name)
            .field("level", &self.level)
            .field("key", &self.key)
            .field("groups", &self.totals.len())
            .finish()
    }
}

impl IncrementalConstraint for GroupedConstraint {
    fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    fn level(&self) -> ScoreLevel {
        self.level
    }

    fn evaluate(&self, schedule: &Schedule) -> HardSoftScore {
        let (totals, members) = self.collect(schedule);
        totals
            .iter()
            .zip(&members)
            .enumerate()
            .map(|(g, (&total, &count))| self.group_score(schedule, g, total, count))
            .sum()
    }

    fn match_count(&self, schedule: &Schedule) -> usize {
        let (totals, members) = self.collect(schedule);
        totals
            .iter()
            .zip(&members)
            .enumerate()
            .filter(|&(g, (&total, &count))| count > 0 && (self.penalty)(schedule, g, total) != 0)
            .count()
    }

    fn initialize(&mut self, schedule: &Schedule) -> HardSoftScore {
        let (totals, members) = self.collect(schedule);
        self.totals = totals;
        self.members = members;
        self.totals
            .iter()
            .zip(&self.members)
            .enumerate()
            .map(|(g, (&total, &count))| self.group_score(schedule, g, total, count))
            .sum()
    }

    fn on_insert(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore {
        self.shift(schedule, order, bucket, 1)
    }

    fn on_retract(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore {
        self.shift(schedule, order, bucket, -1)
    }

    fn reset(&mut self) {
        self.totals.clear();
        self.members.clear();
    }
}
