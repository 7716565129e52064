//! The slot assignment rules and the tuple-based constraint set that runs them.

use std::fmt::Debug;

use chrono::Timelike;
use slotplan_core::{
    distance_km, ConstraintRef, HardSoftScore, ImpactType, Order, Schedule, ScoreLevel,
    ShiftBucket,
};

use crate::analysis::ConstraintAnalysis;
use crate::constraint::{
    ClusteringConstraint, GroupKey, GroupedConstraint, IncrementalConstraint, UniOrderConstraint,
    CONSTRAINT_PACKAGE,
};

/// Constraint names as reported in score explanations.
pub mod names {
    pub const ALLOWED_DAY: &str = "Order must be assigned to an allowed day";
    pub const EFFECTIVE_CAPACITY: &str = "Shift effective capacity must not be exceeded";
    pub const RIDER_SKILLS: &str = "Rider must have required skills";
    pub const VEHICLE_WEIGHT: &str = "Vehicle weight capacity must not be exceeded";
    pub const VEHICLE_VOLUME: &str = "Vehicle volume capacity must not be exceeded";
    pub const BUFFER_CAPACITY: &str = "Buffer capacity must be respected";
    pub const EARLIEST_DAY: &str = "Prefer earliest allowed day";
    pub const MOVABLE_RATIO: &str = "Balance movable and non-movable (ratio threshold)";
    pub const DEPOT_DISTANCE: &str = "Minimize depot-to-order distance";
    pub const WORKLOAD_BALANCE: &str = "Balance workload per rider across week";
    pub const CLUSTERING: &str = "Clustering bonus for nearby orders";
    pub const TIME_WINDOW: &str = "Customer time window preference";
}

/// Orders each rider should carry across the planning horizon.
pub const WORKLOAD_TARGET: i64 = 12;

/// Pairs closer than this share the clustering reward.
pub const CLUSTER_RADIUS_KM: f64 = 2.0;

pub const CLUSTER_REWARD: i64 = 10;

/// Assumed shift start used by the time window preference, as seconds after midnight.
pub const SHIFT_START_SECONDS: i64 = 9 * 3600;

/// A set of constraints evaluated together.
///
/// Implemented for tuples so each constraint keeps its concrete type.
pub trait ConstraintSet: Send + Sync + Clone + Debug {
    /// Full evaluation of every constraint.
    fn evaluate_all(&self, schedule: &Schedule) -> HardSoftScore;

    fn constraint_count(&self) -> usize;

    /// Per-constraint score and match count.
    fn evaluate_each(&self, schedule: &Schedule) -> Vec<ConstraintAnalysis>;

    fn initialize_all(&mut self, schedule: &Schedule) -> HardSoftScore;

    fn on_insert_all(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore;

    fn on_retract_all(&mut self, schedule: &Schedule, order: usize, bucket: usize)
        -> HardSoftScore;

    fn reset_all(&mut self);
}

macro_rules! impl_constraint_set_for_tuple {
    ($($idx:tt: $T:ident),+) => {
        impl<$($T),+> ConstraintSet for ($($T,)+)
        where
            $($T: IncrementalConstraint,)+
        {
            #[inline]
            fn evaluate_all(&self, schedule: &Schedule) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total += self.$idx.evaluate(schedule);)+
                total
            }

            #[inline]
            fn constraint_count(&self) -> usize {
                let mut count = 0;
                $(let _ = &self.$idx; count += 1;)+
                count
            }

            fn evaluate_each(&self, schedule: &Schedule) -> Vec<ConstraintAnalysis> {
                vec![$(ConstraintAnalysis {
                    constraint_ref: self.$idx.constraint_ref().clone(),
                    level: self.$idx.level(),
                    score: self.$idx.evaluate(schedule),
                    match_count: self.$idx.match_count(schedule),
                }),+]
            }

            #[inline]
            fn initialize_all(&mut self, schedule: &Schedule) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total += self.$idx.initialize(schedule);)+
                total
            }

            #[inline]
            fn on_insert_all(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total += self.$idx.on_insert(schedule, order, bucket);)+
                total
            }

            #[inline]
            fn on_retract_all(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore {
                let mut total = HardSoftScore::ZERO;
                $(total += self.$idx.on_retract(schedule, order, bucket);)+
                total
            }

            #[inline]
            fn reset_all(&mut self) {
                $(self.$idx.reset();)+
            }
        }
    };
}

impl_constraint_set_for_tuple!(0: C0);
impl_constraint_set_for_tuple!(0: C0, 1: C1);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10);
impl_constraint_set_for_tuple!(0: C0, 1: C1, 2: C2, 3: C3, 4: C4, 5: C5, 6: C6, 7: C7, 8: C8, 9: C9, 10: C10, 11: C11);

/// The six hard and six soft slot assignment rules.
pub type SlotConstraints = (
    UniOrderConstraint,
    GroupedConstraint,
    UniOrderConstraint,
    GroupedConstraint,
    GroupedConstraint,
    GroupedConstraint,
    UniOrderConstraint,
    GroupedConstraint,
    UniOrderConstraint,
    GroupedConstraint,
    ClusteringConstraint,
    UniOrderConstraint,
);

fn cref(name: &str) -> ConstraintRef {
    ConstraintRef::new(CONSTRAINT_PACKAGE, name)
}

/// Builds the full rule set, hard constraints first.
pub fn slot_constraints() -> SlotConstraints {
    use ImpactType::Penalty;
    use ScoreLevel::{Hard, Soft};

    (
        UniOrderConstraint::new(cref(names::ALLOWED_DAY), Hard, Penalty, outside_allowed_days),
        GroupedConstraint::new(
            cref(names::EFFECTIVE_CAPACITY),
            Hard,
            Penalty,
            GroupKey::Bucket,
            count_one,
            over_effective_capacity,
        ),
        UniOrderConstraint::new(cref(names::RIDER_SKILLS), Hard, Penalty, missing_skills),
        GroupedConstraint::new(
            cref(names::VEHICLE_WEIGHT),
            Hard,
            Penalty,
            GroupKey::Bucket,
            rounded_weight,
            over_max_weight,
        ),
        GroupedConstraint::new(
            cref(names::VEHICLE_VOLUME),
            Hard,
            Penalty,
            GroupKey::Bucket,
            rounded_deci_volume,
            over_max_volume,
        ),
        // Same rule as effective capacity, kept as its own constraint so an
        // overfull bucket is penalized twice.
        GroupedConstraint::new(
            cref(names::BUFFER_CAPACITY),
            Hard,
            Penalty,
            GroupKey::Bucket,
            count_one,
            over_effective_capacity,
        ),
        UniOrderConstraint::new(cref(names::EARLIEST_DAY), Soft, Penalty, days_after_earliest),
        GroupedConstraint::new(
            cref(names::MOVABLE_RATIO),
            Soft,
            Penalty,
            GroupKey::Bucket,
            count_movable,
            over_movable_limit,
        ),
        UniOrderConstraint::new(cref(names::DEPOT_DISTANCE), Soft, Penalty, depot_distance),
        GroupedConstraint::new(
            cref(names::WORKLOAD_BALANCE),
            Soft,
            Penalty,
            GroupKey::Rider,
            count_one,
            off_workload_target,
        ),
        ClusteringConstraint::new(cref(names::CLUSTERING), CLUSTER_RADIUS_KM, CLUSTER_REWARD),
        UniOrderConstraint::new(cref(names::TIME_WINDOW), Soft, Penalty, time_window_miss),
    )
}

fn outside_allowed_days(order: &Order, bucket: &ShiftBucket) -> i64 {
    i64::from(!order.is_allowed_on(bucket.date()))
}

fn missing_skills(order: &Order, bucket: &ShiftBucket) -> i64 {
    i64::from(!order.required_skills().is_empty() && !bucket.has_skills(order.required_skills()))
}

fn days_after_earliest(order: &Order, bucket: &ShiftBucket) -> i64 {
    (bucket.date() - order.earliest_allowed_day())
        .num_days()
        .max(0)
}

fn depot_distance(order: &Order, bucket: &ShiftBucket) -> i64 {
    distance_km(
        bucket.start_latitude(),
        bucket.start_longitude(),
        order.latitude(),
        order.longitude(),
    )
    .round() as i64
}

/// Half hours between the assumed shift start and the customer's window.
fn time_window_miss(order: &Order, _bucket: &ShiftBucket) -> i64 {
    let (Some(start), Some(end)) = (order.preferred_start_time(), order.preferred_end_time())
    else {
        return 0;
    };
    let start = i64::from(start.num_seconds_from_midnight());
    let end = i64::from(end.num_seconds_from_midnight());

    if SHIFT_START_SECONDS < start {
        (start - SHIFT_START_SECONDS) / 60 / 30
    } else if SHIFT_START_SECONDS > end {
        (SHIFT_START_SECONDS - end) / 60 / 30
    } else {
        0
    }
}

fn count_one(_order: &Order) -> i64 {
    1
}

fn count_movable(order: &Order) -> i64 {
    i64::from(order.is_movable())
}

fn rounded_weight(order: &Order) -> i64 {
    order.weight().round() as i64
}

fn rounded_deci_volume(order: &Order) -> i64 {
    (order.volume() * 10.0).round() as i64
}

fn over_effective_capacity(schedule: &Schedule, bucket: usize, count: i64) -> i64 {
    (count - schedule.bucket(bucket).effective_capacity()).max(0)
}

fn over_movable_limit(schedule: &Schedule, bucket: usize, count: i64) -> i64 {
    (count - schedule.bucket(bucket).movable_limit()).max(0)
}

fn over_max_weight(schedule: &Schedule, bucket: usize, total: i64) -> i64 {
    let max = schedule.bucket(bucket).max_weight();
    let total = total as f64;
    if total > max {
        ((total - max).ceil() as i64).max(0)
    } else {
        0
    }
}

/// `total` is in tenths of a cubic metre.
fn over_max_volume(schedule: &Schedule, bucket: usize, total: i64) -> i64 {
    let max = schedule.bucket(bucket).max_volume();
    let total = total as f64;
    if total > max * 10.0 {
        ((total / 10.0 - max).ceil() as i64).max(0)
    } else {
        0
    }
}

fn off_workload_target(_schedule: &Schedule, _rider: usize, count: i64) -> i64 {
    (count - WORKLOAD_TARGET).abs()
}
