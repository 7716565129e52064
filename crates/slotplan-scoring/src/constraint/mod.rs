//! Incremental constraints.
//!
//! Three shapes cover every rule of the model:
//! - [`UniOrderConstraint`]: an independent weight per assigned order
//! - [`GroupedConstraint`]: a total collected per bucket or per rider, then penalized
//! - [`ClusteringConstraint`]: a reward per pair of orders sharing a bucket

mod clustering;
mod grouped;
mod uni;


use std::fmt::Debug;

use slotplan_core::{ConstraintRef, HardSoftScore, Schedule, ScoreLevel};

pub use clustering::ClusteringConstraint;
pub use grouped::{GroupKey, GroupedConstraint};
pub use uni::UniOrderConstraint;

/// Package name used for every built-in constraint reference.
pub const CONSTRAINT_PACKAGE: &str = "slotplan";

/// A constraint that can be evaluated from scratch or maintained by deltas.
///
/// The incremental callbacks are told explicitly which bucket the order is
/// entering or leaving. They read only the static parts of the schedule
/// (order and bucket attributes), never the current assignments, so a caller
/// may invoke them before or after mutating the planning variable.
pub trait IncrementalConstraint: Send + Sync + Clone + Debug {
    /// Stable identity of this constraint.
    fn constraint_ref(&self) -> &ConstraintRef;

    /// Score level this constraint contributes to.
    fn level(&self) -> ScoreLevel;

    fn name(&self) -> &str {
        &self.constraint_ref().name
    }

    fn is_hard(&self) -> bool {
        self.level() == ScoreLevel::Hard
    }

    /// Full evaluation from the schedule's current assignments. Stateless.
    fn evaluate(&self, schedule: &Schedule) -> HardSoftScore;

    /// Number of non-zero matches in the current assignments.
    fn match_count(&self, schedule: &Schedule) -> usize;

    /// Rebuilds internal state from the current assignments, returning the total.
    fn initialize(&mut self, schedule: &Schedule) -> HardSoftScore;

    /// Order `order` enters `bucket`; returns the score delta.
    fn on_insert(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore;

    /// Order `order` leaves `bucket`; returns the score delta.
    fn on_retract(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore;

    /// Drops internal state.
    fn reset(&mut self);
}
