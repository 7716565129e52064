//! Incremental constraint scoring for slotplan
//!
//! Each constraint keeps just enough state (per-bucket totals, per-rider
//! counts, bucket members) to report the score delta of inserting or
//! retracting one order. The [`IncrementalScoreDirector`] drives that protocol
//! for every planning variable change and keeps a cached total.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use slotplan_core::{HardSoftScore, Order, Schedule, ShiftBucket};
//! use slotplan_scoring::{IncrementalScoreDirector, ScoreDirector};
//!
//! let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
//! let order = Order::builder("O-1").allowed_day(day).build().unwrap();
//! let bucket = ShiftBucket::builder("B-1", "R-1", day, 5).build().unwrap();
//! let schedule = Schedule::new(vec![order], vec![bucket]).unwrap();
//!
//! let mut director = IncrementalScoreDirector::for_schedule(schedule).unwrap();
//! director.change_bucket(0, Some(0));
//!
//! // One order on the rider's week is 11 below the workload target of 12.
//! assert_eq!(director.calculate_score(), HardSoftScore::of(0, -11));
//! ```

pub mod analysis;
pub mod constraint;
pub mod constraint_set;
pub mod director;

#[cfg(test)]
mod constraint_tests;

pub use analysis::{ConstraintAnalysis, OrderIndictment, ScoreExplanation};
pub use constraint::{
    ClusteringConstraint, GroupKey, GroupedConstraint, IncrementalConstraint, UniOrderConstraint,
    CONSTRAINT_PACKAGE,
};
pub use constraint_set::{slot_constraints, ConstraintSet, SlotConstraints};
pub use director::{IncrementalScoreDirector, RecordingScoreDirector, ScoreDirector};
