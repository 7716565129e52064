//! slotplan - rider-day slot assignment
//!
//! Assigns delivery orders to rider shift buckets: a first-fit construction
//! followed by hill climbing and tabu search over reassign and swap moves,
//! scored by twelve hard and soft constraints.
//!
//! # Example
//!
//! ```
//! use slotplan::prelude::*;
//! use slotplan_test::scenarios;
//!
//! let config = SolverConfig::default_preset(1).with_random_seed(42);
//! let solved = slotplan::solve(scenarios::nearby_pair(), &config).unwrap();
//!
//! assert_eq!(solved.summary.unassigned, 0);
//! assert!(solved.is_feasible());
//! assert_eq!(solved.explanation.score, solved.score);
//! ```

mod solve;
mod summary;

#[cfg(test)]
mod tests;

pub use solve::{solve, solve_with, SolveOptions, SolvedSchedule};
pub use summary::{BucketLoad, RiderTotals, ScheduleSummary};

pub use slotplan_config::{
    AcceptorConfig, ConfigError, EnvironmentMode, LocalSearchConfig, MoveThreadCount,
    PhaseConfig, SolverConfig, TerminationConfig,
};
pub use slotplan_core::{
    distance_km, ConstraintRef, DomainError, HardSoftScore, Order, OrderBuilder, Schedule,
    ShiftBucket, ShiftBucketBuilder, SlotPlanError,
};
pub use slotplan_scoring::constraint_set::names;
pub use slotplan_scoring::{ConstraintAnalysis, OrderIndictment, ScoreExplanation};
pub use slotplan_solver::{
    BestSolutionEvent, JobId, JobStatus, ProgressTracker, SearchScore, SolverManager,
    SolverStatistics,
};

#[cfg(feature = "console")]
pub use slotplan_console as console;

pub mod prelude {
    pub use super::{solve, solve_with, SolveOptions, SolvedSchedule};
    pub use super::{HardSoftScore, Order, Schedule, ShiftBucket, SolverConfig};
    pub use super::{ScheduleSummary, ScoreExplanation, SlotPlanError};
}
