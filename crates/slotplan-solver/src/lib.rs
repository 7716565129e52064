//! Solver engine for slotplan
//!
//! A solve runs its configured phases in order against one working
//! [`Schedule`](slotplan_core::Schedule):
//! - [`FirstFitPhase`]: greedy construction of an initial assignment
//! - [`LocalSearchPhase`]: reassign/swap neighborhood with hill climbing or
//!   tabu search acceptance
//!
//! The [`Solver`] keeps the best assignment seen across all phases and
//! returns it, not the final working state.
//!
//! Logging levels:
//! - **INFO**: solve and phase start/end
//! - **DEBUG**: new best solutions and progress summaries
//! - **TRACE**: individual steps

pub mod builder;
pub mod event;
pub mod heuristic;
pub mod manager;
pub mod phase;
pub mod progress;
pub mod scope;
pub mod search_score;
pub mod solver;
pub mod statistics;
pub mod termination;

#[cfg(test)]
mod solver_tests;

pub use event::{BestSolutionCallback, BestSolutionEvent};
pub use heuristic::{BucketChange, Move, MoveSelector, ReassignMove, SlotMove, SwapMove};
pub use manager::{BestSolutionUpdate, JobId, JobStatus, SolverManager};
pub use phase::construction::FirstFitPhase;
pub use phase::localsearch::{
    AcceptedCountForager, Acceptor, HillClimbingAcceptor, LocalSearchPhase, TabuSearchAcceptor,
};
pub use phase::Phase;
pub use progress::{ProgressSummary, ProgressTracker};
pub use scope::{PhaseScope, SolverScope, StepScope};
pub use search_score::SearchScore;
pub use solver::{SolveResult, Solver};
pub use statistics::{PhaseStatistics, ScoreImprovement, SolverStatistics, StatisticsCollector};
pub use termination::{
    BestScoreTermination, OrTermination, StepCountTermination, Termination, TerminationLevel,
    TimeTermination, UnimprovedTimeTermination,
};

use slotplan_scoring::{IncrementalScoreDirector, SlotConstraints};

/// Score director every solve works with.
pub type SlotDirector = IncrementalScoreDirector<SlotConstraints>;
