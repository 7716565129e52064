//! Solver phases
//!
//! Phases run in sequence, each starting from the previous one's working
//! state:
//! - [`FirstFitPhase`](construction::FirstFitPhase): builds an initial assignment
//! - [`LocalSearchPhase`](localsearch::LocalSearchPhase): improves it

pub mod construction;
pub mod localsearch;


use std::fmt::Debug;

use slotplan_core::SlotPlanError;

use crate::scope::SolverScope;

/// A phase of the solving process.
pub trait Phase: Send + Debug {
    /// Executes this phase.
    ///
    /// The phase modifies the working schedule in the solver scope and
    /// updates the best solution when improvements are found.
    fn solve(&mut self, solver_scope: &mut SolverScope, phase_index: usize)
        -> Result<(), SlotPlanError>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}
