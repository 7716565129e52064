//! Scope hierarchy for solver execution.
//!
//! - [`SolverScope`]: the whole solve (working director, best snapshot, rng)
//! - [`PhaseScope`]: one phase (timing, counters, phase-level termination)
//! - [`StepScope`]: one step within a phase

mod phase;
mod solver;
mod step;


pub use phase::PhaseScope;
pub use solver::SolverScope;
pub use step::StepScope;
