//! Acceptors for local search move acceptance.
//!
//! Acceptors determine whether a move should be accepted based on
//! comparing the resulting score with the previous step score.

mod hill_climbing;
mod tabu_search;

use std::fmt::Debug;

use crate::heuristic::BucketChange;
use crate::SearchScore;

pub use hill_climbing::HillClimbingAcceptor;
pub use tabu_search::TabuSearchAcceptor;

/// Trait for accepting or rejecting moves in local search.
pub trait Acceptor: Send + Debug {
    /// Returns true if a move with `changes`, resulting in `move_score`,
    /// should be accepted given the previous step's score.
    fn is_accepted(
        &self,
        last_step_score: SearchScore,
        move_score: SearchScore,
        changes: &[BucketChange],
    ) -> bool;

    /// Called when a phase starts.
    fn phase_started(&mut self, _initial_score: SearchScore) {}

    /// Called when a phase ends.
    fn phase_ended(&mut self) {}

    /// Called when a step applied a move.
    fn step_ended(&mut self, _changes: &[BucketChange], _step_score: SearchScore) {}

    /// Forager limit used when none is configured.
    fn default_accepted_count_limit(&self) -> usize {
        1
    }
}
