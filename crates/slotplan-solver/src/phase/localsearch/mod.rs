//! Local search phase.
//!
//! Each step generates candidate moves, scores them on the working director
//! with automatic undo, lets the acceptor filter them and the forager pick
//! one, then applies the winner.

mod acceptor;
mod forager;
mod phase;


pub use acceptor::{Acceptor, HillClimbingAcceptor, TabuSearchAcceptor};
pub use forager::AcceptedCountForager;
pub use phase::LocalSearchPhase;
