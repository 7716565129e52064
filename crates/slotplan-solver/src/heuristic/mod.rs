//! Moves and move selection for local search.

mod moves;
mod selector;


pub use moves::{BucketChange, Move, ReassignMove, SlotMove, SwapMove};
pub use selector::MoveSelector;
