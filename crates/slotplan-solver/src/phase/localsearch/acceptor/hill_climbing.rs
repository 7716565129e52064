//! Hill climbing acceptor.

use super::Acceptor;
use crate::heuristic::BucketChange;
use crate::SearchScore;

/// Accepts moves that do not worsen the last step score.
///
/// Equal scores are accepted so the search can cross plateaus.
///
/// ```
/// use slotplan_core::HardSoftScore;
/// use slotplan_solver::{Acceptor, HillClimbingAcceptor, SearchScore};
///
/// let acceptor = HillClimbingAcceptor::new();
/// let last = SearchScore::initialized(HardSoftScore::of(0, -10));
/// assert!(acceptor.is_accepted(last, last, &[]));
/// assert!(!acceptor.is_accepted(last, SearchScore::initialized(HardSoftScore::of(0, -11)), &[]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct HillClimbingAcceptor;

impl HillClimbingAcceptor {
    pub fn new() -> Self {
        Self
    }
}

impl Acceptor for HillClimbingAcceptor {
    fn is_accepted(
        &self,
        last_step_score: SearchScore,
        move_score: SearchScore,
        _changes: &[BucketChange],
    ) -> bool {
        move_score >= last_step_score
    }
}
