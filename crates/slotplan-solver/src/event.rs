//! Best solution notifications.

use std::time::Duration;

use slotplan_core::{HardSoftScore, Schedule};

use crate::SearchScore;

/// Emitted synchronously each time the tracked best solution improves.
#[derive(Debug, Clone, Copy)]
pub struct BestSolutionEvent<'a> {
    /// Working schedule, which equals the new best at the time of the call.
    pub schedule: &'a Schedule,
    pub score: SearchScore,
    /// Time since solving started.
    pub elapsed: Duration,
    /// Number of improvements so far, this one included.
    pub improvement_count: u64,
}

impl BestSolutionEvent<'_> {
    #[inline]
    pub fn hard_soft(&self) -> HardSoftScore {
        self.score.score()
    }
}

/// Listener invoked on every new best solution.
pub type BestSolutionCallback = Box<dyn FnMut(&BestSolutionEvent<'_>) + Send>;
