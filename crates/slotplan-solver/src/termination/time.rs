//! Wall-clock time limit.

use std::time::Duration;

use super::{Termination, TerminationLevel};
use crate::scope::PhaseScope;

/// Terminates once the time budget is spent.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use slotplan_solver::{TerminationLevel, TimeTermination};
///
/// let term = TimeTermination::seconds(30, TerminationLevel::Solver);
/// assert_eq!(term.limit(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct TimeTermination {
    limit: Duration,
    level: TerminationLevel,
}

impl TimeTermination {
    pub fn new(limit: Duration, level: TerminationLevel) -> Self {
        Self { limit, level }
    }

    pub fn seconds(secs: u64, level: TerminationLevel) -> Self {
        Self::new(Duration::from_secs(secs), level)
    }

    pub fn millis(ms: u64, level: TerminationLevel) -> Self {
        Self::new(Duration::from_millis(ms), level)
    }

    pub fn limit(&self) -> Duration {
        self.limit
    }
}

impl Termination for TimeTermination {
    fn is_terminated(&self, phase_scope: &PhaseScope<'_>) -> bool {
        phase_scope.elapsed_at(self.level) >= self.limit
    }
}
