//! Termination based on lack of improvement.

use std::time::Duration;

use super::{Termination, TerminationLevel};
use crate::scope::PhaseScope;

/// Terminates once the best score has not improved for the time limit.
///
/// At phase level the clock restarts with every phase, so a phase gets its
/// full budget even if earlier phases stalled.
#[derive(Debug, Clone)]
pub struct UnimprovedTimeTermination {
    limit: Duration,
    level: TerminationLevel,
}

impl UnimprovedTimeTermination {
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

impl Termination for UnimprovedTimeTermination {
    fn is_terminated(&self, phase_scope: &PhaseScope<'_>) -> bool {
        phase_scope.unimproved_at(self.level) >= self.limit
    }
}
