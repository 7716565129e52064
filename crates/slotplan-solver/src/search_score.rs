//! Score as the search ranks candidate states.

use std::fmt;

use slotplan_core::HardSoftScore;
use slotplan_scoring::ScoreDirector;

/// Hard/soft score plus an initialization level.
///
/// Unassigned orders contribute nothing to any constraint, so they are
/// counted separately: `init` is minus the number of unassigned orders and
/// ranks above hard. A fully assigned schedule therefore always beats a
/// partial one, and among equally assigned states the usual hard-then-soft
/// order applies.
///
/// ```
/// use slotplan_core::HardSoftScore;
/// use slotplan_solver::SearchScore;
///
/// let partial = SearchScore::new(1, HardSoftScore::of(0, 0));
/// let complete = SearchScore::new(0, HardSoftScore::of(-2, -40));
/// assert!(complete > partial);
/// assert_eq!(partial.to_string(), "-1init/0hard/0soft");
/// assert_eq!(complete.to_string(), "-2hard/-40soft");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchScore {
    init: i64,
    score: HardSoftScore,
}

impl SearchScore {
    pub fn new(unassigned: usize, score: HardSoftScore) -> Self {
        Self {
            init: -(unassigned as i64),
            score,
        }
    }

    /// A score with every order assigned.
    pub const fn initialized(score: HardSoftScore) -> Self {
        Self { init: 0, score }
    }

    /// Reads the current state of a score director.
    pub fn of<D: ScoreDirector>(director: &mut D) -> Self {
        let score = director.calculate_score();
        Self::new(director.unassigned_count(), score)
    }

    #[inline]
    pub fn init(&self) -> i64 {
        self.init
    }

    #[inline]
    pub fn score(&self) -> HardSoftScore {
        self.score
    }

    #[inline]
    pub fn unassigned(&self) -> usize {
        self.init.unsigned_abs() as usize
    }

    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.init == 0
    }
}

impl fmt::Display for SearchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.init == 0 {
            write!(f, "{}", self.score)
        } else {
            write!(f, "{}init/{}", self.init, self.score)
        }
    }
}
