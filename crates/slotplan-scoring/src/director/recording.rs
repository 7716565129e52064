//! Recording score director for undo tracking.
//!
//! ```text
//! let mut recording = RecordingScoreDirector::new(&mut director);
//! candidate.do_move(&mut recording);
//! let score = recording.calculate_score();
//! recording.undo_changes();
//! ```

use slotplan_core::{HardSoftScore, Schedule};

use super::ScoreDirector;

/// Wraps a score director and remembers every bucket change so it can be
/// reverted in reverse order.
pub struct RecordingScoreDirector<'a, D: ScoreDirector> {
    inner: &'a mut D,
    undo_stack: Vec<(usize, Option<usize>)>,
}

impl<'a, D: ScoreDirector> RecordingScoreDirector<'a, D> {
    pub fn new(inner: &'a mut D) -> Self {
        Self {
            inner,
            undo_stack: Vec::with_capacity(4),
        }
    }

    /// Reverts every recorded change, newest first.
    pub fn undo_changes(&mut self) {
        while let Some((order, previous)) = self.undo_stack.pop() {
            self.inner.change_bucket(order, previous);
        }
    }

    pub fn change_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }
}

impl<D: ScoreDirector> ScoreDirector for RecordingScoreDirector<'_, D> {
    fn working_schedule(&self) -> &Schedule {
        self.inner.working_schedule()
    }

    fn calculate_score(&mut self) -> HardSoftScore {
        self.inner.calculate_score()
    }

    fn unassigned_count(&self) -> usize {
        self.inner.unassigned_count()
    }

    fn change_bucket(&mut self, order: usize, bucket: Option<usize>) -> Option<usize> {
        let previous = self.inner.change_bucket(order, bucket);
        if previous != bucket {
            self.undo_stack.push((order, previous));
        }
        previous
    }
}
