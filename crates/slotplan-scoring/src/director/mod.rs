//! Score directors manage the working schedule and its score.
//!
//! Every planning variable change goes through [`ScoreDirector::change_bucket`]
//! so incremental constraint state never drifts from the assignments.

mod incremental;
mod recording;

#[cfg(test)]
mod tests;

use slotplan_core::{HardSoftScore, Schedule};

pub use incremental::IncrementalScoreDirector;
pub use recording::RecordingScoreDirector;

/// Owner of the working schedule during solving.
pub trait ScoreDirector: Send {
    /// Returns a reference to the working schedule.
    fn working_schedule(&self) -> &Schedule;

    /// Calculates and returns the current score.
    fn calculate_score(&mut self) -> HardSoftScore;

    /// Moves `order` to `bucket` (`None` unassigns) and returns its previous bucket.
    fn change_bucket(&mut self, order: usize, bucket: Option<usize>) -> Option<usize>;

    /// Clones the working schedule.
    fn clone_working_schedule(&self) -> Schedule {
        self.working_schedule().clone()
    }

    /// Number of orders without a bucket.
    fn unassigned_count(&self) -> usize {
        self.working_schedule().unassigned_count()
    }

    fn order_count(&self) -> usize {
        self.working_schedule().order_count()
    }

    fn bucket_count(&self) -> usize {
        self.working_schedule().bucket_count()
    }
}
