//! Forager for local search move selection.

use crate::SearchScore;

/// Collects up to `accepted_count_limit` accepted moves per step and picks
/// the best of them. Ties go to the move seen first.
///
/// Moves are referenced by their index in the step's candidate list.
#[derive(Debug, Clone)]
pub struct AcceptedCountForager {
    accepted_count_limit: usize,
    accepted: Vec<(usize, SearchScore)>,
}

impl AcceptedCountForager {
    pub fn new(accepted_count_limit: usize) -> Self {
        Self {
            accepted_count_limit: accepted_count_limit.max(1),
            accepted: Vec::new(),
        }
    }

    pub fn accepted_count_limit(&self) -> usize {
        self.accepted_count_limit
    }

    /// Called at the start of each step to reset state.
    pub fn step_started(&mut self) {
        self.accepted.clear();
    }

    pub fn add_move_index(&mut self, index: usize, score: SearchScore) {
        self.accepted.push((index, score));
    }

    /// True once enough moves were accepted to stop evaluating.
    pub fn is_quit_early(&self) -> bool {
        self.accepted.len() >= self.accepted_count_limit
    }

    pub fn accepted_count(&self) -> usize {
        self.accepted.len()
    }

    /// Picks the best accepted move, or `None` if nothing was accepted.
    pub fn pick_move_index(&self) -> Option<(usize, SearchScore)> {
        let mut best: Option<(usize, SearchScore)> = None;
        for &(index, score) in &self.accepted {
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((index, score));
            }
        }
        best
    }
}
