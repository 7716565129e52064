//! Tabu search acceptor.

use std::collections::HashMap;

use super::Acceptor;
use crate::heuristic::BucketChange;
use crate::SearchScore;

/// Forbids moving an order back to a bucket it recently left.
///
/// Applying a move makes every `(order, previous bucket)` pair tabu for
/// `tabu_tenure` steps; a swap therefore records two pairs. Any non-tabu move
/// is accepted, worsening or not, so the forager's choice decides the step.
/// With aspiration, a tabu move that beats the best score seen in the phase
/// is accepted anyway.
#[derive(Debug, Clone)]
pub struct TabuSearchAcceptor {
    tabu_tenure: usize,
    aspiration: bool,
    /// `(order, bucket)` to the step that made it tabu.
    tabu: HashMap<(usize, Option<usize>), u64>,
    step_index: u64,
    best_score: Option<SearchScore>,
}

impl TabuSearchAcceptor {
    pub fn new(tabu_tenure: usize) -> Self {
        Self {
            tabu_tenure,
            aspiration: true,
            tabu: HashMap::new(),
            step_index: 0,
            best_score: None,
        }
    }

    pub fn without_aspiration(tabu_tenure: usize) -> Self {
        Self {
            aspiration: false,
            ..Self::new(tabu_tenure)
        }
    }

    pub fn tabu_tenure(&self) -> usize {
        self.tabu_tenure
    }

    /// True if moving `order` into `bucket` is currently forbidden.
    pub fn is_tabu(&self, order: usize, bucket: Option<usize>) -> bool {
        self.tabu
            .get(&(order, bucket))
            .is_some_and(|&made_tabu| self.step_index - made_tabu <= self.tabu_tenure as u64)
    }

    /// Number of pairs still tabu.
    pub fn tabu_count(&self) -> usize {
        self.tabu
            .keys()
            .filter(|&&(order, bucket)| self.is_tabu(order, bucket))
            .count()
    }
}

impl Default for TabuSearchAcceptor {
    fn default() -> Self {
        Self::new(slotplan_config::DEFAULT_TABU_TENURE)
    }
}

impl Acceptor for TabuSearchAcceptor {
    fn is_accepted(
        &self,
        _last_step_score: SearchScore,
        move_score: SearchScore,
        changes: &[BucketChange],
    ) -> bool {
        if self.aspiration && self.best_score.is_some_and(|best| move_score > best) {
            return true;
        }
        !changes.iter().any(|c| self.is_tabu(c.order, c.to))
    }

    fn phase_started(&mut self, initial_score: SearchScore) {
        self.tabu.clear();
        self.step_index = 0;
        self.best_score = Some(initial_score);
    }

    fn phase_ended(&mut self) {
        self.tabu.clear();
    }

    fn step_ended(&mut self, changes: &[BucketChange], step_score: SearchScore) {
        for c in changes {
            self.tabu.insert((c.order, c.from), self.step_index);
        }
        self.step_index += 1;
        if self.best_score.map_or(true, |best| step_score > best) {
            self.best_score = Some(step_score);
        }

        let tenure = self.tabu_tenure as u64;
        let now = self.step_index;
        self.tabu.retain(|_, &mut made_tabu| now - made_tabu <= tenure);
    }

    fn default_accepted_count_limit(&self) -> usize {
        1000
    }
}
