//! Move selector over the reassign and swap neighborhoods.

use rand::Rng;
use slotplan_config::{MoveSelectorConfig, SelectionOrder};
use slotplan_core::Schedule;

use super::{Move, ReassignMove, SlotMove, SwapMove};

/// Generates the candidate moves of one local search step.
///
/// `Original` order enumerates every doable move: reassignments by order
/// then target (buckets first, unassigned last), followed by swaps of every
/// pair in different buckets. `Random` order draws `sample_size` candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSelector {
    include_reassign: bool,
    include_swap: bool,
    selection_order: SelectionOrder,
    sample_size: usize,
}

impl MoveSelector {
    /// Full enumeration of both move types.
    pub fn original() -> Self {
        Self {
            include_reassign: true,
            include_swap: true,
            selection_order: SelectionOrder::Original,
            sample_size: 0,
        }
    }

    /// Random sample of both move types.
    pub fn random(sample_size: usize) -> Self {
        Self {
            include_reassign: true,
            include_swap: true,
            selection_order: SelectionOrder::Random,
            sample_size,
        }
    }

    pub fn from_config(config: &MoveSelectorConfig) -> Self {
        Self {
            include_reassign: config.include_reassign,
            include_swap: config.include_swap,
            selection_order: config.selection_order,
            sample_size: config.sample_size(),
        }
    }

    pub fn with_reassign(mut self, include: bool) -> Self {
        self.include_reassign = include;
        self
    }

    pub fn with_swap(mut self, include: bool) -> Self {
        self.include_swap = include;
        self
    }

    pub fn selection_order(&self) -> SelectionOrder {
        self.selection_order
    }

    /// True if an empty accepted set means no better neighbor exists.
    pub fn is_exhaustive(&self) -> bool {
        self.selection_order == SelectionOrder::Original
    }

    /// Fills `moves` with this step's candidates. Only doable moves are added.
    pub fn select_moves<R: Rng>(&self, schedule: &Schedule, rng: &mut R, moves: &mut Vec<SlotMove>) {
        moves.clear();
        match self.selection_order {
            SelectionOrder::Original => self.enumerate(schedule, moves),
            SelectionOrder::Random => self.sample(schedule, rng, moves),
        }
    }

    fn enumerate(&self, schedule: &Schedule, moves: &mut Vec<SlotMove>) {
        let orders = schedule.order_count();
        let buckets = schedule.bucket_count();

        if self.include_reassign {
            for order in 0..orders {
                let targets = (0..buckets).map(Some).chain(std::iter::once(None));
                for to in targets {
                    let m = ReassignMove::new(order, to);
                    if m.is_doable(schedule) {
                        moves.push(m.into());
                    }
                }
            }
        }

        if self.include_swap {
            for left in 0..orders {
                for right in (left + 1)..orders {
                    let m = SwapMove::new(left, right);
                    if m.is_doable(schedule) {
                        moves.push(m.into());
                    }
                }
            }
        }
    }

    fn sample<R: Rng>(&self, schedule: &Schedule, rng: &mut R, moves: &mut Vec<SlotMove>) {
        let orders = schedule.order_count();
        if orders == 0 || !(self.include_reassign || self.include_swap) {
            return;
        }
        let buckets = schedule.bucket_count();
        let swap_possible = self.include_swap && orders > 1;

        // Undoable draws are skipped, not retried.
        for _ in 0..self.sample_size {
            let use_swap = match (self.include_reassign, swap_possible) {
                (true, true) => rng.random_bool(0.5),
                (false, true) => true,
                _ => false,
            };
            let m: SlotMove = if use_swap {
                let left = rng.random_range(0..orders);
                let right = rng.random_range(0..orders);
                SwapMove::new(left, right).into()
            } else if self.include_reassign {
                let order = rng.random_range(0..orders);
                // Index `buckets` stands for unassigned.
                let target = rng.random_range(0..=buckets);
                let to = (target < buckets).then_some(target);
                ReassignMove::new(order, to).into()
            } else {
                return;
            };
            if m.is_doable(schedule) {
                moves.push(m);
            }
        }
    }
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::from_config(&MoveSelectorConfig::default())
    }
}
