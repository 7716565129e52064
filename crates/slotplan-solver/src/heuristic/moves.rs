//! Reassign and swap moves over the bucket assignment.

use std::fmt::Debug;

use slotplan_core::Schedule;
use slotplan_scoring::ScoreDirector;
use smallvec::{smallvec, SmallVec};

/// One order's bucket change as a move would perform it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BucketChange {
    pub order: usize,
    pub from: Option<usize>,
    pub to: Option<usize>,
}

/// A candidate transformation of the current assignment.
///
/// Undo is handled by `RecordingScoreDirector`, not by the move. Methods are
/// generic over the director so the same move runs against the working
/// director and a recording wrapper.
pub trait Move: Send + Sync + Debug {
    /// Returns true if executing this move would change anything.
    fn is_doable(&self, schedule: &Schedule) -> bool;

    /// Executes this move through the score director.
    fn do_move<D: ScoreDirector>(&self, score_director: &mut D);

    /// The bucket changes this move performs from the given state.
    fn changes(&self, schedule: &Schedule) -> SmallVec<[BucketChange; 2]>;

    /// Orders touched by this move.
    fn order_indices(&self) -> SmallVec<[usize; 2]>;
}

/// Moves one order to another bucket, or unassigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReassignMove {
    order: usize,
    to: Option<usize>,
}

impl ReassignMove {
    pub fn new(order: usize, to: Option<usize>) -> Self {
        Self { order, to }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn to(&self) -> Option<usize> {
        self.to
    }
}

impl Move for ReassignMove {
    fn is_doable(&self, schedule: &Schedule) -> bool {
        schedule.assigned_bucket(self.order) != self.to
    }

    fn do_move<D: ScoreDirector>(&self, score_director: &mut D) {
        score_director.change_bucket(self.order, self.to);
    }

    fn changes(&self, schedule: &Schedule) -> SmallVec<[BucketChange; 2]> {
        smallvec![BucketChange {
            order: self.order,
            from: schedule.assigned_bucket(self.order),
            to: self.to,
        }]
    }

    fn order_indices(&self) -> SmallVec<[usize; 2]> {
        smallvec![self.order]
    }
}

/// Exchanges the buckets of two orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    left: usize,
    right: usize,
}

impl SwapMove {
    pub fn new(left: usize, right: usize) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> usize {
        self.left
    }

    pub fn right(&self) -> usize {
        self.right
    }
}

impl Move for SwapMove {
    fn is_doable(&self, schedule: &Schedule) -> bool {
        self.left != self.right
            && schedule.assigned_bucket(self.left) != schedule.assigned_bucket(self.right)
    }

    fn do_move<D: ScoreDirector>(&self, score_director: &mut D) {
        let schedule = score_director.working_schedule();
        let left_bucket = schedule.assigned_bucket(self.left);
        let right_bucket = schedule.assigned_bucket(self.right);
        score_director.change_bucket(self.left, right_bucket);
        score_director.change_bucket(self.right, left_bucket);
    }

    fn changes(&self, schedule: &Schedule) -> SmallVec<[BucketChange; 2]> {
        let left_bucket = schedule.assigned_bucket(self.left);
        let right_bucket = schedule.assigned_bucket(self.right);
        smallvec![
            BucketChange {
                order: self.left,
                from: left_bucket,
                to: right_bucket,
            },
            BucketChange {
                order: self.right,
                from: right_bucket,
                to: left_bucket,
            },
        ]
    }

    fn order_indices(&self) -> SmallVec<[usize; 2]> {
        smallvec![self.left, self.right]
    }
}

/// Either neighborhood move, so one selector can mix both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotMove {
    Reassign(ReassignMove),
    Swap(SwapMove),
}

impl From<ReassignMove> for SlotMove {
    fn from(m: ReassignMove) -> Self {
        SlotMove::Reassign(m)
    }
}

impl From<SwapMove> for SlotMove {
    fn from(m: SwapMove) -> Self {
        SlotMove::Swap(m)
    }
}

impl Move for SlotMove {
    fn is_doable(&self, schedule: &Schedule) -> bool {
        match self {
            SlotMove::Reassign(m) => m.is_doable(schedule),
            SlotMove::Swap(m) => m.is_doable(schedule),
        }
    }

    fn do_move<D: ScoreDirector>(&self, score_director: &mut D) {
        match self {
            SlotMove::Reassign(m) => m.do_move(score_director),
            SlotMove::Swap(m) => m.do_move(score_director),
        }
    }

    fn changes(&self, schedule: &Schedule) -> SmallVec<[BucketChange; 2]> {
        match self {
            SlotMove::Reassign(m) => m.changes(schedule),
            SlotMove::Swap(m) => m.changes(schedule),
        }
    }

    fn order_indices(&self) -> SmallVec<[usize; 2]> {
        match self {
            SlotMove::Reassign(m) => m.order_indices(),
            SlotMove::Swap(m) => m.order_indices(),
        }
    }
}
