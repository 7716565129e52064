//! Pairwise reward for nearby orders in the same bucket.

use slotplan_core::{distance_km, ConstraintRef, HardSoftScore, Order, Schedule, ScoreLevel};

use super::IncrementalConstraint;

/// Rewards every unordered pair of orders sharing a bucket when they are
/// closer than `radius_km`.
#[derive(Debug, Clone)]
pub struct ClusteringConstraint {
    constraint_ref: ConstraintRef,
    radius_km: f64,
    reward: i64,
    members: Vec<Vec<usize>>,
}

impl ClusteringConstraint {
    pub fn new(constraint_ref: ConstraintRef, radius_km: f64, reward: i64) -> Self {
        Self {
            constraint_ref,
            radius_km,
            reward,
            members: Vec::new(),
        }
    }

    #[inline]
    fn is_close(&self, a: &Order, b: &Order) -> bool {
        distance_km(a.latitude(), a.longitude(), b.latitude(), b.longitude()) < self.radius_km
    }

    fn close_partners(&self, schedule: &Schedule, order: usize, others: &[usize]) -> i64 {
        let o = schedule.order(order);
        others
            .iter()
            .filter(|&&m| m != order && self.is_close(o, schedule.order(m)))
            .count() as i64
    }

    fn bucket_members(schedule: &Schedule) -> Vec<Vec<usize>> {
        let mut members = vec![Vec::new(); schedule.bucket_count()];
        for (i, order) in schedule.orders().iter().enumerate() {
            if let Some(b) = order.assigned_bucket() {
                members[b].push(i);
            }
        }
        members
    }

    fn close_pair_count(&self, schedule: &Schedule, members: &[Vec<usize>]) -> usize {
        members
            .iter()
            .map(|bucket| {
                bucket
                    .iter()
                    .enumerate()
                    .map(|(k, &a)| self.close_partners(schedule, a, &bucket[k + 1..]) as usize)
                    .sum::<usize>()
            })
            .sum()
    }
}

impl IncrementalConstraint for ClusteringConstraint {
    fn constraint_ref(&self) -> &ConstraintRef {
        &self.constraint_ref
    }

    fn level(&self) -> ScoreLevel {
        ScoreLevel::Soft
    }

    fn evaluate(&self, schedule: &Schedule) -> HardSoftScore {
        let members = Self::bucket_members(schedule);
        HardSoftScore::of_soft(self.reward * self.close_pair_count(schedule, &members) as i64)
    }

    fn match_count(&self, schedule: &Schedule) -> usize {
        let members = Self::bucket_members(schedule);
        self.close_pair_count(schedule, &members)
    }

    fn initialize(&mut self, schedule: &Schedule) -> HardSoftScore {
        self.members = Self::bucket_members(schedule);
        HardSoftScore::of_soft(self.reward * self.close_pair_count(schedule, &self.members) as i64)
    }

    fn on_insert(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore {
        if self.members.len() != schedule.bucket_count() {
            self.members = vec![Vec::new(); schedule.bucket_count()];
        }
        let pairs = self.close_partners(schedule, order, &self.members[bucket]);
        self.members[bucket].push(order);
        HardSoftScore::of_soft(self.reward * pairs)
    }

    fn on_retract(&mut self, schedule: &Schedule, order: usize, bucket: usize) -> HardSoftScore {
        let Some(members) = self.members.get_mut(bucket) else {
            return HardSoftScore::ZERO;
        };
        let Some(pos) = members.iter().position(|&m| m == order) else {
            return HardSoftScore::ZERO;
        };
        members.swap_remove(pos);
        let pairs = self.close_partners(schedule, order, &self.members[bucket]);
        HardSoftScore::of_soft(-self.reward * pairs)
    }

    fn reset(&mut self) {
        self.members.clear();
    }
}
