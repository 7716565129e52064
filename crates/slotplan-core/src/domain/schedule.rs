//! The problem instance and its current assignment.

use std::collections::{HashMap, HashSet};

use super::{Order, ShiftBucket};
use crate::error::DomainError;
use crate::score::HardSoftScore;

/// All orders, all buckets and the assignment relation between them.
///
/// Order and bucket membership is fixed once the schedule is built. The only
/// thing that changes while solving is each order's assigned bucket index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schedule {
    orders: Vec<Order>,
    buckets: Vec<ShiftBucket>,
    rider_ids: Vec<String>,
    bucket_riders: Vec<usize>,
    score: Option<HardSoftScore>,
}

impl Schedule {
    /// Builds a schedule, rejecting duplicate ids and out-of-range assignments.
    pub fn new(orders: Vec<Order>, buckets: Vec<ShiftBucket>) -> Result<Self, DomainError> {
        let mut seen = HashSet::with_capacity(orders.len());
        for order in &orders {
            if !seen.insert(order.id()) {
                return Err(DomainError::DuplicateOrderId(order.id().to_string()));
            }
        }

        let mut seen = HashSet::with_capacity(buckets.len());
        for bucket in &buckets {
            if !seen.insert(bucket.id()) {
                return Err(DomainError::DuplicateBucketId(bucket.id().to_string()));
            }
        }

        // Riders are indexed in first-seen bucket order.
        let mut rider_ids: Vec<String> = Vec::new();
        let mut rider_lookup: HashMap<&str, usize> = HashMap::new();
        let mut bucket_riders = Vec::with_capacity(buckets.len());
        for bucket in &buckets {
            let idx = *rider_lookup.entry(bucket.rider_id()).or_insert_with(|| {
                rider_ids.push(bucket.rider_id().to_string());
                rider_ids.len() - 1
            });
            bucket_riders.push(idx);
        }

        let schedule = Self {
            orders,
            buckets,
            rider_ids,
            bucket_riders,
            score: None,
        };
        schedule.validate_assignments()?;
        Ok(schedule)
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn buckets(&self) -> &[ShiftBucket] {
        &self.buckets
    }

    #[inline]
    pub fn order(&self, index: usize) -> &Order {
        &self.orders[index]
    }

    #[inline]
    pub fn bucket(&self, index: usize) -> &ShiftBucket {
        &self.buckets[index]
    }

    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Distinct rider ids, in the order their first bucket appears.
    pub fn rider_ids(&self) -> &[String] {
        &self.rider_ids
    }

    #[inline]
    pub fn rider_count(&self) -> usize {
        self.rider_ids.len()
    }

    /// Rider index of the given bucket.
    #[inline]
    pub fn rider_of_bucket(&self, bucket: usize) -> usize {
        self.bucket_riders[bucket]
    }

    pub fn find_order(&self, id: &str) -> Option<usize> {
        self.orders.iter().position(|o| o.id() == id)
    }

    pub fn find_bucket(&self, id: &str) -> Option<usize> {
        self.buckets.iter().position(|b| b.id() == id)
    }

    #[inline]
    pub fn assigned_bucket(&self, order: usize) -> Option<usize> {
        self.orders[order].assigned_bucket()
    }

    /// Assigns or clears an order's bucket, checking both indices.
    pub fn assign(&mut self, order: usize, bucket: Option<usize>) -> Result<(), DomainError> {
        let bucket_count = self.buckets.len();
        let target = self
            .orders
            .get_mut(order)
            .ok_or(DomainError::UnknownOrder(order))?;
        if let Some(b) = bucket {
            if b >= bucket_count {
                return Err(DomainError::InvalidAssignment {
                    order_id: target.id().to_string(),
                    bucket_index: b,
                    bucket_count,
                });
            }
        }
        target.set_assigned_bucket(bucket);
        self.score = None;
        Ok(())
    }

    /// Sets an order's bucket without range checks.
    ///
    /// Intended for the score director, which only produces indices taken from
    /// this schedule.
    ///
    /// # Panics
    ///
    /// Panics if `order` is out of range.
    #[inline]
    pub fn set_assigned_bucket(&mut self, order: usize, bucket: Option<usize>) {
        debug_assert!(bucket.map_or(true, |b| b < self.buckets.len()));
        self.orders[order].set_assigned_bucket(bucket);
    }

    /// Checks that every assignment points into the bucket arena.
    pub fn validate_assignments(&self) -> Result<(), DomainError> {
        let bucket_count = self.buckets.len();
        for order in &self.orders {
            if let Some(b) = order.assigned_bucket() {
                if b >= bucket_count {
                    return Err(DomainError::InvalidAssignment {
                        order_id: order.id().to_string(),
                        bucket_index: b,
                        bucket_count,
                    });
                }
            }
        }
        Ok(())
    }

    /// Unassigns every order.
    pub fn clear_assignments(&mut self) {
        for order in &mut self.orders {
            order.set_assigned_bucket(None);
        }
        self.score = None;
    }

    /// Snapshot of the planning variable, one entry per order.
    pub fn assignments(&self) -> Vec<Option<usize>> {
        self.orders.iter().map(Order::assigned_bucket).collect()
    }

    /// Restores a snapshot taken with [`Schedule::assignments`].
    ///
    /// The whole snapshot is checked first; on error nothing changes.
    pub fn restore_assignments(&mut self, assignments: &[Option<usize>]) -> Result<(), DomainError> {
        if assignments.len() != self.orders.len() {
            return Err(DomainError::SnapshotLength {
                expected: self.orders.len(),
                actual: assignments.len(),
            });
        }
        let bucket_count = self.buckets.len();
        for (order, bucket) in self.orders.iter().zip(assignments) {
            if let Some(b) = *bucket {
                if b >= bucket_count {
                    return Err(DomainError::InvalidAssignment {
                        order_id: order.id().to_string(),
                        bucket_index: b,
                        bucket_count,
                    });
                }
            }
        }

        for (order, bucket) in self.orders.iter_mut().zip(assignments) {
            order.set_assigned_bucket(*bucket);
        }
        self.score = None;
        Ok(())
    }

    pub fn assigned_count(&self) -> usize {
        self.orders.iter().filter(|o| o.is_assigned()).count()
    }

    pub fn unassigned_count(&self) -> usize {
        self.orders.len() - self.assigned_count()
    }

    /// Indices of orders currently assigned to `bucket`.
    pub fn orders_in_bucket(&self, bucket: usize) -> impl Iterator<Item = usize> + '_ {
        self.orders
            .iter()
            .enumerate()
            .filter(move |(_, o)| o.assigned_bucket() == Some(bucket))
            .map(|(i, _)| i)
    }

    /// Order indices sorted by ascending order id.
    pub fn order_indices_by_id(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.orders.len()).collect();
        indices.sort_by(|&a, &b| self.orders[a].id().cmp(self.orders[b].id()));
        indices
    }

    /// The last score stored by the solver, cleared by checked assignment.
    pub fn score(&self) -> Option<HardSoftScore> {
        self.score
    }

    pub fn set_score(&mut self, score: Option<HardSoftScore>) {
        self.score = score;
    }
}
