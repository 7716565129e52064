//! Assignment counts and per-bucket, per-rider loads of a schedule.

use std::fmt;

use chrono::NaiveDate;
use slotplan_core::Schedule;

/// Orders in one bucket against its effective capacity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BucketLoad {
    pub bucket_id: String,
    pub rider_id: String,
    pub date: NaiveDate,
    pub count: usize,
    pub effective_capacity: i64,
}

impl BucketLoad {
    pub fn is_over_capacity(&self) -> bool {
        self.count as i64 > self.effective_capacity
    }
}

impl fmt::Display for BucketLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}: {}/{}",
            self.bucket_id, self.rider_id, self.date, self.count, self.effective_capacity
        )
    }
}

/// Everything one rider carries over the week.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RiderTotals {
    pub rider_id: String,
    pub orders: usize,
    pub weight: f64,
    pub volume: f64,
    /// Buckets with at least one order.
    pub active_days: usize,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScheduleSummary {
    pub total: usize,
    pub assigned: usize,
    pub unassigned: usize,
    pub movable: usize,
    /// Assigned orders in percent, 100 for an empty schedule.
    pub assignment_rate: f64,
    /// In bucket order.
    pub buckets: Vec<BucketLoad>,
    /// In rider order of first appearance.
    pub riders: Vec<RiderTotals>,
}

impl ScheduleSummary {
    /// Summarizes the current assignment of `schedule`.
    pub fn of(schedule: &Schedule) -> Self {
        let mut buckets: Vec<BucketLoad> = schedule
            .buckets()
            .iter()
            .map(|b| BucketLoad {
                bucket_id: b.id().to_string(),
                rider_id: b.rider_id().to_string(),
                date: b.date(),
                count: 0,
                effective_capacity: b.effective_capacity(),
            })
            .collect();
        let mut riders: Vec<RiderTotals> = schedule
            .rider_ids()
            .iter()
            .map(|id| RiderTotals {
                rider_id: id.clone(),
                orders: 0,
                weight: 0.0,
                volume: 0.0,
                active_days: 0,
            })
            .collect();

        for order in schedule.orders() {
            let Some(bucket) = order.assigned_bucket() else {
                continue;
            };
            buckets[bucket].count += 1;
            let rider = &mut riders[schedule.rider_of_bucket(bucket)];
            rider.orders += 1;
            rider.weight += order.weight();
            rider.volume += order.volume();
        }
        for (index, load) in buckets.iter().enumerate() {
            if load.count > 0 {
                riders[schedule.rider_of_bucket(index)].active_days += 1;
            }
        }

        let total = schedule.order_count();
        let assigned = schedule.assigned_count();
        let assignment_rate = if total == 0 {
            100.0
        } else {
            assigned as f64 * 100.0 / total as f64
        };

        Self {
            total,
            assigned,
            unassigned: total - assigned,
            movable: schedule.orders().iter().filter(|o| o.is_movable()).count(),
            assignment_rate,
            buckets,
            riders,
        }
    }

    /// Buckets holding more orders than their effective capacity.
    pub fn over_capacity(&self) -> impl Iterator<Item = &BucketLoad> {
        self.buckets.iter().filter(|b| b.is_over_capacity())
    }
}

impl fmt::Display for ScheduleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}/{} orders assigned ({:.1}%), {} unassigned, {} movable",
            self.assigned, self.total, self.assignment_rate, self.unassigned, self.movable
        )?;
        for load in &self.buckets {
            writeln!(f, "  {}", load)?;
        }
        for rider in &self.riders {
            writeln!(
                f,
                "  {}: {} orders on {} days, {:.1} kg, {:.2} m3",
                rider.rider_id, rider.orders, rider.active_days, rider.weight, rider.volume
            )?;
        }
        Ok(())
    }
}
