//! Terse constructors for test data.
//!
//! Builders panic on invalid input; tests that exercise validation should use
//! the core builders directly.

use chrono::{NaiveDate, NaiveTime};
use slotplan_core::{Order, OrderBuilder, Schedule, ShiftBucket, ShiftBucketBuilder};

/// Day `n` of the fixture week; day 1 is Monday 2025-03-03.
///
/// ```
/// use slotplan_test::day;
/// assert_eq!(day(1).to_string(), "2025-03-03");
/// assert_eq!(day(5).to_string(), "2025-03-07");
/// ```
pub fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 2 + n).expect("fixture day out of range")
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("invalid fixture time")
}

/// Order builder allowed on the given fixture days.
pub fn order(id: &str, days: &[u32]) -> OrderBuilder {
    Order::builder(id).allowed_days(days.iter().map(|&d| day(d)))
}

/// Bucket builder on a fixture day.
pub fn bucket(id: &str, rider: &str, on_day: u32, capacity: i64) -> ShiftBucketBuilder {
    ShiftBucket::builder(id, rider, day(on_day), capacity)
}

/// Builds a schedule from builders, panicking on invalid input.
pub fn schedule(orders: Vec<OrderBuilder>, buckets: Vec<ShiftBucketBuilder>) -> Schedule {
    let orders = orders
        .into_iter()
        .map(|o| o.build().expect("invalid fixture order"))
        .collect();
    let buckets = buckets
        .into_iter()
        .map(|b| b.build().expect("invalid fixture bucket"))
        .collect();
    Schedule::new(orders, buckets).expect("invalid fixture schedule")
}
