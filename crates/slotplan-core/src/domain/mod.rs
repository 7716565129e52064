//! Problem model: orders, rider-day buckets and the schedule that relates them.
//!
//! Buckets live in an arena owned by [`Schedule`]; an order's planning variable
//! is an optional index into that arena.

mod bucket;
mod order;
mod schedule;


pub use bucket::{ShiftBucket, ShiftBucketBuilder};
pub use order::{Order, OrderBuilder};
pub use schedule::Schedule;
