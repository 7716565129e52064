//! Shared test fixtures for slotplan crates.
//!
//! This crate provides schedule builders and canned problem instances.
//! It does NOT depend on `slotplan-scoring` to avoid circular dependencies.
//!
//! - [`builders`] - terse constructors for orders, buckets and schedules
//! - [`scenarios`] - small hand-built instances with known scores
//! - [`generator`] - seeded random weekly instances
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! slotplan-test = { workspace = true }
//! ```

pub mod builders;
pub mod generator;
pub mod scenarios;

pub use builders::{bucket, day, order, schedule, time};
pub use generator::{weekly_schedule, GeneratorConfig};
