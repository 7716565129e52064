//! Slotplan Core - domain and score types for rider-day slot assignment
//!
//! This crate provides the building blocks shared by every other slotplan crate:
//! - The two-level [`HardSoftScore`]
//! - The problem model: [`Order`], [`ShiftBucket`] and [`Schedule`]
//! - Constraint identity types
//! - Great-circle distance helpers
//! - Error types

pub mod constraint;
pub mod domain;
pub mod error;
pub mod geo;
pub mod score;

pub use constraint::{ConstraintRef, ImpactType};
pub use domain::{Order, OrderBuilder, Schedule, ShiftBucket, ShiftBucketBuilder};
pub use error::{DomainError, Result, SlotPlanError};
pub use geo::distance_km;
pub use score::{HardSoftScore, ScoreLevel, ScoreParseError};
