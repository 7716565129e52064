//! Error types for slotplan

use thiserror::Error;

/// Rejected problem input.
///
/// Raised when building orders, buckets or schedules, before any solving starts.
/// Values are never clamped into range.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("order '{order_id}' has no allowed days")]
    EmptyAllowedDays { order_id: String },

    #[error("order '{order_id}' has negative {field}")]
    NegativeSize {
        order_id: String,
        field: &'static str,
    },

    #[error("bucket '{bucket_id}' has negative capacity {capacity}")]
    NegativeCapacity { bucket_id: String, capacity: i64 },

    #[error("bucket '{bucket_id}' has buffer ratio {ratio} outside [0, 1)")]
    InvalidBufferRatio { bucket_id: String, ratio: f64 },

    #[error("bucket '{bucket_id}' has movable occupation threshold {ratio} outside [0, 1]")]
    InvalidMovableThreshold { bucket_id: String, ratio: f64 },

    #[error("bucket '{bucket_id}' has negative {field}")]
    NegativeVehicleLimit {
        bucket_id: String,
        field: &'static str,
    },

    #[error("duplicate order id '{0}'")]
    DuplicateOrderId(String),

    #[error("duplicate bucket id '{0}'")]
    DuplicateBucketId(String),

    /// An order references a bucket outside the bucket arena.
    #[error("order '{order_id}' is assigned to bucket index {bucket_index}, but only {bucket_count} buckets exist")]
    InvalidAssignment {
        order_id: String,
        bucket_index: usize,
        bucket_count: usize,
    },

    #[error("no order at index {0}")]
    UnknownOrder(usize),

    #[error("assignment snapshot has {actual} entries for {expected} orders")]
    SnapshotLength { expected: usize, actual: usize },
}

/// Main error type for slotplan operations
#[derive(Debug, Error)]
pub enum SlotPlanError {
    /// Invalid problem input
    #[error("Invalid input: {0}")]
    Domain(#[from] DomainError),

    /// Error in solver configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Corrupted solver state, such as an incremental score drifting from a full recalculation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for slotplan operations
pub type Result<T> = std::result::Result<T, SlotPlanError>;
