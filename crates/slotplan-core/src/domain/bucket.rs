//! Rider-day capacity buckets: the planning values.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::error::DomainError;

/// A rider's capacity slot for one calendar day.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ShiftBucket {
    id: String,
    rider_id: String,
    date: NaiveDate,
    capacity: i64,
    buffer_ratio: f64,
    movable_occupation_ratio_threshold: f64,
    start_latitude: f64,
    start_longitude: f64,
    rider_skills: BTreeSet<String>,
    max_weight: f64,
    max_volume: f64,
}

impl ShiftBucket {
    /// Starts building a bucket.
    ///
    /// Defaults: no buffer, movable threshold 1.0, depot at (0, 0), no skills,
    /// unlimited weight and volume.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use slotplan_core::ShiftBucket;
    ///
    /// let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    /// let bucket = ShiftBucket::builder("B-1", "rider-1", day, 25)
    ///     .buffer_ratio(0.1)
    ///     .movable_occupation_ratio_threshold(0.5)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(bucket.effective_capacity(), 22);
    /// assert_eq!(bucket.movable_limit(), 12);
    /// ```
    pub fn builder(
        id: impl Into<String>,
        rider_id: impl Into<String>,
        date: NaiveDate,
        capacity: i64,
    ) -> ShiftBucketBuilder {
        ShiftBucketBuilder::new(id.into(), rider_id.into(), date, capacity)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn rider_id(&self) -> &str {
        &self.rider_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn capacity(&self) -> i64 {
        self.capacity
    }

    pub fn buffer_ratio(&self) -> f64 {
        self.buffer_ratio
    }

    pub fn movable_occupation_ratio_threshold(&self) -> f64 {
        self.movable_occupation_ratio_threshold
    }

    /// Real assignment ceiling: `floor(capacity * (1 - buffer_ratio))`.
    #[inline]
    pub fn effective_capacity(&self) -> i64 {
        (self.capacity as f64 * (1.0 - self.buffer_ratio)).floor() as i64
    }

    /// Maximum number of movable orders: `floor(threshold * capacity)`.
    #[inline]
    pub fn movable_limit(&self) -> i64 {
        (self.movable_occupation_ratio_threshold * self.capacity as f64).floor() as i64
    }

    pub fn start_latitude(&self) -> f64 {
        self.start_latitude
    }

    pub fn start_longitude(&self) -> f64 {
        self.start_longitude
    }

    pub fn rider_skills(&self) -> &BTreeSet<String> {
        &self.rider_skills
    }

    /// Returns true if the rider has every skill in `required`.
    #[inline]
    pub fn has_skills(&self, required: &BTreeSet<String>) -> bool {
        required.is_subset(&self.rider_skills)
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    pub fn max_volume(&self) -> f64 {
        self.max_volume
    }
}

/// Builder for [`ShiftBucket`].
#[derive(Debug, Clone)]
pub struct ShiftBucketBuilder {
    id: String,
    rider_id: String,
    date: NaiveDate,
    capacity: i64,
    buffer_ratio: f64,
    movable_occupation_ratio_threshold: f64,
    start_latitude: f64,
    start_longitude: f64,
    rider_skills: BTreeSet<String>,
    max_weight: f64,
    max_volume: f64,
}

impl ShiftBucketBuilder {
    fn new(id: String, rider_id: String, date: NaiveDate, capacity: i64) -> Self {
        Self {
            id,
            rider_id,
            date,
            capacity,
            buffer_ratio: 0.0,
            movable_occupation_ratio_threshold: 1.0,
            start_latitude: 0.0,
            start_longitude: 0.0,
            rider_skills: BTreeSet::new(),
            max_weight: f64::INFINITY,
            max_volume: f64::INFINITY,
        }
    }

    /// Fraction of capacity held back for urgent orders, in `[0, 1)`.
    pub fn buffer_ratio(mut self, ratio: f64) -> Self {
        self.buffer_ratio = ratio;
        self
    }

    /// Maximum fraction of raw capacity usable by movable orders, in `[0, 1]`.
    pub fn movable_occupation_ratio_threshold(mut self, ratio: f64) -> Self {
        self.movable_occupation_ratio_threshold = ratio;
        self
    }

    pub fn depot(mut self, latitude: f64, longitude: f64) -> Self {
        self.start_latitude = latitude;
        self.start_longitude = longitude;
        self
    }

    pub fn rider_skill(mut self, skill: impl Into<String>) -> Self {
        self.rider_skills.insert(skill.into());
        self
    }

    pub fn rider_skills<I, T>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.rider_skills.extend(skills.into_iter().map(Into::into));
        self
    }

    /// Vehicle limits in kilograms and cubic metres.
    pub fn vehicle(mut self, max_weight: f64, max_volume: f64) -> Self {
        self.max_weight = max_weight;
        self.max_volume = max_volume;
        self
    }

    pub fn build(self) -> Result<ShiftBucket, DomainError> {
        if self.capacity < 0 {
            return Err(DomainError::NegativeCapacity {
                bucket_id: self.id,
                capacity: self.capacity,
            });
        }
        if !(0.0..1.0).contains(&self.buffer_ratio) {
            return Err(DomainError::InvalidBufferRatio {
                bucket_id: self.id,
                ratio: self.buffer_ratio,
            });
        }
        if !(0.0..=1.0).contains(&self.movable_occupation_ratio_threshold) {
            return Err(DomainError::InvalidMovableThreshold {
                bucket_id: self.id,
                ratio: self.movable_occupation_ratio_threshold,
            });
        }
        if !(self.max_weight >= 0.0) {
            return Err(DomainError::NegativeVehicleLimit {
                bucket_id: self.id,
                field: "max_weight",
            });
        }
        if !(self.max_volume >= 0.0) {
            return Err(DomainError::NegativeVehicleLimit {
                bucket_id: self.id,
                field: "max_volume",
            });
        }

        Ok(ShiftBucket {
            id: self.id,
            rider_id: self.rider_id,
            date: self.date,
            capacity: self.capacity,
            buffer_ratio: self.buffer_ratio,
            movable_occupation_ratio_threshold: self.movable_occupation_ratio_threshold,
            start_latitude: self.start_latitude,
            start_longitude: self.start_longitude,
            rider_skills: self.rider_skills,
            max_weight: self.max_weight,
            max_volume: self.max_volume,
        })
    }
}
