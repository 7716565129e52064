//! Orders: the planning entities.

use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveTime};

use crate::error::DomainError;

/// A unit of work to place on exactly one rider-day, or leave unassigned.
///
/// Everything except the assigned bucket is fixed at construction; build one
/// through [`Order::builder`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Order {
    id: String,
    allowed_days: BTreeSet<NaiveDate>,
    earliest_allowed_day: NaiveDate,
    latitude: f64,
    longitude: f64,
    preferred_start_time: Option<NaiveTime>,
    preferred_end_time: Option<NaiveTime>,
    weight: f64,
    volume: f64,
    required_skills: BTreeSet<String>,
    assigned_bucket: Option<usize>,
}

impl Order {
    /// Starts building an order with the given id.
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use slotplan_core::Order;
    ///
    /// let monday = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    /// let order = Order::builder("O-1")
    ///     .allowed_day(monday)
    ///     .location(52.37, 4.89)
    ///     .weight(12.5)
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(!order.is_movable());
    /// assert_eq!(order.earliest_allowed_day(), monday);
    /// ```
    pub fn builder(id: impl Into<String>) -> OrderBuilder {
        OrderBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn allowed_days(&self) -> &BTreeSet<NaiveDate> {
        &self.allowed_days
    }

    /// Returns true if the order may be scheduled on `date`.
    #[inline]
    pub fn is_allowed_on(&self, date: NaiveDate) -> bool {
        self.allowed_days.contains(&date)
    }

    /// An order with more than one allowed day can be moved between days.
    #[inline]
    pub fn is_movable(&self) -> bool {
        self.allowed_days.len() > 1
    }

    #[inline]
    pub fn earliest_allowed_day(&self) -> NaiveDate {
        self.earliest_allowed_day
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn preferred_start_time(&self) -> Option<NaiveTime> {
        self.preferred_start_time
    }

    pub fn preferred_end_time(&self) -> Option<NaiveTime> {
        self.preferred_end_time
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn required_skills(&self) -> &BTreeSet<String> {
        &self.required_skills
    }

    /// Index of the assigned bucket in the owning schedule, if any.
    #[inline]
    pub fn assigned_bucket(&self) -> Option<usize> {
        self.assigned_bucket
    }

    #[inline]
    pub fn is_assigned(&self) -> bool {
        self.assigned_bucket.is_some()
    }

    #[inline]
    pub(crate) fn set_assigned_bucket(&mut self, bucket: Option<usize>) {
        self.assigned_bucket = bucket;
    }
}

/// Builder for [`Order`].
#[derive(Debug, Clone)]
pub struct OrderBuilder {
    id: String,
    allowed_days: BTreeSet<NaiveDate>,
    latitude: f64,
    longitude: f64,
    preferred_start_time: Option<NaiveTime>,
    preferred_end_time: Option<NaiveTime>,
    weight: f64,
    volume: f64,
    required_skills: BTreeSet<String>,
    assigned_bucket: Option<usize>,
}

impl OrderBuilder {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            allowed_days: BTreeSet::new(),
            latitude: 0.0,
            longitude: 0.0,
            preferred_start_time: None,
            preferred_end_time: None,
            weight: 0.0,
            volume: 0.0,
            required_skills: BTreeSet::new(),
            assigned_bucket: None,
        }
    }

    pub fn allowed_day(mut self, day: NaiveDate) -> Self {
        self.allowed_days.insert(day);
        self
    }

    pub fn allowed_days(mut self, days: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.allowed_days.extend(days);
        self
    }

    pub fn location(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Sets the customer's preferred time window.
    pub fn time_window(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.preferred_start_time = Some(start);
        self.preferred_end_time = Some(end);
        self
    }

    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn volume(mut self, volume: f64) -> Self {
        self.volume = volume;
        self
    }

    pub fn required_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skills.insert(skill.into());
        self
    }

    pub fn required_skills<I, T>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.required_skills
            .extend(skills.into_iter().map(Into::into));
        self
    }

    /// Pre-assigns the order, e.g. when resuming from a previous plan.
    ///
    /// The index is checked against the bucket arena by [`crate::Schedule::new`].
    pub fn assigned_bucket(mut self, bucket: usize) -> Self {
        self.assigned_bucket = Some(bucket);
        self
    }

    pub fn build(self) -> Result<Order, DomainError> {
        let Some(&earliest_allowed_day) = self.allowed_days.first() else {
            return Err(DomainError::EmptyAllowedDays { order_id: self.id });
        };
        // Written as a negated comparison so NaN is rejected too.
        if !(self.weight >= 0.0) {
            return Err(DomainError::NegativeSize {
                order_id: self.id,
                field: "weight",
            });
        }
        if !(self.volume >= 0.0) {
            return Err(DomainError::NegativeSize {
                order_id: self.id,
                field: "volume",
            });
        }

        Ok(Order {
            id: self.id,
            allowed_days: self.allowed_days,
            earliest_allowed_day,
            latitude: self.latitude,
            longitude: self.longitude,
            preferred_start_time: self.preferred_start_time,
            preferred_end_time: self.preferred_end_time,
            weight: self.weight,
            volume: self.volume,
            required_skills: self.required_skills,
            assigned_bucket: self.assigned_bucket,
        })
    }
}
