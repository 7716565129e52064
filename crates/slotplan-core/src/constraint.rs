//! Constraint identification and classification.

use crate::score::ScoreLevel;

/// Reference to a constraint for identification.
///
/// # Example
///
/// ```
/// use slotplan_core::ConstraintRef;
///
/// let cr = ConstraintRef::new("slotplan", "Rider must have required skills");
/// assert_eq!(cr.full_name(), "slotplan/Rider must have required skills");
///
/// let simple = ConstraintRef::new("", "Simple");
/// assert_eq!(simple.full_name(), "Simple");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstraintRef {
    /// Package/module containing the constraint.
    pub package: String,
    /// Name of the constraint.
    pub name: String,
}

impl ConstraintRef {
    /// Creates a new constraint reference.
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// Returns the fully qualified name.
    pub fn full_name(&self) -> String {
        if self.package.is_empty() {
            self.name.clone()
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }
}

/// Type of impact a constraint has on the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ImpactType {
    /// Penalize (subtract from score).
    Penalty,
    /// Reward (add to score).
    Reward,
}

impl ImpactType {
    /// Signs a non-negative magnitude and places it on the given level.
    ///
    /// ```
    /// use slotplan_core::{HardSoftScore, ImpactType, ScoreLevel};
    ///
    /// assert_eq!(ImpactType::Penalty.apply(ScoreLevel::Hard, 3), HardSoftScore::of_hard(-3));
    /// assert_eq!(ImpactType::Reward.apply(ScoreLevel::Soft, 10), HardSoftScore::of_soft(10));
    /// ```
    #[inline]
    pub fn apply(self, level: ScoreLevel, magnitude: i64) -> crate::HardSoftScore {
        let signed = match self {
            ImpactType::Penalty => -magnitude,
            ImpactType::Reward => magnitude,
        };
        crate::HardSoftScore::of_level(level, signed)
    }
}
