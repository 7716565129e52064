//! Composite termination.

use super::Termination;
use crate::scope::PhaseScope;

/// Terminates when any of its children does.
#[derive(Debug, Default)]
pub struct OrTermination {
    terminations: Vec<Box<dyn Termination>>,
}

impl OrTermination {
    pub fn new(terminations: Vec<Box<dyn Termination>>) -> Self {
        Self { terminations }
    }

    pub fn push(&mut self, termination: Box<dyn Termination>) {
        self.terminations.push(termination);
    }

    pub fn len(&self) -> usize {
        self.terminations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terminations.is_empty()
    }
}

impl Termination for OrTermination {
    fn is_terminated(&self, phase_scope: &PhaseScope<'_>) -> bool {
        self.terminations.iter().any(|t| t.is_terminated(phase_scope))
    }
}
