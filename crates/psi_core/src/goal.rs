//! The capability contract candidate goals must satisfy.
//!
//! The core never knows what a goal does. It only asks how much the goal is
//! worth to a need, how likely it is to succeed, whether it can run right now,
//! and what it satisfied once it ran.

use std::collections::BTreeMap;

use crate::need::NeedType;

/// The scoring half of a goal: everything a [`crate::Motive`] reads.
pub trait GoalValue {
    /// Satisfaction value in `[0, 1]`; 0 for unrelated needs.
    fn value_for_need(&self, need: NeedType) -> f64;

    /// Probability of success in `[0, 1]`.
    fn expectation(&self) -> f64 {
        1.0
    }
}

/// A goal that can be checked and executed against an environment `E`.
pub trait Goal<E: ?Sized>: GoalValue {
    /// Host-specific side effect carried back in the [`Outcome`].
    type Effect;

    fn name(&self) -> &str;

    /// Precondition check. Must not mutate anything.
    fn is_executable(&self, env: &E) -> bool;

    /// Only ever called on the goal the selector picked.
    fn execute(&self, env: &mut E) -> Outcome<Self::Effect>;
}

/// What executing a goal produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T> {
    pub success: bool,
    /// Amounts fed into `NeedTankSystem::satisfy_need` when `success` is set.
    pub needs_satisfied: BTreeMap<NeedType, f64>,
    pub effect: T,
    pub message: String,
}

impl<T> Outcome<T> {
    pub fn succeeded(effect: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            needs_satisfied: BTreeMap::new(),
            effect,
            message: message.into(),
        }
    }

    pub fn failed(effect: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            needs_satisfied: BTreeMap::new(),
            effect,
            message: message.into(),
        }
    }

    pub fn satisfies(mut self, need: NeedType, amount: f64) -> Self {
        *self.needs_satisfied.entry(need).or_insert(0.0) += amount;
        self
    }
}
