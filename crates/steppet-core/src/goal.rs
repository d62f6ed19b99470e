//! Daily step goal with deferred changes.
//!
//! A goal change requested during a day is parked in `pending` and only
//! becomes `active` at the next rollover, so today's health is always judged
//! against the goal that was in force when the day started.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_STEP_GOAL: u32 = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepGoal {
    active: u32,
    #[serde(default)]
    pending: Option<u32>,
}

impl StepGoal {
    /// Create a goal. Zero is rejected.
    pub fn new(active: u32) -> Result<Self, ValidationError> {
        if active == 0 {
            return Err(ValidationError::NonPositiveGoal);
        }
        Ok(Self {
            active,
            pending: None,
        })
    }

    pub fn active(&self) -> u32 {
        self.active
    }

    pub fn pending(&self) -> Option<u32> {
        self.pending
    }

    /// Park a goal change until the next rollover.
    ///
    /// Requesting the goal already in force clears any pending change.
    pub fn request_change(&mut self, goal: u32) -> Result<(), ValidationError> {
        if goal == 0 {
            return Err(ValidationError::NonPositiveGoal);
        }
        self.pending = if goal == self.active { None } else { Some(goal) };
        Ok(())
    }

    /// Promote the pending goal, returning the new active goal if it changed.
    /// Only the rollover sequence calls this.
    pub(crate) fn promote_pending(&mut self) -> Option<u32> {
        let next = self.pending.take()?;
        self.active = next;
        Some(next)
    }
}

impl Default for StepGoal {
    fn default() -> Self {
        Self {
            active: DEFAULT_STEP_GOAL,
            pending: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_goal_rejected() {
        assert_eq!(StepGoal::new(0), Err(ValidationError::NonPositiveGoal));
        let mut goal = StepGoal::default();
        assert_eq!(goal.request_change(0), Err(ValidationError::NonPositiveGoal));
        assert_eq!(goal.pending(), None);
    }

    #[test]
    fn change_is_deferred_until_promotion() {
        let mut goal = StepGoal::new(10_000).unwrap();
        goal.request_change(8_000).unwrap();
        assert_eq!(goal.active(), 10_000);
        assert_eq!(goal.pending(), Some(8_000));

        assert_eq!(goal.promote_pending(), Some(8_000));
        assert_eq!(goal.active(), 8_000);
        assert_eq!(goal.pending(), None);
        assert_eq!(goal.promote_pending(), None);
    }

    #[test]
    fn latest_request_wins() {
        let mut goal = StepGoal::new(10_000).unwrap();
        goal.request_change(8_000).unwrap();
        goal.request_change(12_000).unwrap();
        assert_eq!(goal.pending(), Some(12_000));
        goal.request_change(10_000).unwrap();
        assert_eq!(goal.pending(), None);
    }
}
