//! Pet health and mood derivation.
//!
//! Health is never stored as a source of truth. It is recomputed from the
//! day's step count, the goal in force for that day and the boost
//! accumulated from credit spends:
//!
//! ```text
//! health = clamp(0, 100, floor(100 * steps / goal) + boost)
//! ```

use serde::{Deserialize, Serialize};

/// Highest possible health value.
pub const MAX_HEALTH: u8 = 100;

/// Discrete mood band over health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    /// 0..=20
    Sick,
    /// 21..=40
    Sad,
    /// 41..=60
    Content,
    /// 61..=80
    Happy,
    /// 81..=100
    FullHealth,
}

impl Mood {
    /// Mood for a health value. Values above 100 are treated as 100.
    pub fn from_health(health: u8) -> Self {
        match health.min(MAX_HEALTH) {
            0..=20 => Mood::Sick,
            21..=40 => Mood::Sad,
            41..=60 => Mood::Content,
            61..=80 => Mood::Happy,
            _ => Mood::FullHealth,
        }
    }

    /// Inclusive health range covered by this mood.
    pub fn health_range(&self) -> std::ops::RangeInclusive<u8> {
        match self {
            Mood::Sick => 0..=20,
            Mood::Sad => 21..=40,
            Mood::Content => 41..=60,
            Mood::Happy => 61..=80,
            Mood::FullHealth => 81..=100,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Mood::Sick => "Your pet is feeling unwell. Get moving!",
            Mood::Sad => "Your pet is a bit down. Some steps would help!",
            Mood::Content => "Your pet is doing okay. Keep it up!",
            Mood::Happy => "Your pet is happy! Almost there!",
            Mood::FullHealth => "Your pet is thriving! Amazing work!",
        }
    }
}

/// Derived vitality for the current day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalityState {
    pub health: u8,
    pub mood: Mood,
    pub boost_accumulated_today: u32,
}

impl VitalityState {
    pub fn compute(step_count: u32, goal: u32, boost_accumulated_today: u32) -> Self {
        let (health, mood) = compute_health(step_count, goal, boost_accumulated_today);
        Self {
            health,
            mood,
            boost_accumulated_today,
        }
    }

    pub fn is_full(&self) -> bool {
        self.health >= MAX_HEALTH
    }
}

/// Compute health and mood. Total: a zero goal is treated as a goal of 1.
///
/// The boost is added after flooring the step ratio and the sum is capped
/// at 100, so a boost that overflows the cap is still kept by the caller
/// and not lost if the goal later rises.
pub fn compute_health(step_count: u32, goal: u32, boost_accumulated_today: u32) -> (u8, Mood) {
    let goal = u64::from(goal.max(1));
    let step_health = u64::from(step_count) * 100 / goal;
    let total = step_health.saturating_add(u64::from(boost_accumulated_today));
    let health = total.min(u64::from(MAX_HEALTH)) as u8;
    (health, Mood::from_health(health))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_steps_is_zero_health() {
        assert_eq!(compute_health(0, 10_000, 0), (0, Mood::Sick));
    }

    #[test]
    fn meeting_goal_is_full_health() {
        assert_eq!(compute_health(10_000, 10_000, 0), (100, Mood::FullHealth));
    }

    #[test]
    fn step_ratio_is_floored_before_boost() {
        // 9_999 / 10_000 = 99.99% -> 99
        assert_eq!(compute_health(9_999, 10_000, 0).0, 99);
        assert_eq!(compute_health(9_999, 10_000, 1).0, 100);
    }

    #[test]
    fn exceeding_goal_and_boost_are_capped() {
        assert_eq!(compute_health(30_000, 10_000, 0).0, 100);
        assert_eq!(compute_health(5_000, 10_000, 90).0, 100);
        assert_eq!(compute_health(u32::MAX, 1, u32::MAX).0, 100);
    }

    #[test]
    fn zero_goal_is_treated_as_one() {
        assert_eq!(compute_health(0, 0, 0).0, 0);
        assert_eq!(compute_health(1, 0, 0).0, 100);
    }

    #[test]
    fn boost_alone_counts_like_steps() {
        assert_eq!(compute_health(0, 10_000, 100).0, 100);
        assert_eq!(compute_health(0, 10_000, 30), (30, Mood::Sad));
    }

    #[test]
    fn mood_breakpoints_are_inclusive_upper_bounds() {
        assert_eq!(Mood::from_health(20), Mood::Sick);
        assert_eq!(Mood::from_health(21), Mood::Sad);
        assert_eq!(Mood::from_health(40), Mood::Sad);
        assert_eq!(Mood::from_health(41), Mood::Content);
        assert_eq!(Mood::from_health(60), Mood::Content);
        assert_eq!(Mood::from_health(61), Mood::Happy);
        assert_eq!(Mood::from_health(80), Mood::Happy);
        assert_eq!(Mood::from_health(81), Mood::FullHealth);
        assert_eq!(Mood::from_health(100), Mood::FullHealth);
    }

    #[test]
    fn mood_ranges_partition_health() {
        for health in 0..=MAX_HEALTH {
            let mood = Mood::from_health(health);
            assert!(mood.health_range().contains(&health));
        }
    }
}
