use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::achievements::AchievementRarity;
use crate::credits::{ActivityClass, SubscriptionTier};
use crate::streak::DayOutcome;

/// Every notable progression change produces an Event.
/// The host drains them after each trigger; each is delivered once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Health reached 100 for the first time today.
    HealthReachedFull {
        day: NaiveDate,
    },
    DayFinalized {
        day: NaiveDate,
        outcome: DayOutcome,
        current_streak: u32,
        longest_streak: u32,
    },
    /// One-shot celebration for a streak milestone.
    StreakMilestone {
        streak: u32,
        day: NaiveDate,
    },
    AchievementUnlocked {
        id: String,
        title: String,
        rarity: AchievementRarity,
        day: NaiveDate,
    },
    CreditSpent {
        activity: ActivityClass,
        cost: u32,
        boost: u32,
        health: u8,
        remaining: u32,
    },
    CreditsPurchased {
        credits: u32,
        purchased_balance: u32,
    },
    GoalPromoted {
        goal: u32,
        day: NaiveDate,
    },
    TierPromoted {
        tier: SubscriptionTier,
        day: NaiveDate,
    },
    RolloverCompleted {
        from: NaiveDate,
        to: NaiveDate,
    },
}
