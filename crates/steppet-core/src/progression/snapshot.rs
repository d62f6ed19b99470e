use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::{AchievementRecord, AchievementRegistry, ProgressCounters};
use crate::credits::{CreditBalance, SubscriptionTier};
use crate::goal::StepGoal;
use crate::history::{DailyStepSample, DayHistory};
use crate::streak::StreakState;

/// Bumped whenever the snapshot layout changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything the engine needs to resume after a restart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub last_known_day: NaiveDate,
    pub today: DailyStepSample,
    pub goal: StepGoal,
    pub boost_accumulated_today: u32,
    /// Whether today has already been evaluated for the streak.
    pub finalized_today: bool,
    pub credits: CreditBalance,
    pub streak: StreakState,
    pub achievements: Vec<AchievementRecord>,
    #[serde(default)]
    pub counters: ProgressCounters,
    #[serde(default)]
    pub history: DayHistory,
}

impl EngineSnapshot {
    /// State of a brand-new profile starting on `today`.
    pub fn fresh(today: NaiveDate, goal: u32, tier: SubscriptionTier) -> Self {
        let goal = StepGoal::new(goal).unwrap_or_default();
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            last_known_day: today,
            today: DailyStepSample::new(today, goal.active()),
            goal,
            boost_accumulated_today: 0,
            finalized_today: false,
            credits: CreditBalance::fresh(tier, today),
            streak: StreakState::default(),
            achievements: AchievementRegistry::new().records().to_vec(),
            counters: ProgressCounters::default(),
            history: DayHistory::default(),
        }
    }
}
