//! Day streak tracking.
//!
//! Each calendar day is evaluated exactly once, when it becomes final: either
//! the moment health first reaches 100 (qualified), or at rollover if it never
//! did (missed). A qualifying day extends the streak only when the previously
//! evaluated day is the calendar day right before it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock::is_next_day;
use crate::vitality::MAX_HEALTH;

/// Persisted streak state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_evaluated_day: Option<NaiveDate>,
    /// Streak value of the last milestone signal, cleared when the streak breaks.
    #[serde(default)]
    pub last_milestone_emitted: Option<u32>,
    /// The first-ever qualifying day is celebrated once, ever.
    #[serde(default)]
    pub first_day_celebrated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOutcome {
    Qualified,
    Missed,
}

/// What a day finalization did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finalization {
    pub day: NaiveDate,
    pub outcome: DayOutcome,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Set when this finalization reached a milestone not yet signalled.
    pub milestone: Option<u32>,
}

/// Badge earned by the current streak length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakBadge {
    None,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

impl StreakBadge {
    pub fn for_streak(streak: u32) -> Self {
        match streak {
            0..=2 => StreakBadge::None,
            3..=6 => StreakBadge::Bronze,
            7..=13 => StreakBadge::Silver,
            14..=29 => StreakBadge::Gold,
            30..=99 => StreakBadge::Platinum,
            _ => StreakBadge::Diamond,
        }
    }

    pub fn required_days(&self) -> u32 {
        match self {
            StreakBadge::None => 0,
            StreakBadge::Bronze => 3,
            StreakBadge::Silver => 7,
            StreakBadge::Gold => 14,
            StreakBadge::Platinum => 30,
            StreakBadge::Diamond => 100,
        }
    }

    /// The badge after this one, `None` at the top.
    pub fn next(&self) -> Option<Self> {
        match self {
            StreakBadge::None => Some(StreakBadge::Bronze),
            StreakBadge::Bronze => Some(StreakBadge::Silver),
            StreakBadge::Silver => Some(StreakBadge::Gold),
            StreakBadge::Gold => Some(StreakBadge::Platinum),
            StreakBadge::Platinum => Some(StreakBadge::Diamond),
            StreakBadge::Diamond => None,
        }
    }
}

/// Streak lengths that trigger a celebration.
///
/// 1 is included but only ever fires for the first qualifying day.
pub fn is_milestone(streak: u32) -> bool {
    matches!(streak, 1 | 3 | 7 | 14 | 365) || (streak >= 10 && streak % 10 == 0)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreakTracker {
    state: StreakState,
}

impl StreakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(mut state: StreakState) -> Self {
        state.longest_streak = state.longest_streak.max(state.current_streak);
        Self { state }
    }

    pub fn state(&self) -> &StreakState {
        &self.state
    }

    pub fn into_state(self) -> StreakState {
        self.state
    }

    pub fn current_streak(&self) -> u32 {
        self.state.current_streak
    }

    pub fn longest_streak(&self) -> u32 {
        self.state.longest_streak
    }

    pub fn badge(&self) -> StreakBadge {
        StreakBadge::for_streak(self.state.current_streak)
    }

    /// True when `day` has already been evaluated (or is older than the last
    /// evaluated day).
    pub fn is_evaluated(&self, day: NaiveDate) -> bool {
        self.state.last_evaluated_day.is_some_and(|last| last >= day)
    }

    /// Finalize `day` with its end-of-day health.
    ///
    /// Returns `None` for a day that was already evaluated.
    pub fn finalize(&mut self, day: NaiveDate, end_health: u8) -> Option<Finalization> {
        if self.is_evaluated(day) {
            tracing::debug!(day = %day, "day already finalized; ignoring");
            return None;
        }

        let outcome = if end_health >= MAX_HEALTH {
            DayOutcome::Qualified
        } else {
            DayOutcome::Missed
        };

        let mut milestone = None;
        match outcome {
            DayOutcome::Qualified => {
                let continues = self
                    .state
                    .last_evaluated_day
                    .is_some_and(|last| is_next_day(last, day));
                self.state.current_streak = if continues && self.state.current_streak > 0 {
                    self.state.current_streak + 1
                } else {
                    1
                };
                self.state.longest_streak = self.state.longest_streak.max(self.state.current_streak);
                milestone = self.take_milestone();
            }
            DayOutcome::Missed => {
                self.state.current_streak = 0;
                self.state.last_milestone_emitted = None;
            }
        }
        self.state.last_evaluated_day = Some(day);

        Some(Finalization {
            day,
            outcome,
            current_streak: self.state.current_streak,
            longest_streak: self.state.longest_streak,
            milestone,
        })
    }

    fn take_milestone(&mut self) -> Option<u32> {
        let streak = self.state.current_streak;
        if !is_milestone(streak) || self.state.last_milestone_emitted == Some(streak) {
            return None;
        }
        if streak == 1 {
            if self.state.first_day_celebrated {
                return None;
            }
            self.state.first_day_celebrated = true;
        }
        self.state.last_milestone_emitted = Some(streak);
        Some(streak)
    }
}
