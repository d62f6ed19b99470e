//! Achievement definitions.
//!
//! Catalogue order is the unlock order when several achievements become
//! unlockable in the same pass.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::counters::CounterSnapshot;
use crate::credits::Minigame;
use crate::vitality::MAX_HEALTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementCategory {
    GettingStarted,
    Streak,
    Steps,
    Health,
    Consistency,
    Milestones,
    Special,
    Play,
}

impl std::str::FromStr for AchievementCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let category = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "getting_started" => AchievementCategory::GettingStarted,
            "streak" => AchievementCategory::Streak,
            "steps" => AchievementCategory::Steps,
            "health" => AchievementCategory::Health,
            "consistency" => AchievementCategory::Consistency,
            "milestones" => AchievementCategory::Milestones,
            "special" => AchievementCategory::Special,
            "play" => AchievementCategory::Play,
            other => return Err(format!("unknown category '{other}'")),
        };
        Ok(category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// A counter read straight out of a [`CounterSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    TodaySteps,
    LifetimeSteps,
    CurrentStreak,
    GoalsAchieved,
    DaysActive,
    MinigamePlays,
    DistinctMinigames,
    ActivityPlays,
    CreditsUsed,
    AllActivitiesDays,
    NeverSickDays,
    AboveFortyDays,
    AboveSixtyDays,
    DailyWalkerDays,
    GoalCrusherDays,
    SteadyPaceDays,
    WeekendGoalDays,
    MondayGoalDays,
    SickRecoveries,
    LowHealthRecoveries,
    WeekSteps,
}

impl Counter {
    pub fn read(self, snap: &CounterSnapshot) -> u64 {
        match self {
            Counter::TodaySteps => u64::from(snap.today_steps),
            Counter::LifetimeSteps => snap.lifetime_steps,
            Counter::CurrentStreak => u64::from(snap.current_streak),
            Counter::GoalsAchieved => u64::from(snap.goals_achieved),
            Counter::DaysActive => u64::from(snap.days_active),
            Counter::MinigamePlays => u64::from(snap.minigame_plays),
            Counter::DistinctMinigames => u64::from(snap.distinct_minigames),
            Counter::ActivityPlays => u64::from(snap.activity_plays),
            Counter::CreditsUsed => snap.credits_used,
            Counter::AllActivitiesDays => u64::from(snap.all_activities_days),
            Counter::NeverSickDays => u64::from(snap.never_sick_days),
            Counter::AboveFortyDays => u64::from(snap.above_forty_days),
            Counter::AboveSixtyDays => u64::from(snap.above_sixty_days),
            Counter::DailyWalkerDays => u64::from(snap.daily_walker_days),
            Counter::GoalCrusherDays => u64::from(snap.goal_crusher_days),
            Counter::SteadyPaceDays => u64::from(snap.steady_pace_days),
            Counter::WeekendGoalDays => u64::from(snap.weekend_goal_days),
            Counter::MondayGoalDays => u64::from(snap.monday_goal_days),
            Counter::SickRecoveries => u64::from(snap.sick_recoveries),
            Counter::LowHealthRecoveries => u64::from(snap.low_health_recoveries),
            Counter::WeekSteps => snap.week_steps,
        }
    }
}

/// A yes/no condition over a [`CounterSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    FullHealth,
    GoalMet,
    /// Today's steps at least `n` times the goal.
    GoalMultiple(u32),
    ExactSteps(u32),
    /// Steps exactly equal to the goal.
    ExactGoal,
    GoalMetOn { month: u32, day: u32 },
    AllMinigamesTried,
    /// The last completed month averaged at least this health.
    MonthAverageHealth(u8),
    /// This week's steps at least `percent` of seven times today's goal.
    WeekAboveGoal { percent: u32 },
    Premium,
}

impl Predicate {
    pub fn holds(self, snap: &CounterSnapshot) -> bool {
        let goal_met = snap.today_steps >= snap.goal;
        match self {
            Predicate::FullHealth => snap.health >= MAX_HEALTH,
            Predicate::GoalMet => goal_met,
            Predicate::GoalMultiple(n) => {
                u64::from(snap.today_steps) >= u64::from(snap.goal) * u64::from(n)
            }
            Predicate::ExactSteps(n) => snap.today_steps == n,
            Predicate::ExactGoal => snap.today_steps == snap.goal,
            Predicate::GoalMetOn { month, day } => {
                goal_met && snap.day.month() == month && snap.day.day() == day
            }
            Predicate::AllMinigamesTried => snap.distinct_minigames as usize >= Minigame::ALL.len(),
            Predicate::MonthAverageHealth(min) => {
                snap.completed_month_health.is_some_and(|avg| avg >= min)
            }
            Predicate::WeekAboveGoal { percent } => {
                snap.week_steps * 100 >= u64::from(snap.goal) * 7 * u64::from(percent)
            }
            Predicate::Premium => snap.premium,
        }
    }
}

/// Where an achievement's progress comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressSource {
    /// Progress is the counter value.
    Counter(Counter),
    /// Progress is 1 once the predicate holds.
    Predicate(Predicate),
    /// Progress is pushed by the host through `update_progress`.
    Manual,
}

/// How `update_progress` merges a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// `max(current, new)`.
    Monotonic,
    /// The caller recomputes the full value each time.
    Recomputed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub rarity: AchievementRarity,
    pub target: u32,
    pub source: ProgressSource,
    pub mode: ProgressMode,
    pub daily_scoped: bool,
}

impl AchievementDef {
    /// Progress this definition reads from a snapshot, if it reads one.
    pub fn progress_from(&self, snap: &CounterSnapshot) -> Option<u64> {
        match self.source {
            ProgressSource::Counter(counter) => Some(counter.read(snap)),
            ProgressSource::Predicate(predicate) => Some(u64::from(predicate.holds(snap))),
            ProgressSource::Manual => None,
        }
    }
}

use AchievementCategory as Cat;
use AchievementRarity as R;

const fn counter(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: AchievementCategory,
    rarity: AchievementRarity,
    target: u32,
    source: Counter,
) -> AchievementDef {
    AchievementDef {
        id,
        title,
        description,
        category,
        rarity,
        target,
        source: ProgressSource::Counter(source),
        mode: ProgressMode::Monotonic,
        daily_scoped: false,
    }
}

/// Single-day step count; recomputed on every update and zeroed at rollover.
const fn daily_steps(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: AchievementCategory,
    rarity: AchievementRarity,
    target: u32,
) -> AchievementDef {
    AchievementDef {
        id,
        title,
        description,
        category,
        rarity,
        target,
        source: ProgressSource::Counter(Counter::TodaySteps),
        mode: ProgressMode::Recomputed,
        daily_scoped: true,
    }
}

const fn predicate(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: AchievementCategory,
    rarity: AchievementRarity,
    predicate: Predicate,
    daily_scoped: bool,
) -> AchievementDef {
    AchievementDef {
        id,
        title,
        description,
        category,
        rarity,
        target: 1,
        source: ProgressSource::Predicate(predicate),
        mode: ProgressMode::Monotonic,
        daily_scoped,
    }
}

const fn manual(
    id: &'static str,
    title: &'static str,
    description: &'static str,
    category: AchievementCategory,
    rarity: AchievementRarity,
    target: u32,
) -> AchievementDef {
    AchievementDef {
        id,
        title,
        description,
        category,
        rarity,
        target,
        source: ProgressSource::Manual,
        mode: ProgressMode::Monotonic,
        daily_scoped: false,
    }
}

pub static CATALOGUE: &[AchievementDef] = &[
    // Getting started
    counter("first_step", "First Step", "Complete your first day of step tracking", Cat::GettingStarted, R::Common, 1, Counter::DaysActive),
    daily_steps("step_up", "Step Up", "Reach 1,000 steps in a single day", Cat::GettingStarted, R::Common, 1_000),
    daily_steps("getting_started", "Getting Started", "Reach 5,000 steps in a single day", Cat::GettingStarted, R::Common, 5_000),
    manual("goal_setter", "Goal Setter", "Set your first daily step goal", Cat::GettingStarted, R::Common, 1),
    manual("pet_parent", "Pet Parent", "Name your pet for the first time", Cat::GettingStarted, R::Common, 1),
    manual("health_check", "Health Check", "View your pet's health status", Cat::GettingStarted, R::Common, 1),
    manual("explorer", "Explorer", "Visit all app sections", Cat::GettingStarted, R::Common, 5),
    manual("customizer", "Customizer", "Change your pet's appearance", Cat::GettingStarted, R::Common, 1),
    manual("notifications_on", "Stay Connected", "Enable notifications", Cat::GettingStarted, R::Common, 1),
    predicate("first_goal", "First Goal", "Achieve your daily step goal for the first time", Cat::GettingStarted, R::Common, Predicate::GoalMet, false),
    // Streak
    counter("on_fire", "On Fire", "Maintain a 3-day goal streak", Cat::Streak, R::Common, 3, Counter::CurrentStreak),
    counter("consistent_walker", "Consistent Walker", "Hit your goal 5 days in a row", Cat::Streak, R::Uncommon, 5, Counter::CurrentStreak),
    counter("week_warrior", "Week Warrior", "Maintain a 7-day goal streak", Cat::Streak, R::Uncommon, 7, Counter::CurrentStreak),
    counter("two_week_titan", "Two Week Titan", "Maintain a 14-day goal streak", Cat::Streak, R::Rare, 14, Counter::CurrentStreak),
    counter("monthly_master", "Monthly Master", "Maintain a 30-day goal streak", Cat::Streak, R::Epic, 30, Counter::CurrentStreak),
    counter("dedication", "Pure Dedication", "Maintain a 60-day goal streak", Cat::Streak, R::Epic, 60, Counter::CurrentStreak),
    counter("streak_legend", "Streak Legend", "Maintain a 100-day goal streak", Cat::Streak, R::Legendary, 100, Counter::CurrentStreak),
    counter("comeback_kid", "Comeback Kid", "Recover your pet's health from sick to full health", Cat::Streak, R::Uncommon, 1, Counter::SickRecoveries),
    counter("never_miss", "Never Miss Monday", "Hit your goal on 4 consecutive Mondays", Cat::Streak, R::Rare, 4, Counter::MondayGoalDays),
    counter("weekend_warrior", "Weekend Warrior", "Hit your goal on 8 consecutive weekend days", Cat::Streak, R::Rare, 8, Counter::WeekendGoalDays),
    // Steps
    daily_steps("ten_thousand", "10K Club", "Walk 10,000 steps in a single day", Cat::Steps, R::Common, 10_000),
    daily_steps("fifteen_k", "15K Achiever", "Walk 15,000 steps in a single day", Cat::Steps, R::Uncommon, 15_000),
    daily_steps("twenty_k", "20K Champion", "Walk 20,000 steps in a single day", Cat::Steps, R::Rare, 20_000),
    daily_steps("marathon_day", "Marathon Day", "Walk 30,000 steps in a single day", Cat::Steps, R::Epic, 30_000),
    daily_steps("ultra_walker", "Ultra Walker", "Walk 50,000 steps in a single day", Cat::Steps, R::Legendary, 50_000),
    counter("hundred_k_total", "100K Total", "Accumulate 100,000 total steps", Cat::Steps, R::Common, 100_000, Counter::LifetimeSteps),
    counter("half_million", "Half Million", "Accumulate 500,000 total steps", Cat::Steps, R::Uncommon, 500_000, Counter::LifetimeSteps),
    counter("millionaire", "Step Millionaire", "Accumulate 1,000,000 total steps", Cat::Steps, R::Rare, 1_000_000, Counter::LifetimeSteps),
    counter("five_million", "Five Million Steps", "Accumulate 5,000,000 total steps", Cat::Steps, R::Epic, 5_000_000, Counter::LifetimeSteps),
    counter("ten_million", "Ten Million Steps", "Accumulate 10,000,000 total steps", Cat::Steps, R::Legendary, 10_000_000, Counter::LifetimeSteps),
    counter("weekly_75k", "Weekly 75K", "Walk 75,000 steps in a single week", Cat::Steps, R::Uncommon, 75_000, Counter::WeekSteps),
    counter("weekly_100k", "Weekly 100K", "Walk 100,000 steps in a single week", Cat::Steps, R::Rare, 100_000, Counter::WeekSteps),
    // Health
    predicate("full_health_first", "Thriving", "Reach 100% pet health for the first time", Cat::Health, R::Common, Predicate::FullHealth, false),
    counter("perfect_week", "Perfect Week", "Keep pet at 100% health for 7 consecutive days", Cat::Health, R::Rare, 7, Counter::CurrentStreak),
    counter("perfect_month", "Perfect Month", "Keep pet at 100% health for 30 consecutive days", Cat::Health, R::Legendary, 30, Counter::CurrentStreak),
    counter("never_sick", "Never Sick", "Never let pet fall to sick status for 14 days", Cat::Health, R::Rare, 14, Counter::NeverSickDays),
    counter("health_recovery", "Health Recovery", "Recover from below 50% to 100% in one day", Cat::Health, R::Uncommon, 1, Counter::LowHealthRecoveries),
    counter("stable_health", "Stable Health", "Keep pet above 60% health for 10 days", Cat::Health, R::Uncommon, 10, Counter::AboveSixtyDays),
    counter("always_happy", "Always Happy", "Keep pet at happy or full health for 5 days", Cat::Health, R::Uncommon, 5, Counter::AboveSixtyDays),
    predicate("health_champion", "Health Champion", "Average 90%+ health for a month", Cat::Health, R::Epic, Predicate::MonthAverageHealth(90), false),
    counter("rescue_mission", "Rescue Mission", "Recover pet from sick status 5 times", Cat::Health, R::Uncommon, 5, Counter::SickRecoveries),
    counter("guardian", "Guardian", "Never let pet fall below 40% health for 30 days", Cat::Health, R::Epic, 30, Counter::AboveFortyDays),
    // Consistency
    counter("daily_walker", "Daily Walker", "Walk at least 1,000 steps every day for a week", Cat::Consistency, R::Common, 7, Counter::DailyWalkerDays),
    counter("monthly_active", "Monthly Active", "Walk at least 1,000 steps every day for a month", Cat::Consistency, R::Rare, 30, Counter::DailyWalkerDays),
    counter("goal_crusher", "Goal Crusher", "Exceed your daily goal by 50% for 5 days", Cat::Consistency, R::Rare, 5, Counter::GoalCrusherDays),
    counter("steady_pace", "Steady Pace", "Hit exactly 10,000 steps (±500) for 3 days", Cat::Consistency, R::Uncommon, 3, Counter::SteadyPaceDays),
    // Milestones
    counter("one_week_user", "One Week User", "Use StepPet for 7 days", Cat::Milestones, R::Common, 7, Counter::DaysActive),
    counter("one_month_user", "One Month User", "Use StepPet for 30 days", Cat::Milestones, R::Uncommon, 30, Counter::DaysActive),
    counter("three_month_user", "Three Month User", "Use StepPet for 90 days", Cat::Milestones, R::Rare, 90, Counter::DaysActive),
    counter("six_month_user", "Six Month User", "Use StepPet for 180 days", Cat::Milestones, R::Epic, 180, Counter::DaysActive),
    counter("one_year_user", "One Year User", "Use StepPet for 365 days", Cat::Milestones, R::Legendary, 365, Counter::DaysActive),
    counter("hundred_goals", "100 Goals", "Achieve your daily goal 100 times", Cat::Milestones, R::Rare, 100, Counter::GoalsAchieved),
    counter("thousand_goals", "1000 Goals", "Achieve your daily goal 1000 times", Cat::Milestones, R::Legendary, 1_000, Counter::GoalsAchieved),
    // Special
    predicate("new_years_walk", "New Year's Walk", "Hit your goal on January 1st", Cat::Special, R::Rare, Predicate::GoalMetOn { month: 1, day: 1 }, false),
    predicate("holiday_spirit", "Holiday Spirit", "Hit your goal on December 25th", Cat::Special, R::Rare, Predicate::GoalMetOn { month: 12, day: 25 }, false),
    predicate("lucky_seven", "Lucky Seven", "Walk exactly 7,777 steps in a day", Cat::Special, R::Rare, Predicate::ExactSteps(7_777), true),
    predicate("double_trouble", "Double Trouble", "Walk double your daily goal", Cat::Special, R::Uncommon, Predicate::GoalMultiple(2), true),
    predicate("triple_threat", "Triple Threat", "Walk triple your daily goal", Cat::Special, R::Rare, Predicate::GoalMultiple(3), true),
    predicate("photo_finish", "Photo Finish", "Complete your goal with exactly 0 steps remaining", Cat::Special, R::Epic, Predicate::ExactGoal, true),
    predicate("overachiever", "Overachiever", "Exceed your weekly goal by 25%", Cat::Special, R::Uncommon, Predicate::WeekAboveGoal { percent: 125 }, false),
    manual("pet_lover", "Pet Lover", "Try all 5 different pets", Cat::Special, R::Rare, 5),
    predicate("premium_supporter", "Premium Supporter", "Upgrade to StepPet Premium", Cat::Special, R::Epic, Predicate::Premium, false),
    // Play
    counter("first_game", "Game On", "Play your first minigame", Cat::Play, R::Common, 1, Counter::MinigamePlays),
    counter("game_enthusiast", "Game Enthusiast", "Play 25 minigames", Cat::Play, R::Uncommon, 25, Counter::MinigamePlays),
    predicate("arcade_explorer", "Arcade Explorer", "Try every minigame", Cat::Play, R::Rare, Predicate::AllMinigamesTried, false),
    counter("caretaker", "Caretaker", "Do 10 activities with your pet", Cat::Play, R::Common, 10, Counter::ActivityPlays),
    counter("full_service", "Full Service", "Feed, play ball and watch TV with your pet in one day", Cat::Play, R::Uncommon, 1, Counter::AllActivitiesDays),
    counter("devoted_keeper", "Devoted Keeper", "Do every pet activity 7 days in a row", Cat::Play, R::Epic, 7, Counter::AllActivitiesDays),
    counter("credit_spender", "Credit Spender", "Use 50 credits", Cat::Play, R::Uncommon, 50, Counter::CreditsUsed),
    counter("big_spender", "Big Spender", "Use 200 credits", Cat::Play, R::Rare, 200, Counter::CreditsUsed),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique_and_targets_positive() {
        let mut seen = HashSet::new();
        for def in CATALOGUE {
            assert!(seen.insert(def.id), "duplicate id {}", def.id);
            assert!(def.target > 0, "{} has zero target", def.id);
        }
    }

    #[test]
    fn recomputed_progress_is_daily_scoped() {
        for def in CATALOGUE {
            if def.mode == ProgressMode::Recomputed {
                assert!(def.daily_scoped, "{} recomputes but never resets", def.id);
            }
        }
    }

    fn snap() -> CounterSnapshot {
        CounterSnapshot {
            goal: 10_000,
            ..CounterSnapshot::default()
        }
    }

    #[test]
    fn month_average_needs_a_completed_month() {
        let champion = Predicate::MonthAverageHealth(90);
        assert!(!champion.holds(&snap()));
        let high = CounterSnapshot {
            completed_month_health: Some(92),
            ..snap()
        };
        assert!(champion.holds(&high));
        let low = CounterSnapshot {
            completed_month_health: Some(89),
            ..snap()
        };
        assert!(!champion.holds(&low));
    }

    #[test]
    fn week_steps_feed_weekly_totals() {
        let week = CounterSnapshot {
            week_steps: 80_000,
            ..snap()
        };
        let read = |id: &str| {
            CATALOGUE
                .iter()
                .find(|d| d.id == id)
                .and_then(|d| d.progress_from(&week))
        };
        assert_eq!(read("weekly_75k"), Some(80_000));
        assert_eq!(read("weekly_100k"), Some(80_000));
        assert_eq!(read("pet_lover"), None);
    }

    #[test]
    fn overachiever_needs_a_quarter_over_the_weekly_goal() {
        let over = Predicate::WeekAboveGoal { percent: 125 };
        let week = |week_steps| CounterSnapshot {
            week_steps,
            ..snap()
        };
        assert!(over.holds(&week(87_500)));
        assert!(!over.holds(&week(87_499)));
    }

    #[test]
    fn category_parses() {
        assert_eq!("getting-started".parse::<AchievementCategory>(), Ok(AchievementCategory::GettingStarted));
        assert!("bogus".parse::<AchievementCategory>().is_err());
    }
}
