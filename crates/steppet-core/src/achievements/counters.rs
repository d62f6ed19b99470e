//! Progress counters feeding achievement evaluation.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::credits::{ActivityClass, Minigame, PetActivity};
use crate::history::DayRecord;
use crate::vitality::Mood;

/// Lifetime and run-length counters owned by the coordinator.
///
/// Runs count consecutive finalized calendar days meeting a condition and
/// drop to zero on a day that does not (or on a skipped day).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressCounters {
    /// Steps of all finalized days.
    pub lifetime_steps: u64,
    /// Days whose health reached 100.
    pub goals_achieved: u32,
    /// Closed days with at least one step.
    pub days_active: u32,
    pub minigame_plays: BTreeMap<Minigame, u32>,
    pub activity_plays: BTreeMap<PetActivity, u32>,
    /// Pet activities done today; cleared at rollover.
    pub activities_today: BTreeSet<PetActivity>,
    /// Consecutive days on which every pet activity was done.
    pub all_activities_run: u32,
    /// Consecutive days ending above the sick band.
    pub never_sick_run: u32,
    /// Consecutive days ending above 40 health.
    pub above_forty_run: u32,
    /// Consecutive days ending above 60 health.
    pub above_sixty_run: u32,
    /// Consecutive days with at least 1,000 steps.
    pub daily_walker_run: u32,
    /// Consecutive days with steps at or above 150% of the goal.
    pub goal_crusher_run: u32,
    /// Consecutive days within 500 steps of 10,000.
    pub steady_pace_run: u32,
    /// Consecutive Saturdays and Sundays reaching full health.
    pub weekend_goal_run: u32,
    /// Consecutive Mondays reaching full health.
    pub monday_goal_run: u32,
    /// End health of the last closed day.
    pub last_day_health: Option<u8>,
    /// Days reaching full health right after a day that ended sick.
    pub sick_recoveries: u32,
    /// Days reaching full health right after a day that ended below 50.
    pub low_health_recoveries: u32,
}

impl ProgressCounters {
    pub fn record_play(&mut self, activity: ActivityClass) {
        match activity {
            ActivityClass::Minigame(game) => *self.minigame_plays.entry(game).or_default() += 1,
            ActivityClass::PetActivity(act) => {
                *self.activity_plays.entry(act).or_default() += 1;
                self.activities_today.insert(act);
            }
        }
    }

    pub fn total_minigame_plays(&self) -> u32 {
        self.minigame_plays.values().sum()
    }

    pub fn total_activity_plays(&self) -> u32 {
        self.activity_plays.values().sum()
    }

    /// Count a day that reached full health, crediting a recovery when the
    /// previous day ended low.
    pub fn record_goal_day(&mut self) {
        self.goals_achieved += 1;
        if let Some(previous) = self.last_day_health {
            if is_sick(previous) {
                self.sick_recoveries += 1;
            }
            if previous < 50 {
                self.low_health_recoveries += 1;
            }
        }
    }

    /// Fold a closed day into the lifetime counters and runs.
    pub fn close_day(&mut self, record: &DayRecord) {
        let steps = record.steps;
        let end_health = record.health;
        self.lifetime_steps += u64::from(steps);
        if steps > 0 {
            self.days_active += 1;
        }

        let all_done = PetActivity::ALL.iter().all(|a| self.activities_today.contains(a));
        bump_run(&mut self.all_activities_run, all_done);
        bump_run(&mut self.never_sick_run, !is_sick(end_health));
        bump_run(&mut self.above_forty_run, end_health > 40);
        bump_run(&mut self.above_sixty_run, end_health > 60);
        bump_run(&mut self.daily_walker_run, steps >= 1_000);
        bump_run(
            &mut self.goal_crusher_run,
            u64::from(steps) * 2 >= u64::from(record.goal) * 3,
        );
        bump_run(&mut self.steady_pace_run, steps.abs_diff(10_000) <= 500);
        if is_weekend(record.day) {
            bump_run(&mut self.weekend_goal_run, record.goal_achieved());
        }
        if record.day.weekday() == Weekday::Mon {
            bump_run(&mut self.monday_goal_run, record.goal_achieved());
        }
        self.last_day_health = Some(end_health);
        self.activities_today.clear();
    }

    /// Break the runs crossing the skipped days `first..=last`.
    ///
    /// Daily runs always break. Weekend and Monday runs break only when the
    /// gap covers such a day.
    pub fn break_runs(&mut self, first: NaiveDate, last: NaiveDate) {
        self.all_activities_run = 0;
        self.never_sick_run = 0;
        self.above_forty_run = 0;
        self.above_sixty_run = 0;
        self.daily_walker_run = 0;
        self.goal_crusher_run = 0;
        self.steady_pace_run = 0;

        let (mut weekend, mut monday) = (false, false);
        for d in first.iter_days().take_while(|d| *d <= last).take(7) {
            weekend |= is_weekend(d);
            monday |= d.weekday() == Weekday::Mon;
        }
        if weekend {
            self.weekend_goal_run = 0;
        }
        if monday {
            self.monday_goal_run = 0;
        }
        // A skipped day never reached full health.
        self.last_day_health = Some(0);
    }
}

fn is_sick(health: u8) -> bool {
    Mood::from_health(health) == Mood::Sick
}

fn is_weekend(day: NaiveDate) -> bool {
    matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

fn bump_run(run: &mut u32, held: bool) {
    *run = if held { *run + 1 } else { 0 };
}

/// Read-only view of every counter an achievement can depend on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub day: NaiveDate,
    pub today_steps: u32,
    pub goal: u32,
    pub health: u8,
    /// Finalized steps plus today's.
    pub lifetime_steps: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub goals_achieved: u32,
    pub days_active: u32,
    pub minigame_plays: u32,
    pub distinct_minigames: u32,
    pub activity_plays: u32,
    pub credits_used: u64,
    pub all_activities_days: u32,
    pub never_sick_days: u32,
    pub above_forty_days: u32,
    pub above_sixty_days: u32,
    pub daily_walker_days: u32,
    pub goal_crusher_days: u32,
    pub steady_pace_days: u32,
    pub weekend_goal_days: u32,
    pub monday_goal_days: u32,
    pub sick_recoveries: u32,
    pub low_health_recoveries: u32,
    /// Finalized steps of the current Monday-based week plus today's.
    pub week_steps: u64,
    /// Average end health of the month that ended yesterday, when every
    /// day of it is archived.
    pub completed_month_health: Option<u8>,
    /// The active tier is Premium.
    pub premium: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-05-06 is a Monday.
    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn closed(day: NaiveDate, steps: u32, health: u8) -> DayRecord {
        DayRecord {
            day,
            steps,
            goal: 10_000,
            health,
        }
    }

    #[test]
    fn close_day_updates_runs() {
        let mut counters = ProgressCounters::default();
        for act in PetActivity::ALL {
            counters.record_play(ActivityClass::PetActivity(act));
        }
        counters.close_day(&closed(day(6), 12_000, 100));
        assert_eq!(counters.all_activities_run, 1);
        assert_eq!(counters.daily_walker_run, 1);
        assert_eq!(counters.above_sixty_run, 1);
        assert_eq!(counters.goal_crusher_run, 0);
        assert!(counters.activities_today.is_empty());

        counters.record_play(ActivityClass::PetActivity(PetActivity::Feed));
        counters.close_day(&closed(day(7), 500, 30));
        assert_eq!(counters.all_activities_run, 0);
        assert_eq!(counters.daily_walker_run, 0);
        assert_eq!(counters.never_sick_run, 2);
        assert_eq!(counters.above_forty_run, 0);
        assert_eq!(counters.lifetime_steps, 12_500);
        assert_eq!(counters.days_active, 2);
        assert_eq!(counters.last_day_health, Some(30));
        assert_eq!(counters.total_activity_plays(), 4);
    }

    #[test]
    fn zero_step_day_is_not_active() {
        let mut counters = ProgressCounters::default();
        counters.close_day(&closed(day(6), 0, 0));
        assert_eq!(counters.days_active, 0);
        counters.close_day(&closed(day(7), 1, 0));
        assert_eq!(counters.days_active, 1);
    }

    #[test]
    fn goal_crusher_needs_half_again_the_goal() {
        let mut counters = ProgressCounters::default();
        counters.close_day(&closed(day(6), 15_000, 100));
        counters.close_day(&closed(day(7), 16_000, 100));
        assert_eq!(counters.goal_crusher_run, 2);
        counters.close_day(&closed(day(8), 14_999, 100));
        assert_eq!(counters.goal_crusher_run, 0);
    }

    #[test]
    fn steady_pace_allows_five_hundred_either_way() {
        let mut counters = ProgressCounters::default();
        for steps in [9_500, 10_500, 10_000] {
            counters.close_day(&closed(day(6), steps, 100));
        }
        assert_eq!(counters.steady_pace_run, 3);
        counters.close_day(&closed(day(9), 10_501, 100));
        assert_eq!(counters.steady_pace_run, 0);
    }

    #[test]
    fn weekend_run_ignores_weekdays() {
        let mut counters = ProgressCounters::default();
        counters.close_day(&closed(day(4), 10_000, 100));
        counters.close_day(&closed(day(5), 10_000, 100));
        counters.close_day(&closed(day(6), 2_000, 20));
        counters.close_day(&closed(day(11), 10_000, 100));
        assert_eq!(counters.weekend_goal_run, 3);
        assert_eq!(counters.monday_goal_run, 0);

        counters.close_day(&closed(day(12), 3_000, 30));
        assert_eq!(counters.weekend_goal_run, 0);
    }

    #[test]
    fn monday_run_counts_mondays_only() {
        let mut counters = ProgressCounters::default();
        counters.close_day(&closed(day(6), 10_000, 100));
        counters.close_day(&closed(day(7), 0, 0));
        counters.close_day(&closed(day(13), 10_000, 100));
        assert_eq!(counters.monday_goal_run, 2);
    }

    #[test]
    fn gap_breaks_weekday_scoped_runs_only_when_covered() {
        let mut counters = ProgressCounters::default();
        counters.weekend_goal_run = 2;
        counters.monday_goal_run = 2;
        counters.daily_walker_run = 4;

        // Tuesday to Thursday.
        counters.break_runs(day(7), day(9));
        assert_eq!(counters.daily_walker_run, 0);
        assert_eq!(counters.weekend_goal_run, 2);
        assert_eq!(counters.monday_goal_run, 2);
        assert_eq!(counters.last_day_health, Some(0));

        // Saturday to Monday.
        counters.break_runs(day(11), day(13));
        assert_eq!(counters.weekend_goal_run, 0);
        assert_eq!(counters.monday_goal_run, 0);
    }

    #[test]
    fn goal_day_after_low_day_counts_as_recovery() {
        let mut counters = ProgressCounters::default();
        counters.record_goal_day();
        assert_eq!(counters.sick_recoveries, 0);

        counters.close_day(&closed(day(6), 4_000, 40));
        counters.record_goal_day();
        assert_eq!(counters.low_health_recoveries, 1);
        assert_eq!(counters.sick_recoveries, 0);

        counters.close_day(&closed(day(7), 1_000, 10));
        counters.record_goal_day();
        assert_eq!(counters.low_health_recoveries, 2);
        assert_eq!(counters.sick_recoveries, 1);
        assert_eq!(counters.goals_achieved, 3);
    }

    #[test]
    fn plays_are_counted_per_kind() {
        let mut counters = ProgressCounters::default();
        counters.record_play(ActivityClass::Minigame(Minigame::SkyDash));
        counters.record_play(ActivityClass::Minigame(Minigame::SkyDash));
        counters.record_play(ActivityClass::Minigame(Minigame::BubblePop));
        assert_eq!(counters.minigame_plays[&Minigame::SkyDash], 2);
        assert_eq!(counters.total_minigame_plays(), 3);
        assert!(counters.activities_today.is_empty());
    }
}
