//! Daily step samples, the archive of finalized days, and summaries.

use std::collections::VecDeque;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::is_next_day;
use crate::vitality::MAX_HEALTH;

pub const DEFAULT_RETENTION_DAYS: u32 = 365;
/// Largest retention window the config accepts.
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// Step reading for one calendar day. Mutable only while it is today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStepSample {
    pub day: NaiveDate,
    pub step_count: u32,
    /// Goal in force when the day started.
    pub goal_at_time: u32,
}

impl DailyStepSample {
    pub fn new(day: NaiveDate, goal_at_time: u32) -> Self {
        Self {
            day,
            step_count: 0,
            goal_at_time: goal_at_time.max(1),
        }
    }
}

/// A finalized day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: NaiveDate,
    pub steps: u32,
    pub goal: u32,
    pub health: u8,
}

impl DayRecord {
    pub fn from_sample(sample: &DailyStepSample, health: u8) -> Self {
        Self {
            day: sample.day,
            steps: sample.step_count,
            goal: sample.goal_at_time,
            health,
        }
    }

    pub fn goal_achieved(&self) -> bool {
        self.health >= MAX_HEALTH
    }
}

/// Finalized days, oldest first, bounded by a retention window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHistory {
    records: VecDeque<DayRecord>,
}

impl DayHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> impl Iterator<Item = &DayRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a finalized day, replacing an existing record for the same day,
    /// then drop records older than `retention_days` before it.
    pub fn archive(&mut self, record: DayRecord, retention_days: u32) {
        if let Some(existing) = self.records.iter_mut().find(|r| r.day == record.day) {
            *existing = record;
        } else {
            let pos = self.records.partition_point(|r| r.day < record.day);
            self.records.insert(pos, record);
        }

        // A window reaching before the calendar's start keeps everything.
        let Some(cutoff) = record
            .day
            .checked_sub_signed(Duration::days(i64::from(retention_days)))
        else {
            return;
        };
        while self.records.front().is_some_and(|r| r.day <= cutoff) {
            self.records.pop_front();
        }
    }

    pub fn range(&self, from: NaiveDate, to: NaiveDate) -> Vec<DayRecord> {
        self.records
            .iter()
            .filter(|r| r.day >= from && r.day <= to)
            .copied()
            .collect()
    }

    pub fn best_day(&self) -> Option<&DayRecord> {
        self.records.iter().max_by_key(|r| r.steps)
    }

    /// Week starting Monday that contains `day`.
    pub fn weekly_summary(&self, day: NaiveDate) -> PeriodSummary {
        let start = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
        let end = start + Duration::days(6);
        PeriodSummary::from_records(start, end, self.range(start, end))
    }

    /// Calendar month that contains `day`.
    pub fn monthly_summary(&self, day: NaiveDate) -> PeriodSummary {
        let start = day.with_day(1).unwrap_or(day);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month.and_then(|d| d.pred_opt()).unwrap_or(start);
        PeriodSummary::from_records(start, end, self.range(start, end))
    }
}

/// Aggregates over a run of finalized days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days_recorded: u32,
    pub total_steps: u64,
    pub average_steps: u64,
    pub goals_achieved: u32,
    pub average_health: u8,
    pub best_day: Option<DayRecord>,
    /// Longest run of consecutive goal days within the period.
    pub longest_goal_run: u32,
}

impl PeriodSummary {
    fn from_records(start: NaiveDate, end: NaiveDate, records: Vec<DayRecord>) -> Self {
        let days_recorded = records.len() as u32;
        let total_steps: u64 = records.iter().map(|r| u64::from(r.steps)).sum();
        let health_sum: u64 = records.iter().map(|r| u64::from(r.health)).sum();
        let (average_steps, average_health) = if days_recorded == 0 {
            (0, 0)
        } else {
            (
                total_steps / u64::from(days_recorded),
                (health_sum / u64::from(days_recorded)) as u8,
            )
        };

        let mut longest_goal_run = 0;
        let mut run = 0;
        let mut prev: Option<NaiveDate> = None;
        for record in &records {
            if record.goal_achieved() {
                let continues = prev.is_some_and(|p| is_next_day(p, record.day));
                run = if continues { run + 1 } else { 1 };
                longest_goal_run = longest_goal_run.max(run);
                prev = Some(record.day);
            } else {
                run = 0;
                prev = None;
            }
        }

        Self {
            start,
            end,
            days_recorded,
            total_steps,
            average_steps,
            goals_achieved: records.iter().filter(|r| r.goal_achieved()).count() as u32,
            average_health,
            best_day: records.iter().max_by_key(|r| r.steps).copied(),
            longest_goal_run,
        }
    }
}
