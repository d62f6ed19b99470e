//! The progression coordinator.
//!
//! Owns every progression component and is the only place that reacts to
//! the three triggers: a step update, a credit spend and a day rollover.
//! Each trigger runs to completion, then the resulting state is saved as one
//! snapshot.

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::{EngineSnapshot, SNAPSHOT_VERSION};
use crate::achievements::{AchievementRegistry, CounterSnapshot, ProgressCounters, Unlock};
use crate::clock::days_between;
use crate::credits::{
    ActivityClass, CreditBalance, CreditLedger, CreditPackage, SpendReceipt, SubscriptionTier,
};
use crate::error::{CreditError, StoreError, ValidationError};
use crate::events::Event;
use crate::goal::{StepGoal, DEFAULT_STEP_GOAL};
use crate::history::{DailyStepSample, DayHistory, DayRecord, DEFAULT_RETENTION_DAYS};
use crate::storage::SnapshotStore;
use crate::streak::{DayOutcome, Finalization, StreakTracker};
use crate::vitality::VitalityState;

/// Seed values for a profile with no saved snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    pub initial_goal: u32,
    pub initial_tier: SubscriptionTier,
    pub retention_days: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            initial_goal: DEFAULT_STEP_GOAL,
            initial_tier: SubscriptionTier::Base,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }
}

/// How `open` obtained its starting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadOutcome {
    Restored { last_known_day: NaiveDate },
    /// Started from defaults; `reason` says why nothing was restored.
    Fresh { reason: String },
}

/// Outcome of a step reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepUpdate {
    Applied(VitalityState),
    /// The reading was for a day that is already closed.
    Stale,
}

/// What a rollover did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RolloverReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Finalization of the closing day, when it was still open.
    pub finalized: Option<Finalization>,
    pub skipped_days: u32,
    pub goal_promoted: Option<u32>,
    pub credits_granted: bool,
    pub daily_achievements_reset: usize,
}

/// Reject a raw step reading that cannot be a count.
pub fn validate_step_count(raw: i64) -> Result<u32, ValidationError> {
    if raw < 0 {
        return Err(ValidationError::NegativeSteps(raw));
    }
    Ok(u32::try_from(raw).unwrap_or(u32::MAX))
}

pub struct ProgressionCoordinator {
    store: Box<dyn SnapshotStore>,
    settings: EngineSettings,
    last_known_day: NaiveDate,
    today: DailyStepSample,
    goal: StepGoal,
    boost_today: u32,
    finalized_today: bool,
    ledger: CreditLedger,
    streak: StreakTracker,
    achievements: AchievementRegistry,
    counters: ProgressCounters,
    history: DayHistory,
    events: Vec<Event>,
    /// Set when the last save failed; the next trigger retries.
    dirty: bool,
}

impl std::fmt::Debug for ProgressionCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressionCoordinator")
            .field("last_known_day", &self.last_known_day)
            .field("today", &self.today)
            .field("goal", &self.goal)
            .field("boost_today", &self.boost_today)
            .field("finalized_today", &self.finalized_today)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl ProgressionCoordinator {
    /// Load the saved snapshot, or start fresh, then catch up to `today`.
    ///
    /// A missing, unreadable or too-new snapshot never fails the open; the
    /// engine starts from defaults and reports why.
    pub fn open(
        store: Box<dyn SnapshotStore>,
        settings: EngineSettings,
        today: NaiveDate,
    ) -> (Self, LoadOutcome) {
        let (snapshot, outcome) = match store.load() {
            Ok(Some(snapshot)) if snapshot.version <= SNAPSHOT_VERSION => {
                let outcome = LoadOutcome::Restored {
                    last_known_day: snapshot.last_known_day,
                };
                (snapshot, outcome)
            }
            Ok(Some(snapshot)) => {
                let reason = StoreError::UnsupportedVersion {
                    found: snapshot.version,
                    supported: SNAPSHOT_VERSION,
                }
                .to_string();
                tracing::warn!(%reason, "starting with fresh progression state");
                (Self::fresh_snapshot(&settings, today), LoadOutcome::Fresh { reason })
            }
            Ok(None) => (
                Self::fresh_snapshot(&settings, today),
                LoadOutcome::Fresh {
                    reason: "no saved progression".into(),
                },
            ),
            Err(e) => {
                tracing::warn!(error = %e, "starting with fresh progression state");
                (
                    Self::fresh_snapshot(&settings, today),
                    LoadOutcome::Fresh {
                        reason: e.to_string(),
                    },
                )
            }
        };

        let mut coordinator = Self::from_snapshot(store, settings, snapshot);
        if matches!(outcome, LoadOutcome::Fresh { .. }) {
            coordinator.dirty = true;
        }
        if coordinator.check_rollover(today).is_none() && coordinator.dirty {
            coordinator.commit();
        }
        (coordinator, outcome)
    }

    fn fresh_snapshot(settings: &EngineSettings, today: NaiveDate) -> EngineSnapshot {
        EngineSnapshot::fresh(today, settings.initial_goal, settings.initial_tier)
    }

    fn from_snapshot(
        store: Box<dyn SnapshotStore>,
        settings: EngineSettings,
        snapshot: EngineSnapshot,
    ) -> Self {
        Self {
            store,
            settings,
            last_known_day: snapshot.last_known_day,
            today: snapshot.today,
            goal: snapshot.goal,
            boost_today: snapshot.boost_accumulated_today,
            finalized_today: snapshot.finalized_today,
            ledger: CreditLedger::from_balance(snapshot.credits),
            streak: StreakTracker::from_state(snapshot.streak),
            achievements: AchievementRegistry::restore(snapshot.achievements),
            counters: snapshot.counters,
            history: snapshot.history,
            events: Vec::new(),
            dirty: false,
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn vitality(&self) -> VitalityState {
        VitalityState::compute(
            self.today.step_count,
            self.today.goal_at_time,
            self.boost_today,
        )
    }

    pub fn last_known_day(&self) -> NaiveDate {
        self.last_known_day
    }

    pub fn today(&self) -> &DailyStepSample {
        &self.today
    }

    pub fn goal(&self) -> &StepGoal {
        &self.goal
    }

    pub fn is_finalized_today(&self) -> bool {
        self.finalized_today
    }

    pub fn credits(&self) -> &CreditBalance {
        self.ledger.balance()
    }

    pub fn available_credits(&self) -> u32 {
        self.ledger.available_balance()
    }

    pub fn streak(&self) -> &StreakTracker {
        &self.streak
    }

    pub fn achievements(&self) -> &AchievementRegistry {
        &self.achievements
    }

    pub fn counters(&self) -> &ProgressCounters {
        &self.counters
    }

    pub fn history(&self) -> &DayHistory {
        &self.history
    }

    /// True when the last save failed and has not been retried yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Everything an achievement can be judged on, as of now.
    pub fn counter_snapshot(&self) -> CounterSnapshot {
        let vitality = self.vitality();
        let counters = &self.counters;
        CounterSnapshot {
            day: self.today.day,
            today_steps: self.today.step_count,
            goal: self.today.goal_at_time,
            health: vitality.health,
            lifetime_steps: counters.lifetime_steps + u64::from(self.today.step_count),
            current_streak: self.streak.current_streak(),
            longest_streak: self.streak.longest_streak(),
            goals_achieved: counters.goals_achieved,
            days_active: counters.days_active,
            minigame_plays: counters.total_minigame_plays(),
            distinct_minigames: counters.minigame_plays.values().filter(|n| **n > 0).count()
                as u32,
            activity_plays: counters.total_activity_plays(),
            credits_used: self.ledger.balance().total_used_lifetime,
            all_activities_days: counters.all_activities_run,
            never_sick_days: counters.never_sick_run,
            above_forty_days: counters.above_forty_run,
            above_sixty_days: counters.above_sixty_run,
            daily_walker_days: counters.daily_walker_run,
            goal_crusher_days: counters.goal_crusher_run,
            steady_pace_days: counters.steady_pace_run,
            weekend_goal_days: counters.weekend_goal_run,
            monday_goal_days: counters.monday_goal_run,
            sick_recoveries: counters.sick_recoveries,
            low_health_recoveries: counters.low_health_recoveries,
            week_steps: self.history.weekly_summary(self.today.day).total_steps
                + u64::from(self.today.step_count),
            completed_month_health: self.completed_month_health(),
            premium: self.ledger.balance().tier == SubscriptionTier::Premium,
        }
    }

    /// Average health of the month that ended yesterday, if every one of its
    /// days is archived.
    fn completed_month_health(&self) -> Option<u8> {
        let yesterday = self.today.day.pred_opt()?;
        if yesterday.month() == self.today.day.month() {
            return None;
        }
        let summary = self.history.monthly_summary(yesterday);
        let month_len = (summary.end - summary.start).num_days() + 1;
        (i64::from(summary.days_recorded) == month_len).then_some(summary.average_health)
    }

    /// Build the snapshot that would be saved right now.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            last_known_day: self.last_known_day,
            today: self.today,
            goal: self.goal,
            boost_accumulated_today: self.boost_today,
            finalized_today: self.finalized_today,
            credits: self.ledger.balance().clone(),
            streak: self.streak.state().clone(),
            achievements: self.achievements.records().to_vec(),
            counters: self.counters.clone(),
            history: self.history.clone(),
        }
    }

    /// Take every event produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    // ── Triggers ────────────────────────────────────────────────────────

    /// Apply a step reading for `day`.
    ///
    /// A reading for a later day rolls over first. A reading for a day that
    /// is already closed is ignored.
    pub fn record_steps(&mut self, day: NaiveDate, steps: u32) -> StepUpdate {
        if day > self.last_known_day {
            self.check_rollover(day);
        }
        if day < self.today.day {
            tracing::warn!(day = %day, today = %self.today.day, "ignoring steps for a closed day");
            return StepUpdate::Stale;
        }

        self.today.step_count = steps;
        let vitality = self.after_health_change();
        tracing::debug!(steps, health = vitality.health, "steps recorded");
        self.commit();
        StepUpdate::Applied(vitality)
    }

    /// Spend credits on an activity and apply its health boost.
    ///
    /// A rejected spend changes nothing.
    pub fn spend_credit(&mut self, activity: ActivityClass) -> Result<SpendReceipt, CreditError> {
        let receipt = self.ledger.spend(activity).map_err(|e| {
            tracing::warn!(%activity, error = %e, "credit spend rejected");
            e
        })?;

        self.boost_today = self.boost_today.saturating_add(receipt.boost_granted);
        self.counters.record_play(activity);
        let vitality = self.after_health_change();
        self.events.push(Event::CreditSpent {
            activity,
            cost: receipt.cost,
            boost: receipt.boost_granted,
            health: vitality.health,
            remaining: self.ledger.available_balance(),
        });
        tracing::info!(%activity, cost = receipt.cost, health = vitality.health, "credit spent");
        self.commit();
        Ok(receipt)
    }

    /// Close every day before `now_day` and open `now_day`.
    ///
    /// Returns `None` when `now_day` is not after the last known day, so a
    /// repeated call is a no-op.
    pub fn check_rollover(&mut self, now_day: NaiveDate) -> Option<RolloverReport> {
        if now_day <= self.last_known_day {
            if now_day < self.last_known_day {
                tracing::warn!(
                    now = %now_day,
                    last_known = %self.last_known_day,
                    "clock is behind the last known day; not rolling over"
                );
            }
            return None;
        }

        let from = self.last_known_day;
        let closing = self.vitality();

        let finalized = if self.finalized_today {
            None
        } else {
            self.finalize_day(self.today.day, closing.health)
        };
        let closed = DayRecord::from_sample(&self.today, closing.health);
        self.history.archive(closed, self.settings.retention_days);
        self.counters.close_day(&closed);

        let skipped_days = u32::try_from(days_between(from, now_day) - 1).unwrap_or(0);
        if skipped_days > 0 {
            // The skipped days had no readings; finalizing the latest one
            // as missed breaks the streak and every counter run.
            if let (Some(first), Some(last)) = (from.succ_opt(), now_day.pred_opt()) {
                self.finalize_day(last, 0);
                self.counters.break_runs(first, last);
            }
        }

        let goal_promoted = self.goal.promote_pending();
        if let Some(goal) = goal_promoted {
            self.events.push(Event::GoalPromoted { goal, day: now_day });
        }

        self.boost_today = 0;
        self.finalized_today = false;

        let tier_before = self.ledger.balance().tier;
        let credits_granted = self.ledger.grant_daily_allotment(now_day);
        let tier_after = self.ledger.balance().tier;
        if tier_after != tier_before {
            self.events.push(Event::TierPromoted {
                tier: tier_after,
                day: now_day,
            });
        }

        let daily_achievements_reset = self.achievements.reset_daily_scoped();

        self.last_known_day = now_day;
        self.today = DailyStepSample::new(now_day, self.goal.active());
        self.evaluate_achievements();

        self.events.push(Event::RolloverCompleted { from, to: now_day });
        tracing::info!(from = %from, to = %now_day, skipped_days, "day rollover");
        self.commit();

        Some(RolloverReport {
            from,
            to: now_day,
            finalized,
            skipped_days,
            goal_promoted,
            credits_granted,
            daily_achievements_reset,
        })
    }

    // ── Other inputs ────────────────────────────────────────────────────

    /// Credit a confirmed purchase of `n` durable credits.
    pub fn add_purchased_credits(&mut self, n: u32) -> Result<u32, ValidationError> {
        let balance = self.ledger.add_purchased(n)?;
        self.events.push(Event::CreditsPurchased {
            credits: n,
            purchased_balance: balance,
        });
        tracing::info!(credits = n, purchased = balance, "credits purchased");
        self.commit();
        Ok(balance)
    }

    /// Credit a confirmed purchase of a store package.
    pub fn purchase_package(&mut self, product_id: &str) -> Result<u32, ValidationError> {
        let package = CreditPackage::by_product_id(product_id)?;
        self.add_purchased_credits(package.credits)
    }

    /// Record a tier change; it applies from the next daily grant.
    pub fn set_subscription_tier(&mut self, tier: SubscriptionTier) {
        self.ledger.request_tier(tier);
        self.commit();
    }

    /// Park a new step goal until the next rollover.
    pub fn request_goal_change(&mut self, goal: u32) -> Result<(), ValidationError> {
        self.goal.request_change(goal)?;
        tracing::debug!(goal, "goal change pending");
        self.commit();
        Ok(())
    }

    /// Report progress on a host-driven achievement.
    pub fn update_achievement_progress(
        &mut self,
        id: &str,
        progress: u64,
    ) -> Result<Option<Unlock>, ValidationError> {
        let unlock = self
            .achievements
            .update_progress(id, progress, self.today.day)?;
        if let Some(unlock) = &unlock {
            self.push_unlock(unlock.clone());
        }
        self.commit();
        Ok(unlock)
    }

    /// Retry a failed save now.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        let snapshot = self.snapshot();
        self.store.save(&snapshot)?;
        self.dirty = false;
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    /// React to a health change: finalize today the first time health
    /// reaches 100, then re-check achievements.
    fn after_health_change(&mut self) -> VitalityState {
        let vitality = self.vitality();
        if vitality.is_full() && !self.finalized_today {
            self.finalized_today = true;
            self.events.push(Event::HealthReachedFull {
                day: self.today.day,
            });
            self.finalize_day(self.today.day, vitality.health);
        }
        self.evaluate_achievements();
        vitality
    }

    fn finalize_day(&mut self, day: NaiveDate, end_health: u8) -> Option<Finalization> {
        let finalization = self.streak.finalize(day, end_health)?;
        if finalization.outcome == DayOutcome::Qualified {
            self.counters.record_goal_day();
        }
        self.events.push(Event::DayFinalized {
            day,
            outcome: finalization.outcome,
            current_streak: finalization.current_streak,
            longest_streak: finalization.longest_streak,
        });
        if let Some(streak) = finalization.milestone {
            tracing::info!(streak, "streak milestone");
            self.events.push(Event::StreakMilestone { streak, day });
        }
        Some(finalization)
    }

    fn evaluate_achievements(&mut self) {
        let snapshot = self.counter_snapshot();
        for unlock in self.achievements.check_composite(&snapshot) {
            self.push_unlock(unlock);
        }
    }

    fn push_unlock(&mut self, unlock: Unlock) {
        self.events.push(Event::AchievementUnlocked {
            id: unlock.id,
            title: unlock.title,
            rarity: unlock.rarity,
            day: unlock.day,
        });
    }

    /// Save the current state. A failure keeps the in-memory state and
    /// leaves the coordinator dirty so the next trigger retries.
    fn commit(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to save progression snapshot");
            self.dirty = true;
        }
    }
}
