//! Achievement records and unlock evaluation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalogue::{
    AchievementCategory, AchievementDef, AchievementRarity, ProgressMode, CATALOGUE,
};
use super::counters::CounterSnapshot;
use crate::error::ValidationError;

/// Persisted progress for one achievement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementRecord {
    pub id: String,
    pub category: AchievementCategory,
    pub rarity: AchievementRarity,
    pub target_progress: u32,
    pub progress: u32,
    pub unlocked: bool,
    pub unlocked_date: Option<NaiveDate>,
    pub daily_scoped: bool,
}

impl AchievementRecord {
    fn from_def(def: &AchievementDef) -> Self {
        Self {
            id: def.id.to_string(),
            category: def.category,
            rarity: def.rarity,
            target_progress: def.target,
            progress: 0,
            unlocked: false,
            unlocked_date: None,
            daily_scoped: def.daily_scoped,
        }
    }

    pub fn progress_ratio(&self) -> f64 {
        f64::from(self.progress) / f64::from(self.target_progress.max(1))
    }
}

/// An unlock produced by an update or evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unlock {
    pub id: String,
    pub title: String,
    pub rarity: AchievementRarity,
    pub day: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct AchievementRegistry {
    defs: &'static [AchievementDef],
    /// Parallel to `defs`.
    records: Vec<AchievementRecord>,
}

impl AchievementRegistry {
    pub fn new() -> Self {
        Self::with_catalogue(CATALOGUE)
    }

    pub fn with_catalogue(defs: &'static [AchievementDef]) -> Self {
        Self {
            defs,
            records: defs.iter().map(AchievementRecord::from_def).collect(),
        }
    }

    /// Rebuild from saved records.
    ///
    /// Saved progress is matched to the catalogue by id. Catalogue entries
    /// with no saved record start locked; saved ids no longer in the
    /// catalogue are dropped. Definition fields come from the catalogue.
    pub fn restore(saved: Vec<AchievementRecord>) -> Self {
        Self::restore_with_catalogue(CATALOGUE, saved)
    }

    pub fn restore_with_catalogue(
        defs: &'static [AchievementDef],
        saved: Vec<AchievementRecord>,
    ) -> Self {
        let mut registry = Self::with_catalogue(defs);
        for saved in saved {
            let Some(record) = registry.records.iter_mut().find(|r| r.id == saved.id) else {
                tracing::debug!(id = %saved.id, "dropping achievement no longer in catalogue");
                continue;
            };
            record.unlocked = saved.unlocked || saved.progress >= record.target_progress;
            record.unlocked_date = if record.unlocked { saved.unlocked_date } else { None };
            record.progress = if record.unlocked {
                record.target_progress
            } else {
                saved.progress
            };
        }
        registry
    }

    pub fn records(&self) -> &[AchievementRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&AchievementRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn definition(&self, id: &str) -> Option<&'static AchievementDef> {
        self.defs.iter().find(|d| d.id == id)
    }

    /// Apply a progress value to one achievement.
    ///
    /// Monotonic records keep the larger of current and new progress;
    /// recomputed records take `new_progress` as given. Progress is capped at
    /// the target. Unlocked records are never changed again.
    pub fn update_progress(
        &mut self,
        id: &str,
        new_progress: u64,
        day: NaiveDate,
    ) -> Result<Option<Unlock>, ValidationError> {
        let index = self
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ValidationError::UnknownAchievement(id.to_string()))?;
        Ok(self.apply(index, new_progress, day))
    }

    fn apply(&mut self, index: usize, new_progress: u64, day: NaiveDate) -> Option<Unlock> {
        let defs = self.defs;
        let def = &defs[index];
        let record = &mut self.records[index];
        if record.unlocked {
            return None;
        }

        let capped = new_progress.min(u64::from(record.target_progress)) as u32;
        record.progress = match def.mode {
            ProgressMode::Monotonic => record.progress.max(capped),
            ProgressMode::Recomputed => capped,
        };

        if record.progress < record.target_progress {
            return None;
        }
        record.unlocked = true;
        record.unlocked_date = Some(day);
        tracing::info!(id = def.id, rarity = ?def.rarity, "achievement unlocked");
        Some(Unlock {
            id: def.id.to_string(),
            title: def.title.to_string(),
            rarity: def.rarity,
            day,
        })
    }

    /// Evaluate every snapshot-driven achievement, in catalogue order.
    pub fn check_composite(&mut self, snapshot: &CounterSnapshot) -> Vec<Unlock> {
        let mut unlocks = Vec::new();
        for index in 0..self.defs.len() {
            let Some(progress) = self.defs[index].progress_from(snapshot) else {
                continue;
            };
            if let Some(unlock) = self.apply(index, progress, snapshot.day) {
                unlocks.push(unlock);
            }
        }
        unlocks
    }

    /// Zero the progress of locked daily-scoped records. Returns how many
    /// records were reset.
    pub fn reset_daily_scoped(&mut self) -> usize {
        let mut reset = 0;
        for record in self.records.iter_mut() {
            if record.daily_scoped && !record.unlocked && record.progress > 0 {
                record.progress = 0;
                reset += 1;
            }
        }
        reset
    }

    pub fn by_category(&self, category: AchievementCategory) -> Vec<&AchievementRecord> {
        self.records.iter().filter(|r| r.category == category).collect()
    }

    pub fn unlocked(&self) -> Vec<&AchievementRecord> {
        self.records.iter().filter(|r| r.unlocked).collect()
    }

    pub fn unlocked_count(&self) -> usize {
        self.records.iter().filter(|r| r.unlocked).count()
    }

    pub fn completion_ratio(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.unlocked_count() as f64 / self.records.len() as f64
    }
}

impl Default for AchievementRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::catalogue::{Counter, Predicate, ProgressSource};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    static TEST_DEFS: &[AchievementDef] = &[
        AchievementDef {
            id: "fifty",
            title: "Fifty",
            description: "Reach fifty",
            category: AchievementCategory::Milestones,
            rarity: AchievementRarity::Common,
            target: 50,
            source: ProgressSource::Manual,
            mode: ProgressMode::Monotonic,
            daily_scoped: false,
        },
        AchievementDef {
            id: "daily_thousand",
            title: "Daily Thousand",
            description: "1,000 steps today",
            category: AchievementCategory::Steps,
            rarity: AchievementRarity::Common,
            target: 1_000,
            source: ProgressSource::Counter(Counter::TodaySteps),
            mode: ProgressMode::Recomputed,
            daily_scoped: true,
        },
        AchievementDef {
            id: "goal",
            title: "Goal",
            description: "Meet the goal",
            category: AchievementCategory::Health,
            rarity: AchievementRarity::Rare,
            target: 1,
            source: ProgressSource::Predicate(Predicate::GoalMet),
            mode: ProgressMode::Monotonic,
            daily_scoped: false,
        },
    ];

    fn snapshot(today_steps: u32, goal: u32) -> CounterSnapshot {
        CounterSnapshot {
            day: day(10),
            today_steps,
            goal,
            health: 0,
            lifetime_steps: u64::from(today_steps),
            ..CounterSnapshot::default()
        }
    }

    #[test]
    fn unlocks_exactly_once_when_target_reached() {
        let mut registry = AchievementRegistry::with_catalogue(TEST_DEFS);
        assert_eq!(registry.update_progress("fifty", 10, day(1)).unwrap(), None);
        assert_eq!(registry.update_progress("fifty", 30, day(1)).unwrap(), None);
        let unlock = registry.update_progress("fifty", 60, day(2)).unwrap().unwrap();
        assert_eq!(unlock.id, "fifty");
        assert_eq!(unlock.day, day(2));

        let record = registry.get("fifty").unwrap();
        assert!(record.unlocked);
        assert_eq!(record.progress, 50);
        assert_eq!(record.unlocked_date, Some(day(2)));

        assert_eq!(registry.update_progress("fifty", 80, day(3)).unwrap(), None);
        registry.reset_daily_scoped();
        assert!(registry.get("fifty").unwrap().unlocked);
    }

    #[test]
    fn monotonic_progress_never_decreases() {
        let mut registry = AchievementRegistry::with_catalogue(TEST_DEFS);
        registry.update_progress("fifty", 30, day(1)).unwrap();
        registry.update_progress("fifty", 10, day(1)).unwrap();
        assert_eq!(registry.get("fifty").unwrap().progress, 30);
    }

    #[test]
    fn recomputed_progress_follows_caller() {
        let mut registry = AchievementRegistry::with_catalogue(TEST_DEFS);
        registry.update_progress("daily_thousand", 700, day(1)).unwrap();
        registry.update_progress("daily_thousand", 400, day(1)).unwrap();
        assert_eq!(registry.get("daily_thousand").unwrap().progress, 400);
    }

    #[test]
    fn unknown_id_is_rejected() {
        let mut registry = AchievementRegistry::with_catalogue(TEST_DEFS);
        assert_eq!(
            registry.update_progress("nope", 1, day(1)),
            Err(ValidationError::UnknownAchievement("nope".into()))
        );
    }

    #[test]
    fn daily_reset_only_touches_locked_daily_records() {
        let mut registry = AchievementRegistry::with_catalogue(TEST_DEFS);
        registry.update_progress("daily_thousand", 700, day(1)).unwrap();
        registry.update_progress("fifty", 20, day(1)).unwrap();
        assert_eq!(registry.reset_daily_scoped(), 1);
        assert_eq!(registry.get("daily_thousand").unwrap().progress, 0);
        assert_eq!(registry.get("fifty").unwrap().progress, 20);

        registry.update_progress("daily_thousand", 1_200, day(2)).unwrap();
        assert_eq!(registry.reset_daily_scoped(), 0);
        let record = registry.get("daily_thousand").unwrap();
        assert!(record.unlocked);
        assert_eq!(record.progress, 1_000);
    }

    #[test]
    fn composite_unlocks_in_catalogue_order() {
        let mut registry = AchievementRegistry::with_catalogue(TEST_DEFS);
        let unlocks = registry.check_composite(&snapshot(5_000, 5_000));
        let ids: Vec<_> = unlocks.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["daily_thousand", "goal"]);
        assert!(registry.check_composite(&snapshot(6_000, 5_000)).is_empty());
        // Manual records are not driven by snapshots.
        assert_eq!(registry.get("fifty").unwrap().progress, 0);
    }

    #[test]
    fn restore_merges_by_id_and_relatches() {
        let saved = vec![
            AchievementRecord {
                id: "fifty".into(),
                category: AchievementCategory::Milestones,
                rarity: AchievementRarity::Common,
                target_progress: 50,
                progress: 50,
                unlocked: false,
                unlocked_date: None,
                daily_scoped: false,
            },
            AchievementRecord {
                id: "retired".into(),
                category: AchievementCategory::Special,
                rarity: AchievementRarity::Epic,
                target_progress: 1,
                progress: 1,
                unlocked: true,
                unlocked_date: Some(day(1)),
                daily_scoped: false,
            },
        ];
        let registry = AchievementRegistry::restore_with_catalogue(TEST_DEFS, saved);
        assert_eq!(registry.records().len(), 3);
        assert!(registry.get("fifty").unwrap().unlocked);
        assert!(registry.get("retired").is_none());
        assert!(!registry.get("goal").unwrap().unlocked);
    }

    #[test]
    fn full_catalogue_queries() {
        let registry = AchievementRegistry::new();
        assert_eq!(registry.unlocked_count(), 0);
        assert_eq!(registry.completion_ratio(), 0.0);
        assert!(!registry.by_category(AchievementCategory::Streak).is_empty());
        assert!(registry.definition("ten_thousand").is_some());
    }
}
