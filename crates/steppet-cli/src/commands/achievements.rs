use chrono::NaiveDate;
use serde_json::json;
use steppet_core::achievements::AchievementCategory;

use super::{print_json, CliResult, Session};

pub fn run(day: Option<NaiveDate>, category: Option<&str>, unlocked_only: bool) -> CliResult {
    let category: Option<AchievementCategory> = category.map(str::parse::<AchievementCategory>).transpose()?;
    let mut session = Session::open(day)?;
    let registry = session.coordinator.achievements();

    let list: Vec<_> = registry
        .records()
        .iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .filter(|r| !unlocked_only || r.unlocked)
        .map(|r| {
            let def = registry.definition(&r.id);
            json!({
                "id": r.id,
                "title": def.map(|d| d.title),
                "description": def.map(|d| d.description),
                "category": r.category,
                "rarity": r.rarity,
                "progress": r.progress,
                "target": r.target_progress,
                "ratio": r.progress_ratio(),
                "unlocked": r.unlocked,
                "unlocked_date": r.unlocked_date,
            })
        })
        .collect();
    let completion = registry.completion_ratio();
    let events = session.events();
    print_json(&json!({
        "achievements": list,
        "completion": completion,
        "events": events,
    }))
}
