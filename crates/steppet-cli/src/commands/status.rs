use chrono::NaiveDate;
use serde_json::json;

use super::{print_json, CliResult, Session};

pub fn run(day: Option<NaiveDate>) -> CliResult {
    let mut session = Session::open(day)?;
    let c = &session.coordinator;
    let vitality = c.vitality();
    let streak = c.streak();
    let credits = c.credits();
    let achievements = c.achievements();
    let next_badge = streak.badge().next().map(|badge| {
        json!({
            "badge": badge,
            "days_left": badge.required_days().saturating_sub(streak.current_streak()),
        })
    });

    let status = json!({
        "day": c.today().day,
        "steps": c.today().step_count,
        "goal": c.today().goal_at_time,
        "pending_goal": c.goal().pending(),
        "health": vitality.health,
        "mood": vitality.mood,
        "mood_description": vitality.mood.description(),
        "boost_today": vitality.boost_accumulated_today,
        "finalized_today": c.is_finalized_today(),
        "streak": {
            "current": streak.current_streak(),
            "longest": streak.longest_streak(),
            "badge": streak.badge(),
            "next_badge": next_badge,
        },
        "credits": {
            "tier": credits.tier,
            "pending_tier": credits.pending_tier,
            "free_remaining": credits.daily_free_remaining,
            "daily_free_cap": credits.daily_free_cap,
            "purchased": credits.purchased,
            "used_lifetime": credits.total_used_lifetime,
        },
        "achievements": {
            "unlocked": achievements.unlocked_count(),
            "total": achievements.records().len(),
        },
        "unsaved_changes": c.has_unsaved_changes(),
    });
    let events = session.events();
    print_json(&json!({ "status": status, "events": events }))
}

/// Rollover is already run when the session opens; report what it emitted.
pub fn rollover(day: Option<NaiveDate>) -> CliResult {
    let mut session = Session::open(day)?;
    let events = session.events();
    print_json(&json!({
        "day": session.coordinator.last_known_day(),
        "events": events,
    }))
}
