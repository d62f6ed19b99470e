use chrono::NaiveDate;
use serde_json::json;
use steppet_core::progression::validate_step_count;
use steppet_core::StepUpdate;

use super::{print_json, CliResult, Session};

pub fn run(day: Option<NaiveDate>, count: i64) -> CliResult {
    let steps = validate_step_count(count)?;
    let mut session = Session::open(day)?;
    let today = session.today;

    let update = session.coordinator.record_steps(today, steps);
    let vitality = match update {
        StepUpdate::Applied(vitality) => vitality,
        StepUpdate::Stale => session.coordinator.vitality(),
    };
    let events = session.events();
    print_json(&json!({
        "day": today,
        "steps": session.coordinator.today().step_count,
        "health": vitality.health,
        "mood": vitality.mood,
        "events": events,
    }))
}
