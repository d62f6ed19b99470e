use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Request a new daily step goal; it applies from the next day
    Set {
        /// Steps per day
        steps: u32,
    },
    /// Show the active and pending goal
    Show,
}

pub fn run(day: Option<NaiveDate>, action: GoalAction) -> CliResult {
    let mut session = Session::open(day)?;
    if let GoalAction::Set { steps } = action {
        session.coordinator.request_goal_change(steps)?;
        session.sync_config(|config| config.goal.daily_steps = steps)?;
    }
    let goal = *session.coordinator.goal();
    let events = session.events();
    print_json(&json!({
        "active": goal.active(),
        "pending": goal.pending(),
        "events": events,
    }))
}
