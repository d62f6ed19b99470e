use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Summary of the current week (Monday to Sunday)
    Week,
    /// Summary of the current month
    Month,
    /// Every archived day
    List,
}

pub fn run(day: Option<NaiveDate>, action: HistoryAction) -> CliResult {
    let mut session = Session::open(day)?;
    let today = session.today;
    let history = session.coordinator.history();

    let body = match action {
        HistoryAction::Week => serde_json::to_value(history.weekly_summary(today))?,
        HistoryAction::Month => serde_json::to_value(history.monthly_summary(today))?,
        HistoryAction::List => serde_json::to_value(history.records().collect::<Vec<_>>())?,
    };
    let events = session.events();
    print_json(&json!({ "history": body, "events": events }))
}
