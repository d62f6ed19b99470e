use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use steppet_core::{ActivityClass, SubscriptionTier};

use super::{print_json, CliResult, Session};

#[derive(Subcommand)]
pub enum TierAction {
    /// Change the subscription tier from the next day on
    Set {
        /// "base" or "premium"
        tier: String,
    },
    /// Show the current and pending tier
    Show,
}

pub fn spend(day: Option<NaiveDate>, activity: &str) -> CliResult {
    let activity: ActivityClass = activity.parse()?;
    let mut session = Session::open(day)?;

    let receipt = session.coordinator.spend_credit(activity)?;
    let vitality = session.coordinator.vitality();
    let events = session.events();
    print_json(&json!({
        "activity": activity,
        "cost": receipt.cost,
        "boost": receipt.boost_granted,
        "health": vitality.health,
        "credits_remaining": session.coordinator.available_credits(),
        "events": events,
    }))
}

pub fn purchase(day: Option<NaiveDate>, product_id: &str) -> CliResult {
    let mut session = Session::open(day)?;
    let purchased = session.coordinator.purchase_package(product_id)?;
    let events = session.events();
    print_json(&json!({
        "purchased_balance": purchased,
        "credits_available": session.coordinator.available_credits(),
        "events": events,
    }))
}

pub fn tier(day: Option<NaiveDate>, action: TierAction) -> CliResult {
    let mut session = Session::open(day)?;
    if let TierAction::Set { tier } = action {
        let tier: SubscriptionTier = tier.parse()?;
        session.coordinator.set_subscription_tier(tier);
        session.sync_config(|config| config.subscription.tier = tier)?;
    }
    let events = session.events();
    let credits = session.coordinator.credits();
    print_json(&json!({
        "tier": credits.tier,
        "pending_tier": credits.pending_tier,
        "daily_free_cap": credits.daily_free_cap,
        "events": events,
    }))
}
