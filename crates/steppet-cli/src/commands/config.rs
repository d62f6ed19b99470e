use chrono::NaiveDate;
use clap::Subcommand;
use steppet_core::Config;

use super::Session;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g. "goal.daily_steps", "subscription.tier")
        key: String,
    },
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },
    /// List all config values
    List,
    /// Reset config to defaults
    Reset,
}

pub fn run(day: Option<NaiveDate>, action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => return Err(format!("unknown key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.apply(&key, &value)?;
            forward_to_engine(day, &config, &[key.as_str()])?;
            config.save()?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.entries() {
                println!("{key} = {value}");
            }
        }
        ConfigAction::Reset => {
            let config = Config::default();
            forward_to_engine(day, &config, &ENGINE_KEYS)?;
            config.save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}

/// Config keys the engine also tracks.
const ENGINE_KEYS: [&str; 2] = ["goal.daily_steps", "subscription.tier"];

/// Goal and tier changes are requests: they reach the engine as pending
/// changes and apply from the next day. The engine must accept them before
/// the config file is written.
fn forward_to_engine(
    day: Option<NaiveDate>,
    config: &Config,
    keys: &[&str],
) -> Result<(), Box<dyn std::error::Error>> {
    if !keys.iter().any(|key| ENGINE_KEYS.contains(key)) {
        return Ok(());
    }
    let mut session = Session::open(day)?;
    if keys.contains(&"goal.daily_steps") {
        session
            .coordinator
            .request_goal_change(config.goal.daily_steps)?;
    }
    if keys.contains(&"subscription.tier") {
        session
            .coordinator
            .set_subscription_tier(config.subscription.tier);
    }
    Ok(())
}
