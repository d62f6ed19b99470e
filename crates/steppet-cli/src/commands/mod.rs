pub mod achievements;
pub mod config;
pub mod credits;
pub mod goal;
pub mod history;
pub mod status;
pub mod steps;

use chrono::NaiveDate;
use steppet_core::{
    Clock, Config, Database, Event, FixedClock, LoadOutcome, ProgressionCoordinator,
    SystemClock,
};

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// An opened engine, already caught up to today.
pub struct Session {
    pub coordinator: ProgressionCoordinator,
    pub config: Config,
    pub today: NaiveDate,
}

impl Session {
    /// Open the database and run the rollover check for today.
    pub fn open(day: Option<NaiveDate>) -> steppet_core::Result<Self> {
        let clock: Box<dyn Clock> = match day {
            Some(day) => Box::new(FixedClock(day)),
            None => Box::new(SystemClock),
        };
        let today = clock.today();
        let config = Config::load_or_default();
        let db = Database::open()?;

        let (coordinator, outcome) =
            ProgressionCoordinator::open(Box::new(db), config.engine_settings(), today);
        if let LoadOutcome::Fresh { reason } = &outcome {
            tracing::info!(%reason, "starting a new profile");
        }

        Ok(Self {
            coordinator,
            config,
            today,
        })
    }

    /// Write a change the engine has accepted back to the config file.
    pub fn sync_config(&mut self, update: impl FnOnce(&mut Config)) -> steppet_core::Result<()> {
        let mut config = Config::load()?;
        update(&mut config);
        config.save()?;
        self.config = config;
        Ok(())
    }

    /// Drain pending events, dropping celebrations the user turned off.
    pub fn events(&mut self) -> Vec<Event> {
        let celebrations = &self.config.celebrations;
        self.coordinator
            .drain_events()
            .into_iter()
            .filter(|event| match event {
                Event::HealthReachedFull { .. } => celebrations.goal_celebrations,
                Event::StreakMilestone { .. } => celebrations.streak_milestones,
                _ => true,
            })
            .collect()
    }
}

pub fn print_json(value: &impl serde::Serialize) -> CliResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
