//! # StepPet Core Library
//!
//! This library provides the progression engine behind StepPet, a virtual pet
//! whose health follows the owner's daily step count. All state changes flow
//! through one coordinator that a CLI or any other host drives.
//!
//! ## Architecture
//!
//! - **Vitality**: Health and mood derived from steps, goal and today's boost
//! - **Credits**: Two-pool ledger (daily free and purchased) spent on activities
//! - **Streaks**: Consecutive-day tracking with one-shot milestone signals
//! - **Achievements**: Static catalogue evaluated against progress counters
//! - **Storage**: SQLite snapshot store and TOML configuration
//!
//! ## Key Components
//!
//! - [`ProgressionCoordinator`]: Reacts to step updates, spends and rollovers
//! - [`Database`]: Snapshot persistence
//! - [`Config`]: Application configuration management
//! - [`Clock`]: Source of the current calendar day

pub mod achievements;
pub mod clock;
pub mod credits;
pub mod error;
pub mod events;
pub mod goal;
pub mod history;
pub mod progression;
pub mod storage;
pub mod streak;
pub mod vitality;

pub use achievements::{AchievementRegistry, AchievementRecord, Unlock};
pub use clock::{Clock, FixedClock, SystemClock};
pub use credits::{ActivityClass, CreditLedger, SubscriptionTier};
pub use error::{ConfigError, CoreError, CreditError, Result, StoreError, ValidationError};
pub use events::Event;
pub use goal::StepGoal;
pub use progression::{
    EngineSettings, EngineSnapshot, LoadOutcome, ProgressionCoordinator, SharedCoordinator,
    StepUpdate,
};
pub use storage::{Config, Database, MemoryStore, SnapshotStore};
pub use streak::{StreakBadge, StreakTracker};
pub use vitality::{Mood, VitalityState};
