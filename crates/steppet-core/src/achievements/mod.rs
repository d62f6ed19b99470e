//! Achievement catalogue, counters and the registry that tracks unlocks.

mod catalogue;
mod counters;
mod registry;

pub use catalogue::{
    AchievementCategory, AchievementDef, AchievementRarity, Counter, Predicate, ProgressMode,
    ProgressSource, CATALOGUE,
};
pub use counters::{CounterSnapshot, ProgressCounters};
pub use registry::{AchievementRecord, AchievementRegistry, Unlock};
