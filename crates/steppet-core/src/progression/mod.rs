//! Orchestration of every progression component.

mod coordinator;
mod shared;
mod snapshot;

pub use coordinator::{
    validate_step_count, EngineSettings, LoadOutcome, ProgressionCoordinator, RolloverReport,
    StepUpdate,
};
pub use shared::SharedCoordinator;
pub use snapshot::{EngineSnapshot, SNAPSHOT_VERSION};
