pub mod config;
pub mod errors;
pub mod events;
pub mod input;
pub mod simulation;
pub mod tick;

#[allow(clippy::module_inception)]
mod engine;
mod handle;
mod worker;

pub use config::EngineConfig;
pub use engine::RoadEngine;
pub use errors::EngineError;
pub use events::{EngineCommand, EngineEvent, EngineSnapshot};
pub use handle::EngineHandle;
pub use worker::EngineWorker;

/// Capacity of the command queue and the event broadcast of a started engine.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
