//! Engine commands and events.
//!
//! [`EngineCommand`]s travel from the host to the engine loop through an
//! [`EngineHandle`](crate::engine::EngineHandle); [`EngineEvent`]s are broadcast back to every
//! subscriber.

use crate::engine::input::KeyStatus;
use crate::engine::simulation::SimulationState;
use tokio::sync::oneshot;

/// State handed back to the host when the engine shuts down.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSnapshot {
    pub simulation: SimulationState,
    pub keys: KeyStatus,
    pub frames_rendered: u64,
}

/// Commands the host sends to the engine loop
#[derive(Debug)]
pub enum EngineCommand {
    // ****************************************
    // ** User input
    /// Key has been pressed. `repeat` is set for auto-repeated presses.
    KeyDown { key: String, repeat: bool },
    /// Key has been released
    KeyUp { key: String },

    // ****************************************
    // ** Simulation
    /// Change the forward speed (world units per second)
    SetSpeed { speed: f64 },

    // ****************************************
    // ** Engine control
    /// Stop the loop and reply with the final state
    Shutdown { reply: oneshot::Sender<EngineSnapshot> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    // ****************************************
    // ** Engine lifecycle
    /// Engine loop has started
    EngineStarted,
    /// Warning from the engine
    Warning { message: String },
    /// Engine loop has stopped
    EngineShutdown { reason: String },

    // ****************************************
    // ** Rendering
    /// A frame has been drawn onto the surface
    FrameRendered { frame_id: u64, items: usize },

    // ****************************************
    // ** Simulation
    /// Pressed-state of the direction keys changed
    KeyStatusChanged { status: KeyStatus },
    /// Player wrapped around the end of the road
    RoadWrapped { lap: i64 },
    /// Player stopped at the end of the road
    RoadEndReached,
}
