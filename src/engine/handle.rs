use crate::engine::errors::EngineError;
use crate::engine::events::{EngineCommand, EngineEvent, EngineSnapshot};
use tokio::sync::{broadcast, mpsc, oneshot};

/// Host-side endpoint of a running engine. Cloning is cheap; the engine stops once every clone
/// has been dropped or [`EngineHandle::shutdown`] is called.
#[derive(Clone)]
pub struct EngineHandle {
    /// Command sender into the engine loop
    cmd_tx: mpsc::Sender<EngineCommand>,
    /// Kept so new subscribers can be created at any time
    event_tx: broadcast::Sender<EngineEvent>,
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("cmd_tx", &self.cmd_tx)
            .field("subscribers", &self.event_tx.receiver_count())
            .finish()
    }
}

impl EngineHandle {
    pub fn new(cmd_tx: mpsc::Sender<EngineCommand>, event_tx: broadcast::Sender<EngineEvent>) -> Self {
        Self { cmd_tx, event_tx }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    async fn send(&self, cmd: EngineCommand) -> Result<(), EngineError> {
        self.cmd_tx.send(cmd).await.map_err(|_| EngineError::ChannelClosed)
    }

    /// Forward a key press. `repeat` marks auto-repeated presses, which the engine ignores.
    pub async fn key_down(&self, key: impl Into<String>, repeat: bool) -> Result<(), EngineError> {
        self.send(EngineCommand::KeyDown { key: key.into(), repeat }).await
    }

    pub async fn key_up(&self, key: impl Into<String>) -> Result<(), EngineError> {
        self.send(EngineCommand::KeyUp { key: key.into() }).await
    }

    pub async fn set_speed(&self, speed: f64) -> Result<(), EngineError> {
        self.send(EngineCommand::SetSpeed { speed }).await
    }

    /// Stops the engine loop and returns its final state.
    pub async fn shutdown(&self) -> Result<EngineSnapshot, EngineError> {
        let (tx, rx) = oneshot::channel();
        self.send(EngineCommand::Shutdown { reply: tx }).await?;
        rx.await.map_err(|_| EngineError::ChannelClosed)
    }
}
