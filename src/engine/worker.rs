use crate::engine::events::{EngineCommand, EngineEvent};
use crate::engine::tick::TickResult;
use crate::engine::RoadEngine;
use crate::render::backend::{ErasedSurface, RenderBackend};
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, MissedTickBehavior};

/// Owns a [`RoadEngine`] together with its backend and surface, and drives it from a single
/// tokio task. Commands, simulation ticks and frames are handled one at a time, so the engine
/// state is never shared.
pub struct EngineWorker {
    engine: RoadEngine,
    backend: Box<dyn RenderBackend + Send>,
    surface: Box<dyn ErasedSurface + Send>,
    cmd_rx: mpsc::Receiver<EngineCommand>,
    event_tx: broadcast::Sender<EngineEvent>,
}

impl EngineWorker {
    pub fn new(
        engine: RoadEngine,
        backend: Box<dyn RenderBackend + Send>,
        surface: Box<dyn ErasedSurface + Send>,
        cmd_rx: mpsc::Receiver<EngineCommand>,
        event_tx: broadcast::Sender<EngineEvent>,
    ) -> Self {
        Self {
            engine,
            backend,
            surface,
            cmd_rx,
            event_tx,
        }
    }

    /// Main engine loop. Runs until a shutdown command arrives or every handle is dropped.
    pub async fn run(mut self) {
        let sim = &self.engine.config().simulation;
        let mut sim_ticker = tokio::time::interval(sim.fixed_timestep);
        sim_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut frame_ticker = tokio::time::interval(sim.frame_interval);
        frame_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut last_tick = Instant::now();
        self.emit(EngineEvent::EngineStarted);

        let reason = loop {
            tokio::select! {
                cmd = self.cmd_rx.recv() => {
                    match cmd {
                        Some(EngineCommand::Shutdown { reply }) => {
                            let _ = reply.send(self.engine.snapshot());
                            break "shutdown requested";
                        }
                        Some(cmd) => self.handle_command(cmd),
                        None => break "all handles dropped",
                    }
                }

                // Fixed simulation steps; elapsed time goes through the accumulator so late
                // ticks catch up instead of slowing the player down
                _ = sim_ticker.tick() => {
                    let now = Instant::now();
                    let result = self.engine.update(now - last_tick);
                    last_tick = now;
                    self.report_tick(result);
                }

                _ = frame_ticker.tick() => self.draw(),
            }
        };

        log::info!(
            "engine stopped ({reason}) at z={:.1} after {} frames",
            self.engine.simulation().player_position.z,
            self.engine.frames_rendered()
        );
        self.emit(EngineEvent::EngineShutdown { reason: reason.to_string() });
    }

    fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::KeyDown { key, repeat } => {
                if self.engine.key_down(&key, repeat) {
                    self.emit(EngineEvent::KeyStatusChanged { status: self.engine.key_status() });
                }
            }
            EngineCommand::KeyUp { key } => {
                if self.engine.key_up(&key) {
                    self.emit(EngineEvent::KeyStatusChanged { status: self.engine.key_status() });
                }
            }
            EngineCommand::SetSpeed { speed } => {
                if let Err(e) = self.engine.set_speed(speed) {
                    log::warn!("ignoring speed change: {e}");
                    self.emit(EngineEvent::Warning { message: e.to_string() });
                }
            }
            // Handled by the loop
            EngineCommand::Shutdown { .. } => {}
        }
    }

    fn report_tick(&self, result: TickResult) {
        if let Some(lap) = result.wrapped_to_lap {
            self.emit(EngineEvent::RoadWrapped { lap });
        }
        if result.end_reached {
            self.emit(EngineEvent::RoadEndReached);
        }
    }

    /// Renders one frame. A failing backend skips the frame; the loop keeps running.
    fn draw(&mut self) {
        match self.engine.render_frame(self.backend.as_mut(), self.surface.as_mut()) {
            Ok(items) => {
                let frame_id = self.engine.frames_rendered();
                self.emit(EngineEvent::FrameRendered { frame_id, items });
            }
            Err(e) => {
                log::warn!("{} failed to render frame: {e:#}", self.backend.name());
                self.emit(EngineEvent::Warning { message: format!("frame skipped: {e}") });
            }
        }
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}
