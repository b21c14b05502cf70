use crate::engine::config::{ConfigError, EngineConfig};
use crate::engine::errors::EngineError;
use crate::engine::events::EngineSnapshot;
use crate::engine::handle::EngineHandle;
use crate::engine::input::{InputState, KeyStatus};
use crate::engine::simulation::{Advance, SimulationState};
use crate::engine::tick::{FixedTimestep, TickResult};
use crate::engine::worker::EngineWorker;
use crate::engine::DEFAULT_CHANNEL_CAPACITY;
use crate::render::backend::{ErasedSurface, RenderBackend, SurfaceSize};
use crate::render::{RenderList, RoadRenderer};
use crate::road::{Road, RoadGenerator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

/// The complete application state: the generated road, the simulation, the keyboard and the
/// renderer. Nothing in here is global; a host can run as many engines as it likes.
///
/// `RoadEngine` is synchronous. It can be driven by hand (`tick`, `update`, `build_frame`) or
/// moved onto the tokio runtime with [`RoadEngine::start`].
pub struct RoadEngine {
    config: EngineConfig,
    road: Road,
    simulation: SimulationState,
    input: InputState,
    timestep: FixedTimestep,
    renderer: RoadRenderer,
    frames_rendered: u64,
    /// Set once the clamp policy stopped the player, so the end is only reported once
    at_end: bool,
}

impl RoadEngine {
    /// Validates the configuration and generates the road. The road is seeded from
    /// `config.seed` when set, from the OS otherwise.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, &mut rng)
    }

    /// Same as [`RoadEngine::new`] but draws the road from the given random source.
    pub fn with_rng<R: Rng + ?Sized>(config: EngineConfig, rng: &mut R) -> Result<Self, EngineError> {
        config.validate()?;

        let road = RoadGenerator::new(&config.road)?.generate(rng);
        let simulation = SimulationState::new(
            config.simulation.initial_speed,
            config.camera.offset,
            config.simulation.end_of_road,
        );

        Ok(Self {
            timestep: FixedTimestep::new(config.simulation.fixed_timestep),
            renderer: RoadRenderer::new(&config),
            road,
            simulation,
            input: InputState::new(),
            frames_rendered: 0,
            at_end: false,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn road(&self) -> &Road {
        &self.road
    }

    pub fn simulation(&self) -> &SimulationState {
        &self.simulation
    }

    pub fn key_status(&self) -> KeyStatus {
        self.input.status()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Runs exactly one fixed simulation step.
    pub fn tick(&mut self) -> TickResult {
        let mut result = TickResult { steps: 1, ..Default::default() };
        self.step(&mut result);
        result
    }

    /// Feeds wall-clock time into the fixed-timestep accumulator and runs every step that is due.
    pub fn update(&mut self, elapsed: Duration) -> TickResult {
        let steps = self.timestep.accumulate(elapsed);
        let mut result = TickResult { steps, ..Default::default() };
        for _ in 0..steps {
            self.step(&mut result);
        }
        result
    }

    fn step(&mut self, result: &mut TickResult) {
        match self.simulation.advance(self.timestep.dt(), &self.road) {
            Advance::Moved => self.at_end = false,
            Advance::Wrapped { lap } => {
                self.at_end = false;
                result.wrapped_to_lap = Some(lap);
            }
            Advance::Clamped => {
                if !self.at_end {
                    self.at_end = true;
                    result.end_reached = true;
                }
            }
        }
    }

    /// Records a key press. Returns true when the pressed-state changed.
    pub fn key_down(&mut self, key: &str, repeat: bool) -> bool {
        let changed = self.input.key_down(key, repeat);
        if changed {
            log::debug!("keys: {}", self.input.status());
        }
        changed
    }

    /// Records a key release. Returns true when the pressed-state changed.
    pub fn key_up(&mut self, key: &str) -> bool {
        let changed = self.input.key_up(key);
        if changed {
            log::debug!("keys: {}", self.input.status());
        }
        changed
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), EngineError> {
        if !speed.is_finite() {
            return Err(ConfigError::InvalidSpeed(speed).into());
        }
        self.simulation.speed = speed;
        Ok(())
    }

    /// Render list for the current camera position.
    pub fn build_frame(&self) -> RenderList {
        self.renderer.render(&self.road, self.simulation.camera_position)
    }

    /// Builds the current frame and paints it through `backend`. Returns the number of display
    /// items drawn.
    pub fn render_frame(
        &mut self,
        backend: &mut dyn RenderBackend,
        surface: &mut dyn ErasedSurface,
    ) -> anyhow::Result<usize> {
        let list = self.build_frame();
        backend.render(&list, surface)?;
        self.frames_rendered += 1;
        Ok(list.len())
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            simulation: self.simulation.clone(),
            keys: self.input.status(),
            frames_rendered: self.frames_rendered,
        }
    }

    /// Moves the engine onto a tokio task that ticks and renders on its own. Must be called from
    /// within a tokio runtime.
    pub fn start(self, backend: Box<dyn RenderBackend + Send>) -> Result<(EngineHandle, JoinHandle<()>), EngineError> {
        let size = SurfaceSize::new(self.config.canvas.width, self.config.canvas.height);
        let surface = backend.create_surface(size)?;

        let (cmd_tx, cmd_rx) = mpsc::channel(DEFAULT_CHANNEL_CAPACITY);
        let (event_tx, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);

        log::info!(
            "starting engine with {} ({} segments, {}x{})",
            backend.name(),
            self.road.len(),
            size.width,
            size.height
        );

        let handle = EngineHandle::new(cmd_tx, event_tx.clone());
        let worker = EngineWorker::new(self, backend, surface, cmd_rx, event_tx);
        let join_handle = tokio::spawn(worker.run());

        Ok((handle, join_handle))
    }
}

impl std::fmt::Debug for RoadEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadEngine")
            .field("segments", &self.road.len())
            .field("simulation", &self.simulation)
            .field("keys", &self.input.status())
            .field("frames_rendered", &self.frames_rendered)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::simulation::EndOfRoad;
    use crate::render::backends::null::NullBackend;

    fn engine() -> RoadEngine {
        RoadEngine::new(EngineConfig::builder().seed(42).build().unwrap()).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.road.segment_count = 0;
        assert!(matches!(RoadEngine::new(config), Err(EngineError::Config(ConfigError::ZeroSegments))));
    }

    #[test]
    fn same_seed_same_road() {
        assert_eq!(engine().road().segments(), engine().road().segments());
    }

    #[test]
    fn fifty_ticks_cover_one_second() {
        let mut engine = engine();
        for _ in 0..50 {
            assert_eq!(engine.tick().steps, 1);
        }

        let sim = engine.simulation();
        assert!((sim.player_position.z - 400.0).abs() < 1e-6);
        assert_eq!(sim.camera_position, sim.player_position + sim.camera_offset());
    }

    #[test]
    fn update_runs_due_steps_only() {
        let mut engine = engine();
        assert_eq!(engine.update(Duration::from_millis(10)).steps, 0);
        assert_eq!(engine.update(Duration::from_millis(50)).steps, 3);
        assert!((engine.simulation().player_position.z - 24.0).abs() < 1e-6);
    }

    #[test]
    fn reports_wraps_and_end_once() {
        let config = EngineConfig::builder().seed(1).segment_count(4).speed(5000.0).build().unwrap();
        let mut engine = RoadEngine::new(config).unwrap();
        // last segment is a cap, so 300 units of road at 100 per tick
        let wraps: Vec<_> = (0..4).filter_map(|_| engine.tick().wrapped_to_lap).collect();
        assert_eq!(wraps, vec![1]);

        let config = EngineConfig::builder()
            .seed(1)
            .segment_count(4)
            .speed(5000.0)
            .end_of_road(EndOfRoad::Clamp)
            .build()
            .unwrap();
        let mut engine = RoadEngine::new(config).unwrap();
        let ends = (0..6).filter(|_| engine.tick().end_reached).count();
        assert_eq!(ends, 1);
        assert_eq!(engine.simulation().speed, 0.0);
    }

    #[test]
    fn keys_and_speed() {
        let mut engine = engine();
        assert!(engine.key_down("w", false));
        assert!(!engine.key_down("w", true));
        assert!(!engine.key_down("q", false));
        assert_eq!(engine.key_status(), KeyStatus::UP);
        assert!(engine.key_up("w"));
        assert!(engine.key_status().is_empty());

        engine.set_speed(-100.0).unwrap();
        assert_eq!(engine.simulation().speed, -100.0);
        assert!(engine.set_speed(f64::NAN).is_err());
    }

    #[test]
    fn renders_through_a_backend() {
        let mut engine = engine();
        let mut backend = NullBackend::new();
        let mut surface = backend.create_surface(SurfaceSize::new(800, 600)).unwrap();

        let items = engine.render_frame(&mut backend, surface.as_mut()).unwrap();
        assert_eq!(items, engine.build_frame().len());
        assert!(items > 3);
        assert_eq!(engine.frames_rendered(), 1);
        assert_eq!(backend.frames(), 1);
        assert_eq!(engine.snapshot().frames_rendered, 1);
    }
}
