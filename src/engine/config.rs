//! Engine configuration.
//!
//! [`EngineConfig`] bundles every startup constant of the road engine: canvas size, road shape
//! and generation bounds, camera placement, simulation cadence and the color palette. Nothing in
//! here can change once the engine is running.
//!
//! `EngineConfig` provides the classic values via [`Default`] and a fluent
//! [`EngineConfig::builder()`] that validates before handing out a config.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use roadline::engine::config::EngineConfig;
//! let cfg = EngineConfig::default();
//! assert_eq!(cfg.road.segment_count, 4096);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use roadline::engine::config::EngineConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = EngineConfig::builder()
//!     .canvas_size(1024, 768)
//!     .segment_count(2048)
//!     .x_scale(-10.0, 10.0)
//!     .seed(7)
//!     .build()?; // returns Result<EngineConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Errors
//!
//! [`EngineConfigBuilder::build`] returns a [`ConfigError`] for values the generator, projector
//! or simulation cannot work with (zero counts, non-positive distances, inverted bounds, ...).

use crate::engine::simulation::EndOfRoad;
use crate::math::{vec3, Vec3};
use crate::render::palette::Palette;
use std::time::Duration;

/// Inclusive `min..=max` pair used for random generation bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const ZERO: Bounds = Bounds { min: 0.0, max: 0.0 };

    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Pixel size of the drawable surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 800, height: 600 }
    }
}

/// Shape of the road and the bounds used to generate it.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadConfig {
    /// Number of segments generated at startup
    pub segment_count: usize,
    /// Length of one segment along z
    pub segment_length: f64,
    /// Segments per color band
    pub segments_per_strip: usize,
    /// Segments between two curve control points
    pub curve_length: usize,
    /// Half width of the road surface
    pub road_width: f64,
    pub lane_count: usize,
    /// Half width of a lane stripe
    pub stripe_width: f64,
    pub x_frequency: Bounds,
    /// Horizontal delta between consecutive control points
    pub x_scale: Bounds,
    pub y_frequency: Bounds,
    /// Vertical delta between consecutive control points
    pub y_scale: Bounds,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            segment_count: 4096,
            segment_length: 100.0,
            segments_per_strip: 3,
            curve_length: 50,
            road_width: 10.0,
            lane_count: 3,
            stripe_width: 0.2,
            x_frequency: Bounds::new(0.002, 0.05),
            x_scale: Bounds::new(-30.0, 30.0),
            y_frequency: Bounds::new(0.002, 0.05),
            y_scale: Bounds::new(-30.0, 30.0),
        }
    }
}

impl RoadConfig {
    /// Checks the road shape on its own. Also part of [`EngineConfig::validate`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.segment_count == 0 {
            return Err(ConfigError::ZeroSegments);
        }
        if !(self.segment_length.is_finite() && self.segment_length > 0.0) {
            return Err(ConfigError::InvalidSegmentLength(self.segment_length));
        }
        if self.segments_per_strip == 0 {
            return Err(ConfigError::ZeroStripLength);
        }
        if self.curve_length == 0 {
            return Err(ConfigError::ZeroCurveLength);
        }
        if self.lane_count == 0 {
            return Err(ConfigError::ZeroLanes);
        }
        positive("road_width", self.road_width)?;
        if !(self.stripe_width.is_finite() && self.stripe_width >= 0.0) {
            return Err(ConfigError::NonPositive { name: "stripe_width", value: self.stripe_width });
        }
        bounds("x_frequency", &self.x_frequency)?;
        bounds("x_scale", &self.x_scale)?;
        bounds("y_frequency", &self.y_frequency)?;
        bounds("y_scale", &self.y_scale)?;
        Ok(())
    }

    /// Straight, level road: the default shape with zero curve and hill scale.
    pub fn flat() -> Self {
        Self {
            x_scale: Bounds::ZERO,
            y_scale: Bounds::ZERO,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    /// Camera position relative to the player
    pub offset: Vec3,
    /// Distance from the eye to the projection plane
    pub screen_distance: f64,
    /// Segments further ahead than this are not drawn
    pub max_draw_distance: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: vec3(0.0, 3.0, -5.0),
            screen_distance: 30.0,
            max_draw_distance: 10_000.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    /// Period of the simulation tick
    pub fixed_timestep: Duration,
    /// Period of the frame scheduler
    pub frame_interval: Duration,
    /// Forward speed in world units per second
    pub initial_speed: f64,
    pub end_of_road: EndOfRoad,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: Duration::from_millis(20),
            frame_interval: Duration::from_micros(16_667),
            initial_speed: 400.0,
            end_of_road: EndOfRoad::Wrap,
        }
    }
}

/// Main engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub canvas: CanvasConfig,
    pub road: RoadConfig,
    pub camera: CameraConfig,
    pub simulation: SimulationConfig,
    pub palette: Palette,
    /// Seed for road generation. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            road: RoadConfig::default(),
            camera: CameraConfig::default(),
            simulation: SimulationConfig::default(),
            palette: Palette::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }

    /// The fixed-camera variant: a straight level road.
    pub fn flat() -> Self {
        Self {
            road: RoadConfig::flat(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfigBuilder {
    inner: EngineConfig,
}

impl EngineConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut EngineConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn canvas_size(self, width: u32, height: u32) -> Self { self.map(|c| c.canvas = CanvasConfig { width, height }) }
    pub fn segment_count(self, n: usize) -> Self { self.map(|c| c.road.segment_count = n) }
    pub fn segment_length(self, len: f64) -> Self { self.map(|c| c.road.segment_length = len) }
    pub fn segments_per_strip(self, n: usize) -> Self { self.map(|c| c.road.segments_per_strip = n) }
    pub fn curve_length(self, n: usize) -> Self { self.map(|c| c.road.curve_length = n) }
    pub fn road_width(self, w: f64) -> Self { self.map(|c| c.road.road_width = w) }
    pub fn lane_count(self, n: usize) -> Self { self.map(|c| c.road.lane_count = n) }
    pub fn stripe_width(self, w: f64) -> Self { self.map(|c| c.road.stripe_width = w) }
    pub fn x_frequency(self, min: f64, max: f64) -> Self { self.map(|c| c.road.x_frequency = Bounds::new(min, max)) }
    pub fn x_scale(self, min: f64, max: f64) -> Self { self.map(|c| c.road.x_scale = Bounds::new(min, max)) }
    pub fn y_frequency(self, min: f64, max: f64) -> Self { self.map(|c| c.road.y_frequency = Bounds::new(min, max)) }
    pub fn y_scale(self, min: f64, max: f64) -> Self { self.map(|c| c.road.y_scale = Bounds::new(min, max)) }
    pub fn camera_offset(self, offset: Vec3) -> Self { self.map(|c| c.camera.offset = offset) }
    pub fn screen_distance(self, d: f64) -> Self { self.map(|c| c.camera.screen_distance = d) }
    pub fn max_draw_distance(self, d: f64) -> Self { self.map(|c| c.camera.max_draw_distance = d) }
    pub fn fixed_timestep(self, dt: Duration) -> Self { self.map(|c| c.simulation.fixed_timestep = dt) }
    pub fn frame_interval(self, interval: Duration) -> Self { self.map(|c| c.simulation.frame_interval = interval) }
    pub fn speed(self, speed: f64) -> Self { self.map(|c| c.simulation.initial_speed = speed) }
    pub fn end_of_road(self, policy: EndOfRoad) -> Self { self.map(|c| c.simulation.end_of_road = policy) }
    pub fn palette(self, palette: Palette) -> Self { self.map(|c| c.palette = palette) }
    pub fn seed(self, seed: u64) -> Self { self.map(|c| c.seed = Some(seed)) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut EngineConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("canvas size {width}x{height} must be non-zero")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("segment_count must be at least 1")]
    ZeroSegments,

    #[error("segment_length {0} must be positive")]
    InvalidSegmentLength(f64),

    #[error("segments_per_strip must be at least 1")]
    ZeroStripLength,

    #[error("curve_length must be at least 1")]
    ZeroCurveLength,

    #[error("lane_count must be at least 1")]
    ZeroLanes,

    #[error("{name} {value} must be positive")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} bounds are invalid (min {min}, max {max})")]
    InvalidBounds { name: &'static str, min: f64, max: f64 },

    #[error("{name} must be finite")]
    NonFinite { name: &'static str },

    #[error("{name} must be a non-zero duration")]
    ZeroDuration { name: &'static str },

    #[error("speed {0} is not finite")]
    InvalidSpeed(f64),
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn bounds(name: &'static str, b: &Bounds) -> Result<(), ConfigError> {
    if b.is_valid() {
        Ok(())
    } else {
        Err(ConfigError::InvalidBounds { name, min: b.min, max: b.max })
    }
}

fn validate(c: &EngineConfig) -> Result<(), ConfigError> {
    if c.canvas.width == 0 || c.canvas.height == 0 {
        return Err(ConfigError::InvalidCanvas { width: c.canvas.width, height: c.canvas.height });
    }

    c.road.validate()?;

    positive("screen_distance", c.camera.screen_distance)?;
    positive("max_draw_distance", c.camera.max_draw_distance)?;
    let o = c.camera.offset;
    if !(o.x.is_finite() && o.y.is_finite() && o.z.is_finite()) {
        return Err(ConfigError::NonFinite { name: "camera_offset" });
    }

    if c.simulation.fixed_timestep.is_zero() {
        return Err(ConfigError::ZeroDuration { name: "fixed_timestep" });
    }
    if c.simulation.frame_interval.is_zero() {
        return Err(ConfigError::ZeroDuration { name: "frame_interval" });
    }
    if !c.simulation.initial_speed.is_finite() {
        return Err(ConfigError::InvalidSpeed(c.simulation.initial_speed));
    }

    Ok(())
}
