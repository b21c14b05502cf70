//! Pseudo-3D road engine: a procedurally generated road of flat segments, a fixed-timestep
//! player simulation and a perspective renderer that turns the visible part of the road into a
//! list of 2D display items for a pluggable backend.
//!
//! ```no_run
//! use roadline::render::backends::null::NullBackend;
//! use roadline::{EngineConfig, RoadEngine};
//!
//! # async fn run() -> Result<(), roadline::EngineError> {
//! let engine = RoadEngine::new(EngineConfig::builder().seed(7).build()?)?;
//! let (handle, join) = engine.start(Box::new(NullBackend::new()))?;
//!
//! handle.key_down("w", false).await?;
//! let snapshot = handle.shutdown().await?;
//! println!("stopped at z={}", snapshot.simulation.player_position.z);
//! # let _ = join.await;
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod math;
pub mod render;
pub mod road;

pub use engine::*;
