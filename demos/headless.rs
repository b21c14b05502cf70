use roadline::engine::simulation::EndOfRoad;
use roadline::render::backend::RenderBackend;
use roadline::{EngineConfig, EngineError, EngineEvent, RoadEngine};
use std::time::Duration;

#[cfg(feature = "backend_cairo")]
fn backend() -> Box<dyn RenderBackend + Send> {
    Box::new(roadline::render::backends::cairo::CairoBackend::new())
}

#[cfg(not(feature = "backend_cairo"))]
fn backend() -> Box<dyn RenderBackend + Send> {
    Box::new(roadline::render::backends::null::NullBackend::new())
}

#[tokio::main]
async fn main() -> Result<(), EngineError> {
    env_logger::init();

    // Same road every run
    let config = EngineConfig::builder()
        .seed(0x5eed)
        .end_of_road(EndOfRoad::Wrap)
        .build()
        .expect("Configuration is not valid");

    let engine = RoadEngine::new(config.clone())?;
    let (handle, join_handle) = engine.start(backend())?;

    // Only events sent from this point on are received
    let mut event_rx = handle.subscribe_events();

    // Hold "up" for a while, like a player would
    handle.key_down("w", false).await?;
    handle.key_down("w", true).await?;

    let mut frames = 0usize;
    let mut seconds = 0usize;
    let mut interval = tokio::time::interval(Duration::from_secs(1));

    loop {
        tokio::select! {
            Ok(ev) = event_rx.recv() => {
                match ev {
                    EngineEvent::FrameRendered { .. } => frames += 1,
                    other => println!("[event] {other:?}"),
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("Received Ctrl-C, shutting down...");
                break;
            }
            _ = interval.tick() => {
                seconds += 1;
                if seconds == 2 {
                    handle.set_speed(800.0).await?;
                }
                if seconds > 3 {
                    break;
                }
            }
        }
    }

    handle.key_up("w").await?;
    let snapshot = handle.shutdown().await?;
    if let Err(join_err) = join_handle.await {
        eprintln!("engine task panicked: {join_err}");
    }

    println!(
        "Stopped at {} on segment {} (lap {}) after {} frames ({frames} seen), keys: {}",
        snapshot.simulation.player_position,
        snapshot.simulation.segment_index(),
        snapshot.simulation.laps(),
        snapshot.frames_rendered,
        snapshot.keys,
    );

    #[cfg(feature = "backend_cairo")]
    write_snapshot(config)?;

    Ok(())
}

/// Renders the same road one second into the drive with cairo and writes it to the working
/// directory.
#[cfg(feature = "backend_cairo")]
fn write_snapshot(config: EngineConfig) -> Result<(), EngineError> {
    use roadline::render::backend::SurfaceSize;

    let mut engine = RoadEngine::new(config)?;
    for _ in 0..50 {
        engine.tick();
    }

    let mut backend = backend();
    let size = SurfaceSize::new(engine.config().canvas.width, engine.config().canvas.height);
    let mut surface = backend.create_surface(size)?;
    engine.render_frame(backend.as_mut(), surface.as_mut())?;

    let image = backend.snapshot(surface.as_mut())?;
    image.write_png("roadline.png")?;
    println!("Wrote roadline.png ({}x{})", image.width, image.height);
    Ok(())
}
