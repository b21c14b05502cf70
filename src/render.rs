pub mod backend;

/// Rendering backends.
pub mod backends {
    /// Cairo rendering backend
    #[cfg(feature = "backend_cairo")]
    pub mod cairo;
    pub mod null;
}

mod render_list;
pub use render_list::*;

pub mod palette;
pub mod projector;

mod road_renderer;
pub use road_renderer::RoadRenderer;
