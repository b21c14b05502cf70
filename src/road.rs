//! Road model: the immutable sequence of [`RoadSegment`]s and the generator that builds it.

mod generator;
mod segment;

pub use generator::RoadGenerator;
pub use segment::{Road, RoadSegment};
