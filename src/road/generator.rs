use crate::engine::config::{Bounds, ConfigError, RoadConfig};
use crate::math::{ease_in_out, random_range};
use crate::road::{Road, RoadSegment};
use rand::Rng;

/// Builds the road once at startup.
///
/// Every `curve_length` segments a new control point is picked by adding a random delta (within
/// the scale bounds) to the previous one, independently for x (curvature) and y (elevation).
/// Segments inside a curve group are eased between the two control points.
#[derive(Debug, Clone)]
pub struct RoadGenerator {
    segment_count: usize,
    segment_length: f64,
    segments_per_strip: usize,
    curve_length: usize,
    x_scale: Bounds,
    y_scale: Bounds,
}

impl RoadGenerator {
    /// Fails with the same [`ConfigError`] as [`RoadConfig::validate`] for a road shape it
    /// cannot build.
    pub fn new(config: &RoadConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            segment_count: config.segment_count,
            segment_length: config.segment_length,
            segments_per_strip: config.segments_per_strip,
            curve_length: config.curve_length,
            x_scale: config.x_scale,
            y_scale: config.y_scale,
        })
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Road {
        let mut segments = Vec::with_capacity(self.segment_count);

        let mut is_strip = false;
        let (mut x_start, mut x_end) = (0.0, 0.0);
        let (mut y_start, mut y_end) = (0.0, 0.0);

        for i in 0..self.segment_count {
            if i % self.segments_per_strip == 0 {
                is_strip = !is_strip;
            }

            let curve_step = i % self.curve_length;
            if curve_step == 0 {
                x_start = x_end;
                y_start = y_end;
                x_end += random_range(rng, self.x_scale.min, self.x_scale.max);
                y_end += random_range(rng, self.y_scale.min, self.y_scale.max);
            }

            let p = curve_step as f64 / self.curve_length as f64;
            let x0 = ease_in_out(p, x_start, x_end);
            let y0 = ease_in_out(p, y_start, y_end);
            let z0 = i as f64 * self.segment_length;

            // Far edge is stitched below; until then the segment is a flat cap.
            segments.push(RoadSegment { x0, y0, z0, x1: x0, y1: y0, z1: z0, is_strip });
        }

        for i in 1..segments.len() {
            let next = segments[i];
            let prev = &mut segments[i - 1];
            prev.x1 = next.x0;
            prev.y1 = next.y0;
            prev.z1 = next.z0;
        }

        let road = Road::from_segments(segments);
        log::info!(
            "generated road: {} segments, {:.0} units long, ends at ({:.1}, {:.1})",
            road.len(),
            road.length(),
            road.last().x0,
            road.last().y0,
        );

        road
    }
}
