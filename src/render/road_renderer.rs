use crate::engine::config::EngineConfig;
use crate::math::{vec3, Vec3};
use crate::render::palette::Palette;
use crate::render::projector::Projector;
use crate::render::render_list::{DisplayItem, Fill, RenderList, ScreenPoint};
use crate::road::{Road, RoadSegment};

/// Builds the render list for one frame: sky, sun glow, sun, then the visible road.
///
/// Segments are selected in stored (ascending z) order and drawn in reverse, far to near, so
/// nearer terrain and road overpaint what lies behind them.
#[derive(Debug, Clone)]
pub struct RoadRenderer {
    projector: Projector,
    width: f64,
    height: f64,
    road_width: f64,
    lane_count: usize,
    stripe_width: f64,
    max_draw_distance: f64,
    palette: Palette,
}

impl RoadRenderer {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            projector: Projector::new(config.canvas.width, config.canvas.height, config.camera.screen_distance),
            width: config.canvas.width as f64,
            height: config.canvas.height as f64,
            road_width: config.road.road_width,
            lane_count: config.road.lane_count,
            stripe_width: config.road.stripe_width,
            max_draw_distance: config.camera.max_draw_distance,
            palette: config.palette.clone(),
        }
    }

    /// Segments with `camera.z <= z0 <= camera.z + max_draw_distance`, in stored order.
    pub fn visible<'a>(&self, road: &'a Road, camera: Vec3) -> &'a [RoadSegment] {
        road.between(camera.z, camera.z + self.max_draw_distance)
    }

    pub fn render(&self, road: &Road, camera: Vec3) -> RenderList {
        let mut list = RenderList::new();
        self.render_background(&mut list);

        let mut skipped = 0usize;
        for segment in self.visible(road, camera).iter().rev() {
            if !self.render_segment(&mut list, segment, camera) {
                skipped += 1;
            }
        }
        if skipped > 0 {
            log::trace!("skipped {skipped} segment(s) too close to the camera at z={:.2}", camera.z);
        }

        list
    }

    fn render_background(&self, list: &mut RenderList) {
        list.add_command(DisplayItem::Rect {
            x: 0.0,
            y: 0.0,
            w: self.width,
            h: self.height,
            fill: Fill::Linear(self.palette.sky_gradient(self.height)),
        });

        let sun = &self.palette.sun;
        list.add_command(DisplayItem::Circle {
            cx: sun.center_x,
            cy: sun.center_y,
            radius: sun.radius + sun.glow_radius,
            fill: Fill::Radial(self.palette.sun_glow_gradient()),
        });
        list.add_command(DisplayItem::Circle {
            cx: sun.center_x,
            cy: sun.center_y,
            radius: sun.radius,
            fill: Fill::Linear(self.palette.sun_gradient()),
        });
    }

    /// Draws terrain band, road surface and, on strip segments, the lane stripes.
    /// Returns false when the segment cannot be projected.
    fn render_segment(&self, list: &mut RenderList, seg: &RoadSegment, camera: Vec3) -> bool {
        let Some([top_left, top_right, bottom_right, bottom_left]) = self.project_quad(seg, 0.0, self.road_width, camera)
        else {
            return false;
        };

        list.add_command(DisplayItem::Polygon {
            points: vec![
                ScreenPoint::new(0.0, top_left.y),
                ScreenPoint::new(self.width, top_left.y),
                ScreenPoint::new(self.width, bottom_left.y),
                ScreenPoint::new(0.0, bottom_left.y),
            ]
            .into_iter()
            .map(snap)
            .collect(),
            color: self.palette.terrain(seg.is_strip),
        });

        list.add_command(DisplayItem::Polygon {
            points: [top_left, top_right, bottom_right, bottom_left].into_iter().map(snap).collect(),
            color: self.palette.road(seg.is_strip),
        });

        if seg.is_strip {
            for lane in 0..self.lane_count.saturating_sub(1) {
                let offset = self.road_width * lane_offset(lane, self.lane_count);
                if let Some([tl, tr, br, bl]) = self.project_quad(seg, offset, self.stripe_width, camera) {
                    list.add_command(DisplayItem::Polygon {
                        points: [tl, tr, br, bl].into_iter().map(snap).collect(),
                        color: self.palette.line,
                    });
                }
            }
        }

        true
    }

    /// Projects the quad `center + offset ± half_width` at the near and far edge, as
    /// `[near left, near right, far right, far left]`.
    fn project_quad(&self, seg: &RoadSegment, offset: f64, half_width: f64, camera: Vec3) -> Option<[ScreenPoint; 4]> {
        let near_x = seg.x0 + offset;
        let far_x = seg.x1 + offset;
        let p = &self.projector;

        Some([
            p.world_to_screen(vec3(near_x - half_width, seg.y0, seg.z0), camera)?,
            p.world_to_screen(vec3(near_x + half_width, seg.y0, seg.z0), camera)?,
            p.world_to_screen(vec3(far_x + half_width, seg.y1, seg.z1), camera)?,
            p.world_to_screen(vec3(far_x - half_width, seg.y1, seg.z1), camera)?,
        ])
    }
}

/// Center of the internal lane boundary `lane` as a fraction of the half road width, in `(-1, 1)`.
#[inline]
fn lane_offset(lane: usize, lane_count: usize) -> f64 {
    ((lane + 1) * 2) as f64 / lane_count as f64 - 1.0
}

/// Polygon vertices land on whole pixel rows.
#[inline]
fn snap(p: ScreenPoint) -> ScreenPoint {
    ScreenPoint::new(p.x, p.y.trunc())
}
