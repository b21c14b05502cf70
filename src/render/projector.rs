//! Perspective projection from world space to pixel space.
//!
//! A point is moved into camera space, divided by its depth (scaled by the screen distance) to
//! get normalized device coordinates, then mapped onto the surface with y pointing down:
//!
//! ```text
//! ratio    = screen_distance / (z - camera.z)
//! screen_x = W/2 + W/2 * (x - camera.x) * ratio
//! screen_y = H/2 - H/2 * (y - camera.y) * ratio
//! ```

use crate::math::{vec3, Vec3};
use crate::render::render_list::ScreenPoint;

/// Points closer to the camera plane than this are not projected.
pub const MIN_DEPTH: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projector {
    half_width: f64,
    half_height: f64,
    screen_distance: f64,
}

impl Projector {
    pub fn new(width: u32, height: u32, screen_distance: f64) -> Self {
        Self {
            half_width: width as f64 / 2.0,
            half_height: height as f64 / 2.0,
            screen_distance,
        }
    }

    /// Projects `point` as seen from `camera`. `None` when the point is not in front of the camera.
    pub fn world_to_screen(&self, point: Vec3, camera: Vec3) -> Option<ScreenPoint> {
        let rel = point - camera;
        if rel.z <= MIN_DEPTH {
            return None;
        }

        let ratio = self.screen_distance / rel.z;
        Some(ScreenPoint {
            x: self.half_width + self.half_width * rel.x * ratio,
            y: self.half_height - self.half_height * rel.y * ratio,
        })
    }

    /// Inverse of [`world_to_screen`](Self::world_to_screen) for a known world depth `z`.
    pub fn screen_to_world(&self, screen: ScreenPoint, z: f64, camera: Vec3) -> Option<Vec3> {
        let rel_z = z - camera.z;
        if rel_z <= MIN_DEPTH {
            return None;
        }

        let ratio = self.screen_distance / rel_z;
        let ndc_x = (screen.x - self.half_width) / self.half_width;
        let ndc_y = (self.half_height - screen.y) / self.half_height;
        Some(vec3(camera.x + ndc_x / ratio, camera.y + ndc_y / ratio, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projector() -> Projector {
        Projector::new(800, 600, 30.0)
    }

    #[test]
    fn point_straight_ahead_lands_in_the_center() {
        let p = projector().world_to_screen(vec3(0.0, 3.0, 100.0), vec3(0.0, 3.0, -5.0)).unwrap();
        assert_eq!(p, ScreenPoint::new(400.0, 300.0));
    }

    #[test]
    fn known_projection() {
        // rel = (10, -3, 100), ratio = 0.3
        let p = projector().world_to_screen(vec3(10.0, 0.0, 95.0), vec3(0.0, 3.0, -5.0)).unwrap();
        assert!((p.x - (400.0 + 400.0 * 3.0)).abs() < 1e-9);
        assert!((p.y - (300.0 + 300.0 * 0.9)).abs() < 1e-9);
    }

    #[test]
    fn points_behind_or_on_the_camera_plane_are_rejected() {
        let cam = vec3(0.0, 3.0, 100.0);
        assert!(projector().world_to_screen(vec3(0.0, 0.0, 100.0), cam).is_none());
        assert!(projector().world_to_screen(vec3(0.0, 0.0, 50.0), cam).is_none());
        assert!(projector().screen_to_world(ScreenPoint::new(1.0, 1.0), 100.0, cam).is_none());
    }

    #[test]
    fn round_trip_recovers_x_and_y() {
        let proj = projector();
        let cam = vec3(12.5, -7.0, 1234.0);
        for (x, y, z) in [(0.0, 0.0, 1300.0), (-40.0, 25.0, 1234.5), (300.0, -80.0, 11_000.0), (1.0, 1.0, 1240.0)] {
            let point = vec3(x, y, z);
            let screen = proj.world_to_screen(point, cam).unwrap();
            let back = proj.screen_to_world(screen, z, cam).unwrap();
            assert!((back.x - x).abs() < 1e-6, "x: {back:?} vs {point:?}");
            assert!((back.y - y).abs() < 1e-6, "y: {back:?} vs {point:?}");
            assert_eq!(back.z, z);
        }
    }
}
