//! Colors and backdrop layout.

use crate::render::render_list::{Color, LinearGradient, RadialGradient};

/// The sun disc painted behind the road.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sun {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    /// Gradient offset from which the sun is fully `sun_light`
    pub gradient_split: f64,
    /// Width of the glow ring around the disc
    pub glow_radius: f64,
}

impl Default for Sun {
    fn default() -> Self {
        Self {
            center_x: 632.0,
            center_y: 304.0,
            radius: 160.0,
            gradient_split: 0.5,
            glow_radius: 25.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub sky_dark: Color,
    pub sky_light: Color,
    pub sun_dark: Color,
    pub sun_light: Color,
    pub sun_glow: Color,
    /// Terrain on strip segments
    pub terrain_light: Color,
    pub terrain_dark: Color,
    /// Road surface on strip segments
    pub road_light: Color,
    pub road_dark: Color,
    pub line: Color,
    pub sun: Sun,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            sky_dark: Color::from_rgb24(0x004042),
            sky_light: Color::from_rgb24(0x017F84),
            sun_dark: Color::from_rgb24(0xDC5227),
            sun_light: Color::from_rgb24(0xCD910D),
            sun_glow: Color::from_rgb24(0xD76A1D),
            terrain_light: Color::from_rgb24(0x8713D7),
            terrain_dark: Color::from_rgb24(0x66179D),
            road_light: Color::from_rgb24(0x351727),
            road_dark: Color::from_rgb24(0x2E1121),
            line: Color::from_rgb24(0xF7AC06),
            sun: Sun::default(),
        }
    }
}

impl Palette {
    #[inline]
    pub fn terrain(&self, is_strip: bool) -> Color {
        if is_strip { self.terrain_light } else { self.terrain_dark }
    }

    #[inline]
    pub fn road(&self, is_strip: bool) -> Color {
        if is_strip { self.road_light } else { self.road_dark }
    }

    /// Sky gradient for a canvas of the given height: dark at the top, light at the bottom.
    pub fn sky_gradient(&self, height: f64) -> LinearGradient {
        LinearGradient::vertical(0.0, height)
            .with_stop(0.0, self.sky_dark)
            .with_stop(1.0, self.sky_light)
    }

    /// Sun gradient across the disc's vertical extent.
    pub fn sun_gradient(&self) -> LinearGradient {
        let sun = &self.sun;
        LinearGradient::vertical(sun.center_y - sun.radius, sun.center_y + sun.radius)
            .with_stop(0.0, self.sun_dark)
            .with_stop(sun.gradient_split, self.sun_light)
    }

    /// Glow fading from `sun_glow` at the rim of the disc to transparent `glow_radius` further out.
    pub fn sun_glow_gradient(&self) -> RadialGradient {
        let sun = &self.sun;
        let clear = Color { a: 0.0, ..self.sun_glow };
        RadialGradient::ring(sun.center_x, sun.center_y, sun.radius, sun.radius + sun.glow_radius)
            .with_stop(0.0, self.sun_glow)
            .with_stop(1.0, clear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_segments_use_the_light_colors() {
        let p = Palette::default();
        assert_eq!(p.terrain(true), p.terrain_light);
        assert_eq!(p.terrain(false), p.terrain_dark);
        assert_eq!(p.road(true), p.road_light);
        assert_eq!(p.road(false), p.road_dark);
    }

    #[test]
    fn sun_gradient_spans_the_disc() {
        let p = Palette::default();
        let g = p.sun_gradient();
        assert_eq!((g.y0, g.y1), (144.0, 464.0));
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[1].offset, 0.5);
        assert_eq!(g.stops[1].color, Color::from_rgb24(0xCD910D));
    }

    #[test]
    fn glow_fades_out_around_the_sun() {
        let p = Palette::default();
        let g = p.sun_glow_gradient();
        assert_eq!((g.cx, g.cy, g.r0, g.r1), (632.0, 304.0, 160.0, 185.0));
        assert_eq!(g.stops[0].color, Color::from_rgb24(0xD76A1D));
        assert_eq!(g.stops[1].color.a, 0.0);
    }
}
