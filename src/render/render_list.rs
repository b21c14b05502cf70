//! Render list and display items.
//!
//! A frame is described as an immediate-style [`RenderList`] of [`DisplayItem`] commands in
//! paint order. The road renderer fills it, a [`RenderBackend`](crate::render::backend::RenderBackend)
//! consumes it. Later items paint over earlier ones; there is no depth buffer.
//!
//! # Example
//!
//! ```rust
//! use roadline::render::{Color, DisplayItem, Fill, RenderList, ScreenPoint};
//!
//! let mut list = RenderList::new();
//!
//! // Black background
//! list.add_command(DisplayItem::Rect {
//!     x: 0.0,
//!     y: 0.0,
//!     w: 800.0,
//!     h: 600.0,
//!     fill: Fill::Solid(Color::from_u8(0, 0, 0, 255)),
//! });
//!
//! // Draw a white triangle
//! list.add_command(DisplayItem::Polygon {
//!     points: vec![
//!         ScreenPoint::new(10.0, 10.0),
//!         ScreenPoint::new(60.0, 10.0),
//!         ScreenPoint::new(35.0, 50.0),
//!     ],
//!     color: Color::from_u8(255, 255, 255, 255),
//! });
//! assert_eq!(list.len(), 2);
//! ```

/// RGBA color used for drawing commands.
///
/// Channels are represented as `f32` in the range `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel (opacity)
    pub a: f32,
}

impl Color {
    /// Creates a new color from `f32` channel values in the range `0.0 ..= 1.0`.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Color {
        Color { r, g, b, a }
    }

    /// Creates a new color from `u8` channel values in the range `0 ..= 255`.
    pub fn from_u8(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Opaque color from a 24-bit `0xRRGGBB` value.
    pub fn from_rgb24(rgb: u32) -> Color {
        Color::from_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }
}

/// A point in pixel space. `(0, 0)` is the top-left corner of the surface, y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Color stop of a gradient, `offset` in `0.0 ..= 1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Color,
}

/// Vertical linear gradient running from `y0` (offset 0) to `y1` (offset 1) in pixel space.
/// Outside the stops the nearest stop color extends.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub y0: f64,
    pub y1: f64,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn vertical(y0: f64, y1: f64) -> Self {
        Self { y0, y1, stops: Vec::new() }
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }
}

/// Radial gradient between two circles sharing the center `(cx, cy)`: offset 0 on the circle of
/// radius `r0`, offset 1 on the circle of radius `r1`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub cx: f64,
    pub cy: f64,
    pub r0: f64,
    pub r1: f64,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn ring(cx: f64, cy: f64, r0: f64, r1: f64) -> Self {
        Self { cx, cy, r0, r1, stops: Vec::new() }
    }

    pub fn with_stop(mut self, offset: f64, color: Color) -> Self {
        self.stops.push(ColorStop { offset, color });
        self
    }
}

/// How a shape is filled.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Color),
    Linear(LinearGradient),
    Radial(RadialGradient),
}

/// A single display item representing a drawing command.
///
/// Variants:
/// - [`Rect`](DisplayItem::Rect): fill an axis-aligned rectangle.
/// - [`Circle`](DisplayItem::Circle): fill a circle.
/// - [`Polygon`](DisplayItem::Polygon): fill a closed polygon given its vertices in order.
#[derive(Clone, Debug, PartialEq)]
pub enum DisplayItem {
    /// Fill a rectangle at `(x, y)` with width `w` and height `h`.
    Rect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        fill: Fill,
    },

    /// Fill a circle centered on `(cx, cy)`.
    Circle {
        cx: f64,
        cy: f64,
        radius: f64,
        fill: Fill,
    },

    /// Fill the polygon closed by `points` with a solid color.
    Polygon {
        points: Vec<ScreenPoint>,
        color: Color,
    },
}

/// A list of display items to be rendered, in paint order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderList {
    /// Sequence of drawing commands to execute.
    pub items: Vec<DisplayItem>,
}

impl RenderList {
    /// Creates a new, empty render list.
    pub fn new() -> Self {
        RenderList { items: Vec::new() }
    }

    /// Adds a new display item (drawing command) to the list.
    pub fn add_command(&mut self, command: DisplayItem) {
        self.items.push(command);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the polygon commands only.
    pub fn polygons(&self) -> impl Iterator<Item = (&[ScreenPoint], Color)> + '_ {
        self.items.iter().filter_map(|item| match item {
            DisplayItem::Polygon { points, color } => Some((points.as_slice(), *color)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb24_colors_are_opaque() {
        assert_eq!(Color::from_rgb24(0x8713D7), Color::from_u8(0x87, 0x13, 0xD7, 0xFF));
        assert_eq!(Color::from_rgb24(0x8713D7).a, 1.0);
        assert_eq!(Color::from_rgb24(0xF7AC06), Color::from_u8(0xF7, 0xAC, 0x06, 0xFF));
    }

    #[test]
    fn polygons_skips_other_items() {
        let mut list = RenderList::new();
        list.add_command(DisplayItem::Circle {
            cx: 1.0,
            cy: 1.0,
            radius: 1.0,
            fill: Fill::Solid(Color::new(0.0, 0.0, 0.0, 1.0)),
        });
        list.add_command(DisplayItem::Polygon {
            points: vec![ScreenPoint::new(0.0, 0.0), ScreenPoint::new(1.0, 0.0), ScreenPoint::new(1.0, 1.0)],
            color: Color::from_rgb24(0xFFFFFF),
        });
        assert_eq!(list.len(), 2);
        assert_eq!(list.polygons().count(), 1);
    }
}
