use crate::render::backend::{ErasedSurface, PixelFormat, RenderBackend, RgbaImage, SurfaceSize};
use crate::render::{Color, DisplayItem, Fill, RenderList};
use anyhow::{anyhow, Result};
use std::any::Any;
use std::f64::consts::PI;

/// Cairo backend rasterising render lists onto an ARGB32 image surface.
pub struct CairoBackend;

impl CairoBackend {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for CairoBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for CairoBackend {
    fn name(&self) -> &str {
        "CairoBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn ErasedSurface + Send>> {
        Ok(Box::new(CairoSurface::new(size)?))
    }

    /// Paints every display item in order onto a fresh cairo image and copies the result into
    /// the surface's pixel buffer.
    fn render(&mut self, list: &RenderList, surface: &mut dyn ErasedSurface) -> Result<()> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<CairoSurface>()
            .ok_or_else(|| anyhow!("CairoBackend used with non-Cairo surface"))?;

        let mut image = cairo::ImageSurface::create(cairo::Format::ARgb32, s.size.width as i32, s.size.height as i32)?;
        {
            let cr = cairo::Context::new(&image)?;
            for item in list.items.iter() {
                paint(&cr, item)?;
            }
        }
        image.flush();

        let stride = image.stride() as usize;
        let data = image.data()?;
        s.stride = stride;
        s.pixels.clear();
        s.pixels.extend_from_slice(&data);

        s.frame_id = s.frame_id.wrapping_add(1);
        Ok(())
    }

    /// Converts the premultiplied native-endian ARGB32 pixels to straight RGBA8.
    fn snapshot(&mut self, surface: &mut dyn ErasedSurface) -> Result<RgbaImage> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<CairoSurface>()
            .ok_or_else(|| anyhow!("CairoBackend used with non-Cairo surface"))?;

        let (width, height) = (s.size.width as usize, s.size.height as usize);
        let mut rgba = vec![0u8; width * height * 4];

        if s.pixels.len() >= height * s.stride {
            for y in 0..height {
                let row = &s.pixels[y * s.stride..y * s.stride + width * 4];
                for (x, px) in row.chunks_exact(4).enumerate() {
                    let argb = u32::from_ne_bytes([px[0], px[1], px[2], px[3]]);
                    let out = &mut rgba[(y * width + x) * 4..(y * width + x) * 4 + 4];
                    out.copy_from_slice(&unpremultiply(argb));
                }
            }
        }

        RgbaImage::from_raw(rgba, s.size.width, s.size.height, s.size.width * 4, PixelFormat::Rgba8)
    }
}

fn paint(cr: &cairo::Context, item: &DisplayItem) -> Result<()> {
    match item {
        DisplayItem::Rect { x, y, w, h, fill } => {
            set_fill(cr, fill)?;
            cr.rectangle(*x, *y, *w, *h);
            cr.fill()?;
        }
        DisplayItem::Circle { cx, cy, radius, fill } => {
            set_fill(cr, fill)?;
            cr.new_path();
            cr.arc(*cx, *cy, *radius, 0.0, 2.0 * PI);
            cr.fill()?;
        }
        DisplayItem::Polygon { points, color } => {
            let Some((first, rest)) = points.split_first() else {
                return Ok(());
            };
            set_color(cr, color);
            cr.move_to(first.x, first.y);
            for p in rest {
                cr.line_to(p.x, p.y);
            }
            cr.close_path();
            cr.fill()?;
        }
    }
    Ok(())
}

fn set_color(cr: &cairo::Context, color: &Color) {
    cr.set_source_rgba(color.r as f64, color.g as f64, color.b as f64, color.a as f64);
}

fn set_fill(cr: &cairo::Context, fill: &Fill) -> Result<()> {
    match fill {
        Fill::Solid(color) => set_color(cr, color),
        Fill::Linear(gradient) => {
            let pattern = cairo::LinearGradient::new(0.0, gradient.y0, 0.0, gradient.y1);
            for stop in &gradient.stops {
                let c = stop.color;
                pattern.add_color_stop_rgba(stop.offset, c.r as f64, c.g as f64, c.b as f64, c.a as f64);
            }
            cr.set_source(&pattern)?;
        }
        Fill::Radial(gradient) => {
            let pattern = cairo::RadialGradient::new(
                gradient.cx,
                gradient.cy,
                gradient.r0,
                gradient.cx,
                gradient.cy,
                gradient.r1,
            );
            for stop in &gradient.stops {
                let c = stop.color;
                pattern.add_color_stop_rgba(stop.offset, c.r as f64, c.g as f64, c.b as f64, c.a as f64);
            }
            cr.set_source(&pattern)?;
        }
    }
    Ok(())
}

fn unpremultiply(argb: u32) -> [u8; 4] {
    let a = (argb >> 24) as u8;
    let channel = |shift: u32| {
        let c = ((argb >> shift) & 0xff) as u32;
        if a == 0 { 0 } else { ((c * 255 + a as u32 / 2) / a as u32).min(255) as u8 }
    };
    [channel(16), channel(8), channel(0), a]
}

/// Pixel buffer of the last frame painted by [`CairoBackend`].
pub struct CairoSurface {
    pixels: Vec<u8>,
    stride: usize,
    size: SurfaceSize,
    frame_id: u64,
}

impl CairoSurface {
    fn new(size: SurfaceSize) -> Result<Self> {
        let stride = cairo::Format::ARgb32
            .stride_for_width(size.width)
            .map_err(|e| anyhow!("no cairo stride for width {}: {e}", size.width))? as usize;

        Ok(Self {
            pixels: vec![0u8; stride * size.height as usize],
            stride,
            size,
            frame_id: 0,
        })
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }
}

impl ErasedSurface for CairoSurface {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn size(&self) -> SurfaceSize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ScreenPoint;

    #[test]
    fn unpremultiply_roundtrips_opaque_pixels() {
        assert_eq!(unpremultiply(0xFF87_13D7), [0x87, 0x13, 0xD7, 0xFF]);
        assert_eq!(unpremultiply(0x0000_0000), [0, 0, 0, 0]);
    }

    #[test]
    fn paints_a_polygon() {
        let mut backend = CairoBackend::new();
        let mut surface = backend.create_surface(SurfaceSize::new(20, 20)).unwrap();

        let mut list = RenderList::new();
        list.add_command(DisplayItem::Rect {
            x: 0.0,
            y: 0.0,
            w: 20.0,
            h: 20.0,
            fill: Fill::Solid(Color::from_rgb24(0x000000)),
        });
        list.add_command(DisplayItem::Polygon {
            points: vec![
                ScreenPoint::new(0.0, 10.0),
                ScreenPoint::new(20.0, 10.0),
                ScreenPoint::new(20.0, 20.0),
                ScreenPoint::new(0.0, 20.0),
            ],
            color: Color::from_rgb24(0xF7AC06),
        });
        backend.render(&list, surface.as_mut()).unwrap();

        let img = backend.snapshot(surface.as_mut()).unwrap();
        assert_eq!(img.pixel(5, 2), Some([0, 0, 0, 255]));
        assert_eq!(img.pixel(5, 15), Some([0xF7, 0xAC, 0x06, 255]));
    }

    #[test]
    fn radial_fill_fades_outwards() {
        let mut backend = CairoBackend::new();
        let mut surface = backend.create_surface(SurfaceSize::new(20, 20)).unwrap();

        let mut list = RenderList::new();
        list.add_command(DisplayItem::Rect {
            x: 0.0,
            y: 0.0,
            w: 20.0,
            h: 20.0,
            fill: Fill::Solid(Color::from_rgb24(0x000000)),
        });
        list.add_command(DisplayItem::Circle {
            cx: 10.0,
            cy: 10.0,
            radius: 8.0,
            fill: Fill::Radial(
                crate::render::RadialGradient::ring(10.0, 10.0, 2.0, 8.0)
                    .with_stop(0.0, Color::from_rgb24(0xD76A1D))
                    .with_stop(1.0, Color::new(0.843, 0.416, 0.114, 0.0)),
            ),
        });
        backend.render(&list, surface.as_mut()).unwrap();

        let img = backend.snapshot(surface.as_mut()).unwrap();
        assert_eq!(img.pixel(10, 10), Some([0xD7, 0x6A, 0x1D, 255]));
        assert_eq!(img.pixel(0, 0), Some([0, 0, 0, 255]));

        // Halfway through the ring the glow is partly blended into the background
        let [r, _, _, a] = img.pixel(15, 10).unwrap();
        assert_eq!(a, 255);
        assert!(r > 0 && r < 0xD7, "r = {r}");
    }
}
