use crate::render::RenderList;
use anyhow::{anyhow, Result};
use std::any::Any;
use std::path::Path;

/// Size of a surface in pixels. It's a simple struct to hold width and height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    /// Straight (non premultiplied) RGBA, one byte per channel
    Rgba8,
}

/// RGBA snapshot of a surface.
#[derive(Clone)]
pub struct RgbaImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: PixelFormat,
}

impl RgbaImage {
    pub fn from_raw(pixels: Vec<u8>, width: u32, height: u32, stride: u32, format: PixelFormat) -> Result<Self> {
        if stride < width * 4 || pixels.len() < (height as usize) * (stride as usize) {
            return Err(anyhow!(
                "pixel buffer too small for {width}x{height} image with stride {stride} ({} bytes)",
                pixels.len()
            ));
        }

        Ok(Self {
            pixels,
            width,
            height,
            stride,
            format,
        })
    }

    /// Blank (transparent black) image.
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
            width,
            height,
            stride: width * 4,
            format: PixelFormat::Rgba8,
        }
    }

    /// RGBA value of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize) * (self.stride as usize) + (x as usize) * 4;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]])
    }

    /// Writes the image as an 8-bit RGBA PNG.
    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), self.width, self.height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder.write_header()?;
        let row = (self.width as usize) * 4;
        let mut data = Vec::with_capacity(row * self.height as usize);
        for y in 0..self.height as usize {
            let start = y * self.stride as usize;
            data.extend_from_slice(&self.pixels[start..start + row]);
        }
        writer.write_image_data(&data)?;
        writer.finish()?;
        Ok(())
    }
}

impl std::fmt::Debug for RgbaImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbaImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("len", &self.pixels.len())
            .finish()
    }
}

/// Type-erased surface so the engine can hold it without generics.
pub trait ErasedSurface: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn size(&self) -> SurfaceSize;
}

/// Drawing backend. Calls occur on the engine loop's task.
pub trait RenderBackend {
    /// Name of the backend, for logging
    fn name(&self) -> &str;

    /// Create a new surface with the given size.
    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn ErasedSurface + Send>>;

    /// Paint the render list, in order, onto the given surface.
    fn render(&mut self, list: &RenderList, surface: &mut dyn ErasedSurface) -> Result<()>;

    /// RGBA8 copy of the surface's current contents.
    fn snapshot(&mut self, surface: &mut dyn ErasedSurface) -> Result<RgbaImage>;
}
