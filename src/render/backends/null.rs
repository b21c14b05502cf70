use crate::render::backend::{ErasedSurface, RenderBackend, RgbaImage, SurfaceSize};
use crate::render::RenderList;
use anyhow::{anyhow, Result};
use std::any::Any;

/// Backend that does not paint anything. It only counts frames and display items, which makes
/// it the backend of choice for headless runs and tests.
#[derive(Debug, Default)]
pub struct NullBackend {
    frames: u64,
    items: u64,
}

impl NullBackend {
    /// Creates a new instance of the null backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered through this backend.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Display items consumed across all frames.
    pub fn items(&self) -> u64 {
        self.items
    }
}

impl RenderBackend for NullBackend {
    fn name(&self) -> &str {
        "NullBackend"
    }

    fn create_surface(&self, size: SurfaceSize) -> Result<Box<dyn ErasedSurface + Send>> {
        Ok(Box::new(NullSurface::new(size)))
    }

    fn render(&mut self, list: &RenderList, surface: &mut dyn ErasedSurface) -> Result<()> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<NullSurface>()
            .ok_or_else(|| anyhow!("NullBackend used with non-Null surface"))?;

        s.frame_id = s.frame_id.wrapping_add(1);
        self.frames += 1;
        self.items += list.len() as u64;
        Ok(())
    }

    fn snapshot(&mut self, surface: &mut dyn ErasedSurface) -> Result<RgbaImage> {
        let s = surface
            .as_any_mut()
            .downcast_mut::<NullSurface>()
            .ok_or_else(|| anyhow!("NullBackend used with non-Null surface"))?;

        Ok(RgbaImage::blank(s.size.width, s.size.height))
    }
}

pub struct NullSurface {
    /// Size of the surface in pixels.
    pub size: SurfaceSize,
    /// Frame ID for the surface, used to track rendering frames.
    frame_id: u64,
}

impl NullSurface {
    pub fn new(size: SurfaceSize) -> Self {
        Self { size, frame_id: 0 }
    }

    pub fn frame_id(&self) -> u64 {
        self.frame_id
    }
}

impl ErasedSurface for NullSurface {
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
    use crate::render::{Color, DisplayItem, Fill};

    struct OtherSurface;

    impl ErasedSurface for OtherSurface {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
        fn size(&self) -> SurfaceSize {
            SurfaceSize::new(1, 1)
        }
    }

    #[test]
    fn counts_frames_and_items() {
        let mut backend = NullBackend::new();
        let mut surface = backend.create_surface(SurfaceSize::new(64, 32)).unwrap();

        let mut list = RenderList::new();
        list.add_command(DisplayItem::Rect {
            x: 0.0,
            y: 0.0,
            w: 64.0,
            h: 32.0,
            fill: Fill::Solid(Color::from_rgb24(0x000000)),
        });

        backend.render(&list, surface.as_mut()).unwrap();
        backend.render(&list, surface.as_mut()).unwrap();
        assert_eq!(backend.frames(), 2);
        assert_eq!(backend.items(), 2);

        let null = surface.as_any().downcast_ref::<NullSurface>().unwrap();
        assert_eq!(null.frame_id(), 2);

        let img = backend.snapshot(surface.as_mut()).unwrap();
        assert_eq!((img.width, img.height, img.pixels.len()), (64, 32, 64 * 32 * 4));
    }

    #[test]
    fn rejects_foreign_surfaces() {
        let mut backend = NullBackend::new();
        let mut other = OtherSurface;
        assert!(backend.render(&RenderList::new(), &mut other).is_err());
        assert!(backend.snapshot(&mut other).is_err());
    }
}
