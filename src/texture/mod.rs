//! Texture handles for video frames
//!
//! A command keeps exactly one texture handle bound at a time. The initial
//! frame goes through a full upload; steady-state refreshes go through
//! `subimage`, which consumes the old handle and yields its successor so the
//! bind is replaced rather than mutated in place.

mod gpu;

pub use gpu::{GpuContext, GpuTexture};

/// A decoded video frame ready for GPU upload, tightly packed RGBA8
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel data, `width * height * 4` bytes
    pub data: Vec<u8>,
}

impl VideoFrame {
    /// Create a frame filled with a single color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = (width as usize) * (height as usize);
        let mut data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            data.extend_from_slice(&rgba);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Expected byte length for these dimensions
    pub fn expected_size(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// An opaque GPU texture handle bound to a command
pub trait VideoTexture {
    /// Full upload of the given frame, (re)allocating as needed
    fn upload(&mut self, frame: &VideoFrame);

    /// Partial update against an existing allocation
    ///
    /// Consumes the current handle and returns its successor; the caller
    /// rebinds to the returned handle and discards the old one.
    fn subimage(self: Box<Self>, frame: &VideoFrame) -> Box<dyn VideoTexture>;

    /// Current allocation size in pixels, `(0, 0)` before the first upload
    fn size(&self) -> (u32, u32);
}

/// Texture-handle factory provided by the rendering system
pub trait RenderContext {
    /// Create an empty texture handle
    fn create_texture(&self) -> Box<dyn VideoTexture>;
}

/// Texture handle that performs no GPU work
///
/// Stands in for a real handle on headless hosts, the same way a pool with
/// no GPU textures does.
#[derive(Debug, Default)]
pub struct NullTexture;

impl VideoTexture for NullTexture {
    fn upload(&mut self, _frame: &VideoFrame) {}

    fn subimage(self: Box<Self>, _frame: &VideoFrame) -> Box<dyn VideoTexture> {
        self
    }

    fn size(&self) -> (u32, u32) {
        (0, 0)
    }
}

/// Render context that hands out [`NullTexture`] handles
#[derive(Debug, Default)]
pub struct NullContext;

impl RenderContext for NullContext {
    fn create_texture(&self) -> Box<dyn VideoTexture> {
        Box::new(NullTexture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_frame() {
        let frame = VideoFrame::solid(4, 2, [255, 0, 0, 255]);
        assert_eq!(frame.data.len(), frame.expected_size());
        assert_eq!(&frame.data[0..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_null_texture() {
        let mut texture: Box<dyn VideoTexture> = NullContext.create_texture();
        let frame = VideoFrame::solid(2, 2, [0; 4]);
        texture.upload(&frame);
        assert_eq!(texture.size(), (0, 0));
        let texture = texture.subimage(&frame);
        assert_eq!(texture.size(), (0, 0));
    }
}
