//! wgpu-backed texture handles
//!
//! Frames arrive as tightly packed RGBA8, so uploads go straight through
//! `Queue::write_texture`. A handle reallocates only when the frame
//! dimensions change; the steady-state `subimage` path writes into the
//! existing allocation.

use super::{RenderContext, VideoFrame, VideoTexture};
use anyhow::{anyhow, Result};
use std::rc::Rc;

struct GpuShared {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

/// Rendering context that creates GPU texture handles
pub struct GpuContext {
    shared: Rc<GpuShared>,
}

impl GpuContext {
    /// Acquire a device from the default adapter
    pub fn new() -> Result<Self> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

        let adapter = pollster::block_on(
            instance.request_adapter(&wgpu::RequestAdapterOptions::default()),
        )
        .ok_or_else(|| anyhow!("No suitable GPU adapter found"))?;

        log::info!("Using GPU adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Video Texture Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
            },
            None,
        ))?;

        Ok(Self::from_device(device, queue))
    }

    /// Wrap an existing device and queue
    pub fn from_device(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self {
            shared: Rc::new(GpuShared { device, queue }),
        }
    }
}

impl RenderContext for GpuContext {
    fn create_texture(&self) -> Box<dyn VideoTexture> {
        Box::new(GpuTexture {
            shared: Rc::clone(&self.shared),
            texture: None,
            view: None,
            width: 0,
            height: 0,
        })
    }
}

/// GPU texture handle holding the current video frame
pub struct GpuTexture {
    shared: Rc<GpuShared>,
    texture: Option<wgpu::Texture>,
    view: Option<wgpu::TextureView>,
    width: u32,
    height: u32,
}

impl GpuTexture {
    /// Texture view for binding into a render pass, `None` before the first
    /// upload
    pub fn view(&self) -> Option<&wgpu::TextureView> {
        self.view.as_ref()
    }

    fn allocate(&mut self, width: u32, height: u32) {
        let texture = self.shared.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Video Frame Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.view = Some(texture.create_view(&wgpu::TextureViewDescriptor::default()));
        self.texture = Some(texture);
        self.width = width;
        self.height = height;
    }

    fn write(&self, frame: &VideoFrame) {
        let Some(texture) = &self.texture else {
            return;
        };

        if frame.data.len() < frame.expected_size() {
            log::warn!(
                "Frame data too short: {} bytes, expected {}",
                frame.data.len(),
                frame.expected_size()
            );
            return;
        }

        self.shared.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &frame.data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(frame.width * 4),
                rows_per_image: None,
            },
            wgpu::Extent3d {
                width: frame.width,
                height: frame.height,
                depth_or_array_layers: 1,
            },
        );
    }
}

impl VideoTexture for GpuTexture {
    fn upload(&mut self, frame: &VideoFrame) {
        if frame.width == 0 || frame.height == 0 {
            return;
        }
        if self.texture.is_none() || self.width != frame.width || self.height != frame.height {
            self.allocate(frame.width, frame.height);
        }
        self.write(frame);
    }

    fn subimage(mut self: Box<Self>, frame: &VideoFrame) -> Box<dyn VideoTexture> {
        if self.texture.is_some() && self.width == frame.width && self.height == frame.height {
            self.write(frame);
        } else {
            // Dimension change forces the full path
            self.upload(frame);
        }
        self
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
