//! Video Texture Library
//!
//! Binds a streaming video source's decoded frames to a GPU texture object
//! and exposes a small playback/control surface to a higher-level command
//! system. The media lifecycle, the rendering context, and the per-frame
//! scheduler are injected collaborators; a `wgpu`-backed texture context and
//! a host-driven repaint scheduler are provided.

pub mod command;
pub mod lifecycle;
pub mod manifest;
pub mod schedule;
pub mod source;
pub mod texture;

// Re-export commonly used types
pub use command::{CommandContext, SetSourceOutcome, VideoError, VideoTextureCommand};
pub use lifecycle::{MediaError, MediaLifecycle, SourceRef};
pub use manifest::{Manifest, MediaKind, VideoDescriptor};
pub use schedule::{FrameScheduler, FrameTask, RefreshToken, RepaintScheduler};
pub use source::VideoSource;
pub use texture::{GpuContext, NullContext, NullTexture, RenderContext, VideoFrame, VideoTexture};
