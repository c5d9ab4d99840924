//! Command layer
//!
//! Commands bind media described by a manifest to live rendering resources.

mod video;

pub use video::{CommandContext, SetSourceOutcome, VideoError, VideoTextureCommand};
