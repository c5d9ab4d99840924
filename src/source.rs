//! Decoded media source interface
//!
//! The decoding pipeline owns the source; the command only holds a shared
//! reference and drives playback through it.

use crate::texture::VideoFrame;

/// A decoded, playable media source
///
/// Implemented by the media pipeline. All methods are expected to be cheap;
/// `current_frame` returns a copy of the most recent decoded frame so the
/// caller never holds a borrow into decoder internals across a texture
/// upload.
pub trait VideoSource {
    /// Current source URL
    fn src(&self) -> &str;

    /// Rewrite the source URL
    fn set_src(&mut self, value: &str);

    /// Start playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Most recent decoded frame
    fn current_frame(&self) -> VideoFrame;
}
