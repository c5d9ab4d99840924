//! Media lifecycle interface
//!
//! Boundary to the base media-command system that owns manifest loading and
//! source resolution. The command composes over this trait instead of
//! inheriting from a base class: it registers a descriptor at construction,
//! installs hooks, and drives reload through `reset`/`load`.

use crate::manifest::{Manifest, VideoDescriptor};
use crate::source::VideoSource;
use std::cell::RefCell;
use std::rc::Rc;
use thiserror::Error;

/// Shared handle to the currently decoded source
///
/// Ownership stays with the media pipeline; the command only clones the
/// reference handed to its loaded hook.
pub type SourceRef = Rc<RefCell<dyn VideoSource>>;

/// Hook invoked when a source finishes loading
pub type LoadedHook = Box<dyn FnMut(SourceRef)>;

/// Hook invoked with load progress in the 0.0 to 1.0 range
pub type ProgressHook = Box<dyn FnMut(f32)>;

/// Hook invoked when loading fails
pub type ErrorHook = Box<dyn FnMut(MediaError)>;

/// Failure delivered to the error hook
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("media source failed to load: {0}")]
    LoadFailed(String),
    #[error("unsupported media type: {0}")]
    Unsupported(String),
}

/// The base media-command lifecycle
///
/// Methods take `&self`; implementations are expected to use interior
/// mutability, matching the single-threaded cooperative execution model.
pub trait MediaLifecycle {
    /// Register the typed media descriptor this command is built around
    fn register(&self, descriptor: VideoDescriptor);

    /// The manifest backing this command, if one has been established
    fn manifest(&self) -> Option<Rc<RefCell<Manifest>>>;

    /// Whether the media has fully finished loading
    fn is_done_loading(&self) -> bool;

    /// Reset the load state machine
    fn reset(&self);

    /// Begin (re)loading the described media
    fn load(&self);

    /// Install the hook dispatched once per successful source resolution
    fn on_loaded(&self, hook: LoadedHook);

    /// Install the load-progress hook
    fn on_progress(&self, hook: ProgressHook);

    /// Install the load-failure hook
    fn on_error(&self, hook: ErrorHook);
}
