//! Video texture command
//!
//! Binds a streaming video source's decoded frames to a GPU texture. The
//! lifecycle resolves the source; once it does, this command captures the
//! handle, performs the initial full upload, and keeps a per-frame refresh
//! chain rebinding the texture through `subimage` while new frames arrive.

use crate::lifecycle::{ErrorHook, LoadedHook, MediaError, MediaLifecycle, ProgressHook, SourceRef};
use crate::manifest::VideoDescriptor;
use crate::schedule::{FrameScheduler, FrameTask, RefreshToken};
use crate::texture::{RenderContext, VideoTexture};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use thiserror::Error;

/// Collaborators injected into a command at construction
pub struct CommandContext {
    /// Base media lifecycle owning the manifest and load state machine
    pub lifecycle: Rc<dyn MediaLifecycle>,
    /// Texture-handle factory
    pub render: Rc<dyn RenderContext>,
    /// Per-frame scheduler driving texture refreshes
    pub scheduler: Rc<dyn FrameScheduler>,
}

/// Result of a source-URL mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetSourceOutcome {
    /// Source and manifest updated, reload triggered
    Applied,
    /// Source updated, but no manifest video descriptor exists so no reload
    /// was triggered
    AppliedWithoutReload,
    /// No captured source yet, or the value was empty; nothing changed
    Ignored,
}

/// Playback control errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VideoError {
    #[error("no video source has been captured yet")]
    NoSource,
}

struct CommandState {
    /// Captured decoded-source handle, owned by the media pipeline
    source: Option<SourceRef>,
    texture: Box<dyn VideoTexture>,
    /// Token for the live refresh chain
    refresh: Option<RefreshToken>,
    on_loaded: Option<LoadedHook>,
    on_progress: Option<ProgressHook>,
    on_error: Option<ErrorHook>,
}

/// Command that keeps a GPU texture in step with a streaming video source
pub struct VideoTextureCommand {
    state: Rc<RefCell<CommandState>>,
    lifecycle: Rc<dyn MediaLifecycle>,
}

impl VideoTextureCommand {
    /// Create a command for the given source URL
    ///
    /// Registers a streaming video descriptor with the lifecycle and
    /// installs the loaded/progress/error hooks. The texture stays empty
    /// until the lifecycle resolves a source.
    pub fn new(ctx: CommandContext, src: impl Into<String>) -> Self {
        let CommandContext {
            lifecycle,
            render,
            scheduler,
        } = ctx;

        let src = src.into();
        log::info!("Creating video texture command for {src}");
        lifecycle.register(VideoDescriptor::streaming(src));

        let state = Rc::new(RefCell::new(CommandState {
            source: None,
            texture: render.create_texture(),
            refresh: None,
            on_loaded: None,
            on_progress: None,
            on_error: None,
        }));

        {
            let state = Rc::clone(&state);
            // Weak, or the lifecycle would own a hook that owns the
            // lifecycle
            let weak = Rc::downgrade(&lifecycle);
            let scheduler = Rc::clone(&scheduler);
            lifecycle.on_loaded(Box::new(move |source| {
                if let Some(lifecycle) = weak.upgrade() {
                    Self::handle_loaded(&state, &lifecycle, &scheduler, source);
                }
            }));
        }

        {
            let state = Rc::clone(&state);
            lifecycle.on_progress(Box::new(move |amount| {
                let hook = state.borrow_mut().on_progress.take();
                if let Some(mut hook) = hook {
                    hook(amount);
                    let mut st = state.borrow_mut();
                    if st.on_progress.is_none() {
                        st.on_progress = Some(hook);
                    }
                }
            }));
        }

        {
            let state = Rc::clone(&state);
            lifecycle.on_error(Box::new(move |err| {
                log::error!("Video source failed: {err}");
                let hook = state.borrow_mut().on_error.take();
                if let Some(mut hook) = hook {
                    hook(err);
                    let mut st = state.borrow_mut();
                    if st.on_error.is_none() {
                        st.on_error = Some(hook);
                    }
                }
            }));
        }

        Self { state, lifecycle }
    }

    /// Current source URL
    ///
    /// The captured source wins; with no source captured yet this falls
    /// back to the manifest's recorded video URL. No side effects.
    pub fn src(&self) -> Option<String> {
        let st = self.state.borrow();
        if let Some(source) = &st.source {
            return Some(source.borrow().src().to_string());
        }
        self.lifecycle
            .manifest()
            .and_then(|manifest| manifest.borrow().video_src().map(str::to_string))
    }

    /// Rewrite the source URL
    ///
    /// Updates the captured source and the manifest descriptor together,
    /// then forces a reload so the new URL takes effect. Without a manifest
    /// video descriptor the source is still updated but nothing reloads;
    /// without a captured source (or with an empty value) nothing changes.
    pub fn set_src(&mut self, value: &str) -> SetSourceOutcome {
        if value.is_empty() {
            return SetSourceOutcome::Ignored;
        }

        {
            let st = self.state.borrow();
            let Some(source) = &st.source else {
                return SetSourceOutcome::Ignored;
            };
            source.borrow_mut().set_src(value);
        }

        let Some(manifest) = self.lifecycle.manifest() else {
            return SetSourceOutcome::AppliedWithoutReload;
        };
        {
            let mut manifest = manifest.borrow_mut();
            match manifest.video.as_mut() {
                Some(video) => video.src = value.to_string(),
                None => return SetSourceOutcome::AppliedWithoutReload,
            }
        }

        // State borrows are released; the lifecycle may dispatch a new
        // loaded hook from inside load()
        self.lifecycle.reset();
        self.lifecycle.load();
        SetSourceOutcome::Applied
    }

    /// Current texture handle
    pub fn texture(&self) -> Ref<'_, dyn VideoTexture> {
        Ref::map(self.state.borrow(), |st| &*st.texture)
    }

    /// Start playback on the captured source
    pub fn play(&mut self) -> Result<&mut Self, VideoError> {
        {
            let st = self.state.borrow();
            let source = st.source.as_ref().ok_or(VideoError::NoSource)?;
            source.borrow_mut().play();
        }
        Ok(self)
    }

    /// Pause playback on the captured source
    pub fn pause(&mut self) -> Result<&mut Self, VideoError> {
        {
            let st = self.state.borrow();
            let source = st.source.as_ref().ok_or(VideoError::NoSource)?;
            source.borrow_mut().pause();
        }
        Ok(self)
    }

    /// Install a hook invoked after each source resolution
    pub fn set_on_loaded(&mut self, hook: impl FnMut(SourceRef) + 'static) {
        self.state.borrow_mut().on_loaded = Some(Box::new(hook));
    }

    /// Install a hook invoked with load progress
    pub fn set_on_progress(&mut self, hook: impl FnMut(f32) + 'static) {
        self.state.borrow_mut().on_progress = Some(Box::new(hook));
    }

    /// Install a hook invoked on load failure
    pub fn set_on_error(&mut self, hook: impl FnMut(MediaError) + 'static) {
        self.state.borrow_mut().on_error = Some(Box::new(hook));
    }

    fn handle_loaded(
        state: &Rc<RefCell<CommandState>>,
        lifecycle: &Rc<dyn MediaLifecycle>,
        scheduler: &Rc<dyn FrameScheduler>,
        source: SourceRef,
    ) {
        {
            let mut st = state.borrow_mut();

            // Capture the handle, replacing any prior source
            st.source = Some(Rc::clone(&source));

            // Initial full upload of the current frame
            let frame = source.borrow().current_frame();
            st.texture.upload(&frame);
            log::info!("Video source loaded ({}x{})", frame.width, frame.height);

            // A replaced source must not leave its refresh chain polling
            if let Some(prior) = st.refresh.take() {
                log::debug!("Cancelling stale refresh chain {}", prior.id());
                prior.cancel();
            }

            let token = RefreshToken::new();
            st.refresh = Some(token.clone());

            let task_state = Rc::clone(state);
            let task_lifecycle = Rc::clone(lifecycle);
            let task_source = Rc::clone(&source);
            scheduler.schedule(FrameTask::new(token, move || {
                // Poll readiness every frame; refresh only once fully loaded
                if !task_lifecycle.is_done_loading() {
                    return;
                }
                let frame = task_source.borrow().current_frame();
                let mut st = task_state.borrow_mut();
                let texture = std::mem::replace(
                    &mut st.texture,
                    Box::new(crate::texture::NullTexture),
                );
                st.texture = texture.subimage(&frame);
            }));
        }

        // User hook runs outside the state borrow so it may call back into
        // the command
        let hook = state.borrow_mut().on_loaded.take();
        if let Some(mut hook) = hook {
            hook(source);
            let mut st = state.borrow_mut();
            if st.on_loaded.is_none() {
                st.on_loaded = Some(hook);
            }
        }
    }
}

impl Drop for VideoTextureCommand {
    fn drop(&mut self) {
        if let Some(token) = self.state.borrow_mut().refresh.take() {
            token.cancel();
        }
    }
}
