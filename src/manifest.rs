//! Manifest records for media resources
//!
//! A manifest describes the media a command is bound to. It is owned by the
//! media lifecycle and shared with the command, which keeps the recorded
//! video URL in step with the live source.

use serde::{Deserialize, Serialize};

/// Media kinds the command system can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// Streaming video
    #[default]
    Video,
    /// Still image
    Image,
}

impl MediaKind {
    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
        }
    }
}

/// Typed media descriptor registered with the lifecycle at construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    /// Whether the source is streamed rather than fully buffered
    pub stream: bool,
    /// Media kind
    #[serde(rename = "type")]
    pub kind: MediaKind,
    /// Source URL
    pub src: String,
}

impl VideoDescriptor {
    /// Create a streaming video descriptor for the given URL
    pub fn streaming(src: impl Into<String>) -> Self {
        Self {
            stream: true,
            kind: MediaKind::Video,
            src: src.into(),
        }
    }
}

/// Configuration record describing the media a command is bound to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Video descriptor, if this manifest describes a video
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoDescriptor>,
}

impl Manifest {
    /// Create a manifest holding the given video descriptor
    pub fn with_video(descriptor: VideoDescriptor) -> Self {
        Self {
            video: Some(descriptor),
        }
    }

    /// Get the recorded video URL, if any
    pub fn video_src(&self) -> Option<&str> {
        self.video.as_ref().map(|v| v.src.as_str())
    }

    /// Load a manifest from a JSON string
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the manifest to a JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_streaming_descriptor() {
        let descriptor = VideoDescriptor::streaming("clip.mp4");
        assert!(descriptor.stream);
        assert_eq!(descriptor.kind, MediaKind::Video);
        assert_eq!(descriptor.src, "clip.mp4");
    }

    #[test]
    fn test_manifest_json_round_trip() {
        let manifest = Manifest::with_video(VideoDescriptor::streaming("a.mp4"));
        let json = manifest.to_json().unwrap();
        assert!(json.contains("\"type\":\"video\""));

        let parsed = Manifest::from_json(&json).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn test_video_src_fallback() {
        let empty = Manifest::default();
        assert_eq!(empty.video_src(), None);

        let manifest = Manifest::with_video(VideoDescriptor::streaming("b.mp4"));
        assert_eq!(manifest.video_src(), Some("b.mp4"));
    }
}
