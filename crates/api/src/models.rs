//! Wire models for the WhisprTales REST API.

use serde::Deserialize;
use whisprtales_core::media::MediaKind;
use whisprtales_core::types::{DbId, SceneId};

// ---------------------------------------------------------------------------
// Scenes and media
// ---------------------------------------------------------------------------

/// One generated artifact attached to a scene.
#[derive(Debug, Clone, Deserialize)]
pub struct MediaItem {
    /// Wire media type, e.g. `"image"` or `"audio"`.
    pub media_type: String,
    /// Download URL of the artifact.
    pub url: String,
}

impl MediaItem {
    /// The parsed media kind, or `None` for kinds this client does not
    /// track.
    pub fn kind(&self) -> Option<MediaKind> {
        MediaKind::from_wire(&self.media_type)
    }
}

/// A scene as returned by `GET /stories/{id}/scenes/{scene_id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub id: SceneId,
    /// Scene text, the unit priced for audio narration.
    #[serde(default)]
    pub content: String,
    /// Generated artifacts. Presence of an entry of the requested kind
    /// is the completion signal for a generation job.
    #[serde(default)]
    pub media: Vec<MediaItem>,
}

impl Scene {
    /// The artifact kinds present on this scene, one status read's worth.
    pub fn present_kinds(&self) -> Vec<MediaKind> {
        self.media.iter().filter_map(MediaItem::kind).collect()
    }
}

// ---------------------------------------------------------------------------
// Export previews
// ---------------------------------------------------------------------------

/// Response of `GET /stories/{id}/preview-status/{format}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct PreviewStatus {
    /// Export job status; `"complete"` means the artifact is ready.
    pub status: String,
    /// Download URL, present once the export is complete.
    #[serde(default)]
    pub url: Option<String>,
    /// Echo of the requested format.
    #[serde(default)]
    pub format: Option<String>,
}

/// Wire value of [`PreviewStatus::status`] for a finished export.
pub const PREVIEW_STATUS_COMPLETE: &str = "complete";

impl PreviewStatus {
    /// Whether the export artifact is ready for download.
    pub fn is_complete(&self) -> bool {
        self.status == PREVIEW_STATUS_COMPLETE
    }
}

// ---------------------------------------------------------------------------
// Profile and credits
// ---------------------------------------------------------------------------

/// Credit subsection of the profile payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditSummary {
    /// Server-authoritative remaining balance.
    pub credits_remaining: f64,
}

/// Response of `GET /profile/`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    pub id: DbId,
    pub credits: CreditSummary,
    /// Preferred UI language, when the user has set one.
    #[serde(default)]
    pub language: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_parses_with_media() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "id": 7,
                "content": "Once upon a time",
                "media": [
                    {"media_type": "image", "url": "https://cdn.example/img.png"},
                    {"media_type": "audio", "url": "https://cdn.example/clip.mp3"}
                ]
            }"#,
        )
        .expect("scene should parse");

        assert_eq!(scene.id, 7);
        assert_eq!(
            scene.present_kinds(),
            vec![MediaKind::Image, MediaKind::Audio]
        );
    }

    #[test]
    fn scene_defaults_missing_fields() {
        let scene: Scene = serde_json::from_str(r#"{"id": 1}"#).expect("scene should parse");
        assert!(scene.content.is_empty());
        assert!(scene.media.is_empty());
        assert!(scene.present_kinds().is_empty());
    }

    #[test]
    fn unknown_media_types_are_skipped() {
        let scene: Scene = serde_json::from_str(
            r#"{
                "id": 2,
                "media": [
                    {"media_type": "video", "url": "https://cdn.example/v.mp4"},
                    {"media_type": "audio", "url": "https://cdn.example/a.mp3"}
                ]
            }"#,
        )
        .expect("scene should parse");
        assert_eq!(scene.present_kinds(), vec![MediaKind::Audio]);
    }

    #[test]
    fn preview_status_complete() {
        let status: PreviewStatus = serde_json::from_str(
            r#"{"status": "complete", "url": "https://cdn.example/story.pdf", "format": "pdf"}"#,
        )
        .expect("status should parse");
        assert!(status.is_complete());
        assert_eq!(status.url.as_deref(), Some("https://cdn.example/story.pdf"));
    }

    #[test]
    fn preview_status_pending_has_no_url() {
        let status: PreviewStatus =
            serde_json::from_str(r#"{"status": "processing"}"#).expect("status should parse");
        assert!(!status.is_complete());
        assert!(status.url.is_none());
    }

    #[test]
    fn profile_parses_credits() {
        let profile: Profile = serde_json::from_str(
            r#"{"id": 3, "credits": {"credits_remaining": 41.5}, "language": "en"}"#,
        )
        .expect("profile should parse");
        assert!((profile.credits.credits_remaining - 41.5).abs() < f64::EPSILON);
        assert_eq!(profile.language.as_deref(), Some("en"));
    }
}
