//! Media kinds, generation modes, and the per-kind completion predicate.
//!
//! A scene generation job is complete only when every artifact kind the
//! user asked for is present in a single status read -- a job requesting
//! both image and audio must keep polling while only one of the two has
//! appeared.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Media kinds
// ---------------------------------------------------------------------------

/// An artifact kind attached to a scene by the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Audio,
}

impl MediaKind {
    /// Wire value used in the scene `media` array (`media_type` field).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Audio => "audio",
        }
    }

    /// Parse a wire `media_type` value. Unknown values yield `None`
    /// rather than an error -- the backend may attach kinds this client
    /// does not generate (e.g. video previews).
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "image" => Some(Self::Image),
            "audio" => Some(Self::Audio),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Generation modes
// ---------------------------------------------------------------------------

/// What the user asked to generate for the selected scenes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    Image,
    Audio,
    Both,
}

impl GenerationMode {
    /// The artifact kinds that must all be present before a scene job
    /// in this mode counts as complete.
    pub fn required_kinds(self) -> &'static [MediaKind] {
        match self {
            Self::Image => &[MediaKind::Image],
            Self::Audio => &[MediaKind::Audio],
            Self::Both => &[MediaKind::Image, MediaKind::Audio],
        }
    }

    /// Whether this mode involves audio generation (and therefore
    /// requires a voice to be selected before submission).
    pub fn includes_audio(self) -> bool {
        matches!(self, Self::Audio | Self::Both)
    }

    /// Whether this mode involves image generation.
    pub fn includes_image(self) -> bool {
        matches!(self, Self::Image | Self::Both)
    }
}

// ---------------------------------------------------------------------------
// Completion predicate
// ---------------------------------------------------------------------------

/// Decide whether a single status read satisfies `mode`.
///
/// `present` is the set of artifact kinds observed in the scene's media
/// array during one read. Every kind required by the mode must appear;
/// extra kinds are ignored.
pub fn mode_satisfied(mode: GenerationMode, present: &[MediaKind]) -> bool {
    mode.required_kinds()
        .iter()
        .all(|kind| present.contains(kind))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Wire parsing --

    #[test]
    fn from_wire_known_kinds() {
        assert_eq!(MediaKind::from_wire("image"), Some(MediaKind::Image));
        assert_eq!(MediaKind::from_wire("audio"), Some(MediaKind::Audio));
    }

    #[test]
    fn from_wire_unknown_kind_is_none() {
        assert_eq!(MediaKind::from_wire("video"), None);
        assert_eq!(MediaKind::from_wire(""), None);
    }

    #[test]
    fn as_str_round_trips() {
        for kind in [MediaKind::Image, MediaKind::Audio] {
            assert_eq!(MediaKind::from_wire(kind.as_str()), Some(kind));
        }
    }

    // -- Required kinds --

    #[test]
    fn both_requires_two_kinds() {
        assert_eq!(
            GenerationMode::Both.required_kinds(),
            &[MediaKind::Image, MediaKind::Audio]
        );
    }

    #[test]
    fn audio_mode_includes_audio() {
        assert!(GenerationMode::Audio.includes_audio());
        assert!(GenerationMode::Both.includes_audio());
        assert!(!GenerationMode::Image.includes_audio());
    }

    // -- Completion predicate --

    #[test]
    fn image_mode_satisfied_by_image() {
        assert!(mode_satisfied(GenerationMode::Image, &[MediaKind::Image]));
    }

    #[test]
    fn image_mode_not_satisfied_by_audio_only() {
        assert!(!mode_satisfied(GenerationMode::Image, &[MediaKind::Audio]));
    }

    #[test]
    fn both_mode_not_satisfied_by_single_kind() {
        assert!(!mode_satisfied(GenerationMode::Both, &[MediaKind::Image]));
        assert!(!mode_satisfied(GenerationMode::Both, &[MediaKind::Audio]));
    }

    #[test]
    fn both_mode_satisfied_when_both_present() {
        assert!(mode_satisfied(
            GenerationMode::Both,
            &[MediaKind::Audio, MediaKind::Image]
        ));
    }

    #[test]
    fn empty_read_satisfies_nothing() {
        assert!(!mode_satisfied(GenerationMode::Image, &[]));
        assert!(!mode_satisfied(GenerationMode::Audio, &[]));
        assert!(!mode_satisfied(GenerationMode::Both, &[]));
    }

    #[test]
    fn extra_kinds_are_ignored() {
        // A read may contain kinds beyond what was requested.
        assert!(mode_satisfied(
            GenerationMode::Audio,
            &[MediaKind::Image, MediaKind::Audio]
        ));
    }
}
