//! Story export formats and the preview endpoint path mapping.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Format constants
// ---------------------------------------------------------------------------

/// PDF document export.
pub const FORMAT_PDF: &str = "pdf";
/// Editable document export.
pub const FORMAT_DOCUMENT: &str = "document";
/// Narrated audio export.
pub const FORMAT_AUDIO: &str = "audio";
/// Rendered video export.
pub const FORMAT_VIDEO: &str = "video";

/// All valid export formats.
pub const VALID_EXPORT_FORMATS: &[&str] =
    &[FORMAT_PDF, FORMAT_DOCUMENT, FORMAT_AUDIO, FORMAT_VIDEO];

// ---------------------------------------------------------------------------
// Export format
// ---------------------------------------------------------------------------

/// A story-level export target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Pdf,
    Document,
    Audio,
    Video,
}

impl ExportFormat {
    /// Path segment used in the preview endpoints.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => FORMAT_PDF,
            Self::Document => FORMAT_DOCUMENT,
            Self::Audio => FORMAT_AUDIO,
            Self::Video => FORMAT_VIDEO,
        }
    }

    /// Parse a format path segment.
    pub fn from_str_value(value: &str) -> Result<Self, CoreError> {
        match value {
            FORMAT_PDF => Ok(Self::Pdf),
            FORMAT_DOCUMENT => Ok(Self::Document),
            FORMAT_AUDIO => Ok(Self::Audio),
            FORMAT_VIDEO => Ok(Self::Video),
            other => Err(CoreError::Validation(format!(
                "Unknown export format '{other}'. Must be one of: {}",
                VALID_EXPORT_FORMATS.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
