//! Engine events broadcast to UI subscribers.
//!
//! Every user-visible outcome of the engine -- batch lifecycle, per-scene
//! rejections, credit refreshes, finished exports -- is delivered as an
//! [`EngineEvent`] on a [`tokio::sync::broadcast`] channel owned by the
//! session. The presentation layer renders them as toasts/banners; none
//! are fatal, and after any of them the view is back in an actionable
//! idle state.

use serde::Serialize;
use uuid::Uuid;

use whisprtales_core::export::ExportFormat;
use whisprtales_core::notices;
use whisprtales_core::types::{SceneId, StoryId};

/// A user-facing engine notification.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A batch was accepted and polling has started.
    BatchStarted { batch_id: Uuid, job_count: usize },

    /// One scene's start request was rejected; siblings kept going.
    SceneRejected {
        batch_id: Uuid,
        /// Position of the scene within the submitted selection.
        scene_index: usize,
        scene_id: SceneId,
        /// Server-provided, user-readable message.
        message: String,
    },

    /// Every job in the batch completed.
    BatchCompleted { batch_id: Uuid },

    /// A status read failed; one generic failure for the whole batch.
    BatchFailed { batch_id: Uuid, message: String },

    /// The polling budget elapsed with jobs still pending.
    BatchTimedOut { batch_id: Uuid },

    /// The credit balance was re-fetched from the backend.
    CreditsRefreshed { remaining: f64 },

    /// An export preview finished and can be downloaded.
    ExportReady {
        story_id: StoryId,
        format: ExportFormat,
        url: Option<String>,
    },
}

impl EngineEvent {
    /// Stable message-type identifier for toast deduplication.
    pub fn message_type(&self) -> &'static str {
        match self {
            Self::BatchStarted { .. } => notices::MSG_TYPE_BATCH_STARTED,
            Self::SceneRejected { .. } => notices::MSG_TYPE_SCENE_REJECTED,
            Self::BatchCompleted { .. } => notices::MSG_TYPE_BATCH_COMPLETED,
            Self::BatchFailed { .. } => notices::MSG_TYPE_BATCH_FAILED,
            Self::BatchTimedOut { .. } => notices::MSG_TYPE_BATCH_TIMED_OUT,
            Self::CreditsRefreshed { .. } => notices::MSG_TYPE_CREDITS_REFRESHED,
            Self::ExportReady { .. } => notices::MSG_TYPE_EXPORT_READY,
        }
    }
}
