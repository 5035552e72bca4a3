//! Client-side job tracking for outstanding asynchronous requests.
//!
//! A [`Job`] exists only in the view that created it -- it is never
//! persisted. Dropping the owning session abandons in-flight jobs; the
//! backend keeps working regardless (fire-and-forget).

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use whisprtales_core::export::ExportFormat;
use whisprtales_core::media::GenerationMode;
use whisprtales_core::types::{DbId, SceneId, StoryId};

// ---------------------------------------------------------------------------
// Job kind
// ---------------------------------------------------------------------------

/// What a job is producing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    /// Media generation for one scene; complete when every kind the
    /// mode requires is present on the scene.
    SceneMedia(GenerationMode),
    /// A story-level export preview; complete when the preview status
    /// endpoint reports the artifact ready.
    Export(ExportFormat),
}

// ---------------------------------------------------------------------------
// Job status
// ---------------------------------------------------------------------------

/// Lifecycle state of a tracked job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Accepted by the backend, artifact not yet observed.
    Pending,
    /// The requested artifact(s) appeared in a status read.
    Complete,
    /// A status read failed, or the start request for a sibling path
    /// invalidated the batch.
    Failed,
    /// The wall-clock polling budget elapsed first.
    TimedOut,
}

impl JobStatus {
    /// Whether the job will never be polled again.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// ---------------------------------------------------------------------------
// Job
// ---------------------------------------------------------------------------

/// One outstanding asynchronous request, tracked client-side.
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    /// Batch this job belongs to (one submission = one batch).
    pub batch_id: Uuid,
    /// Story the job acts within.
    pub story_id: StoryId,
    /// The scene (media jobs) or story (export jobs) being produced for.
    pub target_id: DbId,
    pub kind: JobKind,
    /// When the start request was issued (UTC).
    pub submitted_at: DateTime<Utc>,
    pub status: JobStatus,
}

impl Job {
    /// Track a freshly accepted scene media job.
    pub fn scene_media(
        batch_id: Uuid,
        story_id: StoryId,
        scene_id: SceneId,
        mode: GenerationMode,
    ) -> Self {
        Self {
            batch_id,
            story_id,
            target_id: scene_id,
            kind: JobKind::SceneMedia(mode),
            submitted_at: Utc::now(),
            status: JobStatus::Pending,
        }
    }

    /// Track a freshly accepted export preview job.
    pub fn export(batch_id: Uuid, story_id: StoryId, format: ExportFormat) -> Self {
        Self {
            batch_id,
            story_id,
            target_id: story_id,
            kind: JobKind::Export(format),
            submitted_at: Utc::now(),
            status: JobStatus::Pending,
        }
    }

    /// Whether the job still needs polling.
    pub fn is_pending(&self) -> bool {
        self.status == JobStatus::Pending
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_jobs_start_pending() {
        let batch = Uuid::new_v4();
        let job = Job::scene_media(batch, 1, 2, GenerationMode::Image);
        assert!(job.is_pending());
        assert_eq!(job.target_id, 2);
    }

    #[test]
    fn export_jobs_target_the_story() {
        let job = Job::export(Uuid::new_v4(), 9, ExportFormat::Pdf);
        assert_eq!(job.target_id, 9);
        assert_eq!(job.kind, JobKind::Export(ExportFormat::Pdf));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(JobStatus::Complete.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
        assert!(JobStatus::TimedOut.is_terminal());
    }
}
