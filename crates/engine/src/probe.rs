//! Status-read seam between the poller and the REST API.
//!
//! The poller only needs to ask "is this job done yet?"; everything
//! else about the transport stays behind [`JobProbe`]. Tests substitute
//! in-memory fakes; production uses [`StoryApi`].

use async_trait::async_trait;
use whisprtales_api::{ApiError, StoryApi};
use whisprtales_core::media::mode_satisfied;

use crate::job::{Job, JobKind};

/// Issues one fresh status read for a job.
///
/// A read must never resubmit the job -- each call is a GET against the
/// corresponding read endpoint.
#[async_trait]
pub trait JobProbe: Send + Sync {
    /// Whether the job's requested artifact(s) are present.
    async fn is_complete(&self, job: &Job) -> Result<bool, ApiError>;
}

#[async_trait]
impl JobProbe for StoryApi {
    async fn is_complete(&self, job: &Job) -> Result<bool, ApiError> {
        match job.kind {
            JobKind::SceneMedia(mode) => {
                let scene = self.get_scene(job.story_id, job.target_id).await?;
                Ok(mode_satisfied(mode, &scene.present_kinds()))
            }
            JobKind::Export(format) => {
                let status = self.preview_status(job.story_id, format).await?;
                Ok(status.is_complete())
            }
        }
    }
}
