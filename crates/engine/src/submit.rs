//! Batch submission: one start request per `(scene, kind)` pair.
//!
//! All start requests for a batch are issued before any status poll
//! begins. A rejected start is reported per scene, with the scene's
//! index and the server's message, and never blocks sibling scenes
//! from starting. Preconditions (empty selection, missing voice) are
//! checked before any request goes out.

use futures::future::join_all;
use uuid::Uuid;

use whisprtales_api::{ApiError, StoryApi};
use whisprtales_core::error::CoreError;
use whisprtales_core::media::GenerationMode;
use whisprtales_core::types::{SceneId, StoryId};

use crate::job::Job;

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// A batch generation request for a set of selected scenes.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub story_id: StoryId,
    /// Selected scenes in display order.
    pub scene_ids: Vec<SceneId>,
    pub mode: GenerationMode,
    /// Voice for narration; required when the mode includes audio.
    pub voice_id: Option<String>,
}

/// A scene whose start request was rejected by the backend.
#[derive(Debug, Clone)]
pub struct SceneRejection {
    /// Position of the scene within the submitted selection.
    pub index: usize,
    pub scene_id: SceneId,
    /// Server-provided, user-readable message.
    pub message: String,
}

/// Outcome of submitting one batch: the accepted jobs plus any
/// per-scene rejections.
#[derive(Debug)]
pub struct BatchSubmission {
    pub batch_id: Uuid,
    pub jobs: Vec<Job>,
    pub rejections: Vec<SceneRejection>,
}

impl BatchSubmission {
    /// Whether at least one job was accepted and needs polling.
    pub fn any_started(&self) -> bool {
        !self.jobs.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Preconditions
// ---------------------------------------------------------------------------

/// Validate a batch request before any network call.
///
/// A missing voice on an audio-including mode stops the whole batch --
/// a partially-configured job must never be submitted.
pub fn validate_request(request: &BatchRequest) -> Result<(), CoreError> {
    if request.scene_ids.is_empty() {
        return Err(CoreError::Validation(
            "Select at least one scene to generate".to_string(),
        ));
    }
    if request.mode.includes_audio()
        && request.voice_id.as_deref().map_or(true, str::is_empty)
    {
        return Err(CoreError::Validation(
            "Select a voice before generating audio".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Submit start requests for every selected scene.
///
/// Requests fan out concurrently and are all awaited before returning,
/// so the caller starts polling only after the last accept/reject came
/// back. Only a precondition violation produces an `Err`; backend
/// rejections are collected per scene in the returned submission.
pub async fn submit_batch(
    api: &StoryApi,
    request: &BatchRequest,
) -> Result<BatchSubmission, CoreError> {
    validate_request(request)?;

    let batch_id = Uuid::new_v4();
    let voice = request.voice_id.as_deref();

    let starts = request.scene_ids.iter().enumerate().map(|(index, &scene_id)| {
        let mode = request.mode;
        let story_id = request.story_id;
        async move {
            let result = start_scene(api, story_id, scene_id, mode, voice).await;
            (index, scene_id, result)
        }
    });

    let mut jobs = Vec::new();
    let mut rejections = Vec::new();

    for (index, scene_id, result) in join_all(starts).await {
        match result {
            Ok(()) => {
                jobs.push(Job::scene_media(
                    batch_id,
                    request.story_id,
                    scene_id,
                    request.mode,
                ));
            }
            Err(e) => {
                tracing::warn!(
                    story_id = request.story_id,
                    scene_id,
                    index,
                    error = %e,
                    "Scene start request rejected",
                );
                rejections.push(SceneRejection {
                    index,
                    scene_id,
                    message: rejection_message(&e),
                });
            }
        }
    }

    tracing::info!(
        batch_id = %batch_id,
        story_id = request.story_id,
        started = jobs.len(),
        rejected = rejections.len(),
        "Batch submitted",
    );

    Ok(BatchSubmission {
        batch_id,
        jobs,
        rejections,
    })
}

/// Issue the start request(s) one scene needs for the mode.
///
/// `Both` fires image and audio concurrently; the scene counts as
/// started only if every request was accepted.
async fn start_scene(
    api: &StoryApi,
    story_id: StoryId,
    scene_id: SceneId,
    mode: GenerationMode,
    voice: Option<&str>,
) -> Result<(), ApiError> {
    match mode {
        GenerationMode::Image => api.generate_image(story_id, scene_id).await,
        GenerationMode::Audio => {
            api.generate_audio(story_id, scene_id, voice.unwrap_or_default())
                .await
        }
        GenerationMode::Both => {
            let (image, audio) = tokio::join!(
                api.generate_image(story_id, scene_id),
                api.generate_audio(story_id, scene_id, voice.unwrap_or_default()),
            );
            image.and(audio)
        }
    }
}

/// Reduce an API error to the message shown next to the scene.
fn rejection_message(error: &ApiError) -> String {
    match error {
        ApiError::Api { message, .. } => message.clone(),
        ApiError::Request(_) => "Could not reach the server".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn request(mode: GenerationMode, voice: Option<&str>) -> BatchRequest {
        BatchRequest {
            story_id: 1,
            scene_ids: vec![10, 11],
            mode,
            voice_id: voice.map(String::from),
        }
    }

    #[test]
    fn empty_selection_rejected() {
        let mut req = request(GenerationMode::Image, None);
        req.scene_ids.clear();
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn image_mode_needs_no_voice() {
        assert!(validate_request(&request(GenerationMode::Image, None)).is_ok());
    }

    #[test]
    fn audio_mode_without_voice_rejected() {
        let err = validate_request(&request(GenerationMode::Audio, None)).unwrap_err();
        assert!(err.to_string().contains("voice"));
    }

    #[test]
    fn empty_voice_string_counts_as_missing() {
        assert!(validate_request(&request(GenerationMode::Both, Some(""))).is_err());
    }

    #[test]
    fn audio_mode_with_voice_accepted() {
        assert!(validate_request(&request(GenerationMode::Audio, Some("narrator-en-1"))).is_ok());
    }
}
