//! End-to-end orchestration of one view's generation flows.
//!
//! [`GenerationSession`] owns the pieces a story view needs: the credit
//! gate, precondition checks, batch submission, the poll loop, the
//! global "generating" flag, and the post-completion credit refresh.
//! Outcomes are broadcast as [`EngineEvent`]s; subscribers render them
//! as toasts. One session maps to one view; tearing the view down calls
//! [`shutdown`](GenerationSession::shutdown), which cancels any active
//! watch. Server-side work is never cancelled -- jobs are
//! fire-and-forget once accepted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use whisprtales_api::{ApiError, StoryApi};
use whisprtales_core::error::CoreError;
use whisprtales_core::estimation::{check_balance, Pricing};
use whisprtales_core::export::ExportFormat;
use whisprtales_core::media::GenerationMode;
use whisprtales_core::types::{SceneId, StoryId};

use crate::events::EngineEvent;
use crate::job::Job;
use crate::poller::{watch_batch, PollConfig, PollOutcome};
use crate::submit::{submit_batch, BatchRequest, SceneRejection};

/// Broadcast channel capacity for engine events.
const EVENT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// Request / report types
// ---------------------------------------------------------------------------

/// One selected scene as the view knows it.
#[derive(Debug, Clone)]
pub struct SceneInput {
    pub id: SceneId,
    /// Length of the scene's content, the unit priced for narration.
    pub char_count: usize,
}

/// A request to generate media for the current selection.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub story_id: StoryId,
    /// Selected scenes in display order.
    pub scenes: Vec<SceneInput>,
    pub mode: GenerationMode,
    /// Voice for narration; required when the mode includes audio.
    pub voice_id: Option<String>,
}

/// What happened to one generation batch.
#[derive(Debug)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub outcome: PollOutcome,
    /// Final job states, including per-scene completion.
    pub jobs: Vec<Job>,
    /// Scenes whose start request the backend rejected.
    pub rejections: Vec<SceneRejection>,
}

/// What happened to one export preview.
#[derive(Debug)]
pub struct ExportReport {
    pub outcome: PollOutcome,
    /// Download URL, when the export completed.
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by session entry points.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A batch is already running; further submission is disabled until
    /// it resolves.
    #[error("A generation batch is already running")]
    Busy,

    /// A precondition failed before any network call.
    #[error(transparent)]
    Precondition(#[from] CoreError),

    /// A request outside the poll loop failed (profile fetch, export
    /// start).
    #[error(transparent)]
    Api(#[from] ApiError),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Orchestrates generation batches and export previews for one view.
///
/// Created once per view via [`GenerationSession::new`]; the returned
/// `Arc` can be cheaply cloned into UI tasks.
pub struct GenerationSession {
    api: Arc<StoryApi>,
    pricing: Pricing,
    poll_config: PollConfig,
    event_tx: broadcast::Sender<EngineEvent>,
    /// Global "generating" flag: set while a batch is in flight,
    /// cleared on every terminal path so the user can always retry.
    generating: AtomicBool,
    /// Last fetched credit balance. Display-only: refreshed from the
    /// backend, never decremented locally, so it stays stale while a
    /// batch is in flight.
    balance: RwLock<Option<f64>>,
    /// Cancelled on shutdown; each watch runs on a child token.
    cancel: CancellationToken,
}

impl GenerationSession {
    /// Create a session with default pricing and polling policy.
    pub fn new(api: Arc<StoryApi>) -> Arc<Self> {
        Self::with_config(api, Pricing::default(), PollConfig::default())
    }

    /// Create a session with explicit pricing and polling parameters.
    pub fn with_config(api: Arc<StoryApi>, pricing: Pricing, poll_config: PollConfig) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            api,
            pricing,
            poll_config,
            event_tx,
            generating: AtomicBool::new(false),
            balance: RwLock::new(None),
            cancel: CancellationToken::new(),
        })
    }

    /// Subscribe to engine events (toasts, refresh signals).
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Whether a batch is currently in flight.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    /// Last fetched credit balance, if any.
    pub async fn cached_balance(&self) -> Option<f64> {
        *self.balance.read().await
    }

    /// Stop any active watch. Called on view teardown; in-flight
    /// backend jobs keep running server-side.
    pub fn shutdown(&self) {
        tracing::info!("Shutting down generation session");
        self.cancel.cancel();
    }

    /// Re-fetch the credit balance from the backend and broadcast it.
    pub async fn refresh_credits(&self) -> Result<f64, ApiError> {
        let profile = self.api.get_profile().await?;
        let remaining = profile.credits.credits_remaining;

        *self.balance.write().await = Some(remaining);
        self.emit(EngineEvent::CreditsRefreshed { remaining });
        tracing::debug!(remaining, "Credit balance refreshed");
        Ok(remaining)
    }

    // ---- generation ----

    /// Run one generation batch for the current selection.
    ///
    /// Precondition failures (empty selection, missing voice,
    /// insufficient credits) return before any start request is issued.
    /// Backend rejections are reported per scene and do not stop
    /// sibling scenes. The call resolves when the batch reaches a
    /// terminal state; the generating flag is clear again on every
    /// path.
    pub async fn generate(&self, request: GenerateRequest) -> Result<BatchReport, SessionError> {
        self.generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SessionError::Busy)?;

        let result = self.generate_inner(request).await;
        self.generating.store(false, Ordering::SeqCst);
        result
    }

    async fn generate_inner(&self, request: GenerateRequest) -> Result<BatchReport, SessionError> {
        let batch_request = BatchRequest {
            story_id: request.story_id,
            scene_ids: request.scenes.iter().map(|scene| scene.id).collect(),
            mode: request.mode,
            voice_id: request.voice_id,
        };
        crate::submit::validate_request(&batch_request)?;

        // Advisory credit gate; the backend re-prices authoritatively.
        let char_counts: Vec<usize> = request.scenes.iter().map(|s| s.char_count).collect();
        let estimate = self.pricing.cost(request.mode, &char_counts);
        let available = self.current_balance().await?;
        check_balance(available, estimate)?;

        let submission = submit_batch(&self.api, &batch_request).await?;
        for rejection in &submission.rejections {
            self.emit(EngineEvent::SceneRejected {
                batch_id: submission.batch_id,
                scene_index: rejection.index,
                scene_id: rejection.scene_id,
                message: rejection.message.clone(),
            });
        }

        if !submission.any_started() {
            return Ok(BatchReport {
                batch_id: submission.batch_id,
                outcome: PollOutcome::Failed {
                    message: "No generation jobs were started".to_string(),
                },
                jobs: Vec::new(),
                rejections: submission.rejections,
            });
        }

        self.emit(EngineEvent::BatchStarted {
            batch_id: submission.batch_id,
            job_count: submission.jobs.len(),
        });

        let mut jobs = submission.jobs;
        let watch_cancel = self.cancel.child_token();
        let outcome =
            watch_batch(self.api.as_ref(), &mut jobs, &self.poll_config, &watch_cancel).await;

        match &outcome {
            PollOutcome::Completed => {
                if let Err(e) = self.refresh_credits().await {
                    tracing::warn!(error = %e, "Credit refresh after completion failed");
                }
                self.emit(EngineEvent::BatchCompleted {
                    batch_id: submission.batch_id,
                });
            }
            PollOutcome::Failed { message } => {
                self.emit(EngineEvent::BatchFailed {
                    batch_id: submission.batch_id,
                    message: message.clone(),
                });
            }
            PollOutcome::TimedOut => {
                self.emit(EngineEvent::BatchTimedOut {
                    batch_id: submission.batch_id,
                });
            }
            PollOutcome::Cancelled => {}
        }

        Ok(BatchReport {
            batch_id: submission.batch_id,
            outcome,
            jobs,
            rejections: submission.rejections,
        })
    }

    // ---- export previews ----

    /// Start an export preview and watch it to a terminal state.
    pub async fn export_preview(
        &self,
        story_id: StoryId,
        format: ExportFormat,
        sub_format: Option<&str>,
    ) -> Result<ExportReport, SessionError> {
        self.generating
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| SessionError::Busy)?;

        let result = self.export_inner(story_id, format, sub_format).await;
        self.generating.store(false, Ordering::SeqCst);
        result
    }

    async fn export_inner(
        &self,
        story_id: StoryId,
        format: ExportFormat,
        sub_format: Option<&str>,
    ) -> Result<ExportReport, SessionError> {
        self.api.start_preview(story_id, format, sub_format).await?;

        let batch_id = Uuid::new_v4();
        let mut jobs = vec![Job::export(batch_id, story_id, format)];
        let watch_cancel = self.cancel.child_token();
        let outcome =
            watch_batch(self.api.as_ref(), &mut jobs, &self.poll_config, &watch_cancel).await;

        let url = match &outcome {
            PollOutcome::Completed => {
                // One more fresh read to pick up the artifact URL.
                let url = self
                    .api
                    .preview_status(story_id, format)
                    .await
                    .ok()
                    .and_then(|status| status.url);

                if let Err(e) = self.refresh_credits().await {
                    tracing::warn!(error = %e, "Credit refresh after export failed");
                }
                self.emit(EngineEvent::ExportReady {
                    story_id,
                    format,
                    url: url.clone(),
                });
                url
            }
            PollOutcome::Failed { message } => {
                self.emit(EngineEvent::BatchFailed {
                    batch_id,
                    message: message.clone(),
                });
                None
            }
            PollOutcome::TimedOut => {
                self.emit(EngineEvent::BatchTimedOut { batch_id });
                None
            }
            PollOutcome::Cancelled => None,
        };

        Ok(ExportReport { outcome, url })
    }

    // ---- private helpers ----

    /// Cached balance, fetching it once if the session has none yet.
    async fn current_balance(&self) -> Result<f64, ApiError> {
        if let Some(balance) = *self.balance.read().await {
            return Ok(balance);
        }
        self.refresh_credits().await
    }

    /// Broadcast an event. Zero receivers is fine -- a headless caller
    /// may rely solely on the returned report.
    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}
