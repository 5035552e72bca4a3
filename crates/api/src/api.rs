//! REST API client for the WhisprTales backend endpoints.
//!
//! Wraps the backend HTTP API (scene media generation, scene reads,
//! export previews, profile lookup) using [`reqwest`]. A 2xx response
//! to a generation endpoint means "accepted for processing", not
//! "complete" -- completion is observed by polling the corresponding
//! read endpoint.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Method;
use serde::Deserialize;
use whisprtales_core::export::ExportFormat;
use whisprtales_core::types::{SceneId, StoryId};

use crate::auth::TokenProvider;
use crate::config::ClientConfig;
use crate::models::{PreviewStatus, Profile, Scene};

/// HTTP client for the WhisprTales API.
///
/// Constructed with the base URL and a [`TokenProvider`]; holds no
/// global state. Cheap to share behind an `Arc`.
pub struct StoryApi {
    client: reqwest::Client,
    api_url: String,
    token_provider: Arc<dyn TokenProvider>,
}

/// Errors from the WhisprTales REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code. `message` is the
    /// server's `error` field when the body had one, else the raw body.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Human-readable message for display to the user.
        message: String,
    },
}

/// Error body shape used by the backend for non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

impl StoryApi {
    /// Create a new API client.
    ///
    /// * `api_url` - base URL without a trailing slash.
    /// * `token_provider` - supplies the bearer token per request.
    pub fn new(api_url: impl Into<String>, token_provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.into(),
            token_provider,
        }
    }

    /// Create an API client from a [`ClientConfig`], applying the
    /// configured request timeout.
    pub fn from_config(
        config: &ClientConfig,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            token_provider,
        })
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across components).
    pub fn with_client(
        client: reqwest::Client,
        api_url: impl Into<String>,
        token_provider: Arc<dyn TokenProvider>,
    ) -> Self {
        Self {
            client,
            api_url: api_url.into(),
            token_provider,
        }
    }

    /// Base HTTP API URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    // ---- generation ----

    /// Start image generation for a scene.
    ///
    /// Sends `POST /stories/{id}/scenes/{scene_id}/generate-image/`.
    /// A 2xx response means the job was accepted.
    pub async fn generate_image(
        &self,
        story_id: StoryId,
        scene_id: SceneId,
    ) -> Result<(), ApiError> {
        let response = self
            .request(
                Method::POST,
                &format!("/stories/{story_id}/scenes/{scene_id}/generate-image/"),
            )
            .send()
            .await?;

        tracing::debug!(story_id, scene_id, "Image generation requested");
        Self::check_status(response).await
    }

    /// Start audio narration for a scene with the given voice.
    ///
    /// Sends `POST /stories/{id}/scenes/{scene_id}/generate-audio/`
    /// with body `{"voice_id": ...}`.
    pub async fn generate_audio(
        &self,
        story_id: StoryId,
        scene_id: SceneId,
        voice_id: &str,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "voice_id": voice_id });

        let response = self
            .request(
                Method::POST,
                &format!("/stories/{story_id}/scenes/{scene_id}/generate-audio/"),
            )
            .json(&body)
            .send()
            .await?;

        tracing::debug!(story_id, scene_id, voice_id, "Audio generation requested");
        Self::check_status(response).await
    }

    /// Read a scene, including its current media array.
    ///
    /// This is the lightweight status read the poller issues each tick.
    pub async fn get_scene(&self, story_id: StoryId, scene_id: SceneId) -> Result<Scene, ApiError> {
        let response = self
            .request(
                Method::GET,
                &format!("/stories/{story_id}/scenes/{scene_id}/"),
            )
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- export previews ----

    /// Start an export preview job for a story.
    ///
    /// Without a sub-format this sends
    /// `POST /stories/{id}/preview-{format}/`; with one it sends
    /// `POST /stories/{id}/preview/{format}/{sub_format}/`.
    pub async fn start_preview(
        &self,
        story_id: StoryId,
        format: ExportFormat,
        sub_format: Option<&str>,
    ) -> Result<(), ApiError> {
        let path = match sub_format {
            Some(sub) => format!("/stories/{story_id}/preview/{}/{sub}/", format.as_str()),
            None => format!("/stories/{story_id}/preview-{}/", format.as_str()),
        };

        let response = self.request(Method::POST, &path).send().await?;

        tracing::debug!(story_id, format = format.as_str(), "Export preview requested");
        Self::check_status(response).await
    }

    /// Read the status of an export preview job.
    ///
    /// Sends `GET /stories/{id}/preview-status/{format}/`.
    pub async fn preview_status(
        &self,
        story_id: StoryId,
        format: ExportFormat,
    ) -> Result<PreviewStatus, ApiError> {
        let response = self
            .request(
                Method::GET,
                &format!("/stories/{story_id}/preview-status/{}/", format.as_str()),
            )
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- profile ----

    /// Fetch the signed-in user's profile, including the credit balance.
    pub async fn get_profile(&self) -> Result<Profile, ApiError> {
        let response = self.request(Method::GET, "/profile/").send().await?;
        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Build a request for `path`, attaching the bearer token when the
    /// provider has one.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{path}", self.api_url));
        if let Some(token) = self.token_provider.token() {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or an [`ApiError::Api`] carrying
    /// the server's `error` message (falling back to the raw body) on
    /// failure.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(parsed) => parsed.error,
                Err(_) => body,
            };
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), ApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}
