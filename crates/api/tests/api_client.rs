//! Integration tests for [`StoryApi`] against a mock HTTP server.
//!
//! Verifies endpoint shapes, bearer-token injection, and the error
//! taxonomy (2xx = accepted, non-2xx = surfaced with the server's
//! `error` message).

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use whisprtales_api::auth::NoToken;
use whisprtales_api::{ApiError, StaticToken, StoryApi};
use whisprtales_core::export::ExportFormat;
use whisprtales_core::media::MediaKind;

fn authed_api(server: &MockServer) -> StoryApi {
    StoryApi::new(server.uri(), Arc::new(StaticToken("test-token".into())))
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Every request carries the provider's token as a bearer header.
#[tokio::test]
async fn bearer_token_is_attached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stories/1/scenes/2/generate-image/"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let api = authed_api(&server);
    api.generate_image(1, 2).await.expect("accepted");
}

/// With no token available the request goes out unauthenticated.
#[tokio::test]
async fn missing_token_sends_no_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stories/1/scenes/2/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 2})))
        .mount(&server)
        .await;

    let api = StoryApi::new(server.uri(), Arc::new(NoToken));
    api.get_scene(1, 2).await.expect("scene read");

    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

// ---------------------------------------------------------------------------
// Generation endpoints
// ---------------------------------------------------------------------------

/// Audio generation posts the selected voice in the request body.
#[tokio::test]
async fn generate_audio_sends_voice_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stories/5/scenes/9/generate-audio/"))
        .and(body_json(json!({"voice_id": "narrator-en-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let api = authed_api(&server);
    api.generate_audio(5, 9, "narrator-en-1")
        .await
        .expect("accepted");
}

/// A rejected start surfaces the server's `error` field and status.
#[tokio::test]
async fn rejection_surfaces_server_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stories/1/scenes/2/generate-image/"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({"error": "Not enough credits"})),
        )
        .mount(&server)
        .await;

    let api = authed_api(&server);
    let err = api.generate_image(1, 2).await.unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 402);
            assert_eq!(message, "Not enough credits");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

/// A non-JSON error body falls back to the raw text.
#[tokio::test]
async fn malformed_error_body_falls_back_to_raw_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stories/1/scenes/2/generate-image/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let api = authed_api(&server);
    let err = api.generate_image(1, 2).await.unwrap_err();
    match err {
        ApiError::Api { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "upstream exploded");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Scene reads
// ---------------------------------------------------------------------------

/// The scene read returns the media array used as the completion signal.
#[tokio::test]
async fn get_scene_parses_media_kinds() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stories/3/scenes/4/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 4,
            "content": "The fox waited.",
            "media": [
                {"media_type": "image", "url": "https://cdn.example/4.png"}
            ]
        })))
        .mount(&server)
        .await;

    let api = authed_api(&server);
    let scene = api.get_scene(3, 4).await.expect("scene read");
    assert_eq!(scene.id, 4);
    assert_eq!(scene.present_kinds(), vec![MediaKind::Image]);
}

// ---------------------------------------------------------------------------
// Export previews
// ---------------------------------------------------------------------------

/// The plain preview endpoint embeds the format in the path.
#[tokio::test]
async fn start_preview_without_sub_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stories/8/preview-pdf/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let api = authed_api(&server);
    api.start_preview(8, ExportFormat::Pdf, None)
        .await
        .expect("accepted");
}

/// The sub-format variant uses the nested path form.
#[tokio::test]
async fn start_preview_with_sub_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/stories/8/preview/video/720p/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let api = authed_api(&server);
    api.start_preview(8, ExportFormat::Video, Some("720p"))
        .await
        .expect("accepted");
}

/// The preview status read reports completion and the artifact URL.
#[tokio::test]
async fn preview_status_reports_completion() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stories/8/preview-status/pdf/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "complete",
            "url": "https://cdn.example/story.pdf",
            "format": "pdf"
        })))
        .mount(&server)
        .await;

    let api = authed_api(&server);
    let status = api
        .preview_status(8, ExportFormat::Pdf)
        .await
        .expect("status read");
    assert!(status.is_complete());
    assert_eq!(status.url.as_deref(), Some("https://cdn.example/story.pdf"));
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// The profile read exposes the server-authoritative credit balance.
#[tokio::test]
async fn get_profile_parses_credit_balance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/profile/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 11,
            "credits": {"credits_remaining": 27.75},
            "language": "en"
        })))
        .mount(&server)
        .await;

    let api = authed_api(&server);
    let profile = api.get_profile().await.expect("profile read");
    assert!((profile.credits.credits_remaining - 27.75).abs() < f64::EPSILON);
}
