use std::time::Duration;

use serde_json::json;
use smart_content_core::{
    BackendConfig, Count, Dispatcher, RemoteCall, SmartContentError, UploadedFile,
    dispatcher::{FULL_ANALYSIS_FALLBACK, TRANSCRIBE_FALLBACK},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, body_string_contains, header_regex, method, path},
};

const LINK: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

fn dispatcher_for(server: &MockServer) -> Dispatcher {
    Dispatcher::new(BackendConfig::new(server.uri()).unwrap())
}

fn full_analysis() -> RemoteCall {
    RemoteCall::FullAnalysis {
        url: LINK.to_string(),
    }
}

fn transcription() -> RemoteCall {
    RemoteCall::Transcription {
        file: UploadedFile::new("lecture.mp4", "video/mp4", b"fake video bytes".to_vec()),
    }
}

#[tokio::test]
async fn test_full_analysis_sends_url_and_parses_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/full-analysis"))
        .and(body_json(json!({ "url": LINK })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "metadata": {"title": "Never Gonna Give You Up", "channel": "Rick Astley", "views": "1600000000", "likes": 18000000},
            "summary": "A classic.",
            "transcript_preview": "We're no strangers to love...",
            "short_notes": "Never give up.",
            "questions": [{"question": "Who sings it?", "options": ["Rick", "Roll"], "answer": "Rick"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher_for(&server).run(&full_analysis()).await.unwrap();

    assert_eq!(result.metadata.title.as_deref(), Some("Never Gonna Give You Up"));
    assert_eq!(result.metadata.views, Count::Known(1_600_000_000));
    assert_eq!(result.summary.as_deref(), Some("A classic."));
    assert_eq!(result.short_notes.as_deref(), Some("Never give up."));
    assert_eq!(result.questions.unwrap().len(), 1);
}

#[tokio::test]
async fn test_error_detail_becomes_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/full-analysis"))
        .respond_with(
            ResponseTemplate::new(429).set_body_json(json!({ "detail": "quota exceeded" })),
        )
        .mount(&server)
        .await;

    let err = dispatcher_for(&server)
        .run(&full_analysis())
        .await
        .unwrap_err();

    assert!(matches!(err, SmartContentError::Backend { status: 429, .. }));
    assert_eq!(err.to_string(), "quota exceeded");
}

#[tokio::test]
async fn test_unparsable_error_body_uses_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/full-analysis"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dispatcher = dispatcher_for(&server);
    let err = dispatcher.run(&full_analysis()).await.unwrap_err();
    assert_eq!(err.to_string(), FULL_ANALYSIS_FALLBACK);

    let err = dispatcher.run(&transcription()).await.unwrap_err();
    assert_eq!(err.to_string(), TRANSCRIBE_FALLBACK);
}

#[tokio::test]
async fn test_transcription_uploads_file_and_normalizes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("name=\"file\""))
        .and(body_string_contains("lecture.mp4"))
        .and(body_string_contains("fake video bytes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Summary": "S",
            "Full Transcription": "T"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = dispatcher_for(&server).run(&transcription()).await.unwrap();

    assert_eq!(result.summary.as_deref(), Some("S"));
    assert_eq!(result.transcript_preview.as_deref(), Some("T"));
    assert_eq!(result.metadata.title.as_deref(), Some("lecture.mp4"));
    assert_eq!(result.metadata.channel.as_deref(), Some("Local Upload"));
    assert_eq!(result.metadata.views, Count::NotApplicable);
}

#[tokio::test]
async fn test_malformed_success_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribe"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = dispatcher_for(&server)
        .run(&transcription())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SmartContentError::MalformedResponse {
            endpoint: "transcribe",
            ..
        }
    ));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/full-analysis"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "summary": "late" }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = BackendConfig::new(server.uri())
        .unwrap()
        .with_timeout(Some(Duration::from_millis(200)));
    let err = Dispatcher::new(config)
        .run(&full_analysis())
        .await
        .unwrap_err();

    assert!(matches!(err, SmartContentError::Timeout(_)));
    assert_eq!(err.to_string(), "Request timed out after 200ms");
}

#[tokio::test]
async fn test_unreachable_backend_is_a_transport_error() {
    // Grab a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = Dispatcher::new(BackendConfig::new(format!("http://127.0.0.1:{port}")).unwrap())
        .run(&full_analysis())
        .await
        .unwrap_err();

    assert!(matches!(err, SmartContentError::ApiError(_)));
}
