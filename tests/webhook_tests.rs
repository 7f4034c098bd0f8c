//! Webhook server tests
//!
//! Routers are driven with `oneshot`; the provider API is a wiremock server.

use std::path::PathBuf;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt; // For `oneshot`
use url::Url;
use wiremock::matchers::{body_partial_json, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voice_bridge::{create_router, AppState, Config};

fn test_config(provider_url: &str) -> Config {
    let mut cfg = Config::default();
    cfg.application.id = "app-123".to_string();
    cfg.application.private_key_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/test_private.key")
        .to_string_lossy()
        .into_owned();
    cfg.provider.api_base_url = provider_url.to_string();
    cfg.numbers.service = "17806699599".to_string();
    cfg.streaming.host = Some("stream.example".to_string());
    cfg
}

fn app(cfg: Config) -> Router {
    create_router(AppState::new(cfg))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn connect_query(ncco: &Value) -> Vec<(String, String)> {
    let uri = ncco[1]["endpoint"][0]["uri"].as_str().unwrap();
    Url::parse(uri).unwrap().query_pairs().into_owned().collect()
}

fn query_value<'a>(query: &'a [(String, String)], key: &str) -> Option<&'a str> {
    query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
}

// =============================================================================
// /answer
// =============================================================================

#[tokio::test]
async fn test_answer_returns_inbound_ncco() {
    let (status, body) = send(
        app(test_config("http://127.0.0.1:9")),
        get("/answer?uuid=abc-123&from=15551230000"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);

    let ncco: Value = serde_json::from_slice(&body).unwrap();
    let actions = ncco.as_array().unwrap();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0]["action"], "talk");
    assert_eq!(actions[0]["style"], 11);
    assert_eq!(actions[1]["action"], "connect");
    assert_eq!(actions[1]["endpoint"][0]["content-type"], "audio/l16;rate=16000");

    let uri = actions[1]["endpoint"][0]["uri"].as_str().unwrap();
    assert!(uri.starts_with("wss://stream.example/socket?"));

    let query = connect_query(&ncco);
    assert_eq!(query_value(&query, "call_direction"), Some("inbound"));
    assert_eq!(query_value(&query, "peer_uuid"), Some("abc-123"));
    assert_eq!(query_value(&query, "caller_number"), Some("15551230000"));
    assert_eq!(query_value(&query, "participant"), Some("user1"));
}

#[tokio::test]
async fn test_answer_defaults_missing_params() {
    let (status, body) = send(app(test_config("http://127.0.0.1:9")), get("/answer")).await;

    assert_eq!(status, StatusCode::OK);

    let ncco: Value = serde_json::from_slice(&body).unwrap();
    let query = connect_query(&ncco);
    assert_eq!(query_value(&query, "peer_uuid"), Some("unknown"));
    assert_eq!(query_value(&query, "caller_number"), None);
}

#[tokio::test]
async fn test_answer_without_streaming_host() {
    let mut cfg = test_config("http://127.0.0.1:9");
    cfg.streaming.host = None;

    let (status, _) = send(app(cfg), get("/answer?uuid=abc")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_answer_starts_recording_when_enabled() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/legs/leg-7/recording"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({"split": true, "format": "mp3"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&provider)
        .await;

    let mut cfg = test_config(&provider.uri());
    cfg.provider.record_calls = true;

    let (status, _) = send(app(cfg), get("/answer?uuid=leg-7&from=15551230000")).await;
    assert_eq!(status, StatusCode::OK);

    // recording runs in the background
    for _ in 0..100 {
        if !provider.received_requests().await.unwrap().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(provider.received_requests().await.unwrap().len(), 1);
}

// =============================================================================
// /event
// =============================================================================

#[tokio::test]
async fn test_event_post_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/event")
        .header("content-type", "application/json")
        .body(Body::from(json!({"status": "completed", "uuid": "abc"}).to_string()))
        .unwrap();

    let (status, body) = send(app(test_config("http://127.0.0.1:9")), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_event_get_query() {
    let (status, body) = send(
        app(test_config("http://127.0.0.1:9")),
        get("/event?status=ringing&uuid=abc"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_event_post_non_json_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/event?status=answered")
        .body(Body::from("not json"))
        .unwrap();

    let (status, body) = send(app(test_config("http://127.0.0.1:9")), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

// =============================================================================
// /call
// =============================================================================

#[tokio::test]
async fn test_call_without_number_is_rejected_locally() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/calls"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&provider)
        .await;

    let (status, body) = send(app(test_config(&provider.uri())), get("/call")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(body).unwrap(), "Missing 'number' parameter");
}

#[tokio::test]
async fn test_call_relays_created_reply() {
    let provider = MockServer::start().await;
    let reply = json!({
        "uuid": "call-1",
        "status": "started",
        "direction": "outbound",
        "conversation_uuid": "CON-1"
    });
    Mock::given(method("POST"))
        .and(path("/v1/calls"))
        .and(header_exists("authorization"))
        .and(body_partial_json(json!({
            "to": [{"type": "phone", "number": "15198091100"}],
            "from": {"type": "phone", "number": "17806699599"}
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(reply.clone()))
        .expect(1)
        .mount(&provider)
        .await;

    let (status, body) = send(app(test_config(&provider.uri())), get("/call?number=15198091100")).await;

    assert_eq!(status, StatusCode::CREATED);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json, reply);

    let requests = provider.received_requests().await.unwrap();
    let sent: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent["ncco"].as_array().unwrap().len(), 2);
    assert_eq!(sent["ncco"][0]["action"], "talk");

    let query = connect_query(&sent["ncco"]);
    assert_eq!(query_value(&query, "call_direction"), Some("outbound"));

    let auth = requests[0].headers.get("authorization").unwrap().to_str().unwrap();
    assert!(auth.starts_with("Bearer "));
}

#[tokio::test]
async fn test_call_relays_provider_error_verbatim() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/calls"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error": "invalid number"}"#))
        .mount(&provider)
        .await;

    let (status, body) = send(app(test_config(&provider.uri())), get("/call?number=123")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(String::from_utf8(body).unwrap(), r#"{"error": "invalid number"}"#);
}

#[tokio::test]
async fn test_call_with_missing_key_does_not_dial() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/calls"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&provider)
        .await;

    let mut cfg = test_config(&provider.uri());
    cfg.application.private_key_path = "/nonexistent/private.key".to_string();

    let (status, body) = send(app(cfg), get("/call?number=15198091100")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("private key"));
}

#[tokio::test]
async fn test_call_provider_unreachable() {
    // nothing listens on the discard port
    let (status, _) = send(app(test_config("http://127.0.0.1:9")), get("/call?number=15198091100")).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

// =============================================================================
// /rtc
// =============================================================================

fn rtc_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/rtc")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn wait_for_file(path: &std::path::Path, expected: &[u8]) -> bool {
    for _ in 0..100 {
        if std::fs::read(path).ok().as_deref() == Some(expected) {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn test_rtc_record_done_downloads_recording() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/files/abc"))
        .and(header_exists("authorization"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3-audio".to_vec()))
        .expect(1)
        .mount(&provider)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cfg = test_config(&provider.uri());
    cfg.provider.recordings_path = dir.path().join("post-call-data").to_string_lossy().into_owned();

    let (status, body) = send(
        app(cfg),
        rtc_request(json!({
            "type": "audio:record:done",
            "body": {
                "recording_id": "rec-1",
                "destination_url": format!("{}/v1/files/abc", provider.uri()),
                "channel": {"id": "chan-1"}
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let dest = dir.path().join("post-call-data").join("rec-1_chan-1.mp3");
    assert!(wait_for_file(&dest, b"ID3-audio").await, "recording not written to {:?}", dest);
}

#[tokio::test]
async fn test_rtc_transcribe_done_downloads_transcript() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/transcripts/t-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello there"))
        .expect(1)
        .mount(&provider)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut cfg = test_config(&provider.uri());
    cfg.provider.recordings_path = dir.path().to_string_lossy().into_owned();

    let (status, _) = send(
        app(cfg),
        rtc_request(json!({
            "type": "audio:transcribe:done",
            "body": {
                "recording_id": "rec-1",
                "transcription_url": format!("{}/v1/transcripts/t-1", provider.uri())
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(wait_for_file(&dir.path().join("rec-1.txt"), b"hello there").await);
}

#[tokio::test]
async fn test_rtc_other_events_and_bad_bodies_are_acknowledged() {
    let provider = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let (status, body) = send(
        app(test_config(&provider.uri())),
        rtc_request(json!({"type": "audio:record:started", "body": {"recording_id": "rec-1"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let request = Request::builder()
        .method("POST")
        .uri("/rtc")
        .body(Body::from("not json"))
        .unwrap();
    let (status, body) = send(app(test_config(&provider.uri())), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

// =============================================================================
// Misc
// =============================================================================

#[tokio::test]
async fn test_results_and_health() {
    let request = Request::builder()
        .method("POST")
        .uri("/results")
        .body(Body::from(r#"{"transcript": "hello"}"#))
        .unwrap();
    let (status, body) = send(app(test_config("http://127.0.0.1:9")), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let (status, body) = send(app(test_config("http://127.0.0.1:9")), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");

    let (status, body) = send(app(test_config("http://127.0.0.1:9")), get("/_/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}
