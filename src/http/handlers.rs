use super::state::AppState;
use crate::auth::TokenSigner;
use crate::error::Error;
use crate::initiator::dial;
use crate::ncco::{CallControlBuilder, CallDirection};
use crate::voice::{DownloadTarget, RtcEvent};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{error, info, warn};

const UNKNOWN: &str = "unknown";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnswerParams {
    pub uuid: Option<String>,
    pub from: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallParams {
    pub number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /answer
/// Greet an inbound caller and bridge the call to the streaming endpoint
pub async fn answer(State(state): State<AppState>, Query(params): Query<AnswerParams>) -> Response {
    let uuid = params.uuid.clone().unwrap_or_else(|| UNKNOWN.to_string());
    let from = params.from.clone().unwrap_or_else(|| UNKNOWN.to_string());

    info!("[INBOUND] Call from {}, UUID: {}", from, uuid);

    let Some(host) = state.config.streaming.host.as_deref() else {
        error!("Streaming host is not configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Streaming host is not configured");
    };

    let mut builder = CallControlBuilder::from_config(&state.config, host, CallDirection::Inbound).peer_uuid(&uuid);
    if let Some(caller) = params.from {
        builder = builder.caller_number(caller);
    }

    let ncco = match builder.build() {
        Ok(ncco) => ncco,
        Err(e) => {
            error!("Failed to build NCCO: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    if state.config.provider.record_calls {
        if let Some(leg) = params.uuid {
            tokio::spawn(start_recording(state.clone(), leg));
        }
    }

    (StatusCode::OK, Json(ncco)).into_response()
}

/// Recording failures are logged and never affect the answered call
async fn start_recording(state: AppState, leg: String) {
    let app = &state.config.application;
    let token = match TokenSigner::from_file(&app.id, &app.key_path()).and_then(|s| s.sign()) {
        Ok(token) => token,
        Err(e) => {
            warn!("Cannot start recording on leg {}: {}", leg, e);
            return;
        }
    };

    match state.client.start_recording(&token, &leg).await {
        Ok(reply) if reply.status.is_success() => info!("Recording started on leg {}", leg),
        Ok(reply) => warn!("Recording on leg {} refused ({}): {}", leg, reply.status, reply.body),
        Err(e) => warn!("Recording on leg {} failed: {}", leg, e),
    }
}

/// GET|POST /event
/// Log a call lifecycle event; the payload is a JSON body or query parameters
pub async fn event(Query(query): Query<HashMap<String, String>>, body: Bytes) -> impl IntoResponse {
    let data = serde_json::from_slice::<Value>(&body)
        .ok()
        .filter(Value::is_object)
        .unwrap_or_else(|| serde_json::json!(query));

    let status = data.get("status").and_then(Value::as_str).unwrap_or(UNKNOWN);
    info!("[EVENT] {}: {}", status, data);

    (StatusCode::OK, "OK")
}

/// GET /call?number=...
/// Place an outbound call and relay the provider's reply verbatim
pub async fn call(State(state): State<AppState>, Query(params): Query<CallParams>) -> Response {
    let Some(number) = params.number.filter(|n| !n.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing 'number' parameter").into_response();
    };

    let Some(host) = state.config.streaming.host.as_deref() else {
        error!("Streaming host is not configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Streaming host is not configured");
    };

    let ncco = match CallControlBuilder::from_config(&state.config, host, CallDirection::Outbound).build() {
        Ok(ncco) => ncco,
        Err(e) => {
            error!("Failed to build NCCO: {}", e);
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string());
        }
    };

    match dial(&state.config, &state.client, &number, ncco).await {
        Ok(reply) => {
            info!("[OUTBOUND] Calling {}: {}", number, reply.status);
            (reply.status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
        }
        Err(e @ Error::Transport(_)) => {
            error!("[OUTBOUND] Calling {} failed: {}", number, e);
            error_response(StatusCode::BAD_GATEWAY, e.to_string())
        }
        Err(e) => {
            error!("[OUTBOUND] Calling {} failed: {}", number, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// POST /rtc
/// Recording and transcription callbacks; finished files are fetched in the
/// background into `provider.recordings_path`
pub async fn rtc(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    match serde_json::from_slice::<RtcEvent>(&body) {
        Ok(event) => {
            info!("[RTC] {}", event.kind);
            if let Some(target) = event.download_target() {
                tokio::spawn(download(state, target));
            }
        }
        Err(e) => warn!("[RTC] Unreadable callback: {}", e),
    }

    (StatusCode::OK, "OK")
}

async fn download(state: AppState, target: DownloadTarget) {
    let app = &state.config.application;
    let token = match TokenSigner::from_file(&app.id, &app.key_path()).and_then(|s| s.sign()) {
        Ok(token) => token,
        Err(e) => {
            warn!("Cannot download {}: {}", target.url, e);
            return;
        }
    };

    let dest = state.config.provider.recordings_dir().join(&target.file_name);
    if let Err(e) = state.client.download(&token, &target.url, &dest).await {
        warn!("Download of {} failed: {}", target.url, e);
    }
}

/// POST /results
/// Results posted back by the streaming endpoint
pub async fn results(body: Bytes) -> impl IntoResponse {
    info!("[RESULTS] {}", String::from_utf8_lossy(&body));

    (StatusCode::OK, "OK")
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
