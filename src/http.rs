//! HTTP surface: capture trigger, answer publish/pull, health probe.
//!
//! Every route answers 200 with a `status`-tagged JSON body; failures are
//! reportable outcomes scoped to the request, never transport errors.

#![allow(clippy::needless_pass_by_value, clippy::unused_async)] // axum handler signatures

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::models::capture::CaptureOutcome;
use crate::models::role::Role;
use crate::relay::answers::normalize_answer;
use crate::relay::AppState;
use crate::ws;
use crate::Result;

/// Build the coordinator's router: HTTP operations plus the `/ws`
/// WebSocket endpoint for persistent peers.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/capture", post(trigger_capture))
        .route("/answer", post(publish_answer))
        .route("/last", get(last_answer))
        .route("/last-capture", get(last_capture))
        .route("/ping", get(health))
        .with_state(state)
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
enum CaptureResponse {
    Ok { payload: String },
    Timeout,
    Error { message: String },
}

/// `POST /capture` — requester trigger; waits for the provider's reply
/// or the timeout window.
async fn trigger_capture(State(state): State<Arc<AppState>>) -> Json<CaptureResponse> {
    let result = state.capture.start_capture(&state.registry).await;
    Json(capture_response(result))
}

fn capture_response(result: Result<CaptureOutcome>) -> CaptureResponse {
    match result {
        Ok(CaptureOutcome::Fulfilled(payload)) => CaptureResponse::Ok { payload },
        Ok(CaptureOutcome::TimedOut) => CaptureResponse::Timeout,
        Err(err) => CaptureResponse::Error {
            message: err.to_string(),
        },
    }
}

#[derive(Debug, Deserialize)]
struct PublishAnswerBody {
    answer: String,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum PublishAnswerResponse {
    Ok { answer: String, version: u64 },
    Error { message: String },
}

/// `POST /answer` — operator publish. The value is normalized to its
/// canonical short token before storage.
async fn publish_answer(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PublishAnswerBody>,
) -> Json<PublishAnswerResponse> {
    let Some(value) = normalize_answer(&body.answer) else {
        return Json(PublishAnswerResponse::Error {
            message: "answer must not be empty".into(),
        });
    };

    let record = state.answers.publish(value);
    Json(PublishAnswerResponse::Ok {
        answer: record.value.unwrap_or_default(),
        version: record.version,
    })
}

#[derive(Debug, Serialize)]
struct LastAnswerResponse {
    status: &'static str,
    value: Option<String>,
    version: u64,
}

/// `GET /last` — subscriber pull for reconciliation. Value is null and
/// version 0 before the first publish.
async fn last_answer(State(state): State<Arc<AppState>>) -> Json<LastAnswerResponse> {
    let record = state.answers.current();
    Json(LastAnswerResponse {
        status: "ok",
        value: record.value,
        version: record.version,
    })
}

#[derive(Debug, Serialize)]
struct LastCaptureResponse {
    status: &'static str,
    payload: Option<String>,
}

/// `GET /last-capture` — operator retrieval of the latest stored capture
/// payload, including late arrivals that resolved no caller.
async fn last_capture(State(state): State<Arc<AppState>>) -> Json<LastCaptureResponse> {
    Json(LastCaptureResponse {
        status: "ok",
        payload: state.capture.last_result(),
    })
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    provider: &'static str,
}

/// `GET /ping` — liveness probe reporting provider connectivity.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let provider = if state.registry.is_registered(Role::Provider) {
        "connected"
    } else {
        "disconnected"
    };
    Json(HealthResponse {
        status: "ok",
        provider,
    })
}
