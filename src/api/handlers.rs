//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ClassifyRequest, ClassifyResponse, ErrorResponse, InputRequest, LimitQuery, MessageRequest,
    MoodScore, QueuedResponse, RelayRequest, RelayResponse, ResourcesResponse, SessionResponse,
    SuccessResponse, ViewQuery,
};
use super::AppState;
use crate::mood::{resources_for, score, top_n, Mood, UnknownMood};
use crate::runtime::SessionError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};

/// Reply body for any upstream failure on the relay route
pub const RELAY_FAILURE: &str = "Something went wrong with the AI response.";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Relay
        .route("/ping", get(ping))
        .route("/chat", post(relay_chat))
        // Session
        .route("/api/session", get(get_session))
        .route("/api/session/messages", post(submit_message))
        .route("/api/session/input", put(set_input))
        .route("/api/session/input/submit", post(submit_input))
        .route("/api/session/listen", post(listen))
        .route("/api/session/stream", get(stream_session))
        // Mood
        .route("/api/classify", post(classify_text))
        .route("/api/resources/:mood", get(get_resources))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Relay
// ============================================================

async fn ping() -> &'static str {
    "pong"
}

async fn relay_chat(
    State(state): State<AppState>,
    Json(req): Json<RelayRequest>,
) -> Result<Json<RelayResponse>, AppError> {
    if req.message.trim().is_empty() {
        return Err(AppError::BadRequest("Message must not be empty".to_string()));
    }
    tracing::info!(chars = req.message.chars().count(), "Relay message received");

    match state.upstream.send(&req.message).await {
        Ok(reply) => Ok(Json(RelayResponse { reply })),
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind.as_str(), "Upstream reply failed");
            Err(AppError::Internal(RELAY_FAILURE.to_string()))
        }
    }
}

// ============================================================
// Session
// ============================================================

async fn get_session(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
) -> Json<SessionResponse> {
    let session = state.session.snapshot();
    let resources = query
        .view
        .visible(session.current_mood, state.resource_preview);
    Json(SessionResponse {
        session,
        view: query.view,
        resources,
    })
}

async fn submit_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    let queued = state.session.submit_message(&req.text).await?;
    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued })))
}

async fn set_input(
    State(state): State<AppState>,
    Json(req): Json<InputRequest>,
) -> Result<Json<SuccessResponse>, AppError> {
    state.session.set_input(req.text).await?;
    Ok(Json(SuccessResponse { success: true }))
}

async fn submit_input(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<QueuedResponse>), AppError> {
    let queued = state.session.submit_input().await?;
    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued })))
}

/// One-shot voice capture; the outcome arrives as an `input` or `notice` event
async fn listen(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.session.listen().await?;
    Ok(StatusCode::ACCEPTED)
}

async fn stream_session(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before reading the snapshot so no event falls in between
    let rx = state.session.subscribe();
    sse_stream(state.session.snapshot(), rx)
}

// ============================================================
// Mood
// ============================================================

/// Score text against every mood without touching the session
async fn classify_text(Json(req): Json<ClassifyRequest>) -> Json<ClassifyResponse> {
    let scores = score(&req.text);
    Json(ClassifyResponse {
        mood: scores.winner(),
        scores: scores
            .iter()
            .map(|(mood, score)| MoodScore { mood, score })
            .collect(),
    })
}

async fn get_resources(
    Path(mood): Path<String>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<ResourcesResponse>, AppError> {
    let mood: Mood = mood
        .parse()
        .map_err(|e: UnknownMood| AppError::NotFound(e.to_string()))?;
    let resources = match query.limit {
        Some(n) => top_n(mood, n),
        None => resources_for(mood),
    };
    Ok(Json(ResourcesResponse { mood, resources }))
}

async fn get_version() -> &'static str {
    concat!("feelbetter ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Unavailable(String),
    Internal(String),
}

impl From<SessionError> for AppError {
    fn from(e: SessionError) -> Self {
        AppError::Unavailable(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
