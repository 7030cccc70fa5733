//! API request and response types

use crate::mood::{Mood, ResourceEntry, ResourceView};
use crate::session::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// Request to submit a user message
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub text: String,
}

/// Request to replace the pending input buffer
#[derive(Debug, Deserialize)]
pub struct InputRequest {
    pub text: String,
}

/// Response for a submitted message
#[derive(Debug, Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Response for input updates
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub view: ResourceView,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Session snapshot plus the resources for the current mood
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    pub view: ResourceView,
    pub resources: &'static [ResourceEntry],
}

/// Request to classify text without submitting it
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct MoodScore {
    pub mood: Mood,
    pub score: usize,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub mood: Mood,
    pub scores: Vec<MoodScore>,
}

#[derive(Debug, Serialize)]
pub struct ResourcesResponse {
    pub mood: Mood,
    pub resources: &'static [ResourceEntry],
}

/// Relay request body, `{ "message": ... }`
#[derive(Debug, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct RelayResponse {
    pub reply: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
