//! Events that can occur in a session

use crate::voice::VoiceError;
use chrono::{DateTime, Utc};
use tokio::sync::oneshot;

/// Events that trigger state transitions
#[derive(Debug)]
pub enum Event {
    // User events
    InputChanged {
        text: String,
    },
    UserMessage {
        text: String,
        /// Correlates the backend reply with this submission
        request_id: String,
        at: DateTime<Utc>,
    },
    /// Submit whatever the input buffer holds when this event is processed.
    /// The session runtime resolves it into a `UserMessage`; `queued`
    /// reports whether anything was submitted.
    SubmitInput {
        at: DateTime<Utc>,
        queued: oneshot::Sender<bool>,
    },

    // Backend events
    ReplyReceived {
        request_id: String,
        text: String,
    },
    /// Failure details are logged by the gateway; every kind gets the
    /// same fallback
    ReplyFailed {
        request_id: String,
    },

    // Voice events
    VoiceTranscript {
        text: String,
    },
    VoiceFailed {
        error: VoiceError,
    },
}

impl Event {
    pub fn user_message(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Event::UserMessage {
            text: text.into(),
            request_id: uuid::Uuid::new_v4().to_string(),
            at,
        }
    }
}
