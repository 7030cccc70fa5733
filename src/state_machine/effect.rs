//! Effects produced by state transitions

use crate::mood::MoodEvent;
use crate::session::ChatMessage;

/// Effects to be executed after a state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Set the session's started flag
    MarkStarted,

    /// Run the daily check-in gate
    EvaluateCheckIn,

    /// Append a mood event and update the current mood
    RecordMood(MoodEvent),

    /// Append to chat history
    AppendMessage(ChatMessage),

    /// Send text to the backend (spawns as background task)
    RequestReply { request_id: String, text: String },

    /// Hand a reply to voice output
    Speak { text: String },

    SetInput { text: String },

    ClearInput,

    /// Notify connected clients without touching history
    Notify { message: String },
}

impl Effect {
    pub fn append_user(text: impl Into<String>) -> Self {
        Effect::AppendMessage(ChatMessage::user(text))
    }

    pub fn append_bot(text: impl Into<String>) -> Self {
        Effect::AppendMessage(ChatMessage::bot(text))
    }
}
