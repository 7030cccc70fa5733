//! Session phase and context

use serde::Serialize;

/// Phase of a session.
///
/// `NotStarted → Active` happens once, on the first non-blank message.
/// `in_flight` holds the request ids of unresolved backend calls.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    #[default]
    NotStarted,
    Active { in_flight: Vec<String> },
}

impl ConvState {
    pub fn is_started(&self) -> bool {
        matches!(self, ConvState::Active { .. })
    }

    /// Backend calls still awaiting a reply
    pub fn in_flight(&self) -> &[String] {
        match self {
            ConvState::NotStarted => &[],
            ConvState::Active { in_flight } => in_flight,
        }
    }
}

/// Fixed per-session settings visible to the transition function
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub session_id: String,
    /// Speak bot replies aloud
    pub voice_output: bool,
}

impl ConvContext {
    pub fn new(session_id: impl Into<String>, voice_output: bool) -> Self {
        Self {
            session_id: session_id.into(),
            voice_output,
        }
    }
}
