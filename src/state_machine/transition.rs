//! Pure state transition function

use super::{ConvContext, ConvState, Effect, Event};
use crate::mood::{classify, MoodEvent};
use crate::session::FALLBACK_REPLY;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Reply for unknown request: {0}")]
    UnknownRequest(String),
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function.
///
/// Given the same inputs it always produces the same outputs; the only
/// wall-clock value it uses arrives inside the event.
pub fn transition(
    state: &ConvState,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state, event) {
        // ============================================================
        // Input buffer
        // ============================================================
        (_, Event::InputChanged { text }) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::SetInput { text }))
        }

        // ============================================================
        // Message submission
        // ============================================================

        // Blank input is ignored entirely
        (_, Event::UserMessage { text, .. }) if text.trim().is_empty() => {
            Ok(TransitionResult::new(state.clone()))
        }

        (ConvState::NotStarted, Event::UserMessage { text, request_id, at }) => {
            Ok(TransitionResult::new(ConvState::Active {
                in_flight: vec![request_id.clone()],
            })
            .with_effect(Effect::MarkStarted)
            .with_effect(Effect::EvaluateCheckIn)
            .with_effects(submission_effects(text, request_id, at)))
        }

        (ConvState::Active { in_flight }, Event::UserMessage { text, request_id, at }) => {
            let mut in_flight = in_flight.clone();
            in_flight.push(request_id.clone());
            Ok(TransitionResult::new(ConvState::Active { in_flight })
                .with_effects(submission_effects(text, request_id, at)))
        }

        // ============================================================
        // Backend replies
        // ============================================================
        (ConvState::Active { in_flight }, Event::ReplyReceived { request_id, text }) => {
            let in_flight = resolve(in_flight, &request_id)?;
            let speak = context.voice_output.then(|| Effect::Speak { text: text.clone() });

            Ok(TransitionResult::new(ConvState::Active { in_flight })
                .with_effect(Effect::append_bot(text))
                .with_effects(speak))
        }

        (ConvState::Active { in_flight }, Event::ReplyFailed { request_id }) => {
            let in_flight = resolve(in_flight, &request_id)?;
            Ok(TransitionResult::new(ConvState::Active { in_flight })
                .with_effect(Effect::append_bot(FALLBACK_REPLY)))
        }

        (
            ConvState::NotStarted,
            Event::ReplyReceived { request_id, .. } | Event::ReplyFailed { request_id },
        ) => Err(TransitionError::InvalidTransition(format!(
            "reply {request_id} before any message was sent"
        ))),

        // The buffer contents are only known inside the session task
        (_, Event::SubmitInput { .. }) => Err(TransitionError::InvalidTransition(
            "pending input must be resolved before transition".to_string(),
        )),

        // ============================================================
        // Voice input
        // ============================================================
        (_, Event::VoiceTranscript { text }) => {
            if text.trim().is_empty() {
                Ok(TransitionResult::new(state.clone()))
            } else {
                Ok(TransitionResult::new(state.clone()).with_effect(Effect::SetInput { text }))
            }
        }

        // Input stays as it was
        (_, Event::VoiceFailed { error }) => {
            Ok(TransitionResult::new(state.clone()).with_effect(Effect::Notify {
                message: error.notice().to_string(),
            }))
        }
    }
}

fn submission_effects(text: String, request_id: String, at: DateTime<Utc>) -> Vec<Effect> {
    let mood = classify(&text);
    vec![
        Effect::RecordMood(MoodEvent::new(mood, at)),
        Effect::append_user(text.clone()),
        Effect::RequestReply { request_id, text },
        Effect::ClearInput,
    ]
}

fn resolve(in_flight: &[String], request_id: &str) -> Result<Vec<String>, TransitionError> {
    if !in_flight.iter().any(|id| id == request_id) {
        return Err(TransitionError::UnknownRequest(request_id.to_string()));
    }
    Ok(in_flight
        .iter()
        .filter(|id| *id != request_id)
        .cloned()
        .collect())
}
