//! Session aggregate: chat history, mood history and derived state

use crate::mood::{Mood, MoodEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Reply appended when the backend call fails for any reason
pub const FALLBACK_REPLY: &str = "Sorry, something went wrong. Please try again.";

/// Greeting appended once per calendar day when the session starts
pub const CHECK_IN_GREETING: &str = "Hi there! Just checking in. How are you feeling today?";

/// Ordered, append-only sequence. Entries are never mutated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AppendLog<T>(Vec<T>);

impl<T> AppendLog<T> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn append(&mut self, item: T) {
        self.0.push(item);
    }
}

impl<T> Default for AppendLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for AppendLog<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
        }
    }
}

/// Everything one running session knows. Owned by the session runtime.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    chat: AppendLog<ChatMessage>,
    moods: AppendLog<MoodEvent>,
    current_mood: Mood,
    started: bool,
    last_check_in: Option<NaiveDate>,
    input: String,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(dead_code)] // Read by tests; the runtime publishes snapshots instead
impl SessionState {
    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn moods(&self) -> &[MoodEvent] {
        &self.moods
    }

    pub fn current_mood(&self) -> Mood {
        self.current_mood
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn last_check_in(&self) -> Option<NaiveDate> {
        self.last_check_in
    }

    pub fn input(&self) -> &str {
        &self.input
    }
}

impl SessionState {
    /// Flip the started flag. Has no effect once set.
    pub fn mark_started(&mut self) {
        self.started = true;
    }

    /// Append a mood event and update the current mood in the same step
    pub fn record_mood(&mut self, event: MoodEvent) {
        self.current_mood = event.mood;
        self.moods.append(event);
    }

    pub fn append_message(&mut self, message: ChatMessage) {
        self.chat.append(message);
    }

    pub fn set_last_check_in(&mut self, date: NaiveDate) {
        self.last_check_in = Some(date);
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            chat: self.chat.to_vec(),
            moods: self.moods.to_vec(),
            current_mood: self.current_mood,
            started: self.started,
            last_check_in: self.last_check_in,
            input: self.input.clone(),
        }
    }
}

/// Point-in-time copy of a session, for readers outside the runtime task
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub chat: Vec<ChatMessage>,
    pub moods: Vec<MoodEvent>,
    pub current_mood: Mood,
    pub started: bool,
    pub last_check_in: Option<NaiveDate>,
    pub input: String,
}

#[allow(dead_code)] // Used in tests
impl SessionSnapshot {
    pub fn user_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.chat.iter().filter(|m| m.sender == Sender::User)
    }

    pub fn bot_messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.chat.iter().filter(|m| m.sender == Sender::Bot)
    }
}
