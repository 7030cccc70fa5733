//! Runtime for a running session
//!
//! Each session is one task that exclusively owns its `SessionState`.
//! Callers talk to it through a cloneable [`SessionHandle`].

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::check_in::CheckInGate;
use crate::gateway::BackendGateway;
use crate::mood::MoodEvent;
use crate::session::{ChatMessage, SessionSnapshot};
use crate::state_machine::{ConvContext, Event};
use crate::voice::VoiceBridge;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Events sent to subscribed clients
#[derive(Debug, Clone)]
pub enum SessionEvent {
    Message { message: ChatMessage },
    Mood { event: MoodEvent },
    Input { text: String },
    /// User-visible notice that does not enter chat history
    Notice { message: String },
    Error { message: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session has stopped")]
    Closed,
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
    voice: Arc<dyn VoiceBridge>,
    clock: Arc<dyn Clock>,
}

impl SessionHandle {
    async fn send(&self, event: Event) -> Result<(), SessionError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Submit a user message. Returns `false` (and does nothing) for blank
    /// text. The bot reply arrives later through the session.
    pub async fn submit_message(&self, text: &str) -> Result<bool, SessionError> {
        if text.trim().is_empty() {
            return Ok(false);
        }
        self.send(Event::user_message(text, self.clock.now())).await?;
        Ok(true)
    }

    /// Submit whatever is in the pending input buffer. The buffer is read
    /// inside the session task, after every input change sent before this
    /// call. Returns `false` when it was blank.
    pub async fn submit_input(&self) -> Result<bool, SessionError> {
        let (queued, rx) = oneshot::channel();
        self.send(Event::SubmitInput {
            at: self.clock.now(),
            queued,
        })
        .await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    pub async fn set_input(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Event::InputChanged { text: text.into() }).await
    }

    /// Listen once for speech. A transcript replaces the pending input; a
    /// failure leaves it untouched and raises a notice.
    pub async fn listen(&self) -> Result<(), SessionError> {
        let event = match self.voice.recognize().await {
            Ok(text) => Event::VoiceTranscript { text },
            Err(error) => {
                tracing::warn!(error = %error, "Voice recognition failed");
                Event::VoiceFailed { error }
            }
        };
        self.send(event).await
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.broadcast_tx.subscribe()
    }

    /// Wait until a snapshot satisfies `predicate`, up to `timeout`
    #[allow(dead_code)] // Used in tests
    pub async fn wait_for(
        &self,
        timeout: Duration,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Option<SessionSnapshot> {
        let mut rx = self.snapshot_rx.clone();
        let snapshot = match tokio::time::timeout(timeout, rx.wait_for(predicate)).await {
            Ok(Ok(snapshot)) => Some((*snapshot).clone()),
            _ => None,
        };
        snapshot
    }
}

/// Start a session task and return its handle
pub fn spawn_session<G, D>(
    context: ConvContext,
    gateway: G,
    store: D,
    voice: Arc<dyn VoiceBridge>,
    clock: Arc<dyn Clock>,
) -> SessionHandle
where
    G: BackendGateway + 'static,
    D: DateStore + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(64);
    let (broadcast_tx, _) = broadcast::channel(256);
    let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());

    let runtime = SessionRuntime::new(
        context,
        Arc::new(gateway),
        CheckInGate::new(store),
        voice.clone(),
        clock.clone(),
        event_rx,
        event_tx.downgrade(),
        broadcast_tx.clone(),
        snapshot_tx,
    );
    tokio::spawn(runtime.run());

    SessionHandle {
        event_tx,
        broadcast_tx,
        snapshot_rx,
        voice,
        clock,
    }
}
