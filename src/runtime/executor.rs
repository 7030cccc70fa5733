//! Session runtime executor

use super::traits::{Clock, DateStore};
use super::SessionEvent;

use crate::check_in::CheckInGate;
use crate::gateway::BackendGateway;
use crate::session::{ChatMessage, SessionSnapshot, SessionState, CHECK_IN_GREETING};
use crate::state_machine::{transition, ConvContext, ConvState, Effect, Event};
use crate::voice::VoiceBridge;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Session runtime generic over the reply backend and the date store
pub struct SessionRuntime<G, D>
where
    G: BackendGateway + 'static,
    D: DateStore + 'static,
{
    context: ConvContext,
    state: ConvState,
    session: SessionState,
    gateway: Arc<G>,
    check_in: CheckInGate<D>,
    voice: Arc<dyn VoiceBridge>,
    clock: Arc<dyn Clock>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so the loop ends once every handle and in-flight reply is gone
    event_tx: mpsc::WeakSender<Event>,
    broadcast_tx: broadcast::Sender<SessionEvent>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    /// Events raised by the current transition, sent once its snapshot is out
    outbox: Vec<SessionEvent>,
}

impl<G, D> SessionRuntime<G, D>
where
    G: BackendGateway + 'static,
    D: DateStore + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        context: ConvContext,
        gateway: Arc<G>,
        check_in: CheckInGate<D>,
        voice: Arc<dyn VoiceBridge>,
        clock: Arc<dyn Clock>,
        event_rx: mpsc::Receiver<Event>,
        event_tx: mpsc::WeakSender<Event>,
        broadcast_tx: broadcast::Sender<SessionEvent>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
    ) -> Self {
        Self {
            context,
            state: ConvState::NotStarted,
            session: SessionState::new(),
            gateway,
            check_in,
            voice,
            clock,
            event_rx,
            event_tx,
            broadcast_tx,
            snapshot_tx,
            outbox: Vec::new(),
        }
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.context.session_id, "Starting session runtime");

        while let Some(event) = self.event_rx.recv().await {
            if let Err(e) = self.process_event(event).await {
                tracing::warn!(session_id = %self.context.session_id, error = %e, "Rejected event");
                let _ = self.broadcast_tx.send(SessionEvent::Error { message: e });
            }
        }

        tracing::info!(session_id = %self.context.session_id, "Session runtime stopped");
    }

    async fn process_event(&mut self, event: Event) -> Result<(), String> {
        let Some(event) = self.resolve_pending_input(event) else {
            return Ok(());
        };

        // Pure state transition
        let result =
            transition(&self.state, &self.context, event).map_err(|e| e.to_string())?;

        self.state = result.new_state;
        tracing::debug!(
            started = self.state.is_started(),
            in_flight = self.state.in_flight().len(),
            effects = result.effects.len(),
            "Transition applied"
        );
        for effect in result.effects {
            self.execute_effect(effect).await;
        }

        // Readers woken by an event must already see its snapshot
        self.snapshot_tx.send_replace(self.session.snapshot());
        for event in self.outbox.drain(..) {
            let _ = self.broadcast_tx.send(event);
        }
        Ok(())
    }

    /// Turn `SubmitInput` into a `UserMessage` carrying the buffer as it is
    /// now. Returns `None` when the buffer is blank.
    fn resolve_pending_input(&self, event: Event) -> Option<Event> {
        let Event::SubmitInput { at, queued } = event else {
            return Some(event);
        };

        let text = self.session.input();
        let submit = !text.trim().is_empty();
        let _ = queued.send(submit);
        submit.then(|| Event::user_message(text, at))
    }

    fn emit(&mut self, event: SessionEvent) {
        self.outbox.push(event);
    }

    fn append_message(&mut self, message: ChatMessage) {
        self.session.append_message(message.clone());
        self.emit(SessionEvent::Message { message });
    }

    async fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::MarkStarted => {
                tracing::info!(session_id = %self.context.session_id, "Session started");
                self.session.mark_started();
            }

            Effect::EvaluateCheckIn => self.run_check_in().await,

            Effect::RecordMood(event) => {
                tracing::debug!(mood = %event.mood, "Mood detected");
                self.session.record_mood(event.clone());
                self.emit(SessionEvent::Mood { event });
            }

            Effect::AppendMessage(message) => self.append_message(message),

            Effect::RequestReply { request_id, text } => {
                // In-flight calls keep the channel open until they report back
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::warn!(request_id = %request_id, "Session closing, reply not requested");
                    return;
                };
                let gateway = self.gateway.clone();

                tokio::spawn(async move {
                    tracing::debug!(request_id = %request_id, "Requesting reply (background)");
                    let event = match gateway.send(&text).await {
                        Ok(reply) => Event::ReplyReceived {
                            request_id,
                            text: reply,
                        },
                        Err(_) => Event::ReplyFailed { request_id },
                    };
                    let _ = event_tx.send(event).await;
                });
            }

            Effect::Speak { text } => self.voice.speak(&text),

            Effect::SetInput { text } => {
                self.session.set_input(text.clone());
                self.emit(SessionEvent::Input { text });
            }

            Effect::ClearInput => {
                self.session.clear_input();
                self.emit(SessionEvent::Input {
                    text: String::new(),
                });
            }

            Effect::Notify { message } => self.emit(SessionEvent::Notice { message }),
        }
    }

    async fn run_check_in(&mut self) {
        let today = self.clock.today();
        let decision = self.check_in.evaluate(today).await;

        if let Some(last) = decision.last_stored {
            self.session.set_last_check_in(last);
        }
        if !decision.due {
            tracing::debug!(%today, "Already checked in today");
            return;
        }

        self.append_message(ChatMessage::bot(CHECK_IN_GREETING));
        self.session.set_last_check_in(today);
        if let Err(e) = self.check_in.record_check_in(today).await {
            tracing::warn!(error = %e, "Failed to persist check-in date");
        }
    }
}
