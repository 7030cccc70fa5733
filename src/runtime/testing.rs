//! Mock implementations for testing
//!
//! These mocks let sessions run end to end without real I/O.

use super::traits::{Clock, DateStore};
use super::{spawn_session, SessionHandle};
use crate::gateway::{BackendGateway, GatewayError};
use crate::state_machine::ConvContext;
use crate::voice::{VoiceBridge, VoiceError};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Mock Gateway
// ============================================================================

/// Mock gateway that returns queued replies, then echoes
pub struct MockGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    /// Record of every text sent
    pub requests: Mutex<Vec<String>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_reply(&self, reply: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(reply.into()));
    }

    pub fn queue_error(&self, error: GatewayError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendGateway for MockGateway {
    async fn send(&self, text: &str) -> Result<String, GatewayError> {
        self.requests.lock().unwrap().push(text.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(format!("echo: {text}")))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

// ============================================================================
// Delayed Mock Gateway (for interleaving tests)
// ============================================================================

/// Gateway that echoes after a per-message delay
pub struct DelayedMockGateway {
    delays: HashMap<String, Duration>,
    default_delay: Duration,
}

impl DelayedMockGateway {
    pub fn new(default_delay: Duration) -> Self {
        Self {
            delays: HashMap::new(),
            default_delay,
        }
    }

    pub fn with_delay(mut self, text: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(text.into(), delay);
        self
    }
}

#[async_trait]
impl BackendGateway for DelayedMockGateway {
    async fn send(&self, text: &str) -> Result<String, GatewayError> {
        let delay = self.delays.get(text).copied().unwrap_or(self.default_delay);
        tokio::time::sleep(delay).await;
        Ok(format!("echo: {text}"))
    }

    fn name(&self) -> &str {
        "delayed-mock"
    }
}

// ============================================================================
// In-memory Date Store
// ============================================================================

#[derive(Default)]
pub struct MemoryDateStore {
    date: Mutex<Option<NaiveDate>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl MemoryDateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_date(date: NaiveDate) -> Self {
        Self {
            date: Mutex::new(Some(date)),
            ..Self::default()
        }
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn stored(&self) -> Option<NaiveDate> {
        *self.date.lock().unwrap()
    }
}

#[async_trait]
impl DateStore for MemoryDateStore {
    async fn load_last_check_in(&self) -> Result<Option<NaiveDate>, String> {
        if self.fail_reads {
            return Err("store unavailable".to_string());
        }
        Ok(self.stored())
    }

    async fn save_last_check_in(&self, date: NaiveDate) -> Result<(), String> {
        if self.fail_writes {
            return Err("store is read-only".to_string());
        }
        *self.date.lock().unwrap() = Some(date);
        Ok(())
    }
}

// ============================================================================
// Fixed Clock
// ============================================================================

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Noon UTC on the given day
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).unwrap();
        Self::at(Utc.from_utc_datetime(&noon))
    }

    pub fn advance(&self, by: chrono::Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

// ============================================================================
// Recording Voice
// ============================================================================

/// Voice bridge that records speech and plays back queued recognition results
#[derive(Default)]
pub struct RecordingVoice {
    pub spoken: Mutex<Vec<String>>,
    recognitions: Mutex<VecDeque<Result<String, VoiceError>>>,
}

impl RecordingVoice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_transcript(&self, text: impl Into<String>) {
        self.recognitions.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn queue_failure(&self, error: VoiceError) {
        self.recognitions.lock().unwrap().push_back(Err(error));
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoiceBridge for RecordingVoice {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }

    async fn recognize(&self) -> Result<String, VoiceError> {
        self.recognitions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(VoiceError::NotSupported))
    }
}

// ============================================================================
// Test Session Builder
// ============================================================================

pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

/// Helper for building test sessions with minimal boilerplate
pub struct TestSession {
    pub handle: SessionHandle,
    pub store: Arc<MemoryDateStore>,
    pub voice: Arc<RecordingVoice>,
    pub clock: Arc<FixedClock>,
}

pub struct TestSessionBuilder {
    store: Arc<MemoryDateStore>,
    voice: Arc<RecordingVoice>,
    clock: Arc<FixedClock>,
    voice_output: bool,
}

impl TestSession {
    pub fn builder() -> TestSessionBuilder {
        TestSessionBuilder {
            store: Arc::new(MemoryDateStore::new()),
            voice: Arc::new(RecordingVoice::new()),
            clock: Arc::new(FixedClock::on(test_day())),
            voice_output: false,
        }
    }
}

impl TestSessionBuilder {
    pub fn store(mut self, store: Arc<MemoryDateStore>) -> Self {
        self.store = store;
        self
    }

    /// Store already holding today's check-in, so no greeting is injected
    pub fn checked_in_today(self) -> Self {
        self.store(Arc::new(MemoryDateStore::with_date(test_day())))
    }

    pub fn voice(mut self, voice: Arc<RecordingVoice>) -> Self {
        self.voice = voice;
        self
    }

    pub fn voice_output(mut self, enabled: bool) -> Self {
        self.voice_output = enabled;
        self
    }

    pub fn build<G: BackendGateway + 'static>(self, gateway: G) -> TestSession {
        let handle = spawn_session(
            ConvContext::new("test-session", self.voice_output),
            gateway,
            self.store.clone(),
            self.voice.clone(),
            self.clock.clone(),
        );
        TestSession {
            handle,
            store: self.store,
            voice: self.voice,
            clock: self.clock,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Mood;
    use crate::runtime::SessionEvent;
    use crate::session::{ChatMessage, Sender, CHECK_IN_GREETING, FALLBACK_REPLY};

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_mock_gateway_queue_then_echo() {
        let mock = MockGateway::new();
        mock.queue_reply("queued");

        assert_eq!(mock.send("a").await.unwrap(), "queued");
        assert_eq!(mock.send("b").await.unwrap(), "echo: b");
        assert_eq!(mock.recorded_requests(), vec!["a", "b"]);
    }

    /// First message of the day: greeting, user message, reply
    #[tokio::test]
    async fn test_first_message_gets_check_in_and_reply() {
        let gateway = Arc::new(MockGateway::new());
        gateway.queue_reply("That sounds hard. I'm here.");
        let rt = TestSession::builder().build(gateway.clone());

        assert!(rt.handle.submit_message("I feel very sad and down today").await.unwrap());

        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 3).await.unwrap();
        assert_eq!(
            snap.chat,
            vec![
                ChatMessage::bot(CHECK_IN_GREETING),
                ChatMessage::user("I feel very sad and down today"),
                ChatMessage::bot("That sounds hard. I'm here."),
            ]
        );
        assert!(snap.started);
        assert_eq!(snap.current_mood, Mood::Sad);
        assert_eq!(snap.moods.len(), 1);
        assert_eq!(snap.last_check_in, Some(test_day()));
        assert_eq!(rt.store.stored(), Some(test_day()));
        assert_eq!(gateway.recorded_requests(), vec!["I feel very sad and down today"]);
    }

    #[tokio::test]
    async fn test_no_check_in_when_already_done_today() {
        let rt = TestSession::builder().checked_in_today().build(MockGateway::new());

        rt.handle.submit_message("hello").await.unwrap();

        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 2).await.unwrap();
        assert_eq!(snap.chat[0], ChatMessage::user("hello"));
        assert_eq!(snap.chat[1], ChatMessage::bot("echo: hello"));
        assert_eq!(snap.last_check_in, Some(test_day()));
    }

    #[tokio::test]
    async fn test_check_in_on_a_new_day() {
        let yesterday = test_day().pred_opt().unwrap();
        let store = Arc::new(MemoryDateStore::with_date(yesterday));
        let rt = TestSession::builder().store(store.clone()).build(MockGateway::new());

        rt.handle.submit_message("morning").await.unwrap();

        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 3).await.unwrap();
        assert_eq!(snap.chat[0], ChatMessage::bot(CHECK_IN_GREETING));
        assert_eq!(store.stored(), Some(test_day()));
    }

    /// The gate runs once per session, not per message
    #[tokio::test]
    async fn test_check_in_runs_once_per_session() {
        let rt = TestSession::builder().build(MockGateway::new());

        for text in ["one", "two", "three"] {
            rt.handle.submit_message(text).await.unwrap();
        }

        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 7).await.unwrap();
        let greetings = snap
            .chat
            .iter()
            .filter(|m| m.text == CHECK_IN_GREETING)
            .count();
        assert_eq!(greetings, 1);
    }

    #[tokio::test]
    async fn test_check_in_not_repeated_by_next_session_same_day() {
        let store = Arc::new(MemoryDateStore::new());

        let first = TestSession::builder().store(store.clone()).build(MockGateway::new());
        first.handle.submit_message("hi").await.unwrap();
        first.handle.wait_for(WAIT, |s| s.chat.len() == 3).await.unwrap();

        let second = TestSession::builder().store(store).build(MockGateway::new());
        second.handle.submit_message("hi again").await.unwrap();
        let snap = second.handle.wait_for(WAIT, |s| s.chat.len() == 2).await.unwrap();
        assert!(snap.chat.iter().all(|m| m.text != CHECK_IN_GREETING));
    }

    #[tokio::test]
    async fn test_check_in_survives_store_write_failure() {
        let store = Arc::new(MemoryDateStore::new().failing_writes());
        let rt = TestSession::builder().store(store.clone()).build(MockGateway::new());

        rt.handle.submit_message("hey").await.unwrap();

        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 3).await.unwrap();
        assert_eq!(snap.chat[0], ChatMessage::bot(CHECK_IN_GREETING));
        assert_eq!(store.stored(), None);
    }

    /// Backend failure: fallback reply, mood still recorded
    #[tokio::test]
    async fn test_backend_failure_appends_fallback() {
        let gateway = MockGateway::new();
        gateway.queue_error(GatewayError::server_error("upstream 500"));
        let rt = TestSession::builder().checked_in_today().build(gateway);

        rt.handle.submit_message("I am so anxious and nervous").await.unwrap();

        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 2).await.unwrap();
        assert_eq!(snap.chat[1], ChatMessage::bot(FALLBACK_REPLY));
        assert_eq!(snap.moods.len(), 1);
        assert_eq!(snap.current_mood, Mood::Anxious);
        assert_eq!(snap.bot_messages().count(), 1);
    }

    #[tokio::test]
    async fn test_blank_submission_changes_nothing() {
        let gateway = Arc::new(MockGateway::new());
        let rt = TestSession::builder().build(gateway.clone());

        assert!(!rt.handle.submit_message("   \t\n").await.unwrap());
        assert!(!rt.handle.submit_message("").await.unwrap());

        // Use an input update as a barrier: once it is visible, anything
        // sent before it has been processed too.
        rt.handle.set_input("marker").await.unwrap();
        let snap = rt.handle.wait_for(WAIT, |s| s.input == "marker").await.unwrap();

        assert!(snap.chat.is_empty());
        assert!(snap.moods.is_empty());
        assert_eq!(snap.current_mood, Mood::Neutral);
        assert!(!snap.started);
        assert!(gateway.recorded_requests().is_empty());
    }

    /// N submissions give N moods, N user messages, at most N replies
    #[tokio::test]
    async fn test_history_counts_after_many_submissions() {
        let texts = [
            "I feel great today",
            "a bit tired",
            "so much pressure at work",
            "",
            "furious about the bus",
            "just a normal day",
        ];
        let rt = TestSession::builder().checked_in_today().build(MockGateway::new());

        let mut submitted = 0;
        for text in texts {
            if rt.handle.submit_message(text).await.unwrap() {
                submitted += 1;
            }
        }

        let snap = rt
            .handle
            .wait_for(WAIT, |s| s.bot_messages().count() == submitted)
            .await
            .unwrap();
        assert_eq!(snap.moods.len(), submitted);
        assert_eq!(snap.user_messages().count(), submitted);

        let moods: Vec<Mood> = snap.moods.iter().map(|e| e.mood).collect();
        assert_eq!(
            moods,
            vec![Mood::Happy, Mood::Tired, Mood::Stressed, Mood::Angry, Mood::Neutral]
        );
        assert_eq!(snap.current_mood, Mood::Neutral);
    }

    /// Replies append in completion order, not request order
    #[tokio::test]
    async fn test_concurrent_replies_interleave_by_completion() {
        let gateway = DelayedMockGateway::new(Duration::from_millis(10))
            .with_delay("slow one", Duration::from_millis(300));
        let rt = TestSession::builder().checked_in_today().build(gateway);

        rt.handle.submit_message("slow one").await.unwrap();
        rt.handle.submit_message("fast one").await.unwrap();

        // Both user messages are visible before either reply
        let early = rt.handle.wait_for(WAIT, |s| s.user_messages().count() == 2).await.unwrap();
        assert!(early.bot_messages().count() < 2);

        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 4).await.unwrap();
        let senders: Vec<Sender> = snap.chat.iter().map(|m| m.sender).collect();
        assert_eq!(senders, [Sender::User, Sender::User, Sender::Bot, Sender::Bot]);
        assert_eq!(snap.chat[2].text, "echo: fast one");
        assert_eq!(snap.chat[3].text, "echo: slow one");
    }

    #[tokio::test]
    async fn test_reply_spoken_only_when_voice_output_enabled() {
        let voice = Arc::new(RecordingVoice::new());
        let rt = TestSession::builder()
            .checked_in_today()
            .voice(voice.clone())
            .voice_output(true)
            .build(MockGateway::new());

        rt.handle.submit_message("hi").await.unwrap();
        rt.handle.wait_for(WAIT, |s| s.chat.len() == 2).await.unwrap();
        assert_eq!(voice.spoken(), vec!["echo: hi"]);

        let quiet_voice = Arc::new(RecordingVoice::new());
        let quiet = TestSession::builder()
            .checked_in_today()
            .voice(quiet_voice.clone())
            .build(MockGateway::new());
        quiet.handle.submit_message("hi").await.unwrap();
        quiet.handle.wait_for(WAIT, |s| s.chat.len() == 2).await.unwrap();
        assert!(quiet_voice.spoken().is_empty());
    }

    #[tokio::test]
    async fn test_fallback_is_not_spoken() {
        let voice = Arc::new(RecordingVoice::new());
        let gateway = MockGateway::new();
        gateway.queue_error(GatewayError::network("offline"));
        let rt = TestSession::builder()
            .checked_in_today()
            .voice(voice.clone())
            .voice_output(true)
            .build(gateway);

        rt.handle.submit_message("hi").await.unwrap();
        rt.handle.wait_for(WAIT, |s| s.chat.len() == 2).await.unwrap();
        assert!(voice.spoken().is_empty());
    }

    #[tokio::test]
    async fn test_input_buffer_cleared_after_submit() {
        let rt = TestSession::builder().checked_in_today().build(MockGateway::new());

        rt.handle.set_input("I feel calm").await.unwrap();
        rt.handle.wait_for(WAIT, |s| s.input == "I feel calm").await.unwrap();

        assert!(rt.handle.submit_input().await.unwrap());
        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 2).await.unwrap();
        assert!(snap.input.is_empty());
        assert_eq!(snap.chat[0], ChatMessage::user("I feel calm"));
        assert_eq!(snap.current_mood, Mood::Calm);
    }

    #[tokio::test]
    async fn test_input_cleared_even_when_backend_fails() {
        let gateway = MockGateway::new();
        gateway.queue_error(GatewayError::malformed("no reply"));
        let rt = TestSession::builder().checked_in_today().build(gateway);

        rt.handle.set_input("draft").await.unwrap();
        assert!(rt.handle.submit_input().await.unwrap());
        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 2).await.unwrap();
        assert!(snap.input.is_empty());
        assert_eq!(snap.chat[1], ChatMessage::bot(FALLBACK_REPLY));
    }

    /// Submitting right after typing sees the typed text, with no wait between
    #[tokio::test]
    async fn test_submit_input_sees_preceding_input_change() {
        let gateway = Arc::new(MockGateway::new());
        let rt = TestSession::builder().checked_in_today().build(gateway.clone());

        rt.handle.set_input("I feel calm").await.unwrap();
        assert!(rt.handle.submit_input().await.unwrap());

        let snap = rt.handle.wait_for(WAIT, |s| s.chat.len() == 2).await.unwrap();
        assert_eq!(snap.chat[0], ChatMessage::user("I feel calm"));
        assert_eq!(snap.current_mood, Mood::Calm);
        assert_eq!(snap.moods.len(), 1);
        assert!(snap.input.is_empty());
        assert_eq!(gateway.recorded_requests(), vec!["I feel calm"]);
    }

    #[tokio::test]
    async fn test_submit_blank_input_is_not_queued() {
        let gateway = Arc::new(MockGateway::new());
        let rt = TestSession::builder().build(gateway.clone());

        rt.handle.set_input("   ").await.unwrap();
        assert!(!rt.handle.submit_input().await.unwrap());

        let snap = rt.handle.snapshot();
        assert!(snap.chat.is_empty());
        assert!(snap.moods.is_empty());
        assert!(!snap.started);
        assert!(gateway.recorded_requests().is_empty());
    }

    /// A subscriber reacting to an event already sees it in the snapshot
    #[tokio::test]
    async fn test_snapshot_published_before_events() {
        let rt = TestSession::builder().checked_in_today().build(MockGateway::new());
        let mut events = rt.handle.subscribe();

        rt.handle.submit_message("so happy").await.unwrap();

        let mut replies = 0;
        while replies < 1 {
            match tokio::time::timeout(WAIT, events.recv()).await {
                Ok(Ok(SessionEvent::Message { message })) => {
                    assert!(rt.handle.snapshot().chat.contains(&message));
                    if message.sender == Sender::Bot {
                        replies += 1;
                    }
                }
                Ok(Ok(SessionEvent::Mood { event })) => {
                    assert_eq!(rt.handle.snapshot().moods.last(), Some(&event));
                }
                Ok(Ok(SessionEvent::Input { text })) => {
                    assert_eq!(rt.handle.snapshot().input, text);
                }
                Ok(Ok(_)) => {}
                other => panic!("unexpected: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_voice_transcript_fills_input() {
        let voice = Arc::new(RecordingVoice::new());
        voice.queue_transcript("I'm exhausted");
        let rt = TestSession::builder().voice(voice).build(MockGateway::new());

        rt.handle.listen().await.unwrap();
        let snap = rt
            .handle
            .wait_for(WAIT, |s| s.input == "I'm exhausted")
            .await
            .unwrap();
        assert!(snap.chat.is_empty());
        assert!(!snap.started);
    }

    #[tokio::test]
    async fn test_voice_failures_leave_input_and_notify() {
        let voice = Arc::new(RecordingVoice::new());
        voice.queue_failure(VoiceError::NotSupported);
        voice.queue_failure(VoiceError::Recognition("no-speech".into()));
        let rt = TestSession::builder().voice(voice).build(MockGateway::new());
        let mut events = rt.handle.subscribe();

        rt.handle.set_input("typed").await.unwrap();
        rt.handle.listen().await.unwrap();
        rt.handle.listen().await.unwrap();

        let mut notices = Vec::new();
        while notices.len() < 2 {
            match tokio::time::timeout(WAIT, events.recv()).await {
                Ok(Ok(SessionEvent::Notice { message })) => notices.push(message),
                Ok(Ok(_)) => {}
                other => panic!("expected notice, got {other:?}"),
            }
        }
        assert_eq!(notices[0], VoiceError::NotSupported.notice());
        assert_eq!(notices[1], VoiceError::Recognition(String::new()).notice());

        let snap = rt.handle.snapshot();
        assert_eq!(snap.input, "typed");
        assert!(snap.chat.is_empty());
    }

    #[tokio::test]
    async fn test_mood_timestamps_use_clock() {
        let rt = TestSession::builder().checked_in_today().build(MockGateway::new());

        rt.handle.submit_message("first").await.unwrap();
        rt.handle.wait_for(WAIT, |s| s.moods.len() == 1).await.unwrap();
        rt.clock.advance(chrono::Duration::minutes(5));
        rt.handle.submit_message("second").await.unwrap();

        let snap = rt.handle.wait_for(WAIT, |s| s.moods.len() == 2).await.unwrap();
        assert_eq!(
            snap.moods[1].timestamp - snap.moods[0].timestamp,
            chrono::Duration::minutes(5)
        );
    }

    #[tokio::test]
    async fn test_broadcasts_messages_and_moods() {
        let rt = TestSession::builder().checked_in_today().build(MockGateway::new());
        let mut events = rt.handle.subscribe();

        rt.handle.submit_message("so happy").await.unwrap();

        let mut saw_mood = false;
        let mut messages = 0;
        while messages < 2 {
            match tokio::time::timeout(WAIT, events.recv()).await {
                Ok(Ok(SessionEvent::Mood { event })) => {
                    assert_eq!(event.mood, Mood::Happy);
                    saw_mood = true;
                }
                Ok(Ok(SessionEvent::Message { .. })) => messages += 1,
                Ok(Ok(_)) => {}
                other => panic!("unexpected: {other:?}"),
            }
        }
        assert!(saw_mood);
    }
}
