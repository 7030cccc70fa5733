//! Speech input/output capability

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("Voice input is not supported on this device")]
    NotSupported,
    #[error("Speech recognition failed: {0}")]
    Recognition(String),
}

impl VoiceError {
    /// Text shown to the user when recognition does not produce a transcript
    pub fn notice(&self) -> &'static str {
        match self {
            VoiceError::NotSupported => "Sorry, voice input isn't supported here.",
            VoiceError::Recognition(_) => "Sorry, I couldn't catch that. Please try again.",
        }
    }
}

/// Text-to-speech and one-shot speech recognition
#[async_trait]
pub trait VoiceBridge: Send + Sync {
    /// Speak `text`. Fire-and-forget.
    fn speak(&self, text: &str);

    /// Listen once and return at most one transcript
    async fn recognize(&self) -> Result<String, VoiceError>;
}

#[async_trait]
impl<T: VoiceBridge + ?Sized> VoiceBridge for Arc<T> {
    fn speak(&self, text: &str) {
        (**self).speak(text);
    }

    async fn recognize(&self) -> Result<String, VoiceError> {
        (**self).recognize().await
    }
}

/// Voice bridge for hosts without audio: speaking is a no-op and
/// recognition is unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentVoice;

#[async_trait]
impl VoiceBridge for SilentVoice {
    fn speak(&self, text: &str) {
        tracing::debug!(chars = text.chars().count(), "Voice output unavailable, skipping");
    }

    async fn recognize(&self) -> Result<String, VoiceError> {
        Err(VoiceError::NotSupported)
    }
}
