//! Backend gateway abstraction
//!
//! A gateway forwards one message to a language model and returns its
//! reply. The session consumes it only as "send text, receive text or error".

mod error;
mod openai;
mod relay;

pub use error::{GatewayError, GatewayErrorKind};
pub use openai::{OpenAiGateway, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use relay::RelayGateway;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for reply backends
#[async_trait]
pub trait BackendGateway: Send + Sync {
    /// Send one user message and wait for the reply text
    async fn send(&self, text: &str) -> Result<String, GatewayError>;

    /// Short label for logs
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: BackendGateway + ?Sized> BackendGateway for Arc<T> {
    async fn send(&self, text: &str) -> Result<String, GatewayError> {
        (**self).send(text).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Logging wrapper for gateways
pub struct LoggingGateway {
    inner: Arc<dyn BackendGateway>,
    name: String,
}

impl LoggingGateway {
    pub fn new(inner: Arc<dyn BackendGateway>) -> Self {
        let name = inner.name().to_string();
        Self { inner, name }
    }
}

#[async_trait]
impl BackendGateway for LoggingGateway {
    async fn send(&self, text: &str) -> Result<String, GatewayError> {
        let start = std::time::Instant::now();
        let result = self.inner.send(text).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    gateway = %self.name,
                    duration_ms = %duration.as_millis(),
                    request_chars = text.chars().count(),
                    reply_chars = reply.chars().count(),
                    "Backend reply received"
                );
            }
            Err(e) => {
                tracing::error!(
                    gateway = %self.name,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    "Backend request failed"
                );
            }
        }

        result
    }

    fn name(&self) -> &str {
        &self.name
    }
}
