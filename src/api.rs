//! HTTP API for FeelBetter
//!
//! Serves the chat relay (`/ping`, `/chat`) and the single process-wide
//! session.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;

use crate::gateway::BackendGateway;
use crate::runtime::SessionHandle;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandle,
    /// Model behind the `/chat` relay route
    pub upstream: Arc<dyn BackendGateway>,
    /// Entries shown in the collapsed resource view
    pub resource_preview: usize,
}

impl AppState {
    pub fn new(
        session: SessionHandle,
        upstream: Arc<dyn BackendGateway>,
        resource_preview: usize,
    ) -> Self {
        Self {
            session,
            upstream,
            resource_preview,
        }
    }
}
