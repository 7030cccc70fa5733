//! Client for a remote chat relay (`POST {base}/chat`)

use super::{BackendGateway, GatewayError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct RelayGateway {
    client: Client,
    endpoint: String,
}

impl RelayGateway {
    pub fn new(base_url: &str) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(180))
            .build()
            .map_err(|e| GatewayError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat", base_url.trim_end_matches('/')),
        })
    }
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    reply: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl BackendGateway for RelayGateway {
    async fn send(&self, text: &str) -> Result<String, GatewayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RelayRequest { message: text })
            .send()
            .await
            .map_err(|e| GatewayError::from_reqwest(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::network(format!("Failed to read response: {e}")))?;
        let parsed = serde_json::from_str::<RelayResponse>(&body);

        if !status.is_success() {
            let message = parsed.ok().and_then(|r| r.error).unwrap_or(body);
            return Err(GatewayError::from_status(status.as_u16(), message));
        }

        parsed
            .map_err(|e| GatewayError::malformed(format!("Failed to parse response: {e}")))?
            .reply
            .ok_or_else(|| GatewayError::malformed("Response has no reply field"))
    }

    fn name(&self) -> &str {
        "relay"
    }
}
