//! Startup configuration from environment variables

use crate::gateway::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_RESOURCE_PREVIEW: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be true or false, got {value:?}")]
    InvalidBool { var: &'static str, value: String },
}

/// Where replies come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendConfig {
    /// Call the chat-completions API directly
    OpenAi {
        api_key: Option<String>,
        model: String,
        base_url: String,
    },
    /// Forward to a remote relay at `POST {url}/chat`
    Relay { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub backend: BackendConfig,
    pub voice_output: bool,
    pub resource_preview: usize,
    /// Upstream used by the `/chat` relay route
    pub upstream: BackendConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("FEELBETTER_PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                var: "FEELBETTER_PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let resource_preview = match var("FEELBETTER_RESOURCE_PREVIEW") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                var: "FEELBETTER_RESOURCE_PREVIEW",
                value,
            })?,
            None => DEFAULT_RESOURCE_PREVIEW,
        };

        let voice_output = match var("FEELBETTER_VOICE_OUTPUT") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool {
                var: "FEELBETTER_VOICE_OUTPUT",
                value,
            })?,
            None => false,
        };

        let db_path = var("FEELBETTER_DB_PATH").map_or_else(
            || {
                let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".feelbetter").join("feelbetter.db")
            },
            PathBuf::from,
        );

        let upstream = BackendConfig::OpenAi {
            api_key: var("OPENAI_API_KEY"),
            model: var("FEELBETTER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: var("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        let backend = match var("FEELBETTER_BACKEND_URL") {
            Some(url) => BackendConfig::Relay { url },
            None => upstream.clone(),
        };

        Ok(Self {
            port,
            db_path,
            backend,
            voice_output,
            resource_preview,
            upstream,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
