//! Configuration resolution for glosa-ai
//!
//! API key priority: `GLOSA_OPENAI_API_KEY` → `OPENAI_API_KEY` → TOML.
//! A missing key is not fatal; generation calls then fail as not configured.

use glosa_common::config::TomlConfig;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::{info, warn};

use crate::services::openai_client::{
    DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL, DEFAULT_TTS_MODEL, DEFAULT_TTS_VOICE,
};
use crate::services::OpenAiSettings;

pub const API_KEY_ENV: &str = "GLOSA_OPENAI_API_KEY";
pub const FALLBACK_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5730";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Resolve the OpenAI API key from environment and TOML
pub fn resolve_openai_api_key(toml_config: &TomlConfig) -> Option<String> {
    select_api_key(
        std::env::var(API_KEY_ENV).ok(),
        std::env::var(FALLBACK_API_KEY_ENV).ok(),
        toml_config.openai_api_key.clone(),
    )
}

fn select_api_key(
    primary_env: Option<String>,
    fallback_env: Option<String>,
    toml_key: Option<String>,
) -> Option<String> {
    let candidates = [
        (API_KEY_ENV, primary_env),
        (FALLBACK_API_KEY_ENV, fallback_env),
        ("TOML config", toml_key),
    ];

    let valid: Vec<(&str, String)> = candidates
        .into_iter()
        .filter_map(|(source, key)| key.filter(|k| is_valid_key(k)).map(|k| (source, k)))
        .collect();

    if valid.len() > 1 {
        let sources: Vec<&str> = valid.iter().map(|(source, _)| *source).collect();
        warn!(
            "OpenAI API key found in multiple sources: {}. Using {}.",
            sources.join(", "),
            sources[0]
        );
    }

    match valid.into_iter().next() {
        Some((source, key)) => {
            info!("OpenAI API key loaded from {}", source);
            Some(key.trim().to_string())
        }
        None => {
            warn!(
                "OpenAI API key not configured. Set {} or add openai_api_key to the TOML config",
                API_KEY_ENV
            );
            None
        }
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolved runtime settings for the service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_address: SocketAddr,
    pub openai: OpenAiSettings,
}

impl ServiceConfig {
    /// Combine TOML values, CLI overrides and defaults
    pub fn resolve(
        toml_config: &TomlConfig,
        bind_override: Option<&str>,
        api_key: Option<String>,
    ) -> glosa_common::Result<Self> {
        let bind = bind_override
            .or(toml_config.bind_address.as_deref())
            .unwrap_or(DEFAULT_BIND_ADDRESS);
        let bind_address: SocketAddr = bind.parse().map_err(|e| {
            glosa_common::Error::Config(format!("Invalid bind address '{}': {}", bind, e))
        })?;

        let openai = OpenAiSettings {
            api_key,
            base_url: toml_config
                .openai_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            chat_model: toml_config
                .chat_model
                .clone()
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            tts_model: toml_config
                .tts_model
                .clone()
                .unwrap_or_else(|| DEFAULT_TTS_MODEL.to_string()),
            tts_voice: toml_config
                .tts_voice
                .clone()
                .unwrap_or_else(|| DEFAULT_TTS_VOICE.to_string()),
            request_timeout: Duration::from_secs(
                toml_config
                    .request_timeout_secs
                    .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            ),
        };

        Ok(Self {
            bind_address,
            openai,
        })
    }
}
