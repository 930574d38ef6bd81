//! External collaborators consumed by the workflows
//!
//! Each collaborator sits behind an async trait so the workflows never see
//! HTTP details; every call returns `Result<Payload, CollaboratorError>`.

pub mod openai_client;
pub mod prompts;

pub use openai_client::{OpenAiClient, OpenAiSettings};

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Language, SentenceData, Vocabulary};

/// Failure reported by an external collaborator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    /// Request never got a response (connect failure, timeout)
    #[error("Network error: {0}")]
    Unreachable(String),

    /// Upstream answered with a non-success status
    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    /// Response arrived but lacked required fields or failed shape checks
    #[error("Malformed response: {0}")]
    Format(String),

    /// Upstream refused the request input (e.g. unknown persona)
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Collaborator is missing configuration (e.g. API key)
    #[error("Not configured: {0}")]
    NotConfigured(String),
}

/// Text generation for vocabulary and example sentences
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate `count` target-language words related to `keyword`, with meanings
    async fn generate_vocabulary(
        &self,
        keyword: &str,
        language: &Language,
        count: usize,
    ) -> Result<Vocabulary, CollaboratorError>;

    /// Generate one example sentence containing `word`, with its translation
    async fn generate_sentence(
        &self,
        word: &str,
        language: &Language,
    ) -> Result<SentenceData, CollaboratorError>;
}

/// Text-to-speech synthesis
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Returns the base64-encoded audio payload
    async fn synthesize(
        &self,
        text: &str,
        language_code: &str,
    ) -> Result<String, CollaboratorError>;
}

/// Persona chat completion
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    /// Returns the reply text; unknown persona names are `Rejected`
    async fn complete(&self, message: &str, persona: &str) -> Result<String, CollaboratorError>;
}
