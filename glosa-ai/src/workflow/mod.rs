//! Enrichment and chat workflows
//!
//! The enrichment workflow runs three dependent stages (vocabulary, sentence
//! per word, audio per sentence) over a per-language session aggregate. The
//! chat session is its single-stage sibling.

pub mod audio_deck;
pub mod chat_session;
pub mod enrichment;
pub mod enrichment_cache;
pub mod session_store;

pub use audio_deck::{AudioClip, AudioDeck};
pub use chat_session::{ChatOutcome, ChatSession, ChatSnapshot};
pub use enrichment::{EnrichmentWorkflow, LangSnapshot};
pub use enrichment_cache::{CacheState, EnrichmentCache};
pub use session_store::VocabularySessionStore;

use thiserror::Error;

use crate::models::{SentenceData, WordGroup};
use crate::services::CollaboratorError;

/// Fixed number of words requested per vocabulary generation
pub const VOCABULARY_SIZE: usize = 4;

/// Maximum accepted chat message length, in characters
pub const MAX_CHAT_MESSAGE_CHARS: usize = 2000;

/// Transport-level failure category
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("cannot reach server: {0}")]
    Unreachable(String),

    #[error("upstream returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("service unavailable: {0}")]
    Unavailable(String),
}

/// Workflow error taxonomy
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Missing or invalid input, caught before any external call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Upstream replied but the payload failed shape checks
    #[error("Upstream format error: {0}")]
    UpstreamFormat(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Durable store read or write failed
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl WorkflowError {
    /// Stable machine-readable category
    pub fn kind(&self) -> &'static str {
        match self {
            WorkflowError::Validation(_) => "validation_error",
            WorkflowError::UpstreamFormat(_) => "upstream_format_error",
            WorkflowError::Transport(_) => "transport_error",
            WorkflowError::Persistence(_) => "persistence_error",
            WorkflowError::NotFound(_) => "not_found",
        }
    }

    /// Friendlier text shown to the user
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Validation(msg) => msg.clone(),
            WorkflowError::UpstreamFormat(_) => {
                "The AI service returned an unexpected response. Please try again later.".to_string()
            }
            WorkflowError::Transport(TransportError::Unreachable(_)) => {
                "Cannot reach the server. Please check your network connection.".to_string()
            }
            WorkflowError::Transport(TransportError::Status { status, message }) => match status {
                401 => "The API key is invalid or has expired.".to_string(),
                429 => "Rate limit reached. Please try again later.".to_string(),
                500..=599 => "The upstream server encountered an error. Please try again later."
                    .to_string(),
                _ => message.clone(),
            },
            WorkflowError::Transport(TransportError::Unavailable(msg)) => msg.clone(),
            WorkflowError::Persistence(_) => "Failed to access saved history.".to_string(),
            WorkflowError::NotFound(msg) => msg.clone(),
        }
    }
}

impl From<CollaboratorError> for WorkflowError {
    fn from(err: CollaboratorError) -> Self {
        match err {
            CollaboratorError::Unreachable(msg) => TransportError::Unreachable(msg).into(),
            CollaboratorError::Status { status, message } => {
                TransportError::Status { status, message }.into()
            }
            CollaboratorError::Format(msg) => WorkflowError::UpstreamFormat(msg),
            CollaboratorError::Rejected(msg) => WorkflowError::Validation(msg),
            CollaboratorError::NotConfigured(msg) => TransportError::Unavailable(msg).into(),
        }
    }
}

pub type WorkflowResult<T> = std::result::Result<T, WorkflowError>;

/// Result of a vocabulary submission
#[derive(Debug, Clone)]
pub enum StageOutcome {
    /// A new group was prepended to the session list
    Created(WordGroup),
    /// Another vocabulary request is active; nothing was dispatched
    Busy,
}

/// Result of a sentence request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentenceOutcome {
    Generated(SentenceData),
    /// Sentence already existed; no call made
    AlreadyResolved(SentenceData),
    /// Same key is being generated by another caller; no call made
    InFlight,
    /// Generation failed and was absorbed; retry remains possible
    Failed,
}

/// Result of an audio request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutcome {
    Started {
        clip: AudioClip,
        /// True when the payload came from the cache
        cached: bool,
        /// Key that was stopped to make room
        preempted: Option<String>,
    },
    /// Key is already audible or its payload is still being fetched;
    /// nothing changed
    AlreadyPlaying,
}

/// Result of clearing a history list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared { removed: usize },
    NothingToClear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collaborator_errors_map_to_taxonomy() {
        assert_eq!(
            WorkflowError::from(CollaboratorError::Format("x".into())).kind(),
            "upstream_format_error"
        );
        assert_eq!(
            WorkflowError::from(CollaboratorError::Rejected("bad persona".into())),
            WorkflowError::Validation("bad persona".into())
        );
        assert!(matches!(
            WorkflowError::from(CollaboratorError::NotConfigured("no key".into())),
            WorkflowError::Transport(TransportError::Unavailable(_))
        ));
    }

    #[test]
    fn test_status_codes_get_friendly_messages() {
        let status = |status: u16| {
            WorkflowError::from(CollaboratorError::Status {
                status,
                message: "raw upstream text".into(),
            })
            .user_message()
        };

        assert!(status(401).contains("API key"));
        assert!(status(429).contains("Rate limit"));
        assert!(status(503).contains("upstream server"));
        assert_eq!(status(400), "raw upstream text");
    }

    #[test]
    fn test_unreachable_differs_from_server_error() {
        let unreachable =
            WorkflowError::from(CollaboratorError::Unreachable("refused".into())).user_message();
        assert!(unreachable.contains("Cannot reach the server"));
    }
}
