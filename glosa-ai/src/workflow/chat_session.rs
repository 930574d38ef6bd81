//! Persona chat session
//!
//! Single-stage request/response turns, newest first, in memory only.

use glosa_common::events::{AlertSeverity, EventBus, GlosaEvent};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{ClearOutcome, WorkflowError, WorkflowResult, MAX_CHAT_MESSAGE_CHARS};
use crate::models::{ChatMessage, Persona};
use crate::services::ChatCompleter;

#[derive(Default)]
struct ChatState {
    messages: Vec<ChatMessage>,
    is_loading: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatSnapshot {
    pub messages: Vec<ChatMessage>,
    pub is_loading: bool,
}

/// Result of a chat submission
#[derive(Debug, Clone)]
pub enum ChatOutcome {
    /// Reply prepended to the list
    Replied(ChatMessage),
    /// A previous submission is still outstanding; nothing was sent
    Busy,
}

pub struct ChatSession {
    state: Mutex<ChatState>,
    completer: Arc<dyn ChatCompleter>,
    event_bus: EventBus,
}

impl ChatSession {
    pub fn new(completer: Arc<dyn ChatCompleter>, event_bus: EventBus) -> Self {
        Self {
            state: Mutex::new(ChatState::default()),
            completer,
            event_bus,
        }
    }

    /// Send one message with the given persona (default: professional)
    ///
    /// Persona names are passed through unchecked; the completer rejects
    /// unknown ones. On any upstream failure an error entry is prepended
    /// and the error is returned.
    pub async fn submit(
        &self,
        message: &str,
        persona: Option<&str>,
    ) -> WorkflowResult<ChatOutcome> {
        let message = message.trim();
        if message.is_empty() {
            return Err(WorkflowError::Validation("Please enter a message".to_string()));
        }
        if message.chars().count() > MAX_CHAT_MESSAGE_CHARS {
            return Err(WorkflowError::Validation(format!(
                "Message is too long (max {} characters)",
                MAX_CHAT_MESSAGE_CHARS
            )));
        }
        let persona = persona
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| Persona::default().slug())
            .to_string();

        let user_message = ChatMessage::user(message);
        {
            let mut state = self.state.lock().await;
            if state.is_loading {
                drop(state);
                self.alert(AlertSeverity::Info, "Please wait for the current reply");
                return Ok(ChatOutcome::Busy);
            }
            state.is_loading = true;
            state.messages.insert(0, user_message.clone());
        }
        self.announce(&user_message);

        tracing::debug!(
            persona = %persona,
            chars = message.chars().count(),
            "Sending chat message"
        );

        let result = self.completer.complete(message, &persona).await;

        let entry = match &result {
            Ok(reply) => ChatMessage::reply(reply.clone(), &persona),
            Err(e) => ChatMessage::error(&WorkflowError::from(e.clone()).user_message()),
        };
        {
            let mut state = self.state.lock().await;
            state.is_loading = false;
            state.messages.insert(0, entry.clone());
        }
        self.announce(&entry);

        match result {
            Ok(_) => Ok(ChatOutcome::Replied(entry)),
            Err(e) => {
                let err = WorkflowError::from(e);
                tracing::warn!(persona = %persona, error = %err, "Chat completion failed");
                self.alert(AlertSeverity::Error, err.user_message());
                Err(err)
            }
        }
    }

    pub async fn clear_chat(&self) -> ClearOutcome {
        let removed = {
            let mut state = self.state.lock().await;
            if state.messages.is_empty() {
                return ClearOutcome::NothingToClear;
            }
            let removed = state.messages.len();
            state.messages.clear();
            removed
        };

        tracing::info!(removed, "Chat cleared");
        self.event_bus.emit_lossy(GlosaEvent::ChatCleared {
            removed,
            timestamp: glosa_common::time::now(),
        });

        ClearOutcome::Cleared { removed }
    }

    pub async fn snapshot(&self) -> ChatSnapshot {
        let state = self.state.lock().await;
        ChatSnapshot {
            messages: state.messages.clone(),
            is_loading: state.is_loading,
        }
    }

    fn announce(&self, message: &ChatMessage) {
        self.event_bus.emit_lossy(GlosaEvent::ChatMessageAdded {
            message_id: message.id,
            is_user: message.is_user,
            persona: message.persona.clone(),
            timestamp: message.timestamp,
        });
    }

    fn alert(&self, severity: AlertSeverity, message: impl Into<String>) {
        self.event_bus.emit_lossy(GlosaEvent::alert(severity, message));
    }
}
