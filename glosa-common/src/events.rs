//! Event types for the Glosa event system
//!
//! Provides shared event definitions and the EventBus used to push
//! workflow state changes and transient alerts to connected clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Severity of a user-visible alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Error,
}

/// Why an audio resource stopped playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// Playback reached the end of the clip
    Ended,
    /// Another sentence started playing
    Preempted,
}

/// Glosa event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GlosaEvent {
    /// A vocabulary request succeeded and a new word group was prepended
    WordGroupCreated {
        group_id: Uuid,
        keyword: String,
        language_code: String,
        timestamp: DateTime<Utc>,
    },

    /// An example sentence was attached to a word of a group
    SentenceGenerated {
        group_id: Uuid,
        word: String,
        timestamp: DateTime<Utc>,
    },

    /// A sentence clip became the audible resource
    AudioPlaybackStarted {
        sentence_key: String,
        timestamp: DateTime<Utc>,
    },

    /// A sentence clip stopped playing
    AudioPlaybackStopped {
        sentence_key: String,
        reason: StopReason,
        timestamp: DateTime<Utc>,
    },

    /// In-memory vocabulary history was cleared
    HistoryCleared {
        removed: usize,
        timestamp: DateTime<Utc>,
    },

    /// A chat message (user, reply or error entry) was prepended
    ChatMessageAdded {
        message_id: Uuid,
        is_user: bool,
        persona: Option<String>,
        timestamp: DateTime<Utc>,
    },

    /// Chat history was cleared
    ChatCleared {
        removed: usize,
        timestamp: DateTime<Utc>,
    },

    /// Transient user-visible notification
    Alert {
        severity: AlertSeverity,
        message: String,
        timestamp: DateTime<Utc>,
    },
}

impl GlosaEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            GlosaEvent::WordGroupCreated { .. } => "WordGroupCreated",
            GlosaEvent::SentenceGenerated { .. } => "SentenceGenerated",
            GlosaEvent::AudioPlaybackStarted { .. } => "AudioPlaybackStarted",
            GlosaEvent::AudioPlaybackStopped { .. } => "AudioPlaybackStopped",
            GlosaEvent::HistoryCleared { .. } => "HistoryCleared",
            GlosaEvent::ChatMessageAdded { .. } => "ChatMessageAdded",
            GlosaEvent::ChatCleared { .. } => "ChatCleared",
            GlosaEvent::Alert { .. } => "Alert",
        }
    }

    /// Build an alert event stamped with the current time
    pub fn alert(severity: AlertSeverity, message: impl Into<String>) -> Self {
        GlosaEvent::Alert {
            severity,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally:
/// - Non-blocking publish (slow subscribers don't block producers)
/// - Multiple concurrent subscribers
/// - Lagged message detection for slow subscribers
///
/// # Examples
///
/// ```
/// use glosa_common::events::{AlertSeverity, EventBus, GlosaEvent};
///
/// let event_bus = EventBus::new(100);
/// let mut rx = event_bus.subscribe();
///
/// event_bus.emit_lossy(GlosaEvent::alert(AlertSeverity::Info, "hello"));
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GlosaEvent>,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<GlosaEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: GlosaEvent) {
        let _ = self.tx.send(event);
    }
}
