//! Scripted collaborator doubles for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use glosa_ai::db::WordGroupMirror;
use glosa_ai::models::{Language, SentenceData, Vocabulary, WordGroup};
use glosa_ai::services::{ChatCompleter, CollaboratorError, SpeechSynthesizer, TextGenerator};
use glosa_ai::workflow::{ChatSession, EnrichmentWorkflow};
use glosa_common::events::EventBus;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

/// "ID3" header bytes, base64-encoded
pub const AUDIO_PAYLOAD: &str = "SUQzBAA=";

pub fn vocabulary(words: &[&str], meanings: &[&str]) -> Vocabulary {
    Vocabulary {
        words: words.iter().map(|s| s.to_string()).collect(),
        meanings: meanings.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn four_fruits() -> Vocabulary {
    vocabulary(
        &["apple", "pear", "grape", "peach"],
        &["蘋果", "梨", "葡萄", "桃子"],
    )
}

/// Optional barrier a double waits on before answering
#[derive(Default)]
pub struct Gate {
    enabled: bool,
    notify: Notify,
}

impl Gate {
    pub fn closed() -> Self {
        Self {
            enabled: true,
            notify: Notify::new(),
        }
    }

    pub fn open(&self) {
        self.notify.notify_one();
    }

    async fn pass(&self) {
        if self.enabled {
            self.notify.notified().await;
        }
    }
}

pub struct ScriptedText {
    pub vocabulary: Mutex<Result<Vocabulary, CollaboratorError>>,
    pub sentence: Mutex<Result<SentenceData, CollaboratorError>>,
    pub vocabulary_calls: AtomicUsize,
    pub sentence_calls: AtomicUsize,
    pub vocabulary_gate: Gate,
    pub sentence_gate: Gate,
}

impl ScriptedText {
    pub fn new() -> Self {
        Self {
            vocabulary: Mutex::new(Ok(four_fruits())),
            sentence: Mutex::new(Ok(SentenceData {
                example: "I eat an apple every day.".to_string(),
                translation: "我每天吃一顆蘋果。".to_string(),
            })),
            vocabulary_calls: AtomicUsize::new(0),
            sentence_calls: AtomicUsize::new(0),
            vocabulary_gate: Gate::default(),
            sentence_gate: Gate::default(),
        }
    }

    pub fn with_vocabulary(self, result: Result<Vocabulary, CollaboratorError>) -> Self {
        *self.vocabulary.lock().unwrap() = result;
        self
    }

    pub fn with_sentence(self, result: Result<SentenceData, CollaboratorError>) -> Self {
        *self.sentence.lock().unwrap() = result;
        self
    }

    pub fn gate_vocabulary(mut self) -> Self {
        self.vocabulary_gate = Gate::closed();
        self
    }

    pub fn gate_sentences(mut self) -> Self {
        self.sentence_gate = Gate::closed();
        self
    }

    pub fn vocabulary_calls(&self) -> usize {
        self.vocabulary_calls.load(Ordering::SeqCst)
    }

    pub fn sentence_calls(&self) -> usize {
        self.sentence_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedText {
    async fn generate_vocabulary(
        &self,
        _keyword: &str,
        _language: &Language,
        _count: usize,
    ) -> Result<Vocabulary, CollaboratorError> {
        self.vocabulary_calls.fetch_add(1, Ordering::SeqCst);
        self.vocabulary_gate.pass().await;
        self.vocabulary.lock().unwrap().clone()
    }

    async fn generate_sentence(
        &self,
        _word: &str,
        _language: &Language,
    ) -> Result<SentenceData, CollaboratorError> {
        self.sentence_calls.fetch_add(1, Ordering::SeqCst);
        self.sentence_gate.pass().await;
        self.sentence.lock().unwrap().clone()
    }
}

pub struct ScriptedSpeech {
    pub result: Mutex<Result<String, CollaboratorError>>,
    pub calls: AtomicUsize,
    pub gate: Gate,
}

impl ScriptedSpeech {
    pub fn new() -> Self {
        Self {
            result: Mutex::new(Ok(AUDIO_PAYLOAD.to_string())),
            calls: AtomicUsize::new(0),
            gate: Gate::default(),
        }
    }

    pub fn with_result(self, result: Result<String, CollaboratorError>) -> Self {
        *self.result.lock().unwrap() = result;
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Gate::closed();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechSynthesizer for ScriptedSpeech {
    async fn synthesize(
        &self,
        _text: &str,
        _language_code: &str,
    ) -> Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.gate.pass().await;
        self.result.lock().unwrap().clone()
    }
}

pub struct ScriptedChat {
    pub result: Mutex<Result<String, CollaboratorError>>,
    pub calls: AtomicUsize,
    pub gate: Gate,
    pub last_persona: Mutex<Option<String>>,
}

impl ScriptedChat {
    pub fn new() -> Self {
        Self {
            result: Mutex::new(Ok("Hello there!".to_string())),
            calls: AtomicUsize::new(0),
            gate: Gate::default(),
            last_persona: Mutex::new(None),
        }
    }

    pub fn with_result(self, result: Result<String, CollaboratorError>) -> Self {
        *self.result.lock().unwrap() = result;
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Gate::closed();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatCompleter for ScriptedChat {
    async fn complete(&self, _message: &str, persona: &str) -> Result<String, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_persona.lock().unwrap() = Some(persona.to_string());
        self.gate.pass().await;
        if glosa_ai::models::Persona::parse(persona).is_none() {
            return Err(CollaboratorError::Rejected("invalid persona selection".to_string()));
        }
        self.result.lock().unwrap().clone()
    }
}

/// In-memory mirror; optionally fails every call
#[derive(Default)]
pub struct MemoryMirror {
    pub groups: Mutex<Vec<WordGroup>>,
    pub fail: bool,
    pub saves: AtomicUsize,
}

impl MemoryMirror {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Records in arbitrary storage order
    pub fn with_groups(groups: Vec<WordGroup>) -> Self {
        Self {
            groups: Mutex::new(groups),
            ..Default::default()
        }
    }

    pub fn saved(&self) -> Vec<WordGroup> {
        self.groups.lock().unwrap().clone()
    }
}

#[async_trait]
impl WordGroupMirror for MemoryMirror {
    async fn save(&self, group: &WordGroup) -> glosa_common::Result<()> {
        if self.fail {
            self.saves.fetch_add(1, Ordering::SeqCst);
            return Err(glosa_common::Error::Io(std::io::Error::other("disk full")));
        }
        self.groups.lock().unwrap().push(group.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_all(&self) -> glosa_common::Result<Vec<WordGroup>> {
        if self.fail {
            return Err(glosa_common::Error::Io(std::io::Error::other("store offline")));
        }
        Ok(self.groups.lock().unwrap().clone())
    }
}

pub struct Harness {
    pub text: Arc<ScriptedText>,
    pub speech: Arc<ScriptedSpeech>,
    pub chat_double: Arc<ScriptedChat>,
    pub mirror: Arc<MemoryMirror>,
    pub event_bus: EventBus,
    pub workflow: Arc<EnrichmentWorkflow>,
    pub chat: Arc<ChatSession>,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(
            ScriptedText::new(),
            ScriptedSpeech::new(),
            ScriptedChat::new(),
            MemoryMirror::default(),
        )
    }

    pub fn build(
        text: ScriptedText,
        speech: ScriptedSpeech,
        chat: ScriptedChat,
        mirror: MemoryMirror,
    ) -> Self {
        let text = Arc::new(text);
        let speech = Arc::new(speech);
        let chat_double = Arc::new(chat);
        let mirror = Arc::new(mirror);
        let event_bus = EventBus::new(100);

        let workflow = Arc::new(EnrichmentWorkflow::new(
            text.clone(),
            speech.clone(),
            mirror.clone(),
            event_bus.clone(),
        ));
        let chat = Arc::new(ChatSession::new(chat_double.clone(), event_bus.clone()));

        Self {
            text,
            speech,
            chat_double,
            mirror,
            event_bus,
            workflow,
            chat,
        }
    }
}

/// Poll until `condition` holds, failing the test after two seconds
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}
