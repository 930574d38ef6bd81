//! Vocabulary enrichment workflow
//!
//! Stage 1 generates a word group for a keyword, stage 2 lazily adds one
//! example sentence per word, stage 3 lazily synthesizes and plays audio per
//! sentence. All mutable state lives in one [`LangState`] aggregate guarded by
//! a mutex that is never held across an external call.

use glosa_common::events::{AlertSeverity, EventBus, GlosaEvent, StopReason};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{
    AudioClip, AudioDeck, AudioOutcome, CacheState, ClearOutcome, EnrichmentCache, SentenceOutcome,
    StageOutcome, VocabularySessionStore, WorkflowError, WorkflowResult, VOCABULARY_SIZE,
};
use crate::db::WordGroupMirror;
use crate::models::{language, AudioKey, SentenceData, SentenceKey, WordGroup};
use crate::services::{SpeechSynthesizer, TextGenerator};

/// Session aggregate for the language page
#[derive(Default)]
struct LangState {
    store: VocabularySessionStore,
    sentences: EnrichmentCache<SentenceKey, SentenceData>,
    audio: EnrichmentCache<AudioKey, AudioClip>,
    deck: AudioDeck,
    is_loading: bool,
    error: Option<String>,
}

/// Observable state of the language page
#[derive(Debug, Clone, Serialize)]
pub struct LangSnapshot {
    pub groups: Vec<WordGroup>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Sentence keys currently being generated
    pub sentences_in_flight: Vec<SentenceKey>,
    /// Audio keys whose payload is being fetched
    pub audio_loading: Vec<String>,
    /// The one audible key, if any
    pub playing: Option<String>,
    pub cached_audio: usize,
}

pub struct EnrichmentWorkflow {
    state: Mutex<LangState>,
    text: Arc<dyn TextGenerator>,
    speech: Arc<dyn SpeechSynthesizer>,
    mirror: Arc<dyn WordGroupMirror>,
    event_bus: EventBus,
}

impl EnrichmentWorkflow {
    pub fn new(
        text: Arc<dyn TextGenerator>,
        speech: Arc<dyn SpeechSynthesizer>,
        mirror: Arc<dyn WordGroupMirror>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            state: Mutex::new(LangState::default()),
            text,
            speech,
            mirror,
            event_bus,
        }
    }

    /// Replace the session list with the durable mirror's contents
    ///
    /// A read failure leaves the list untouched and sets the error banner.
    /// Sentences still being generated keep their claim and attach to the
    /// reloaded group when they resolve.
    pub async fn load_history(&self) -> WorkflowResult<usize> {
        match self.mirror.load_all().await {
            Ok(groups) => {
                let count = groups.len();
                let mut state = self.state.lock().await;
                state.store.replace_all(groups);
                state.sentences.clear_resolved();
                tracing::info!(count, "Vocabulary history loaded");
                Ok(count)
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load vocabulary history");
                let err = WorkflowError::Persistence(e.to_string());
                self.state.lock().await.error = Some(err.user_message());
                self.alert(AlertSeverity::Error, err.user_message());
                Err(err)
            }
        }
    }

    /// Stage 1: generate a word group for `keyword` in `language_code`
    pub async fn submit_keyword(
        &self,
        keyword: &str,
        language_code: &str,
    ) -> WorkflowResult<StageOutcome> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(WorkflowError::Validation("Please enter a keyword".to_string()));
        }
        let language_code = language_code.trim();
        if language_code.is_empty() {
            return Err(WorkflowError::Validation("Please select a language".to_string()));
        }
        let language = language::find(language_code).ok_or_else(|| {
            WorkflowError::Validation(format!("Unsupported language: {}", language_code))
        })?;

        {
            let mut state = self.state.lock().await;
            if state.is_loading {
                drop(state);
                tracing::debug!(keyword = %keyword, "Vocabulary request already active");
                self.alert(AlertSeverity::Info, "Already processing, please wait");
                return Ok(StageOutcome::Busy);
            }
            state.is_loading = true;
            state.error = None;
        }

        tracing::info!(keyword = %keyword, language = %language.code, "Generating vocabulary");

        let result = self
            .text
            .generate_vocabulary(keyword, language, VOCABULARY_SIZE)
            .await
            .map_err(WorkflowError::from)
            .and_then(|vocabulary| {
                vocabulary
                    .check_shape()
                    .map_err(WorkflowError::UpstreamFormat)?;
                Ok(vocabulary)
            });

        let mut state = self.state.lock().await;
        state.is_loading = false;

        let vocabulary = match result {
            Ok(vocabulary) => vocabulary,
            Err(err) => {
                state.error = Some(err.user_message());
                drop(state);
                tracing::warn!(keyword = %keyword, error = %err, "Vocabulary generation failed");
                self.alert(AlertSeverity::Error, err.user_message());
                return Err(err);
            }
        };

        let group = WordGroup::new(keyword, language, vocabulary);
        state.store.prepend(group.clone());
        drop(state);

        tracing::info!(
            group_id = %group.id,
            keyword = %group.keyword,
            words = group.words.len(),
            "Word group created"
        );

        self.event_bus.emit_lossy(GlosaEvent::WordGroupCreated {
            group_id: group.id,
            keyword: group.keyword.clone(),
            language_code: group.language_code.clone(),
            timestamp: group.created_at,
        });

        self.spawn_mirror_write(group.clone());

        Ok(StageOutcome::Created(group))
    }

    /// Fire-and-forget durable write for a new group
    fn spawn_mirror_write(&self, group: WordGroup) {
        let mirror = Arc::clone(&self.mirror);
        let event_bus = self.event_bus.clone();

        tokio::spawn(async move {
            if let Err(e) = mirror.save(&group).await {
                let err = WorkflowError::Persistence(e.to_string());
                tracing::error!(group_id = %group.id, error = %err, "Failed to save word group");
                event_bus.emit_lossy(GlosaEvent::alert(
                    AlertSeverity::Warning,
                    "Word group could not be saved to history",
                ));
            }
        });
    }

    /// Stage 2: generate an example sentence for one word of a group
    ///
    /// Upstream failures are absorbed: the word stays without a sentence and
    /// the outcome is [`SentenceOutcome::Failed`].
    pub async fn request_sentence(
        &self,
        group_id: Uuid,
        word: &str,
    ) -> WorkflowResult<SentenceOutcome> {
        let key = SentenceKey::new(group_id, word);

        let language = {
            let mut state = self.state.lock().await;
            let group = state
                .store
                .get(group_id)
                .ok_or_else(|| WorkflowError::NotFound(format!("word group {}", group_id)))?;
            if !group.has_word(word) {
                return Err(WorkflowError::Validation(format!(
                    "'{}' is not a word of this group",
                    word
                )));
            }
            if let Some(existing) = group.sentence(word) {
                return Ok(SentenceOutcome::AlreadyResolved(existing.clone()));
            }
            let language = language::find(&group.language_code).ok_or_else(|| {
                WorkflowError::Validation(format!(
                    "Unsupported language: {}",
                    group.language_code
                ))
            })?;
            if !state.sentences.begin(key.clone()) {
                tracing::debug!(key = %key, "Sentence already in flight");
                return Ok(SentenceOutcome::InFlight);
            }
            language
        };

        tracing::debug!(key = %key, "Generating sentence");

        let result = self.text.generate_sentence(word, language).await;

        let mut state = self.state.lock().await;
        match result {
            Ok(sentence) => {
                if state.sentences.state(&key) != CacheState::InFlight
                    || !state.store.attach_sentence(group_id, word, sentence.clone())
                {
                    state.sentences.abandon(&key);
                    return Err(WorkflowError::NotFound(format!(
                        "word group {} was cleared",
                        group_id
                    )));
                }
                state.sentences.resolve(key, sentence.clone());
                drop(state);

                self.event_bus.emit_lossy(GlosaEvent::SentenceGenerated {
                    group_id,
                    word: word.to_string(),
                    timestamp: glosa_common::time::now(),
                });
                Ok(SentenceOutcome::Generated(sentence))
            }
            Err(e) => {
                state.sentences.abandon(&key);
                drop(state);
                tracing::warn!(key = %key, error = %e, "Sentence generation failed");
                Ok(SentenceOutcome::Failed)
            }
        }
    }

    /// Stage 3: synthesize (once per key) and play a sentence
    ///
    /// A key that is already audible or still being fetched is left alone.
    /// The deck only changes once the payload is in hand, so a fetch never
    /// preempts the clip that is currently audible.
    pub async fn request_audio(
        &self,
        sentence: &str,
        language_code: &str,
        key: AudioKey,
    ) -> WorkflowResult<AudioOutcome> {
        if sentence.trim().is_empty() {
            return Err(WorkflowError::Validation("Sentence text is empty".to_string()));
        }
        if language_code.trim().is_empty() {
            return Err(WorkflowError::Validation("Please select a language".to_string()));
        }

        let cached = {
            let mut state = self.state.lock().await;
            if state.deck.is_playing(&key) || state.audio.state(&key) == CacheState::InFlight {
                tracing::debug!(key = %key, "Audio already playing or loading");
                return Ok(AudioOutcome::AlreadyPlaying);
            }
            let cached = state.audio.get(&key).cloned();
            if cached.is_none() {
                state.audio.begin(key.clone());
            }
            cached
        };

        let (clip, from_cache) = match cached {
            Some(clip) => (clip, true),
            None => {
                tracing::debug!(key = %key, "Synthesizing speech");
                let fetched = self
                    .speech
                    .synthesize(sentence, language_code)
                    .await
                    .map_err(WorkflowError::from)
                    .and_then(|payload| {
                        AudioClip::from_base64(&payload).map_err(WorkflowError::UpstreamFormat)
                    });

                match fetched {
                    Ok(clip) => (clip, false),
                    Err(err) => {
                        self.state.lock().await.audio.abandon(&key);
                        tracing::warn!(key = %key, error = %err, "Speech synthesis failed");
                        self.alert(AlertSeverity::Error, err.user_message());
                        return Err(err);
                    }
                }
            }
        };

        let preempted = {
            let mut state = self.state.lock().await;
            if !from_cache {
                state.audio.resolve(key.clone(), clip.clone());
            }
            state.deck.play(&key)
        };

        if let Some(other) = &preempted {
            self.event_bus.emit_lossy(GlosaEvent::AudioPlaybackStopped {
                sentence_key: other.to_string(),
                reason: StopReason::Preempted,
                timestamp: glosa_common::time::now(),
            });
        }
        self.event_bus.emit_lossy(GlosaEvent::AudioPlaybackStarted {
            sentence_key: key.to_string(),
            timestamp: glosa_common::time::now(),
        });

        tracing::debug!(
            key = %key,
            cached = from_cache,
            preempted = ?preempted.as_ref().map(|k| k.to_string()),
            "Audio playing"
        );

        Ok(AudioOutcome::Started {
            clip,
            cached: from_cache,
            preempted: preempted.map(|k| k.to_string()),
        })
    }

    /// Playback of `key` ended naturally; clears its playing marker
    pub async fn audio_ended(&self, key: &AudioKey) -> bool {
        let was_playing = self.state.lock().await.deck.ended(key);
        if was_playing {
            self.event_bus.emit_lossy(GlosaEvent::AudioPlaybackStopped {
                sentence_key: key.to_string(),
                reason: StopReason::Ended,
                timestamp: glosa_common::time::now(),
            });
        }
        was_playing
    }

    /// Clear the in-memory history
    ///
    /// The durable mirror is left as is, so a reload brings the groups back.
    /// Cached audio survives.
    pub async fn clear_all_history(&self) -> ClearOutcome {
        let mut state = self.state.lock().await;
        if state.store.is_empty() {
            return ClearOutcome::NothingToClear;
        }
        let removed = state.store.clear();
        state.sentences.clear();
        state.error = None;
        drop(state);

        tracing::info!(removed, "Vocabulary history cleared");
        self.event_bus.emit_lossy(GlosaEvent::HistoryCleared {
            removed,
            timestamp: glosa_common::time::now(),
        });

        ClearOutcome::Cleared { removed }
    }

    pub async fn snapshot(&self) -> LangSnapshot {
        let state = self.state.lock().await;
        let mut sentences_in_flight: Vec<SentenceKey> =
            state.sentences.in_flight_keys().cloned().collect();
        sentences_in_flight.sort();
        let mut audio_loading: Vec<String> =
            state.audio.in_flight_keys().map(|k| k.to_string()).collect();
        audio_loading.sort();

        LangSnapshot {
            groups: state.store.groups().to_vec(),
            is_loading: state.is_loading,
            error: state.error.clone(),
            sentences_in_flight,
            audio_loading,
            playing: state.deck.playing().map(|k| k.to_string()),
            cached_audio: state.audio.resolved_count(),
        }
    }

    fn alert(&self, severity: AlertSeverity, message: impl Into<String>) {
        self.event_bus.emit_lossy(GlosaEvent::alert(severity, message));
    }
}
