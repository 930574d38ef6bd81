//! Language-learning API handlers
//!
//! GET /lang/languages, GET /lang/state, POST /lang/words,
//! POST /lang/sentence, POST /lang/audio, POST /lang/audio/ended,
//! DELETE /lang/history

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::run_detached;
use crate::{
    error::{ApiError, ApiResult},
    models::{language::LANGUAGES, AudioKey, SentenceData, WordGroup},
    workflow::{AudioOutcome, ClearOutcome, LangSnapshot, SentenceOutcome, StageOutcome},
    AppState,
};

/// GET /lang/languages entry
#[derive(Debug, Serialize)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub label: &'static str,
    pub name: &'static str,
}

/// POST /lang/words request
#[derive(Debug, Deserialize)]
pub struct SubmitKeywordRequest {
    #[serde(default)]
    pub keyword: String,
    #[serde(default)]
    pub language_code: String,
}

/// POST /lang/words response
#[derive(Debug, Serialize)]
pub struct SubmitKeywordResponse {
    /// "created" or "busy"
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<WordGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /lang/sentence request
#[derive(Debug, Deserialize)]
pub struct SentenceRequest {
    pub group_id: Uuid,
    pub word: String,
}

/// POST /lang/sentence response
#[derive(Debug, Serialize)]
pub struct SentenceResponse {
    /// "generated", "already_resolved", "in_flight" or "failed"
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentence: Option<SentenceData>,
}

/// POST /lang/audio request
///
/// The audio key is either given explicitly or derived from
/// `group_id` and `word`.
#[derive(Debug, Deserialize)]
pub struct AudioRequest {
    pub sentence: String,
    pub language_code: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub group_id: Option<Uuid>,
    #[serde(default)]
    pub word: Option<String>,
}

impl AudioRequest {
    fn audio_key(&self) -> ApiResult<AudioKey> {
        match (&self.key, self.group_id, &self.word) {
            (Some(key), _, _) if !key.trim().is_empty() => Ok(AudioKey::new(key.as_str())),
            (_, Some(group_id), Some(word)) => {
                Ok(AudioKey::for_sentence(group_id, word, &self.sentence))
            }
            _ => Err(ApiError::BadRequest(
                "Either key or group_id and word are required".to_string(),
            )),
        }
    }
}

/// POST /lang/audio response
#[derive(Debug, Serialize)]
pub struct AudioResponse {
    /// "playing" or "already_playing"
    pub status: &'static str,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preempted: Option<String>,
    /// Base64 audio for the client player
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
}

/// POST /lang/audio/ended request
#[derive(Debug, Deserialize)]
pub struct AudioEndedRequest {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct AudioEndedResponse {
    pub key: String,
    pub was_playing: bool,
}

/// Response for clearing a history list
#[derive(Debug, Serialize)]
pub struct ClearResponse {
    /// "cleared" or "nothing_to_clear"
    pub status: &'static str,
    pub removed: usize,
}

impl From<ClearOutcome> for ClearResponse {
    fn from(outcome: ClearOutcome) -> Self {
        match outcome {
            ClearOutcome::Cleared { removed } => Self {
                status: "cleared",
                removed,
            },
            ClearOutcome::NothingToClear => Self {
                status: "nothing_to_clear",
                removed: 0,
            },
        }
    }
}

/// GET /lang/languages
pub async fn list_languages() -> Json<Vec<LanguageEntry>> {
    Json(
        LANGUAGES
            .iter()
            .map(|lang| LanguageEntry {
                code: lang.code,
                label: lang.label,
                name: lang.display_name(),
            })
            .collect(),
    )
}

/// GET /lang/state
pub async fn get_state(State(state): State<AppState>) -> Json<LangSnapshot> {
    Json(state.workflow.snapshot().await)
}

/// POST /lang/words
///
/// Generate a word group. Returns 201 with the group, or 200 with
/// status "busy" while another generation is active.
pub async fn submit_keyword(
    State(state): State<AppState>,
    Json(request): Json<SubmitKeywordRequest>,
) -> ApiResult<(StatusCode, Json<SubmitKeywordResponse>)> {
    let workflow = Arc::clone(&state.workflow);
    let result = run_detached(async move {
        workflow
            .submit_keyword(&request.keyword, &request.language_code)
            .await
    })
    .await?;

    let (status, response) = match state.record_outcome(result).await? {
        StageOutcome::Created(group) => (
            StatusCode::CREATED,
            SubmitKeywordResponse {
                status: "created",
                group: Some(group),
                message: None,
            },
        ),
        StageOutcome::Busy => (
            StatusCode::OK,
            SubmitKeywordResponse {
                status: "busy",
                group: None,
                message: Some("Already processing, please wait".to_string()),
            },
        ),
    };

    Ok((status, Json(response)))
}

/// POST /lang/sentence
pub async fn request_sentence(
    State(state): State<AppState>,
    Json(request): Json<SentenceRequest>,
) -> ApiResult<Json<SentenceResponse>> {
    let workflow = Arc::clone(&state.workflow);
    let result = run_detached(async move {
        workflow
            .request_sentence(request.group_id, &request.word)
            .await
    })
    .await?;

    let response = match state.record_outcome(result).await? {
        SentenceOutcome::Generated(sentence) => SentenceResponse {
            status: "generated",
            sentence: Some(sentence),
        },
        SentenceOutcome::AlreadyResolved(sentence) => SentenceResponse {
            status: "already_resolved",
            sentence: Some(sentence),
        },
        SentenceOutcome::InFlight => SentenceResponse {
            status: "in_flight",
            sentence: None,
        },
        SentenceOutcome::Failed => SentenceResponse {
            status: "failed",
            sentence: None,
        },
    };

    Ok(Json(response))
}

/// POST /lang/audio
pub async fn request_audio(
    State(state): State<AppState>,
    Json(request): Json<AudioRequest>,
) -> ApiResult<Json<AudioResponse>> {
    let key = request.audio_key()?;
    let key_text = key.to_string();

    let workflow = Arc::clone(&state.workflow);
    let result = run_detached(async move {
        workflow
            .request_audio(&request.sentence, &request.language_code, key)
            .await
    })
    .await?;

    let response = match state.record_outcome(result).await? {
        AudioOutcome::Started {
            clip,
            cached,
            preempted,
        } => AudioResponse {
            status: "playing",
            key: key_text,
            cached: Some(cached),
            preempted,
            audio: Some(clip.to_base64()),
        },
        AudioOutcome::AlreadyPlaying => AudioResponse {
            status: "already_playing",
            key: key_text,
            cached: None,
            preempted: None,
            audio: None,
        },
    };

    Ok(Json(response))
}

/// POST /lang/audio/ended
pub async fn audio_ended(
    State(state): State<AppState>,
    Json(request): Json<AudioEndedRequest>,
) -> Json<AudioEndedResponse> {
    let key = AudioKey::new(request.key);
    let was_playing = state.workflow.audio_ended(&key).await;
    Json(AudioEndedResponse {
        key: key.to_string(),
        was_playing,
    })
}

/// DELETE /lang/history
///
/// Clears the in-memory history only; saved records reappear on restart.
pub async fn clear_history(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(state.workflow.clear_all_history().await.into())
}

/// Build language-learning routes
pub fn lang_routes() -> Router<AppState> {
    Router::new()
        .route("/lang/languages", get(list_languages))
        .route("/lang/state", get(get_state))
        .route("/lang/words", post(submit_keyword))
        .route("/lang/sentence", post(request_sentence))
        .route("/lang/audio", post(request_audio))
        .route("/lang/audio/ended", post(audio_ended))
        .route("/lang/history", delete(clear_history))
}
