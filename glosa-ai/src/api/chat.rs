//! Chat API handlers
//!
//! GET /chat/personas, GET/POST/DELETE /chat/messages

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::lang::ClearResponse;
use super::run_detached;
use crate::{
    error::ApiResult,
    models::{ChatMessage, Persona},
    workflow::{ChatOutcome, ChatSnapshot},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct PersonaEntry {
    pub name: &'static str,
    pub label: &'static str,
    pub is_default: bool,
}

/// POST /chat/messages request
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
    /// Persona slug or label; defaults to "professional"
    #[serde(default)]
    pub persona: Option<String>,
}

/// POST /chat/messages response
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// "replied" or "busy"
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply: Option<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// GET /chat/personas
pub async fn list_personas() -> Json<Vec<PersonaEntry>> {
    let default = Persona::default();
    Json(
        Persona::ALL
            .iter()
            .map(|p| PersonaEntry {
                name: p.slug(),
                label: p.label(),
                is_default: *p == default,
            })
            .collect(),
    )
}

/// GET /chat/messages
pub async fn get_messages(State(state): State<AppState>) -> Json<ChatSnapshot> {
    Json(state.chat.snapshot().await)
}

/// POST /chat/messages
///
/// Upstream failures still leave an error entry in the message list.
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let chat = Arc::clone(&state.chat);
    let result = run_detached(async move {
        chat.submit(&request.message, request.persona.as_deref()).await
    })
    .await?;

    let response = match state.record_outcome(result).await? {
        ChatOutcome::Replied(reply) => ChatResponse {
            status: "replied",
            reply: Some(reply),
            message: None,
        },
        ChatOutcome::Busy => ChatResponse {
            status: "busy",
            reply: None,
            message: Some("Please wait for the current reply".to_string()),
        },
    };

    Ok(Json(response))
}

/// DELETE /chat/messages
pub async fn clear_messages(State(state): State<AppState>) -> Json<ClearResponse> {
    Json(state.chat.clear_chat().await.into())
}

/// Build chat routes
pub fn chat_routes() -> Router<AppState> {
    Router::new()
        .route("/chat/personas", get(list_personas))
        .route(
            "/chat/messages",
            get(get_messages).post(send_message).delete(clear_messages),
        )
}
