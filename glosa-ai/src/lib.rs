//! glosa-ai library interface
//!
//! Exposes the workflows, collaborators and router for the binary and for
//! integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod workflow;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use glosa_common::events::EventBus;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::workflow::{ChatSession, EnrichmentWorkflow, WorkflowResult};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub workflow: Arc<EnrichmentWorkflow>,
    pub chat: Arc<ChatSession>,
    /// Event bus for SSE broadcasting
    pub event_bus: EventBus,
    /// Whether an API key was resolved at startup
    pub ai_configured: bool,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last error for diagnostic purposes
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(
        workflow: Arc<EnrichmentWorkflow>,
        chat: Arc<ChatSession>,
        event_bus: EventBus,
        ai_configured: bool,
    ) -> Self {
        Self {
            workflow,
            chat,
            event_bus,
            ai_configured,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Convert a workflow result for a handler, remembering failures
    ///
    /// Validation errors are user mistakes and are not recorded.
    pub async fn record_outcome<T>(&self, result: WorkflowResult<T>) -> ApiResult<T> {
        match result {
            Ok(value) => Ok(value),
            Err(err) => {
                if !matches!(err, workflow::WorkflowError::Validation(_)) {
                    *self.last_error.write().await = Some(err.to_string());
                }
                Err(err.into())
            }
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .merge(api::lang_routes())
        .merge(api::chat_routes())
        .merge(api::health_routes())
        .route("/events", get(api::event_stream))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
