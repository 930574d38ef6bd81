//! HTTP API handlers for glosa-ai
//!
//! REST endpoints for the language and chat pages plus an SSE stream.

pub mod chat;
pub mod health;
pub mod lang;
pub mod sse;

pub use chat::chat_routes;
pub use health::health_routes;
pub use lang::lang_routes;
pub use sse::event_stream;

use std::future::Future;

use crate::error::{ApiError, ApiResult};

/// Run a workflow call on its own task
///
/// A dropped client connection aborts the handler future; the spawned task
/// still runs to completion so busy and in-flight markers are always released.
pub(crate) async fn run_detached<F, T>(future: F) -> ApiResult<T>
where
    F: Future<Output = T> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(future)
        .await
        .map_err(|e| ApiError::Internal(format!("Workflow task failed: {}", e)))
}
