//! Server-Sent Events stream of workflow events

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

use crate::AppState;

/// GET /events
///
/// Streams every workflow event (word groups, sentences, playback, chat,
/// alerts) as JSON.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    glosa_common::sse::create_event_sse_stream("glosa-ai", &state.event_bus)
}
