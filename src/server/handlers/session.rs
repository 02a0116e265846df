//! Persisted session handlers.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::session::SessionState;

use super::super::state::AppState;
use super::{ApiError, parse_body};

/// GET /api/session - Current session state.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<SessionState> {
    let editor = state.editor.read().await;
    Json(editor.session_state())
}

/// PUT /api/session - Replace the session state.
pub async fn put(State(state): State<Arc<AppState>>, body: String) -> Result<Json<SessionState>, ApiError> {
    let new_state: SessionState = parse_body(&body)?;
    if !new_state.label_size.is_valid() {
        return Err(ApiError::bad_request("labelSize must have positive width and height"));
    }
    let mut editor = state.editor.write().await;
    editor.restore(new_state);
    Ok(Json(editor.session_state()))
}
