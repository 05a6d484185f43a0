//! Budtender chat handlers.
//!
//! The storefront lock is never held here: chat state lives in the bridge.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::services::chat::ChatMessage;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessage {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Reply {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct TranscriptView {
    pub messages: Vec<ChatMessage>,
    pub awaiting_reply: bool,
}

/// The conversation so far.
#[instrument(skip(state))]
pub async fn transcript(State(state): State<AppState>) -> Json<TranscriptView> {
    let chat = state.chat();
    Json(TranscriptView {
        messages: chat.transcript().await,
        awaiting_reply: chat.is_awaiting_reply().await,
    })
}

/// Send a message and wait for Bud's answer.
///
/// Assistant failures are answered with a fallback line, not an error.
#[instrument(skip(state, body))]
pub async fn send(
    State(state): State<AppState>,
    Json(body): Json<SendMessage>,
) -> Result<Json<Reply>> {
    let reply = state
        .chat()
        .send_message(&body.message)
        .await
        .ok_or_else(|| AppError::BadRequest("message must not be blank".to_string()))?;
    Ok(Json(Reply { reply }))
}
