use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, ExchangeView, TranscriptResponse},
    services::chat_session::{EMPTY_MESSAGE, SubmitError},
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    // Blank input never creates a session.
    if payload.message.trim().is_empty() {
        return Err(SubmitError::Validation(EMPTY_MESSAGE).into());
    }

    let session_id = match &payload.session_id {
        Some(s) if !s.trim().is_empty() => s.trim().to_string(),
        _ => state.sessions.create_session().await,
    };

    let handle = state.sessions.ensure_session(&session_id).await;
    let mut session = handle.lock().await;
    let exchange = session.submit(&state.flow, &payload.message).await?;

    let transcript = session
        .transcript()
        .all()
        .iter()
        .map(ExchangeView::from)
        .collect();

    Ok(Json(ChatResponse {
        session_id,
        reply: exchange.bot_text().to_string(),
        transcript,
    }))
}

pub async fn transcript_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let exchanges = state
        .sessions
        .transcript(&session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("unknown session {session_id}")))?;

    Ok(Json(TranscriptResponse {
        session_id,
        transcript: exchanges.iter().map(ExchangeView::from).collect(),
    }))
}

pub async fn end_session_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove_session(&session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("unknown session {session_id}")))
    }
}
