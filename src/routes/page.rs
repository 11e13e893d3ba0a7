use axum::{
    Form,
    extract::State,
    response::Html,
};
use uuid::Uuid;

use crate::{
    message::PageForm,
    render::{PageView, render_page},
    services::chat_session::EMPTY_MESSAGE,
    state::SharedState,
};

pub async fn index_handler() -> Html<String> {
    Html(render_page(&PageView::default()))
}

/// Form submission from the chat page. Failures are shown on the page itself.
pub async fn submit_handler(
    State(state): State<SharedState>,
    Form(form): Form<PageForm>,
) -> Html<String> {
    // Only canonical ids are echoed back into the page.
    let known_id = form
        .session_id
        .as_deref()
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .map(|id| id.to_string());

    if form.message.trim().is_empty() {
        let exchanges = match &known_id {
            Some(id) => state.sessions.transcript(id).await.unwrap_or_default(),
            None => Vec::new(),
        };
        return Html(render_page(&PageView {
            session_id: known_id.as_deref(),
            draft: &form.message,
            error: Some(EMPTY_MESSAGE),
            exchanges: &exchanges,
        }));
    }

    let session_id = match known_id {
        Some(id) => id,
        None => state.sessions.create_session().await,
    };

    let handle = state.sessions.ensure_session(&session_id).await;
    let mut session = handle.lock().await;
    let error = session
        .submit(&state.flow, &form.message)
        .await
        .err()
        .map(|e| e.to_string());

    let draft = if error.is_some() { form.message.as_str() } else { "" };
    Html(render_page(&PageView {
        session_id: Some(&session_id),
        draft,
        error: error.as_deref(),
        exchanges: session.transcript().all(),
    }))
}
