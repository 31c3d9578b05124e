//! HTTP request handlers

use super::sse::sse_stream;
use super::types::{
    ConsentRequest, ErrorResponse, QueuedResponse, SessionNameRequest, TextRequest,
};
use super::AppState;
use crate::state_machine::state::{MenuEntry, SessionId};
use crate::state_machine::{Event, WidgetView};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Snapshot and live updates
        .route("/api/widget", get(get_widget))
        .route("/api/widget/stream", get(stream_widget))
        // Chrome
        .route("/api/widget/enter", post(enter_chat))
        .route("/api/widget/history/toggle", post(toggle_history))
        .route("/api/widget/history/close", post(close_history))
        .route("/api/widget/menu/toggle", post(toggle_menu))
        .route("/api/widget/menu/:entry", post(select_menu_entry))
        // Conversation
        .route("/api/widget/messages", post(send_message))
        .route("/api/widget/draft", post(edit_draft))
        .route("/api/widget/session-name", post(edit_session_name))
        .route("/api/widget/consent", post(answer_consent))
        // Sessions
        .route("/api/widget/sessions/new", post(start_new_chat))
        .route("/api/widget/sessions/:id/load", post(load_session))
        .route("/api/widget/live", post(show_live_conversation))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

// ============================================================
// Snapshot & Streaming
// ============================================================

async fn get_widget(State(state): State<AppState>) -> Json<WidgetView> {
    Json(state.widget.current_view())
}

async fn stream_widget(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe before reading the snapshot so no change falls in between
    let broadcast_rx = state.widget.subscribe();
    sse_stream(state.widget.current_view(), broadcast_rx)
}

// ============================================================
// Intents
// ============================================================

async fn queue(state: &AppState, event: Event) -> Result<Json<QueuedResponse>, AppError> {
    state
        .widget
        .send(event)
        .await
        .map_err(AppError::Internal)?;
    Ok(Json(QueuedResponse::queued()))
}

async fn enter_chat(State(state): State<AppState>) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, Event::EnterChat).await
}

async fn toggle_history(State(state): State<AppState>) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, Event::ToggleHistory).await
}

async fn close_history(State(state): State<AppState>) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, Event::CloseHistory).await
}

async fn toggle_menu(State(state): State<AppState>) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, Event::ToggleMenu).await
}

async fn select_menu_entry(
    State(state): State<AppState>,
    Path(entry): Path<String>,
) -> Result<Json<QueuedResponse>, AppError> {
    let entry: MenuEntry = entry.parse().map_err(AppError::BadRequest)?;
    queue(&state, Event::SelectMenuEntry { entry }).await
}

async fn send_message(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, Event::SendMessage { text: req.text }).await
}

async fn edit_draft(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, Event::EditDraft { text: req.text }).await
}

async fn edit_session_name(
    State(state): State<AppState>,
    Json(req): Json<SessionNameRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, Event::EditSessionName { name: req.name }).await
}

async fn answer_consent(
    State(state): State<AppState>,
    Json(req): Json<ConsentRequest>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(
        &state,
        Event::ConsentAnswered {
            consent: req.consent,
        },
    )
    .await
}

async fn start_new_chat(State(state): State<AppState>) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, Event::StartNewChat).await
}

async fn load_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<QueuedResponse>, AppError> {
    let id: usize = id
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid session id: {id}")))?;
    queue(&state, Event::LoadSession { id: SessionId(id) }).await
}

async fn show_live_conversation(
    State(state): State<AppState>,
) -> Result<Json<QueuedResponse>, AppError> {
    queue(&state, Event::ShowLiveConversation).await
}

async fn get_version() -> &'static str {
    concat!("chat-widget ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
