//! HTTP handler for the chat assistant

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::assistant::{AssistantService, ChatInput, ChatResponse};
use crate::state::AppState;

/// One chat turn with the AI helper
pub async fn chat(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(input): Json<ChatInput>,
) -> AppResult<Json<ChatResponse>> {
    let service = AssistantService::new(state);
    let response = service.chat(input).await?;
    Ok(Json(response))
}
