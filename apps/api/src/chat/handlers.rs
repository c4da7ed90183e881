use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::chat::assistant::converse;
use crate::errors::{required, AppError};
use crate::identity::{ensure_caller, CallerId};
use crate::models::chat::ChatMessageRow;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub id: Uuid,
    pub fallback: bool,
}

#[derive(Debug, Serialize)]
pub struct ChatHistoryResponse {
    pub messages: Vec<ChatMessageRow>,
}

/// POST /api/chat
pub async fn handle_chat(
    State(state): State<AppState>,
    caller: CallerId,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let message = required(request.message.as_deref(), "message")?;
    let user = ensure_caller(state.store.as_ref(), &caller).await?;

    let exchange = converse(
        state.store.as_ref(),
        state.llm.as_ref(),
        &user,
        message,
        state.config.chat_history_limit,
    )
    .await?;

    Ok(Json(ChatResponse {
        message: exchange.reply.content,
        id: exchange.reply.id,
        fallback: exchange.fallback,
    }))
}

/// GET /api/chat
///
/// Full history, oldest first.
pub async fn handle_history(
    State(state): State<AppState>,
    caller: CallerId,
) -> Result<Json<ChatHistoryResponse>, AppError> {
    let user = ensure_caller(state.store.as_ref(), &caller).await?;
    let messages = state.store.list_chat_messages(&user.id).await?;
    Ok(Json(ChatHistoryResponse { messages }))
}
