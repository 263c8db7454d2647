use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Message, MessageCreate, MessageListResponse};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 100;

/// Message routes
pub fn message_routes() -> Router<AppState> {
    Router::new().route("/messages", get(list_messages).post(create_message))
}

/// POST /messages - Store a message and fan it out to the room
async fn create_message(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<MessageCreate>,
) -> Result<(StatusCode, Json<Message>)> {
    let user = super::current_user(&state, &headers).await?;

    let message = state
        .submit_message(&user, request.chat_room_id, &request.content)
        .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Debug, Deserialize)]
struct MessageHistoryQuery {
    chat_room_id: i64,
    page: Option<u32>,
    page_size: Option<u32>,
}

/// GET /messages - Paged room history, newest first
async fn list_messages(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MessageHistoryQuery>,
) -> Result<Json<MessageListResponse>> {
    let user = super::current_user(&state, &headers).await?;

    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if page == 0 {
        return Err(AppError::BadRequest("page starts at 1".to_string()));
    }
    if page_size == 0 || page_size > MAX_PAGE_SIZE {
        return Err(AppError::BadRequest(format!(
            "page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    let room = state
        .chats
        .find_room(query.chat_room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat room not found".to_string()))?;
    if !room.has_member(user.id) {
        return Err(AppError::Forbidden(
            "Not a member of this chat room".to_string(),
        ));
    }

    let messages = state.chats.list_messages(room.id, page, page_size).await?;

    Ok(Json(MessageListResponse { messages }))
}
