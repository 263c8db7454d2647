use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{ChatRoom, ChatRoomResponse, ChatRoomsListResponse, DirectRoomRequest, User};
use crate::state::AppState;

/// Chat room routes
pub fn chat_room_routes() -> Router<AppState> {
    Router::new()
        .route("/chat_rooms", get(list_chat_rooms))
        .route(
            "/chat_rooms/direct",
            get(find_direct_room).post(create_direct_room),
        )
        .route("/chat_rooms/{room_id}", get(get_chat_room))
}

/// Room payload as seen by `viewer`. `name` and `avatar_url` come from
/// the chat partner, so the same room renders differently per member.
/// Rejects viewers that are not members.
async fn room_response(
    state: &AppState,
    viewer: &User,
    room: &ChatRoom,
) -> Result<ChatRoomResponse> {
    let Some(partner_id) = room.partner_of(viewer.id) else {
        return Err(AppError::Forbidden(
            "Not a member of this chat room".to_string(),
        ));
    };

    let partner = state
        .users
        .find_by_id(partner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ChatRoomResponse {
        id: room.id,
        kind: room.kind.clone(),
        user_ids: vec![room.user_a, room.user_b],
        name: partner.display_name.clone(),
        avatar_url: partner.avatar_url(&state.config.api_url),
    })
}

/// POST /chat_rooms/direct - Create a direct room between two users
async fn create_direct_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DirectRoomRequest>,
) -> Result<(StatusCode, Json<ChatRoomResponse>)> {
    let user = super::current_user(&state, &headers).await?;

    let [a, b]: [i64; 2] = request.user_ids.as_slice().try_into().map_err(|_| {
        AppError::BadRequest("user_ids must contain exactly two user ids".to_string())
    })?;

    if a == b {
        return Err(AppError::BadRequest(
            "user_ids must name two distinct users".to_string(),
        ));
    }
    if a != user.id && b != user.id {
        return Err(AppError::Forbidden(
            "Cannot create a chat room for other users".to_string(),
        ));
    }

    for id in [a, b] {
        if state.users.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound(format!("User {} not found", id)));
        }
    }

    let room = state.chats.create_direct_room(a, b).await?;

    tracing::info!(room_id = room.id, user_a = a, user_b = b, "Direct room created");

    let response = room_response(&state, &user, &room).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /chat_rooms - Rooms the authenticated user belongs to
async fn list_chat_rooms(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<ChatRoomsListResponse>> {
    let user = super::current_user(&state, &headers).await?;

    let rooms = state.chats.list_rooms_for_user(user.id).await?;

    let mut chat_rooms = Vec::with_capacity(rooms.len());
    for room in &rooms {
        chat_rooms.push(room_response(&state, &user, room).await?);
    }

    Ok(Json(ChatRoomsListResponse { chat_rooms }))
}

#[derive(Debug, Deserialize)]
struct DirectRoomQuery {
    partner_id: i64,
}

/// GET /chat_rooms/direct - Look up the direct room shared with a partner
async fn find_direct_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<DirectRoomQuery>,
) -> Result<Json<ChatRoomResponse>> {
    let user = super::current_user(&state, &headers).await?;

    let room = state
        .chats
        .find_direct_room(user.id, query.partner_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat room not found".to_string()))?;

    let response = room_response(&state, &user, &room).await?;
    Ok(Json(response))
}

/// GET /chat_rooms/{room_id} - A single room, members only
async fn get_chat_room(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(room_id): Path<i64>,
) -> Result<Json<ChatRoomResponse>> {
    let user = super::current_user(&state, &headers).await?;

    let room = state
        .chats
        .find_room(room_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chat room not found".to_string()))?;

    let response = room_response(&state, &user, &room).await?;
    Ok(Json(response))
}
