pub mod auth;
pub mod chat_rooms;
pub mod health;
pub mod messages;
pub mod users;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use axum::Router;

use crate::error::{AppError, Result};
use crate::models::User;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(auth::auth_routes())
        .merge(users::user_routes())
        .merge(chat_rooms::chat_room_routes())
        .merge(messages::message_routes())
        .merge(health::health_routes())
        .with_state(state)
}

/// Extract the bearer token from the Authorization header
pub fn require_bearer(headers: &HeaderMap) -> Result<String> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing authorization header".to_string()))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or("");
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AppError::Unauthorized(
            "Invalid authorization scheme".to_string(),
        ));
    }

    let token = parts.next().unwrap_or("");
    if token.is_empty() {
        return Err(AppError::Unauthorized("Missing bearer token".to_string()));
    }

    Ok(token.to_string())
}

/// Resolve the calling user from the Authorization header
pub(crate) async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let token = require_bearer(headers)?;
    state.authenticate(&token).await
}
