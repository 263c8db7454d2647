use axum::{
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{LoginRequest, MeResponse, RegisterRequest, RegisterResponse, TokenResponse};
use crate::security;
use crate::state::AppState;

/// Account routes
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

/// Shape check only. Deliverability is not our problem.
fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9][a-zA-Z0-9.-]*\.[a-zA-Z]{2,}$")
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

/// POST /auth/register - Create a new account
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>> {
    let email = request.email.trim();
    if !is_valid_email(email) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }
    if !security::is_strong_password(&request.password) {
        return Err(AppError::BadRequest(
            "Password must be at least 8 characters and include a letter, a digit and a special character".to_string(),
        ));
    }

    let password_hash = security::hash_password(&request.password)?;
    let user = state.users.create_user(email, &password_hash).await?;

    Ok(Json(RegisterResponse { user_id: user.id }))
}

/// POST /auth/login - Exchange credentials for a bearer token
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>> {
    // Unknown email and wrong password answer identically.
    let user = state
        .users
        .find_by_email(request.email.trim())
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid Credentials".to_string()))?;

    if !security::verify_password(&request.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid Credentials".to_string()));
    }

    let access_token = state.auth.generate_token(user.id)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "Bearer".to_string(),
    }))
}

/// GET /auth/me - Profile of the authenticated user
async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<MeResponse>> {
    let user = super::current_user(&state, &headers).await?;

    let avatar_url = user.avatar_url(&state.config.api_url);
    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        display_name: user.display_name,
        avatar_url,
    }))
}
