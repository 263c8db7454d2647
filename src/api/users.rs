use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use crate::error::{AppError, Result};
use crate::models::{AvatarUploadResponse, DisplayNameUpdate, UserDisplayResponse};
use crate::state::AppState;

/// Profile and image routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/me/display_name", put(update_display_name))
        .route("/users/me/avatar", put(upload_avatar))
        .route("/users/{user_id}", get(get_user))
        .route("/images/{file_id}", get(get_image))
}

/// PUT /users/me/display_name - Rename the authenticated user
async fn update_display_name(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<DisplayNameUpdate>,
) -> Result<Json<UserDisplayResponse>> {
    let user = super::current_user(&state, &headers).await?;

    let display_name = request.display_name.trim();
    if display_name.is_empty() {
        return Err(AppError::BadRequest(
            "Display name must not be empty".to_string(),
        ));
    }
    if display_name.len() > 100 {
        return Err(AppError::BadRequest(
            "Display name must be at most 100 characters".to_string(),
        ));
    }

    let updated = state.users.update_display_name(user.id, display_name).await?;
    if updated == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(UserDisplayResponse {
        display_name: display_name.to_string(),
    }))
}

/// PUT /users/me/avatar - Upload a profile picture (multipart field "file")
async fn upload_avatar(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<AvatarUploadResponse>> {
    let user = super::current_user(&state, &headers).await?;

    let mut stored = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("avatar").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart payload: {}", e)))?;

        if data.is_empty() {
            return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
        }

        stored = Some(state.files.store_file(&filename, &content_type, &data).await?);
        break;
    }

    let file_id = stored.ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;

    let updated = state.users.set_avatar(user.id, file_id).await?;
    if updated == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = user.id, file_id, "Avatar updated");

    Ok(Json(AvatarUploadResponse { file_id }))
}

/// GET /users/{user_id} - Public display name lookup
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDisplayResponse>> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserDisplayResponse {
        display_name: user.display_name,
    }))
}

/// GET /images/{file_id} - Serve an uploaded image
///
/// Unauthenticated: avatar URLs are embedded directly in image tags.
async fn get_image(
    State(state): State<AppState>,
    Path(file_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let file = state
        .files
        .find_file(file_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Image not found".to_string()))?;

    Ok(([(header::CONTENT_TYPE, file.content_type)], file.data))
}
