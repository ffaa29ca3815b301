//! User endpoints. Each handler performs exactly one registry operation.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::users::{NewUser, UserPatch};

use super::{ApiError, ApiResponse, AppState};

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.registry.list_all()?;
    let count = users.len();

    Ok(Json(
        ApiResponse::success(users)
            .with_message("Users retrieved successfully")
            .with_count(count),
    ))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let user = state.registry.get_by_id(&id)?;
    Ok(Json(
        ApiResponse::success(user).with_message("User retrieved successfully"),
    ))
}

/// GET /api/users/:id/profile
pub async fn get_user_profile(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let user = state.registry.get_by_id(&id)?;
    Ok(Json(
        ApiResponse::success(user).with_message("User profile retrieved successfully"),
    ))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = payload?;
    let user = state.registry.create(input)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user).with_message("User created successfully")),
    ))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // Identifier problems take precedence over body problems.
    let Path(id) = path?;
    crate::users::parse_id(&id)?;
    let Json(patch) = payload?;
    let user = state.registry.update(&id, patch)?;

    Ok(Json(
        ApiResponse::success(user).with_message("User updated successfully"),
    ))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = path?;
    let removed = state.registry.delete(&id)?;
    Ok(Json(
        ApiResponse::success(removed).with_message("User deleted successfully"),
    ))
}
