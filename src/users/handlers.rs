use axum::{
    extract::{Path, Query, State},
    Json,
};
use tracing::{info, instrument};

use crate::{
    auth::extractor::CurrentUser,
    error::ApiError,
    state::AppState,
    users::{
        dto::{ListParams, MessageResponse, UserListResponse, UserResponse, UserUpdate},
        repo::User,
    },
};

#[instrument(skip_all)]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}

#[instrument(skip_all)]
pub async fn update_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UserUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    if payload.is_empty() {
        return Err(ApiError::Validation(vec!["no fields to update".into()]));
    }

    let mut problems = Vec::new();
    for (field, value) in [
        ("first_name", &payload.first_name),
        ("last_name", &payload.last_name),
    ] {
        if let Some(v) = value {
            if !(1..=100).contains(&v.trim().chars().count()) {
                problems.push(format!("{field} must be between 1 and 100 characters"));
            }
        }
    }
    if !problems.is_empty() {
        return Err(ApiError::Validation(problems));
    }

    let updated = User::update_profile(&state.db, user.id, &payload.into_changes())
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    info!(user_id = updated.id, "profile updated");
    Ok(Json(UserResponse::from(updated)))
}

#[instrument(skip_all)]
pub async fn deactivate_me(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<MessageResponse>, ApiError> {
    User::set_active(&state.db, user.id, false)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;

    info!(user_id = user.id, "account self-deactivated");
    Ok(Json(MessageResponse {
        message: "account deactivated".into(),
    }))
}

#[instrument(skip_all, fields(%id))]
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    Ok(Json(UserResponse::from(user)))
}

#[instrument(skip_all, fields(page = params.page, size = params.size))]
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<ListParams>,
) -> Result<Json<UserListResponse>, ApiError> {
    let problems = params.validate();
    if !problems.is_empty() {
        return Err(ApiError::Validation(problems));
    }

    let (users, total) = User::list(&state.db, params.page, params.size).await?;
    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
        total,
        page: params.page,
        size: params.size,
    }))
}
