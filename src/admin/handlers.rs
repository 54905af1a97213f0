use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument};

use crate::{
    admin::dto::{UserActivateRequest, UserStatusResponse},
    auth::extractor::CurrentUser,
    error::ApiError,
    state::AppState,
    users::{dto::UserResponse, repo::User},
};

// Any authenticated caller may hit these endpoints; the source API has no
// role concept and none is introduced here.

#[instrument(skip_all, fields(%id))]
pub async fn get_status(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UserStatusResponse>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    let message = if user.is_active {
        "user is active"
    } else {
        "user is deactivated"
    };
    Ok(Json(UserStatusResponse::new(&user, message)))
}

#[instrument(skip_all, fields(%id))]
pub async fn activate(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UserStatusResponse>, ApiError> {
    set_status_inner(&state, id, true).await
}

#[instrument(skip_all, fields(%id))]
pub async fn deactivate(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<UserStatusResponse>, ApiError> {
    set_status_inner(&state, id, false).await
}

#[instrument(skip_all, fields(%id, is_active = payload.is_active))]
pub async fn set_status(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserActivateRequest>,
) -> Result<Json<UserStatusResponse>, ApiError> {
    set_status_inner(&state, id, payload.is_active).await
}

async fn set_status_inner(
    state: &AppState,
    id: i64,
    active: bool,
) -> Result<Json<UserStatusResponse>, ApiError> {
    let user = User::set_active(&state.db, id, active)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".into()))?;
    let message = if active {
        "user activated"
    } else {
        "user deactivated"
    };
    info!(user_id = user.id, active, "activation state changed");
    Ok(Json(UserStatusResponse::new(&user, message)))
}

#[instrument(skip_all)]
pub async fn list_inactive(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = User::list_inactive(&state.db).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
