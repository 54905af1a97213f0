use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{is_valid_email, LoginRequest, RegisterRequest, TokenResponse},
        jwt::JwtKeys,
        password::{hash_password, validate_password, verify_password},
    },
    error::ApiError,
    state::AppState,
    users::{dto::UserResponse, repo::User},
};

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let mut problems: Vec<String> = Vec::new();
    if !is_valid_email(&payload.email) {
        problems.push("invalid email".into());
    }
    for (field, value) in [
        ("first_name", &payload.first_name),
        ("last_name", &payload.last_name),
    ] {
        if !(1..=100).contains(&value.trim().chars().count()) {
            problems.push(format!("{field} must be between 1 and 100 characters"));
        }
    }
    problems.extend(validate_password(&payload.password).into_iter().map(String::from));
    if !problems.is_empty() {
        warn!(email = %payload.email, "registration rejected by validation");
        return Err(ApiError::Validation(problems));
    }

    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::Conflict("email already registered".into()));
    }

    let hash = hash_password(&payload.password).map_err(ApiError::Internal)?;

    // A concurrent register racing on the same email loses on the unique
    // index and comes back as Conflict through the sqlx error mapping.
    let user = User::create(
        &state.db,
        &payload.email,
        &hash,
        payload.first_name.trim(),
        payload.last_name.trim(),
    )
    .await?;

    info!(user_id = user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Shared by POST /auth/token and POST /auth/login; the latter is kept
/// for compatibility with older clients.
#[instrument(skip(state, payload))]
pub async fn issue_token(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await? {
        Some(u) => u,
        None => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Unauthorized("invalid email or password".into()));
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(ApiError::Unauthorized("invalid email or password".into()));
    }

    if !user.is_active {
        warn!(user_id = user.id, "login for deactivated account");
        return Err(ApiError::Unauthorized("account is deactivated".into()));
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id).map_err(ApiError::Internal)?;

    info!(user_id = user.id, "token issued");
    Ok(Json(TokenResponse::bearer(token)))
}
