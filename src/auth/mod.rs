use axum::{routing::post, Router};

use crate::state::AppState;

pub mod dto;
pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod password;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register))
        .route("/auth/token", post(handlers::issue_token))
        .route("/auth/login", post(handlers::issue_token))
}
