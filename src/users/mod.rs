use axum::{
    routing::{get, patch},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;
pub mod repo;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/users/me",
            get(handlers::get_me).put(handlers::update_me),
        )
        .route("/users/me/deactivate", patch(handlers::deactivate_me))
        .route("/users/:id", get(handlers::get_user))
        .route("/users", get(handlers::list_users))
}
