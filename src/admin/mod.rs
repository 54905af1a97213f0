use axum::{
    routing::{get, patch},
    Router,
};

use crate::state::AppState;

pub mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/users/inactive", get(handlers::list_inactive))
        .route(
            "/admin/users/:id/status",
            get(handlers::get_status).put(handlers::set_status),
        )
        .route("/admin/users/:id/activate", patch(handlers::activate))
        .route("/admin/users/:id/deactivate", patch(handlers::deactivate))
}
