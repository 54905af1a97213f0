use serde::{Deserialize, Serialize};

use crate::users::repo::User;

/// Body for PUT /admin/users/:id/status.
#[derive(Debug, Deserialize)]
pub struct UserActivateRequest {
    pub is_active: bool,
}

/// Outcome of an activation-state operation.
#[derive(Debug, Serialize)]
pub struct UserStatusResponse {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
    pub message: String,
}

impl UserStatusResponse {
    pub fn new(user: &User, message: impl Into<String>) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_active: user.is_active,
            message: message.into(),
        }
    }
}
