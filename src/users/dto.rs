use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::users::repo::{ProfileChanges, User};

/// Public projection of a user; carries no hash field at all.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}

/// Partial update body for PUT /users/me; absent fields are left alone.
#[derive(Debug, Deserialize)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.is_active.is_none()
    }

    pub fn into_changes(self) -> ProfileChanges {
        ProfileChanges {
            first_name: self.first_name,
            last_name: self.last_name,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_size")]
    pub size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl ListParams {
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.page < 1 {
            problems.push("page must be at least 1".into());
        }
        if !(1..=100).contains(&self.size) {
            problems.push("size must be between 1 and 100".into());
        }
        problems
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_params_defaults_apply() {
        let params: ListParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.size, 10);
        assert!(params.validate().is_empty());
    }

    #[test]
    fn list_params_bounds_enforced() {
        let params = ListParams { page: 0, size: 101 };
        let problems = params.validate();
        assert_eq!(problems.len(), 2);
        assert!(ListParams { page: 1, size: 100 }.validate().is_empty());
        assert!(!ListParams { page: 1, size: 0 }.validate().is_empty());
    }

    #[test]
    fn empty_update_detected() {
        let update: UserUpdate = serde_json::from_str("{}").unwrap();
        assert!(update.is_empty());
        let update: UserUpdate = serde_json::from_str(r#"{"first_name": "Ann"}"#).unwrap();
        assert!(!update.is_empty());
    }

    #[test]
    fn projection_has_no_password_hash() {
        let response = UserResponse {
            id: 1,
            email: "user@example.com".into(),
            first_name: "Ann".into(),
            last_name: "Smith".into(),
            is_active: true,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("user@example.com"));
    }
}
