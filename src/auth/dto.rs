use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Request body for /auth/token and /auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response returned after successful credential verification.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".into(),
        }
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_address() {
        assert!(is_valid_email("user@example.com"));
    }

    #[test]
    fn email_regex_rejects_missing_domain() {
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("two words@example.com"));
    }

    #[test]
    fn token_response_serializes_bearer_type() {
        let body = serde_json::to_value(TokenResponse::bearer("abc".into())).unwrap();
        assert_eq!(body["access_token"], "abc");
        assert_eq!(body["token_type"], "bearer");
    }
}
