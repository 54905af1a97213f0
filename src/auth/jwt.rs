use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;

use axum::extract::FromRef;

use crate::{config::JwtConfig, state::AppState};

/// JWT payload: subject (user id) plus issue and expiry timestamps.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
    pub ttl: TimeDuration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            ttl_minutes,
        } = state.config.jwt.clone();
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: TimeDuration::minutes(ttl_minutes),
        }
    }
}

impl JwtKeys {
    fn sign_with_ttl(&self, user_id: i64, ttl: TimeDuration) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: user_id,
            iat: now.unix_timestamp() as usize,
            exp: (now + ttl).unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id, "jwt signed");
        Ok(token)
    }

    pub fn sign(&self, user_id: i64) -> anyhow::Result<String> {
        self.sign_with_ttl(user_id, self.ttl)
    }

    /// Checks signature and expiry only; account state is the Auth Gate's
    /// concern.
    pub fn verify(&self, token: &str) -> Result<i64, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        match decode::<Claims>(token, &self.decoding, &validation) {
            Ok(data) => {
                debug!(user_id = data.claims.sub, "jwt verified");
                Ok(data.claims.sub)
            }
            Err(e) => match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => Err(TokenError::Expired),
                _ => Err(TokenError::Invalid),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys(secret: &str) -> JwtKeys {
        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: TimeDuration::minutes(30),
        }
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys("dev-secret");
        let token = keys.sign(42).expect("sign");
        assert_eq!(keys.verify(&token), Ok(42));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let good = make_keys("secret-a");
        let bad = make_keys("secret-b");
        let token = good.sign(7).expect("sign");
        assert_eq!(bad.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let keys = make_keys("dev-secret");
        let mut token = keys.sign(7).expect("sign");
        token.push('x');
        assert_eq!(keys.verify(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn verify_rejects_garbage() {
        let keys = make_keys("dev-secret");
        assert_eq!(keys.verify("not-a-jwt"), Err(TokenError::Invalid));
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let keys = make_keys("dev-secret");
        let token = keys
            .sign_with_ttl(7, TimeDuration::seconds(-30))
            .expect("sign");
        assert_eq!(keys.verify(&token), Err(TokenError::Expired));
    }

    #[test]
    fn unexpired_token_verifies_within_ttl() {
        let keys = make_keys("dev-secret");
        let token = keys
            .sign_with_ttl(7, TimeDuration::seconds(60))
            .expect("sign");
        assert_eq!(keys.verify(&token), Ok(7));
    }
}
