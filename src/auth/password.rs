use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Punctuation accepted by the password policy.
const SPECIAL_CHARS: &str = "!@#$%^&*(),.?\":{}|<>";

pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Constant-time verification. A malformed stored hash is an error, never
/// a plain mismatch.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

/// Returns every policy rule the candidate password violates. Runs at the
/// request-validation boundary, before any hashing.
pub fn validate_password(plain: &str) -> Vec<&'static str> {
    let mut problems = Vec::new();
    let len = plain.chars().count();
    if len < 8 {
        problems.push("password must be at least 8 characters");
    }
    if len > 100 {
        problems.push("password must be at most 100 characters");
    }
    if !plain.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("password must contain an uppercase letter");
    }
    if !plain.chars().any(|c| c.is_ascii_lowercase()) {
        problems.push("password must contain a lowercase letter");
    }
    if !plain.chars().any(|c| c.is_ascii_digit()) {
        problems.push("password must contain a digit");
    }
    if !plain.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        problems.push("password must contain a special character");
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "LongPass1!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("LongPass2!", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn policy_accepts_conforming_password() {
        assert!(validate_password("LongPass1!").is_empty());
    }

    #[test]
    fn policy_rejects_short_password() {
        // 7 characters and no uppercase
        let problems = validate_password("short1!");
        assert!(problems.contains(&"password must be at least 8 characters"));
        assert!(problems.contains(&"password must contain an uppercase letter"));
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn policy_reports_each_missing_class() {
        let problems = validate_password("alllowercase");
        assert!(problems.contains(&"password must contain an uppercase letter"));
        assert!(problems.contains(&"password must contain a digit"));
        assert!(problems.contains(&"password must contain a special character"));
        assert!(!problems.contains(&"password must contain a lowercase letter"));
    }

    #[test]
    fn policy_rejects_overlong_password() {
        let long = format!("Aa1!{}", "x".repeat(100));
        let problems = validate_password(&long);
        assert_eq!(problems, vec!["password must be at most 100 characters"]);
    }

    #[test]
    fn policy_requires_special_character() {
        let problems = validate_password("LongPass11");
        assert_eq!(problems, vec!["password must contain a special character"]);
    }
}
