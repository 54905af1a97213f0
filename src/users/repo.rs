use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use tracing::info;

/// User record in the database. Never serialized directly; responses go
/// through the projections in `users::dto`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Partial profile update; only the populated fields are written.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_active: Option<bool>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.is_active.is_none()
    }
}

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, is_active, created_at, updated_at";

/// Idempotent table and index bootstrap, run on every process start.
pub async fn ensure_schema(db: &PgPool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            BIGSERIAL PRIMARY KEY,
            email         VARCHAR(255) UNIQUE NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            first_name    VARCHAR(100) NOT NULL,
            last_name     VARCHAR(100) NOT NULL,
            is_active     BOOLEAN NOT NULL DEFAULT TRUE,
            created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(db)
    .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_email ON users (email)")
        .execute(db)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_users_is_active ON users (is_active)")
        .execute(db)
        .await?;
    info!("users schema ready");
    Ok(())
}

pub fn page_offset(page: i64, size: i64) -> i64 {
    // Saturates so an absurdly large page yields an empty result set
    // instead of a negative OFFSET.
    (page - 1).saturating_mul(size)
}

impl User {
    pub async fn find_by_id(db: &PgPool, id: i64) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_email(db: &PgPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await
    }

    /// Insert a new user. The unique index on email makes the store the
    /// arbiter for racing registrations.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        first_name: &str,
        last_name: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, first_name, last_name, is_active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(db)
        .await
    }

    /// One page of users, newest first, plus the overall count.
    pub async fn list(db: &PgPool, page: i64, size: i64) -> sqlx::Result<(Vec<User>, i64)> {
        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#
        ))
        .bind(size)
        .bind(page_offset(page, size))
        .fetch_all(db)
        .await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await?;
        Ok((users, total))
    }

    /// Applies only the populated fields, in one statement. Callers reject
    /// an all-empty diff before getting here.
    pub async fn update_profile(
        db: &PgPool,
        id: i64,
        changes: &ProfileChanges,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name  = COALESCE($3, last_name),
                is_active  = COALESCE($4, is_active),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.first_name.as_deref())
        .bind(changes.last_name.as_deref())
        .bind(changes.is_active)
        .fetch_optional(db)
        .await
    }

    pub async fn set_active(db: &PgPool, id: i64, active: bool) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET is_active = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(active)
        .fetch_optional(db)
        .await
    }

    pub async fn list_inactive(db: &PgPool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE is_active = FALSE
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_arithmetic() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(2, 10), 10);
        assert_eq!(page_offset(3, 25), 50);
    }

    #[test]
    fn offset_saturates_for_extreme_page() {
        assert_eq!(page_offset(i64::MAX, 100), i64::MAX);
        assert!(page_offset(i64::MAX, 1) >= 0);
    }

    #[test]
    fn empty_changes_detected() {
        assert!(ProfileChanges::default().is_empty());
        let changes = ProfileChanges {
            last_name: Some("Smith".into()),
            ..Default::default()
        };
        assert!(!changes.is_empty());
    }
}
