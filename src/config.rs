use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = match std::env::var("DATABASE_URL") {
            Ok(url) => url,
            Err(_) => Self::database_url_from_parts()?,
        };
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(30),
        };
        Ok(Self { database_url, jwt })
    }

    /// Compose the connection URL from discrete DB_* variables when
    /// DATABASE_URL is not set.
    fn database_url_from_parts() -> anyhow::Result<String> {
        let host = std::env::var("DB_HOST")?;
        let port = std::env::var("DB_PORT").unwrap_or_else(|_| "5432".into());
        let name = std::env::var("DB_NAME")?;
        let user = std::env::var("DB_USER")?;
        let password = std::env::var("DB_PASSWORD")?;
        Ok(format!(
            "postgres://{}:{}@{}:{}/{}",
            user, password, host, port, name
        ))
    }
}
