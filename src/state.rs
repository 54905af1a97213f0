use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::AppConfig;

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let db = connect_with_retry(&config.database_url).await?;
        Ok(Self { db, config })
    }
}

/// Bounded retry applies to the initial connect only; once the pool is up,
/// a lost connection surfaces to the caller as a store error.
async fn connect_with_retry(url: &str) -> anyhow::Result<PgPool> {
    let mut attempt = 1u32;
    loop {
        match PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(3))
            .connect(url)
            .await
        {
            Ok(pool) => {
                info!("database connected");
                return Ok(pool);
            }
            Err(e) if attempt < CONNECT_ATTEMPTS => {
                warn!(error = %e, attempt, max = CONNECT_ATTEMPTS, "database connect failed, retrying");
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).context("connect to database");
            }
        }
    }
}
