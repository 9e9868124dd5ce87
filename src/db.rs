use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};

use crate::config::DatabaseConfig;

/// Connect to Postgres, retrying a bounded number of times with a fixed delay.
/// Gives up with the last connection error once the attempts are exhausted.
pub async fn connect_with_retry(cfg: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let options = cfg.connect_options()?;
    let attempts = cfg.connect_attempts.max(1);

    let mut attempt = 1;
    loop {
        match PgPoolOptions::new()
            .max_connections(cfg.max_connections)
            .acquire_timeout(cfg.connect_timeout())
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => {
                info!(attempt, "connected to database");
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                warn!(error = %e, attempt, attempts, "database connection failed; retrying");
                tokio::time::sleep(cfg.retry_interval()).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(e).context(format!("connect to database after {attempts} attempts"));
            }
        }
    }
}

pub async fn migrate(db: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations")
        .run(db)
        .await
        .context("run database migrations")?;
    Ok(())
}
