use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{types::Json, FromRow, PgPool};
use time::OffsetDateTime;
use tracing::debug;

use super::{Session, SessionStore};

#[derive(Debug, FromRow)]
struct SessionRow {
    data: Json<Map<String, Value>>,
    expires_at: OffsetDateTime,
}

/// Sessions persisted in the `sessions` table.
#[derive(Clone)]
pub struct PgSessionStore {
    db: PgPool,
}

impl PgSessionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn load(&self, id: &str) -> anyhow::Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            r#"
            SELECT data, expires_at
            FROM sessions
            WHERE id = $1 AND expires_at > now()
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("load session")?;

        Ok(row.map(|r| {
            let remaining = r.expires_at - OffsetDateTime::now_utc();
            Session::from_parts(id.to_string(), r.data.0, remaining)
        }))
    }

    /// Also deletes every expired row, so the table only holds live sessions
    /// plus whatever expired since the last commit.
    async fn save(&self, session: &Session) -> anyhow::Result<()> {
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(session.max_age())
            .context("session expiry out of range")?;
        let swept = sqlx::query("DELETE FROM sessions WHERE expires_at <= now()")
            .execute(&self.db)
            .await
            .context("sweep expired sessions")?
            .rows_affected();
        if swept > 0 {
            debug!(swept, "expired sessions removed");
        }
        sqlx::query(
            r#"
            INSERT INTO sessions (id, data, expires_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET data = EXCLUDED.data, expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(session.id())
        .bind(Json(session.values()))
        .bind(expires_at)
        .execute(&self.db)
        .await
        .context("save session")?;
        Ok(())
    }
}
