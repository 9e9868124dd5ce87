use sqlx::FromRow;
use time::OffsetDateTime;

/// Row of the `users` table.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,                      // BIGSERIAL, assigned on insert
    pub email: String,                // UNIQUE
    pub password: String,             // Argon2 PHC string
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Columns supplied by the caller on insert; the rest are server-assigned.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    pub email: String,
    pub password: String,
}
