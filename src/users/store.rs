use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{
    error::StoreError,
    repo_types::{NewUserRecord, UserRecord},
};

/// Persistence for user rows. Email uniqueness is enforced by the backing
/// store itself; implementations report a violation as `DuplicateEmail`.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: NewUserRecord) -> Result<UserRecord, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<UserRecord, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<UserRecord, StoreError>;
    /// Overwrites email and password of row `user.id`. A missing row is `NotFound`.
    async fn update(&self, user: &UserRecord) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Returns `true` when `err` is a unique-violation (SQLSTATE `23505`).
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn write_error(err: sqlx::Error) -> StoreError {
    if is_unique_violation(&err) {
        StoreError::DuplicateEmail
    } else {
        StoreError::Database(err)
    }
}

fn read_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: NewUserRecord) -> Result<UserRecord, StoreError> {
        let row = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, password, created_at, updated_at)
            VALUES ($1, $2, now(), now())
            RETURNING id, email, password, created_at, updated_at
            "#,
        )
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.db)
        .await
        .map_err(write_error)?;
        debug!(user_id = row.id, "user row inserted");
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> Result<UserRecord, StoreError> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
        .map_err(read_error)
    }

    async fn find_by_id(&self, id: i64) -> Result<UserRecord, StoreError> {
        sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
        .map_err(read_error)
    }

    async fn update(&self, user: &UserRecord) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = $2, password = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password)
        .execute(&self.db)
        .await
        .map_err(write_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
