use std::sync::Arc;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::{
    error::StoreError,
    repo::UserRepository,
    repo_types::{NewUserRecord, UserRecord},
    services::UserService,
    store::UserStore,
};

/// In-process `UserStore` with the same uniqueness rule as the `users` table.
#[derive(Default)]
pub(crate) struct MemoryUserStore {
    rows: Mutex<Vec<UserRecord>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: NewUserRecord) -> Result<UserRecord, StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|r| r.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let now = OffsetDateTime::now_utc();
        let record = UserRecord {
            id: rows.len() as i64 + 1,
            email: user.email,
            password: user.password,
            created_at: now,
            updated_at: now,
        };
        rows.push(record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<UserRecord, StoreError> {
        let rows = self.rows.lock().await;
        rows.iter()
            .find(|r| r.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_by_id(&self, id: i64) -> Result<UserRecord, StoreError> {
        let rows = self.rows.lock().await;
        rows.iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, user: &UserRecord) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().await;
        if rows.iter().any(|r| r.email == user.email && r.id != user.id) {
            return Err(StoreError::DuplicateEmail);
        }
        let row = rows
            .iter_mut()
            .find(|r| r.id == user.id)
            .ok_or(StoreError::NotFound)?;
        row.email = user.email.clone();
        row.password = user.password.clone();
        row.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }
}

pub(crate) fn memory_service() -> UserService {
    UserService::new(UserRepository::new(Arc::new(MemoryUserStore::default())))
}
