use std::sync::Arc;

use super::{
    domain::{NewUser, User},
    error::StoreError,
    repo_types::{NewUserRecord, UserRecord},
    store::UserStore,
};

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        Self {
            id: r.id,
            email: r.email,
            password: r.password,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<&User> for UserRecord {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            email: u.email.clone(),
            password: u.password.clone(),
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Maps between stored rows and domain users. Store errors pass through as-is.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn UserStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let record = self
            .store
            .insert(NewUserRecord {
                email: user.email,
                password: user.password,
            })
            .await?;
        Ok(record.into())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, StoreError> {
        Ok(self.store.find_by_email(email).await?.into())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<User, StoreError> {
        Ok(self.store.find_by_id(id).await?.into())
    }

    pub async fn update(&self, user: &User) -> Result<(), StoreError> {
        self.store.update(&UserRecord::from(user)).await
    }
}
