use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::{Session, SessionStore};

/// Process-local session store. Sessions do not survive a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, (Session, OffsetDateTime)>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> anyhow::Result<Option<Session>> {
        let now = OffsetDateTime::now_utc();
        let entries = self.entries.read().await;
        Ok(entries
            .get(id)
            .filter(|(_, expires_at)| *expires_at > now)
            .map(|(session, _)| session.clone()))
    }

    async fn save(&self, session: &Session) -> anyhow::Result<()> {
        let now = OffsetDateTime::now_utc();
        let expires_at = now
            .checked_add(session.max_age())
            .context("session expiry out of range")?;
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, exp)| *exp > now);
        entries.insert(session.id().to_string(), (session.clone(), expires_at));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::USER_ID_KEY;
    use time::Duration;

    #[tokio::test]
    async fn saved_session_loads_back() {
        let store = MemorySessionStore::new();
        let mut session = Session::new();
        session.set(USER_ID_KEY, 7_i64).expect("set");
        store.save(&session).await.expect("save");

        let loaded = store.load(session.id()).await.expect("load").expect("present");
        assert_eq!(loaded.get::<i64>(USER_ID_KEY), Some(7));
    }

    #[tokio::test]
    async fn unknown_session_is_none() {
        let store = MemorySessionStore::new();
        assert!(store.load("nope").await.expect("load").is_none());
    }

    #[tokio::test]
    async fn expired_session_is_none() {
        let store = MemorySessionStore::new();
        let mut session = Session::new();
        session.set_max_age(Duration::seconds(-1));
        store.save(&session).await.expect("save");
        assert!(store.load(session.id()).await.expect("load").is_none());
    }

    #[tokio::test]
    async fn unrepresentable_expiry_is_an_error() {
        let store = MemorySessionStore::new();
        let mut session = Session::new();
        session.set_max_age(Duration::seconds(i64::MAX / 2));
        let err = store.save(&session).await.unwrap_err();
        assert!(err.to_string().contains("out of range"));
        assert!(store.load(session.id()).await.expect("load").is_none());
    }
}
