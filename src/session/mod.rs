//! Cookie sessions: an opaque key/value bag committed to a `SessionStore`
//! with an expiry, addressed by a random id carried in a cookie.

use async_trait::async_trait;
use axum::http::{header::InvalidHeaderValue, HeaderMap, HeaderValue};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use time::Duration;
use uuid::Uuid;

mod memory;
pub mod middleware;
mod pg;

pub use memory::MemorySessionStore;
pub use pg::PgSessionStore;

/// Key under which the signed-in user's id is stored.
pub const USER_ID_KEY: &str = "userId";

const DEFAULT_MAX_AGE: Duration = Duration::minutes(15);

#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    values: Map<String, Value>,
    max_age: Duration,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().simple().to_string(),
            values: Map::new(),
            max_age: DEFAULT_MAX_AGE,
        }
    }

    pub(crate) fn from_parts(id: String, values: Map<String, Value>, max_age: Duration) -> Self {
        Self { id, values, max_age }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Takes effect on the next `SessionStore::save` and cookie build.
    pub fn set_max_age(&mut self, max_age: Duration) {
        self.max_age = max_age;
    }

    /// `None` when the key is absent or holds a value of another type.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.values
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> serde_json::Result<()> {
        self.values.insert(key.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    pub(crate) fn values(&self) -> &Map<String, Value> {
        &self.values
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Expired or unknown sessions load as `None`.
    async fn load(&self, id: &str) -> anyhow::Result<Option<Session>>;
    /// Commit the session; it expires `max_age` from now.
    async fn save(&self, session: &Session) -> anyhow::Result<()>;
}

/// `HttpOnly` cookie carrying the session id.
pub fn session_cookie(
    name: &str,
    session: &Session,
    secure: bool,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!(
        "{name}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        session.id(),
        session.max_age().whole_seconds()
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

pub fn extract_session_id(headers: &HeaderMap, name: &str) -> Option<String> {
    for header in headers.get_all(axum::http::header::COOKIE) {
        let Ok(value) = header.to_str() else {
            continue;
        };
        for pair in value.split(';') {
            let mut parts = pair.trim().splitn(2, '=');
            let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
                continue;
            };
            if key.trim() == name && !val.trim().is_empty() {
                return Some(val.trim().to_string());
            }
        }
    }
    None
}
