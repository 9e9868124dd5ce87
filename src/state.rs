use std::sync::Arc;

use crate::config::{AppConfig, SessionBackend};
use crate::db;
use crate::session::{MemorySessionStore, PgSessionStore, SessionStore};
use crate::users::{PgUserStore, UserRepository, UserService};

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub sessions: Arc<dyn SessionStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connects once and wires every dependent onto the same pool.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);

        let pool = db::connect_with_retry(&config.database).await?;
        db::migrate(&pool).await?;

        let sessions = match config.session.backend {
            SessionBackend::Postgres => {
                Arc::new(PgSessionStore::new(pool.clone())) as Arc<dyn SessionStore>
            }
            SessionBackend::Memory => Arc::new(MemorySessionStore::new()) as Arc<dyn SessionStore>,
        };

        let users = UserService::new(UserRepository::new(Arc::new(PgUserStore::new(pool))));

        Ok(Self::from_parts(users, sessions, config))
    }

    pub fn from_parts(
        users: UserService,
        sessions: Arc<dyn SessionStore>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            users,
            sessions,
            config,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "SESSION_STORE" => Some("memory".into()),
            _ => None,
        })
        .expect("default config");

        Self::from_parts(
            crate::users::testing::memory_service(),
            Arc::new(MemorySessionStore::new()),
            Arc::new(config),
        )
    }
}
