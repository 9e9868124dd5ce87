use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgConnectOptions;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Full connection string; takes precedence over the discrete fields.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub connect_attempts: u32,
    pub retry_interval_secs: u64,
    /// Upper bound on a single connection attempt.
    pub connect_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return url.parse::<PgConnectOptions>().context("parse DATABASE_URL");
        }
        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Postgres,
    Memory,
}

/// One year.
const MAX_SESSION_TTL_SECONDS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_seconds: i64,
    pub cookie_secure: bool,
    pub backend: SessionBackend,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Origins containing this domain are allowed alongside `http://localhost*`.
    pub allowed_domain: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub cors: CorsConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let database = DatabaseConfig {
            host: var("DB_HOST", "localhost"),
            port: lookup("DB_PORT")
                .map(|v| v.parse::<u16>())
                .transpose()
                .context("DB_PORT must be a port number")?
                .unwrap_or(5432),
            user: var("DB_USER", "postgres"),
            password: var("DB_PASSWORD", ""),
            name: var("DB_NAME", "webook"),
            max_connections: lookup("DB_MAX_CONNECTIONS")
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(10),
            connect_attempts: lookup("DB_CONNECT_ATTEMPTS")
                .and_then(|v| v.parse::<u32>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(10),
            retry_interval_secs: lookup("DB_CONNECT_RETRY_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5),
            connect_timeout_secs: lookup("DB_CONNECT_TIMEOUT_SECS")
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(5),
            url,
        };

        let backend = match var("SESSION_STORE", "postgres").to_lowercase().as_str() {
            "postgres" => SessionBackend::Postgres,
            "memory" => SessionBackend::Memory,
            other => anyhow::bail!("unknown SESSION_STORE '{other}'"),
        };
        let ttl_seconds = lookup("SESSION_TTL_SECONDS")
            .map(|v| v.parse::<i64>())
            .transpose()
            .context("SESSION_TTL_SECONDS must be an integer")?
            .unwrap_or(900);
        if !(1..=MAX_SESSION_TTL_SECONDS).contains(&ttl_seconds) {
            anyhow::bail!(
                "SESSION_TTL_SECONDS must be between 1 and {MAX_SESSION_TTL_SECONDS}, got {ttl_seconds}"
            );
        }
        let session = SessionConfig {
            cookie_name: var("SESSION_COOKIE_NAME", "ssid"),
            ttl_seconds,
            cookie_secure: lookup("SESSION_COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            backend,
        };

        let cors = CorsConfig {
            allowed_domain: var("CORS_ALLOWED_DOMAIN", "webook.com"),
        };

        Ok(Self {
            database,
            session,
            cors,
        })
    }
}
