//! Redis connection configuration, following the usual
//! struct-plus-`Default`-plus-`from_env` shape.

use serde::{Deserialize, Serialize};

/// Connection settings for [`crate::store::RedisStore`]: the recognized
/// options (`host`, `port`, `password`, `db`) rather than a raw
/// connection URL, so the defaults in [`RedisConfig::default`] are
/// plain fields (local host, port 6379, empty password, db 0).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
    pub db: u8,
    /// Retry attempts for the initial connection, with exponential
    /// backoff between them.
    pub max_connect_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            db: 0,
            max_connect_retries: 3,
            retry_delay_ms: 100,
        }
    }
}

impl RedisConfig {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            host: std::env::var("SENTRY_REDIS_HOST").unwrap_or(default.host),
            port: std::env::var("SENTRY_REDIS_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.port),
            password: std::env::var("SENTRY_REDIS_PASSWORD").ok().filter(|s| !s.is_empty()),
            db: std::env::var("SENTRY_REDIS_DB")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(default.db),
            max_connect_retries: default.max_connect_retries,
            retry_delay_ms: default.retry_delay_ms,
        }
    }

    /// Render as a `redis://[:password@]host:port/db` connection URL.
    pub fn to_url(&self) -> String {
        match &self.password {
            Some(password) if !password.is_empty() => {
                format!("redis://:{}@{}:{}/{}", password, self.host, self.port, self.db)
            }
            _ => format!("redis://{}:{}/{}", self.host, self.port, self.db),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_recognized_options() {
        let config = RedisConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 6379);
        assert_eq!(config.password, None);
        assert_eq!(config.db, 0);
    }

    #[test]
    fn url_omits_password_when_absent() {
        let config = RedisConfig::default();
        assert_eq!(config.to_url(), "redis://127.0.0.1:6379/0");
    }

    #[test]
    fn url_includes_password_when_set() {
        let config = RedisConfig { password: Some("secret".to_string()), ..RedisConfig::default() };
        assert_eq!(config.to_url(), "redis://:secret@127.0.0.1:6379/0");
    }
}
