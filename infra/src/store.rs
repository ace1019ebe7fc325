//! [`RedisStore`]: the production [`Store`] implementation, built on
//! `redis::aio::ConnectionManager` with connect-with-retry at
//! construction time. The `ConnectionManager` already re-establishes a
//! dropped connection transparently, so per-call retry isn't needed.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::time::sleep;

use re_core::store::{ScoredMember, Store, StoreError};

use crate::config::RedisConfig;
use crate::InfraError;

/// A Redis-backed [`Store`]. Cheap to clone — `ConnectionManager` is
/// itself a handle onto a shared multiplexed connection.
#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connect, retrying with exponential backoff up to
    /// `config.max_connect_retries` times.
    pub async fn connect(config: &RedisConfig) -> Result<Self, InfraError> {
        let client = redis::Client::open(config.to_url()).map_err(InfraError::InvalidUrl)?;

        let mut attempts = 0;
        let mut delay = config.retry_delay_ms;
        loop {
            attempts += 1;
            match client.get_connection_manager().await {
                Ok(connection) => {
                    tracing::info!(host = %config.host, port = config.port, "connected to redis");
                    return Ok(Self { connection });
                }
                Err(err) if attempts < config.max_connect_retries => {
                    tracing::warn!(
                        attempt = attempts,
                        max_attempts = config.max_connect_retries,
                        error = %err,
                        "redis connection attempt failed, retrying"
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(5_000);
                }
                Err(err) => {
                    return Err(InfraError::Connect { attempts, source: err });
                }
            }
        }
    }

    fn map_err(key: &str, err: redis::RedisError) -> StoreError {
        StoreError::Connection(format!("key {key}: {err}"))
    }
}

#[async_trait]
impl Store for RedisStore {
    async fn incr(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.connection.clone();
        conn.incr(key, 1).await.map_err(|e| Self::map_err(key, e))
    }

    async fn decr(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.connection.clone();
        conn.decr(key, 1).await.map_err(|e| Self::map_err(key, e))
    }

    async fn get(&self, key: &str) -> Result<Option<i64>, StoreError> {
        let mut conn = self.connection.clone();
        conn.get(key).await.map_err(|e| Self::map_err(key, e))
    }

    async fn set(&self, key: &str, value: i64) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        // Redis' SET overwrites any existing TTL, but every caller of
        // this trait method immediately follows with `expire` (see
        // `re_core::engine::base::land_block`), so that's fine here.
        conn.set(key, value).await.map_err(|e| Self::map_err(key, e))
    }

    async fn expire(&self, key: &str, seconds: i64) -> Result<(), StoreError> {
        let mut conn = self.connection.clone();
        conn.expire(key, seconds.max(0)).await.map_err(|e| Self::map_err(key, e))
    }

    async fn ttl(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.connection.clone();
        let ttl: i64 = conn.ttl(key).await.map_err(|e| Self::map_err(key, e))?;
        // Redis returns -2 (no key) / -1 (no TTL) for TTL; the store
        // contract wants 0 for "no TTL set" in both cases.
        Ok(ttl.max(0))
    }

    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let mut conn = self.connection.clone();
        conn.exists(key).await.map_err(|e| Self::map_err(key, e))
    }

    async fn zcard(&self, key: &str) -> Result<i64, StoreError> {
        let mut conn = self.connection.clone();
        conn.zcard(key).await.map_err(|e| Self::map_err(key, e))
    }

    async fn zincrby(&self, key: &str, member: &[u8], delta: i64) -> Result<i64, StoreError> {
        let mut conn = self.connection.clone();
        let new_score: i64 =
            conn.zincr(key, member, delta).await.map_err(|e| Self::map_err(key, e))?;
        Ok(new_score)
    }

    async fn zrange_with_scores(&self, key: &str) -> Result<Vec<ScoredMember>, StoreError> {
        let mut conn = self.connection.clone();
        let raw: Vec<(Vec<u8>, i64)> =
            conn.zrange_withscores(key, 0, -1).await.map_err(|e| Self::map_err(key, e))?;
        Ok(raw.into_iter().map(|(member, score)| ScoredMember { member, score }).collect())
    }
}
