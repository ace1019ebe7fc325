//! # re_infra
//!
//! Infrastructure layer for the sentry engine: a Redis-backed [`Store`]
//! implementation and the default no-op collaborator implementations.
//! This crate is the only place that knows about an actual Redis wire
//! connection — `re_core` stays storage-agnostic.

pub mod collaborators;
pub mod config;
pub mod store;

pub use collaborators::{AlwaysFalseUserExists, NoOpHistorySink};
pub use config::RedisConfig;
pub use store::RedisStore;

/// Errors raised while connecting to or talking to the backing Redis
/// server, distinct from [`re_core::store::StoreError`] which is what
/// the engine actually sees — [`RedisStore`] maps every variant here
/// into a `StoreError::Connection` or `StoreError::Other` at the trait
/// boundary, wrapping the raw `redis::RedisError` underneath.
#[derive(Debug, thiserror::Error)]
pub enum InfraError {
    #[error("failed to parse redis URL: {0}")]
    InvalidUrl(redis::RedisError),

    #[error("failed to connect to redis after {attempts} attempts: {source}")]
    Connect {
        attempts: u32,
        #[source]
        source: redis::RedisError,
    },
}
