//! # re_core
//!
//! Core business logic and domain layer for the sentry backend.
//! This crate contains the brute-force/rate-limiting engine, the store
//! abstraction it runs against, and the error types that form the
//! foundation of the application architecture. It has no knowledge of
//! Redis, actix-web, or any other I/O driver — those live in `re_infra`
//! and `api`.

pub mod domain;
pub mod engine;
pub mod errors;
pub mod store;

// Domain exports
pub use domain::{BlockState, HistoryKind, HistoryRecord, Visibility};

// Engine exports
pub use engine::{Sentry, SentryConfig};
pub use engine::collaborators::{HistorySink, UserExistsLookup};

// Store exports
pub use store::{MemoryStore, ScoredMember, Store, StoreError};

// Error exports
pub use errors::{SentryError, SentryResult};
