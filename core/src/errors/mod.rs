//! Errors for the filter engine.
//!
//! Every engine error ultimately funnels through [`crate::engine::fallback`]
//! at the coordinator and filter-update call sites — `SentryError` exists so
//! that funnel has a single, well-typed shape to catch.

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum SentryError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Logic(String),
}

pub type SentryResult<T> = Result<T, SentryError>;
