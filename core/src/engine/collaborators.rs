//! Collaborator traits injected into [`crate::engine::Sentry`] at
//! construction time, so callers can swap in a real user directory or
//! audit sink without the engine knowing about either.

use async_trait::async_trait;

use crate::domain::HistoryRecord;

/// Looks up whether an account exists, so [`crate::engine::filter_b`] can
/// avoid building up state for accounts that were never real — called at
/// most once per attempt and memoized by `Sentry`.
#[async_trait]
pub trait UserExistsLookup: Send + Sync {
    async fn exists(&self, account: &str) -> bool;
}

/// Fire-and-forget audit sink for failed-attempt and escalation records.
/// A failure to record history must never affect the gate decision —
/// implementations that can fail internally should log and swallow,
/// the same policy [`crate::engine::fallback`] applies to store errors.
#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn record(&self, record: HistoryRecord);
}
