//! The capability bundle passed into each filter, replacing a
//! back-reference from filter to coordinator with a small bundle of
//! borrowed collaborators instead — no ownership cycle between the
//! coordinator and the filters it constructs per attempt.

use std::cell::Cell;

use crate::engine::collaborators::{HistorySink, UserExistsLookup};
use crate::engine::config::SentryConfig;
use crate::engine::rng::DelayRng;
use crate::store::Store;

/// Everything a filter needs besides its own keys: the store, the two
/// collaborator callbacks, the memoized `user_exists` cell Sentry owns
/// for the lifetime of one attempt, the tunable schedule, and the random
/// source for implicit-random durations.
pub struct Capabilities<'a> {
    pub store: &'a dyn Store,
    pub history: &'a dyn HistorySink,
    pub user_exists: &'a dyn UserExistsLookup,
    pub user_exists_cache: &'a Cell<Option<bool>>,
    pub config: &'a SentryConfig,
    pub rng: &'a dyn DelayRng,
}

impl<'a> Capabilities<'a> {
    /// The memoized `cached_user_exists` lookup: calls the
    /// collaborator at most once per attempt.
    pub async fn cached_user_exists(&self, account: &str) -> bool {
        if let Some(cached) = self.user_exists_cache.get() {
            return cached;
        }
        let exists = self.user_exists.exists(account).await;
        self.user_exists_cache.set(Some(exists));
        exists
    }
}
