//! Per-address tally/block.

use crate::domain::{HistoryKind, HistoryRecord};
use crate::engine::base::{base_delay_minutes, base_test, land_block, TestResult};
use crate::engine::capabilities::Capabilities;
use crate::engine::escalation::{escalate, ZVariant};
use crate::engine::keys::{a_block_key, a_counter_key};
use crate::errors::SentryResult;
use crate::store::Store;

pub struct FilterA {
    ip: String,
    account: String,
}

impl FilterA {
    pub fn new(ip: impl Into<String>, account: impl Into<String>) -> Self {
        Self { ip: ip.into(), account: account.into() }
    }

    /// Increment the address's failure tally and land or re-affirm a
    /// block once the tiered schedule engages. Errors propagate to the
    /// caller's fallback wrap (`Sentry::inform`) rather than being
    /// swallowed here, matching `FilterB`/`FilterW`.
    pub async fn update(&self, caps: &Capabilities<'_>) -> SentryResult<(i64, String)> {
        let counter_key = a_counter_key(&self.ip);
        let block_key = a_block_key(&self.ip);

        let n = caps.store.incr(&counter_key).await? as u32;
        let minutes = base_delay_minutes(caps.config, n, caps.rng);
        let seconds = minutes * 60;

        // Refresh the counter TTL on every update, not just when a block
        // lands — a sub-tier counter must still decay on its own schedule.
        let counter_ttl = caps.config.counter_ttl_minutes(n) as i64 * 60 + seconds.abs();
        caps.store.expire(&counter_key, counter_ttl).await?;

        if minutes == 0 {
            return Ok((0, String::new()));
        }

        let message = land_block(caps.store, &block_key, seconds).await?;
        caps.history
            .record(HistoryRecord::new(HistoryKind::Ip, self.ip.clone(), self.account.clone(), n))
            .await;

        Ok((seconds.abs(), message))
    }

    /// Base test, escalating via ZA when a block is already active:
    /// returns the escalation's result if it produced one, else the
    /// original block state.
    pub async fn test(&self, caps: &Capabilities<'_>) -> SentryResult<TestResult> {
        let block_key = a_block_key(&self.ip);
        let result = base_test(caps.store, &block_key).await?;
        if !result.is_blocked() {
            return Ok(result);
        }

        let variant = if result.explicit { ZVariant::Explicit } else { ZVariant::Implicit };
        let outcome = escalate(
            caps.store,
            caps.rng,
            caps.history,
            caps.config,
            &block_key,
            variant,
            HistoryKind::Ip,
            &self.ip,
            &self.account,
        )
        .await?;

        if outcome.message.is_empty() {
            Ok(result)
        } else {
            Ok(TestResult {
                seconds: outcome.seconds,
                explicit: variant == ZVariant::Explicit,
                message: outcome.message,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::collaborators::{HistorySink, UserExistsLookup};
    use crate::engine::config::SentryConfig;
    use crate::engine::rng::SeededRng;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use std::cell::Cell;
    use std::sync::{Arc, Mutex};

    struct AlwaysTrue;
    #[async_trait]
    impl UserExistsLookup for AlwaysTrue {
        async fn exists(&self, _account: &str) -> bool {
            true
        }
    }

    struct RecordingSink(Arc<Mutex<Vec<HistoryRecord>>>);
    #[async_trait]
    impl HistorySink for RecordingSink {
        async fn record(&self, record: HistoryRecord) {
            self.0.lock().unwrap().push(record);
        }
    }

    fn caps<'a>(
        store: &'a MemoryStore,
        history: &'a RecordingSink,
        user_exists: &'a AlwaysTrue,
        cell: &'a Cell<Option<bool>>,
        config: &'a SentryConfig,
        rng: &'a SeededRng,
    ) -> Capabilities<'a> {
        Capabilities { store, history, user_exists, user_exists_cache: cell, config, rng }
    }

    #[tokio::test]
    async fn five_failures_land_a_five_minute_block() {
        let store = MemoryStore::new();
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink(records.clone());
        let user_exists = AlwaysTrue;
        let cell = Cell::new(None);
        let config = SentryConfig::default();
        let rng = SeededRng::new(1);
        let capabilities = caps(&store, &sink, &user_exists, &cell, &config, &rng);

        let filter = FilterA::new("1.2.3.4", "bob");
        let mut last = (0, String::new());
        for _ in 0..5 {
            last = filter.update(&capabilities).await.unwrap();
        }

        assert_eq!(last.0, 5 * 60);
        assert!(last.1.contains("5 minutes"));
        assert_eq!(records.lock().unwrap().len(), 1);

        let test_result = filter.test(&capabilities).await.unwrap();
        assert!(test_result.is_blocked());
    }

    #[tokio::test]
    async fn below_tier_produces_no_block() {
        let store = MemoryStore::new();
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink(records.clone());
        let user_exists = AlwaysTrue;
        let cell = Cell::new(None);
        let config = SentryConfig::default();
        let rng = SeededRng::new(1);
        let capabilities = caps(&store, &sink, &user_exists, &cell, &config, &rng);

        let filter = FilterA::new("1.2.3.4", "bob");
        let (seconds, message) = filter.update(&capabilities).await.unwrap();
        assert_eq!(seconds, 0);
        assert!(message.is_empty());
    }
}
