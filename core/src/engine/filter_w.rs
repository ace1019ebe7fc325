//! Per-(address, account) whitelist filter. A pair that
//! has recently authenticated successfully is tracked on its own, much
//! slower schedule — a failure against a whitelisted pair doesn't erase
//! the promotion outright, it just starts counting toward a block again.

use crate::domain::HistoryKind;
use crate::engine::base::{base_delay_minutes, base_test, land_block, TestResult};
use crate::engine::capabilities::Capabilities;
use crate::engine::escalation::{escalate, ZVariant};
use crate::engine::keys::{w_block_key, w_counter_key};
use crate::errors::SentryResult;
use crate::store::Store;

pub struct FilterW {
    ip: String,
    account: String,
}

impl FilterW {
    pub fn new(ip: impl Into<String>, account: impl Into<String>) -> Self {
        Self { ip: ip.into(), account: account.into() }
    }

    /// Promote the pair: zero the counter with a 30-day TTL.
    pub async fn whitelist(&self, caps: &Capabilities<'_>) -> SentryResult<()> {
        let counter_key = w_counter_key(&self.ip, &self.account);
        caps.store.set(&counter_key, 0).await?;
        caps.store
            .expire(&counter_key, caps.config.whitelist_counter_ttl_minutes as i64 * 60)
            .await?;
        tracing::info!(ip = %self.ip, account = %self.account, "pair promoted to whitelist");
        Ok(())
    }

    pub async fn is_whitelisted(&self, caps: &Capabilities<'_>) -> SentryResult<bool> {
        let counter_key = w_counter_key(&self.ip, &self.account);
        Ok(caps.store.exists(&counter_key).await?)
    }

    /// Increment the whitelist counter, refresh its 30-day TTL, and apply
    /// the same tiered-delay landing logic as FilterA/FilterB against the
    /// W-block.
    pub async fn update(&self, caps: &Capabilities<'_>) -> SentryResult<(i64, String)> {
        let counter_key = w_counter_key(&self.ip, &self.account);
        let block_key = w_block_key(&self.ip, &self.account);

        let n = caps.store.incr(&counter_key).await? as u32;
        caps.store
            .expire(&counter_key, caps.config.whitelist_counter_ttl_minutes as i64 * 60)
            .await?;

        let minutes = base_delay_minutes(caps.config, n, caps.rng);
        if minutes == 0 {
            return Ok((0, String::new()));
        }

        let seconds = minutes * 60;
        let message = land_block(caps.store, &block_key, seconds).await?;
        caps.history
            .record(crate::domain::HistoryRecord::new(
                HistoryKind::IpUsername,
                self.ip.clone(),
                self.account.clone(),
                n,
            ))
            .await;

        Ok((seconds.abs(), message))
    }

    pub async fn test(&self, caps: &Capabilities<'_>) -> SentryResult<TestResult> {
        let block_key = w_block_key(&self.ip, &self.account);
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
            HistoryKind::IpUsername,
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
    use crate::domain::HistoryRecord;
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

    struct NoOpSink;
    #[async_trait]
    impl HistorySink for NoOpSink {
        async fn record(&self, _record: HistoryRecord) {}
    }

    #[tokio::test]
    async fn whitelisting_sets_zero_with_long_ttl() {
        let store = MemoryStore::new();
        let user_exists = AlwaysTrue;
        let sink = NoOpSink;
        let cell = Cell::new(None);
        let config = SentryConfig::default();
        let rng = SeededRng::new(1);
        let caps = Capabilities {
            store: &store,
            history: &sink,
            user_exists: &user_exists,
            user_exists_cache: &cell,
            config: &config,
            rng: &rng,
        };

        let filter = FilterW::new("1.2.3.4", "alice");
        filter.whitelist(&caps).await.unwrap();

        assert!(filter.is_whitelisted(&caps).await.unwrap());
        let ttl = store.ttl("Wc:1.2.3.4:alice").await.unwrap();
        assert!(ttl > 29 * 24 * 60 * 60);
    }

    #[tokio::test]
    async fn failures_after_whitelisting_still_accumulate() {
        let store = MemoryStore::new();
        let user_exists = AlwaysTrue;
        let sink = NoOpSink;
        let cell = Cell::new(None);
        let config = SentryConfig::default();
        let rng = SeededRng::new(1);
        let caps = Capabilities {
            store: &store,
            history: &sink,
            user_exists: &user_exists,
            user_exists_cache: &cell,
            config: &config,
            rng: &rng,
        };

        let filter = FilterW::new("1.2.3.4", "alice");
        filter.whitelist(&caps).await.unwrap();

        let mut last = (0, String::new());
        for _ in 0..5 {
            last = filter.update(&caps).await.unwrap();
        }
        assert_eq!(last.0, 5 * 60);
    }
}
