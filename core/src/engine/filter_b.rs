//! Per-account, distributed-attack-aware tally/block. The
//! counter is an ordered map of packed-IPv4 member → failure count, so
//! the filter can tell a single noisy address apart from a botnet
//! spreading failures across many addresses against the same account.

use std::net::IpAddr;

use crate::domain::{HistoryKind, HistoryRecord};
use crate::engine::base::{base_delay_minutes, base_test, land_block, TestResult};
use crate::engine::capabilities::Capabilities;
use crate::engine::escalation::{escalate, ZVariant};
use crate::engine::keys::{b_block_key, b_counter_key, pack_address, PackedIp};
use crate::errors::SentryResult;
use crate::store::{ScoredMember, Store};

pub struct FilterB {
    ip: Option<IpAddr>,
    account: String,
}

impl FilterB {
    pub fn new(ip: Option<IpAddr>, account: impl Into<String>) -> Self {
        Self { ip, account: account.into() }
    }

    /// Bump this address's score in the account's distinct-address map,
    /// and engage a block once two or more distinct addresses have been
    /// seen. Silently drops the attempt for an unknown
    /// account with no prior entry, to avoid building state that would
    /// confirm the account's non-existence to an enumerating attacker.
    pub async fn update(&self, caps: &Capabilities<'_>) -> SentryResult<(i64, String)> {
        let counter_key = b_counter_key(&self.account);
        let block_key = b_block_key(&self.account);

        let is_empty = caps.store.zcard(&counter_key).await? == 0;
        if is_empty && !caps.cached_user_exists(&self.account).await {
            return Ok((0, String::new()));
        }

        let packed = pack_address(self.ip);
        caps.store.zincrby(&counter_key, packed.as_bytes(), 1).await?;

        let members = caps.store.zrange_with_scores(&counter_key).await?;
        let ip_num = members.len() as u32;
        let fa_num: i64 = members.iter().map(|m| m.score).sum();

        let minutes = if ip_num > 1 { base_delay_minutes(caps.config, fa_num as u32, caps.rng) } else { 0 };
        let seconds = minutes * 60;

        // Refresh the counter TTL on every update once we're past the
        // enumeration-avoidance check, not just when a block lands — a
        // sub-tier or single-address counter must still decay on its own
        // schedule.
        let counter_ttl = caps.config.counter_ttl_minutes(fa_num as u32) as i64 * 60 + seconds.abs();
        caps.store.expire(&counter_key, counter_ttl).await?;

        if minutes == 0 {
            return Ok((0, String::new()));
        }

        let message = land_block(caps.store, &block_key, seconds).await?;

        let payload = render_history_payload(&members, caps.config.history_payload_limit_bytes);
        caps.history
            .record(HistoryRecord::new(HistoryKind::Username, payload, self.account.clone(), fa_num as u32))
            .await;

        Ok((seconds.abs(), message))
    }

    pub async fn test(&self, caps: &Capabilities<'_>) -> SentryResult<TestResult> {
        let block_key = b_block_key(&self.account);
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
            HistoryKind::Username,
            &self.account,
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

/// Renders each distinct-address entry as `addr(count)` joined by `, `,
/// truncated to `limit` bytes for the audit payload.
fn render_history_payload(members: &[ScoredMember], limit: usize) -> String {
    let mut out = String::new();
    for (i, member) in members.iter().enumerate() {
        if member.member.len() != 4 {
            continue;
        }
        let packed = PackedIp([member.member[0], member.member[1], member.member[2], member.member[3]]);
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&format!("{}({})", packed.to_ipv4(), member.score));
    }
    if out.len() > limit {
        out.truncate(limit);
    }
    out
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

    struct KnownAccounts(Vec<&'static str>);
    #[async_trait]
    impl UserExistsLookup for KnownAccounts {
        async fn exists(&self, account: &str) -> bool {
            self.0.contains(&account)
        }
    }

    struct RecordingSink(Arc<Mutex<Vec<HistoryRecord>>>);
    #[async_trait]
    impl HistorySink for RecordingSink {
        async fn record(&self, record: HistoryRecord) {
            self.0.lock().unwrap().push(record);
        }
    }

    #[tokio::test]
    async fn unknown_account_with_no_entry_is_dropped() {
        let store = MemoryStore::new();
        let user_exists = KnownAccounts(vec![]);
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink(records.clone());
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

        let filter = FilterB::new(Some("1.2.3.4".parse().unwrap()), "ghost");
        let (seconds, message) = filter.update(&caps).await.unwrap();
        assert_eq!(seconds, 0);
        assert!(message.is_empty());
        assert_eq!(store.zcard("Bc:ghost").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn single_address_never_blocks() {
        let store = MemoryStore::new();
        let user_exists = KnownAccounts(vec!["bob"]);
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink(records.clone());
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

        let filter = FilterB::new(Some("1.2.3.4".parse().unwrap()), "bob");
        for _ in 0..5 {
            let (seconds, _) = filter.update(&caps).await.unwrap();
            assert_eq!(seconds, 0);
        }
    }

    #[tokio::test]
    async fn five_distinct_addresses_engage_block_at_tier_one() {
        let store = MemoryStore::new();
        let user_exists = KnownAccounts(vec!["bob"]);
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink(records.clone());
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

        let addresses = ["1.0.0.1", "1.0.0.2", "1.0.0.3", "1.0.0.4", "1.0.0.5"];
        let mut last = (0, String::new());
        for addr in addresses {
            let filter = FilterB::new(Some(addr.parse().unwrap()), "bob");
            last = filter.update(&caps).await.unwrap();
        }

        assert_eq!(last.0, 5 * 60);
        assert_eq!(records.lock().unwrap().len(), 1);
        let record = &records.lock().unwrap()[0];
        assert_eq!(record.kind, HistoryKind::Username);
        for addr in addresses {
            assert!(record.subject.contains(addr));
        }
    }
}
