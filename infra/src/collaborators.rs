//! Default collaborator implementations — safe stand-ins for callers
//! that haven't wired a real user directory or audit sink yet.

use async_trait::async_trait;

use re_core::{HistoryRecord, HistorySink, UserExistsLookup};

/// The default `user_exists` lookup: always report the account as
/// unknown. Safe in isolation (FilterB simply never engages for any
/// account) but a production deployment should inject a lookup backed
/// by the real account store.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysFalseUserExists;

#[async_trait]
impl UserExistsLookup for AlwaysFalseUserExists {
    async fn exists(&self, _account: &str) -> bool {
        false
    }
}

/// The default history sink: discard every record. A real deployment
/// swaps this for a sink that writes to whatever audit store the
/// surrounding product already has — that store is outside this
/// engine's concern.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpHistorySink;

#[async_trait]
impl HistorySink for NoOpHistorySink {
    async fn record(&self, record: HistoryRecord) {
        tracing::debug!(
            kind = record.kind.as_str(),
            subject = %record.subject,
            account = %record.account,
            attempts = record.attempts,
            "history record discarded by NoOpHistorySink"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_false_reports_every_account_unknown() {
        let lookup = AlwaysFalseUserExists;
        assert!(!lookup.exists("alice").await);
        assert!(!lookup.exists("").await);
    }

    #[tokio::test]
    async fn noop_sink_accepts_every_record_kind() {
        let sink = NoOpHistorySink;
        sink.record(HistoryRecord::new(re_core::HistoryKind::Ip, "1.2.3.4", "alice", 5)).await;
    }
}
