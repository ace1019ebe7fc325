//! The FilterZ family: extends an already-active block
//! when its owner keeps retrying, without ever shortening it. ZA, ZB and
//! ZW are the same state machine over three different block keys — this
//! module is the shared "Block aggregate" escalation half (`initial_block`
//! lives in [`crate::engine::filter_a`] and siblings; `escalate` lives here).

use crate::domain::{HistoryKind, HistoryRecord};
use crate::engine::collaborators::HistorySink;
use crate::engine::config::SentryConfig;
use crate::engine::delay::tiered_delay;
use crate::engine::humanize::humanize;
use crate::engine::rng::DelayRng;
use crate::errors::SentryResult;
use crate::store::Store;

/// Which escalation cadence to run — selected by the sign of the
/// currently active block: positive
/// (explicit) blocks escalate on the Explicit cadence, negative
/// (implicit) blocks on the Implicit cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZVariant {
    Explicit,
    Implicit,
}

impl ZVariant {
    fn period(self, config: &SentryConfig) -> u32 {
        match self {
            ZVariant::Explicit => config.explicit_period,
            ZVariant::Implicit => config.implicit_period,
        }
    }

    fn delays(self, config: &SentryConfig) -> Vec<u32> {
        match self {
            ZVariant::Explicit => vec![config.explicit_delay_minutes],
            ZVariant::Implicit => Vec::new(),
        }
    }
}

/// The result of one escalation attempt. `message` is empty whenever the
/// escalation did not actually extend the block — either because the
/// retry count didn't land on a tier, or because the computed extension
/// didn't exceed the block's current remaining TTL. Callers (`FilterA`,
/// `FilterB`, `FilterW`'s `test`) fall back to their own `test` result
/// whenever `message` is empty.
pub struct EscalationOutcome {
    pub seconds: i64,
    pub message: String,
}

impl EscalationOutcome {
    fn none() -> Self {
        Self { seconds: 0, message: String::new() }
    }
}

/// Bump `block_key`'s magnitude toward its existing sign, compute the
/// variant's scheduled extension, and — only if that extension exceeds
/// the block's current TTL — overwrite the block and emit a history
/// record. Never shortens an active block.
#[allow(clippy::too_many_arguments)]
pub async fn escalate(
    store: &dyn Store,
    rng: &dyn DelayRng,
    history: &dyn HistorySink,
    config: &SentryConfig,
    block_key: &str,
    variant: ZVariant,
    history_kind: HistoryKind,
    subject: &str,
    account: &str,
) -> SentryResult<EscalationOutcome> {
    let raw_before = store.get(block_key).await?.unwrap_or(0);
    let new_raw = if raw_before >= 0 {
        store.incr(block_key).await?
    } else {
        store.decr(block_key).await?
    };
    let magnitude = new_raw.unsigned_abs();
    let n = magnitude.saturating_sub(1) as u32;

    let period = variant.period(config);
    let delays = variant.delays(config);
    let minutes = tiered_delay(
        n,
        period,
        &delays,
        config.implicit_random_min_minutes,
        config.implicit_random_max_minutes,
        rng,
    );
    if minutes == 0 {
        return Ok(EscalationOutcome::none());
    }

    let seconds = minutes * 60;
    let current_ttl = store.ttl(block_key).await?;
    if seconds.abs() <= current_ttl {
        return Ok(EscalationOutcome::none());
    }

    let signed_magnitude = magnitude as i64 * seconds.signum();
    store.set(block_key, signed_magnitude).await?;
    store.expire(block_key, seconds.abs()).await?;

    history
        .record(HistoryRecord::new(history_kind, subject.to_string(), account.to_string(), magnitude as u32))
        .await;

    let message = if seconds > 0 { humanize(seconds) } else { "later".to_string() };
    Ok(EscalationOutcome { seconds: seconds.abs(), message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::SeededRng;
    use crate::store::MemoryStore;
    use std::sync::{Arc, Mutex};

    struct RecordingSink(Arc<Mutex<Vec<HistoryRecord>>>);

    #[async_trait::async_trait]
    impl HistorySink for RecordingSink {
        async fn record(&self, record: HistoryRecord) {
            self.0.lock().unwrap().push(record);
        }
    }

    #[tokio::test]
    async fn absent_block_lands_as_fresh_one_with_no_delay() {
        let store = MemoryStore::new();
        let rng = SeededRng::new(1);
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink(records.clone());
        let config = SentryConfig::default();

        let outcome = escalate(
            &store,
            &rng,
            &sink,
            &config,
            "Ab:1.2.3.4",
            ZVariant::Explicit,
            HistoryKind::Ip,
            "1.2.3.4",
            "",
        )
        .await
        .unwrap();

        assert_eq!(outcome.message, "");
        assert!(records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn explicit_variant_lands_at_period() {
        let store = MemoryStore::new();
        store.set("Ab:1.2.3.4", 8).await.unwrap();
        store.expire("Ab:1.2.3.4", 5).await.unwrap();
        let rng = SeededRng::new(1);
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink(records.clone());
        let config = SentryConfig::default();

        let outcome = escalate(
            &store,
            &rng,
            &sink,
            &config,
            "Ab:1.2.3.4",
            ZVariant::Explicit,
            HistoryKind::Ip,
            "1.2.3.4",
            "",
        )
        .await
        .unwrap();

        assert_eq!(outcome.seconds, 30 * 60);
        assert!(!outcome.message.is_empty());
        assert_eq!(records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn never_shortens_a_longer_existing_block() {
        let store = MemoryStore::new();
        store.set("Ab:1.2.3.4", 8).await.unwrap();
        store.expire("Ab:1.2.3.4", 10 * 60 * 60).await.unwrap();
        let rng = SeededRng::new(1);
        let records = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingSink(records.clone());
        let config = SentryConfig::default();

        let outcome = escalate(
            &store,
            &rng,
            &sink,
            &config,
            "Ab:1.2.3.4",
            ZVariant::Explicit,
            HistoryKind::Ip,
            "1.2.3.4",
            "",
        )
        .await
        .unwrap();

        assert_eq!(outcome.message, "");
        assert!(records.lock().unwrap().is_empty());
    }
}
