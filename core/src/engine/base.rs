//! Shared base-filter mechanics used by FilterA, FilterB
//! and FilterW: reading an active block's state, and landing a fresh one
//! once the tiered schedule engages.

use crate::domain::{BlockState, Visibility};
use crate::engine::config::SentryConfig;
use crate::engine::delay::tiered_delay;
use crate::engine::humanize::humanize;
use crate::engine::rng::DelayRng;
use crate::errors::SentryResult;
use crate::store::Store;

/// The result of a base `test()`: how long the block lasts (0 = no
/// block), whether it was explicit, and the message to show the caller.
pub struct TestResult {
    pub seconds: i64,
    pub explicit: bool,
    pub message: String,
}

impl TestResult {
    pub fn none() -> Self {
        Self { seconds: 0, explicit: false, message: String::new() }
    }

    pub fn is_blocked(&self) -> bool {
        self.seconds > 0
    }
}

/// Read `block_key`'s TTL and magnitude. If a block is active, render its
/// message (a humanized duration when explicit, "later" when implicit).
pub async fn base_test(store: &dyn Store, block_key: &str) -> SentryResult<TestResult> {
    let ttl = store.ttl(block_key).await?;
    if ttl <= 0 {
        return Ok(TestResult::none());
    }
    let raw = store.get(block_key).await?.unwrap_or(0);
    let Some(block) = BlockState::from_stored(raw) else {
        return Ok(TestResult::none());
    };
    let explicit = block.visibility.is_explicit();
    let message = if explicit { humanize(ttl) } else { "later".to_string() };
    Ok(TestResult { seconds: ttl, explicit, message })
}

/// Compute the base tiered-delay schedule's signed minute count for
/// failure count `n`, using `config`'s base period/delays/implicit bounds.
pub fn base_delay_minutes(config: &SentryConfig, n: u32, rng: &dyn DelayRng) -> i64 {
    tiered_delay(
        n,
        config.base_period,
        &config.base_delays_minutes,
        config.implicit_random_min_minutes,
        config.implicit_random_max_minutes,
        rng,
    )
}

/// Land (or re-affirm) a block once the schedule engages: preserve the
/// existing magnitude if present (defaulting to 1), apply `sign(t)`, and
/// set the TTL to `|t|` seconds. Returns the humanized message for the
/// caller (empty input `t` should never reach here — callers only call
/// this when `t != 0`).
pub async fn land_block(store: &dyn Store, block_key: &str, t_seconds: i64) -> SentryResult<String> {
    let existing_magnitude = store
        .get(block_key)
        .await?
        .and_then(BlockState::from_stored)
        .map(|b| b.magnitude)
        .unwrap_or(1)
        .max(1);

    let visibility = if t_seconds >= 0 { Visibility::Explicit } else { Visibility::Implicit };
    let block = BlockState::new(visibility, existing_magnitude);
    store.set(block_key, block.to_stored()).await?;
    store.expire(block_key, t_seconds.abs()).await?;

    Ok(if t_seconds > 0 { humanize(t_seconds) } else { "later".to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn no_ttl_means_no_block() {
        let store = MemoryStore::new();
        let result = base_test(&store, "Ab:1.2.3.4").await.unwrap();
        assert!(!result.is_blocked());
    }

    #[tokio::test]
    async fn explicit_block_humanizes_ttl() {
        let store = MemoryStore::new();
        store.set("Ab:1.2.3.4", 1).await.unwrap();
        store.expire("Ab:1.2.3.4", 300).await.unwrap();
        let result = base_test(&store, "Ab:1.2.3.4").await.unwrap();
        assert!(result.is_blocked());
        assert!(result.explicit);
        assert_eq!(result.message, "in 5 minutes");
    }

    #[tokio::test]
    async fn implicit_block_says_later() {
        let store = MemoryStore::new();
        store.set("Ab:1.2.3.4", -1).await.unwrap();
        store.expire("Ab:1.2.3.4", 600).await.unwrap();
        let result = base_test(&store, "Ab:1.2.3.4").await.unwrap();
        assert!(result.is_blocked());
        assert!(!result.explicit);
        assert_eq!(result.message, "later");
    }

    #[tokio::test]
    async fn land_block_defaults_magnitude_to_one() {
        let store = MemoryStore::new();
        land_block(&store, "Ab:1.2.3.4", 300).await.unwrap();
        assert_eq!(store.get("Ab:1.2.3.4").await.unwrap(), Some(1));
    }
}
