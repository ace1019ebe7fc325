//! Tunables for the filter engine, following the usual
//! struct-plus-`Default`-plus-`from_env` configuration shape.

use serde::{Deserialize, Serialize};

/// Configuration for the tiered delay schedule, the escalation cadences,
/// and the counter TTL policy. Every field is overridable via `SENTRY_*`
/// environment variables through [`SentryConfig::from_env`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SentryConfig {
    /// Failures per tier for the base (A/B/W) schedule.
    pub base_period: u32,

    /// Tiered delays in minutes for the base schedule, engaged at
    /// `n == k * base_period` for `k` in `1..=delays.len()`.
    pub base_delays_minutes: Vec<u32>,

    /// Explicit escalation cadence: failures per tier.
    pub explicit_period: u32,

    /// Explicit escalation's single fixed tier, in minutes, at
    /// `n == explicit_period`.
    pub explicit_delay_minutes: u32,

    /// Implicit escalation cadence: failures per tier. Every tier falls
    /// through to the implicit-random duration.
    pub implicit_period: u32,

    /// Lower bound, in minutes, of the implicit-random duration drawn by
    /// `exprand` once a schedule's fixed tiers are exhausted.
    pub implicit_random_min_minutes: u32,

    /// Upper bound, in minutes, of the implicit-random duration.
    pub implicit_random_max_minutes: u32,

    /// Minutes of counter TTL granted per failure, before the cap.
    pub delta_counter_ttl_minutes: u32,

    /// Hard cap, in minutes, on counter TTL regardless of failure count.
    pub max_counter_ttl_minutes: u32,

    /// TTL, in minutes, granted to a whitelist counter on promotion or
    /// on a whitelisted-pair failure.
    pub whitelist_counter_ttl_minutes: u32,

    /// Truncation limit, in bytes, for the FilterB distributed-attack
    /// history payload.
    pub history_payload_limit_bytes: usize,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            base_period: 5,
            base_delays_minutes: vec![5, 10, 30, 60],
            explicit_period: 9,
            explicit_delay_minutes: 30,
            implicit_period: 3,
            implicit_random_min_minutes: 3 * 60,
            implicit_random_max_minutes: 23 * 60,
            delta_counter_ttl_minutes: 24 * 60 / 5,
            max_counter_ttl_minutes: 7 * 24 * 60,
            whitelist_counter_ttl_minutes: 30 * 24 * 60,
            history_payload_limit_bytes: 2048,
        }
    }
}

impl SentryConfig {
    /// Load from `SENTRY_*` environment variables, falling back to
    /// [`SentryConfig::default`] for anything unset or unparsable.
    pub fn from_env() -> Self {
        let default = Self::default();

        let base_period = env_u32("SENTRY_BASE_PERIOD", default.base_period);
        let base_delays_minutes = std::env::var("SENTRY_BASE_DELAYS_MINUTES")
            .ok()
            .and_then(|raw| {
                raw.split(',')
                    .map(|s| s.trim().parse::<u32>())
                    .collect::<Result<Vec<u32>, _>>()
                    .ok()
            })
            .unwrap_or(default.base_delays_minutes);
        let explicit_period = env_u32("SENTRY_EXPLICIT_PERIOD", default.explicit_period);
        let explicit_delay_minutes =
            env_u32("SENTRY_EXPLICIT_DELAY_MINUTES", default.explicit_delay_minutes);
        let implicit_period = env_u32("SENTRY_IMPLICIT_PERIOD", default.implicit_period);
        let implicit_random_min_minutes = env_u32(
            "SENTRY_IMPLICIT_RANDOM_MIN_MINUTES",
            default.implicit_random_min_minutes,
        );
        let implicit_random_max_minutes = env_u32(
            "SENTRY_IMPLICIT_RANDOM_MAX_MINUTES",
            default.implicit_random_max_minutes,
        );
        let delta_counter_ttl_minutes = env_u32(
            "SENTRY_DELTA_COUNTER_TTL_MINUTES",
            default.delta_counter_ttl_minutes,
        );
        let max_counter_ttl_minutes = env_u32(
            "SENTRY_MAX_COUNTER_TTL_MINUTES",
            default.max_counter_ttl_minutes,
        );
        let whitelist_counter_ttl_minutes = env_u32(
            "SENTRY_WHITELIST_COUNTER_TTL_MINUTES",
            default.whitelist_counter_ttl_minutes,
        );
        let history_payload_limit_bytes = std::env::var("SENTRY_HISTORY_PAYLOAD_LIMIT_BYTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(default.history_payload_limit_bytes);

        Self {
            base_period,
            base_delays_minutes,
            explicit_period,
            explicit_delay_minutes,
            implicit_period,
            implicit_random_min_minutes,
            implicit_random_max_minutes,
            delta_counter_ttl_minutes,
            max_counter_ttl_minutes,
            whitelist_counter_ttl_minutes,
            history_payload_limit_bytes,
        }
    }

    /// The counter TTL for a given failure count, in minutes.
    pub fn counter_ttl_minutes(&self, n: u32) -> u32 {
        (n * self.delta_counter_ttl_minutes).min(self.max_counter_ttl_minutes)
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    std::env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}
