//! The filter engine: counters, blocks, escalation and the `Sentry`
//! coordinator that composes them into the `ask`/`inform` decision
//! algorithm.

mod base;
mod capabilities;
pub mod collaborators;
pub mod config;
mod delay;
mod escalation;
pub mod fallback;
mod filter_a;
mod filter_b;
mod filter_w;
pub mod humanize;
pub mod keys;
pub mod rng;
mod sentry;

pub use config::SentryConfig;
pub use sentry::Sentry;

// Exposed for integration tests and for callers that want to drive a
// single filter directly rather than through the coordinator.
pub use filter_a::FilterA;
pub use filter_b::FilterB;
pub use filter_w::FilterW;
