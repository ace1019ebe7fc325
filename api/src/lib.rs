//! Demonstration binary wiring `re_core::Sentry` behind two HTTP
//! endpoints. Exposed as a library too so integration tests can drive
//! `create_app` without spawning the real binary.

pub mod app;
pub mod config;
pub mod handlers;
pub mod middleware;

pub use app::AppState;
pub use config::Config;
