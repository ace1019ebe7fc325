//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical business areas:
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server, CORS, and TLS configuration
//!
//! Redis connection settings live in `re_infra::RedisConfig` and the
//! filter schedule lives in `re_core::SentryConfig` — each owned by the
//! crate that actually uses it, composed by the binary's own `Config`.

pub mod environment;
pub mod server;

pub use environment::{Environment, LoggingConfig, MonitoringConfig};
pub use server::{CorsConfig, ServerConfig, TlsConfig};
