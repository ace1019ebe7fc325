//! Shared utilities and common types for the sentry server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error types and response structures
//! - Common type definitions

pub mod config;
pub mod errors;
pub mod types;

// Re-export commonly used items at crate root
pub use config::{CorsConfig, Environment, LoggingConfig, ServerConfig};
pub use errors::{error_codes, ApiResult, ErrorResponse, IntoErrorResponse};
pub use types::{HealthResponse, HealthStatus, ServiceHealth};
