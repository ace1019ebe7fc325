//! Health-check response types, shared between the demo binary and any
//! future monitoring surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Individual service health checks
    pub services: HashMap<String, ServiceHealth>,

    /// Server timestamp
    pub timestamp: DateTime<Utc>,

    /// Server version
    pub version: String,
}

impl HealthResponse {
    /// A response with no dependency checks, just the process itself.
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Healthy,
            services: HashMap::new(),
            timestamp: Utc::now(),
            version: version.into(),
        }
    }

    /// Record a dependency's health, downgrading the overall status if
    /// it isn't healthy.
    pub fn with_service(mut self, name: impl Into<String>, health: ServiceHealth) -> Self {
        self.status = self.status.combine(health.status);
        self.services.insert(name.into(), health);
        self
    }
}

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// Combine with another status, keeping the worse of the two.
    fn combine(self, other: Self) -> Self {
        use HealthStatus::*;
        match (self, other) {
            (Unhealthy, _) | (_, Unhealthy) => Unhealthy,
            (Degraded, _) | (_, Degraded) => Degraded,
            (Healthy, Healthy) => Healthy,
        }
    }
}

/// Individual service health
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceHealth {
    /// Service status
    pub status: HealthStatus,

    /// Health check message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Response time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_time_ms: Option<u64>,
}

impl ServiceHealth {
    pub fn healthy() -> Self {
        Self { status: HealthStatus::Healthy, message: None, response_time_ms: None }
    }

    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self { status: HealthStatus::Unhealthy, message: Some(message.into()), response_time_ms: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combining_an_unhealthy_service_downgrades_overall_status() {
        let response = HealthResponse::healthy("0.1.0")
            .with_service("redis", ServiceHealth::unhealthy("connection refused"));
        assert_eq!(response.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn a_lone_healthy_response_stays_healthy() {
        let response = HealthResponse::healthy("0.1.0");
        assert_eq!(response.status, HealthStatus::Healthy);
    }
}
