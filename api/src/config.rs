//! Configuration for the demo binary: composes `re_shared`'s
//! environment-aware server/CORS/logging config with the engine's own
//! `SentryConfig` and `re_infra`'s `RedisConfig` into one
//! struct-of-sub-configs.

use re_core::SentryConfig;
use re_infra::RedisConfig;
use re_shared::config::{CorsConfig, Environment, LoggingConfig, ServerConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub logging: LoggingConfig,
    pub redis: RedisConfig,
    pub sentry: SentryConfig,
}

impl Config {
    /// Load every sub-config from its own environment variables —
    /// `ENVIRONMENT`/`SERVER_*` (`re_shared`), `SENTRY_REDIS_*`
    /// (`re_infra`), `SENTRY_*` (the engine's schedule tunables).
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        let server = ServerConfig {
            host: std::env::var("SERVER_HOST").unwrap_or_else(|_| ServerConfig::default().host),
            port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
            ..ServerConfig::default()
        };
        let cors = if environment.is_production() { CorsConfig::default() } else { CorsConfig::development() };

        Self {
            environment,
            server,
            cors,
            logging: LoggingConfig::for_environment(environment),
            redis: RedisConfig::from_env(),
            sentry: SentryConfig::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn development_is_the_unset_default() {
        let config = Config::from_env();
        assert!(!config.environment.is_production());
        assert!(config.cors.enabled);
    }
}
