//! Application state and the actix-web app factory.

use std::sync::Arc;

use actix_web::{web, App};
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use tracing_actix_web::TracingLogger;

use re_core::{HistorySink, MemoryStore, Sentry, SentryConfig, Store, UserExistsLookup};
use re_infra::{AlwaysFalseUserExists, NoOpHistorySink};

use crate::config::Config;
use crate::handlers;
use crate::middleware::cors;

/// Shared state behind every request: the store and collaborators the
/// engine actually needs plus its tunable schedule.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Store>,
    history: Arc<dyn HistorySink>,
    user_exists: Arc<dyn UserExistsLookup>,
    sentry_config: SentryConfig,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        history: Arc<dyn HistorySink>,
        user_exists: Arc<dyn UserExistsLookup>,
        sentry_config: SentryConfig,
    ) -> Self {
        Self { store, history, user_exists, sentry_config }
    }

    /// An in-process `AppState` backed by `MemoryStore` and the default
    /// no-op collaborators, for tests and local smoke-testing without a
    /// running Redis.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            Arc::new(NoOpHistorySink),
            Arc::new(AlwaysFalseUserExists),
            SentryConfig::default(),
        )
    }

    pub fn new_sentry(&self, address: &str, account: &str) -> Sentry {
        Sentry::new(
            address,
            account,
            self.store.clone(),
            self.history.clone(),
            self.user_exists.clone(),
            self.sentry_config.clone(),
        )
    }
}

/// Build the actix-web app: health check, the two gate endpoints, CORS
/// and request logging.
pub fn create_app(
    state: web::Data<AppState>,
    config: &Config,
) -> App<
    impl ServiceFactory<ServiceRequest, Config = (), Response = ServiceResponse, Error = actix_web::Error, InitError = ()>,
> {
    App::new()
        .app_data(state)
        .wrap(TracingLogger::default())
        .wrap(cors::build(&config.cors))
        .route("/health", web::get().to(handlers::health))
        .service(
            web::scope("/v1/login")
                .route("/ask", web::post().to(handlers::ask))
                .route("/inform", web::post().to(handlers::inform)),
        )
        .default_service(web::route().to(handlers::not_found))
}
