use std::sync::Arc;

use actix_web::{web, HttpServer};

use re_infra::{AlwaysFalseUserExists, NoOpHistorySink, RedisStore};

use re_api::app::{create_app, AppState};
use re_api::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.logging.colored)
        .with_target(config.logging.source_location)
        .init();

    tracing::info!(environment = %config.environment, "starting sentry gate");

    let store = RedisStore::connect(&config.redis)
        .await
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))?;

    let state = web::Data::new(AppState::new(
        Arc::new(store),
        Arc::new(NoOpHistorySink),
        Arc::new(AlwaysFalseUserExists),
        config.sentry.clone(),
    ));

    let bind_address = config.server.bind_address();
    tracing::info!(address = %bind_address, "binding http server");

    let app_config = config.clone();
    HttpServer::new(move || create_app(state.clone(), &app_config))
        .bind(&bind_address)?
        .run()
        .await
}
