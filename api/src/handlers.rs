//! HTTP handlers demonstrating the Sentry gate. This is intentionally a
//! thin wrapper — request in, `Sentry::ask`/`inform` out — since the
//! actual authentication backend these calls would normally straddle is
//! out of scope for this engine.

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use re_core::Sentry;
use re_shared::errors::{error_codes, ErrorResponse};
use re_shared::types::{HealthResponse, ServiceHealth};

use crate::app::AppState;

#[derive(Debug, Deserialize, Serialize)]
pub struct AskRequest {
    pub address: String,
    pub account: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GateResponse {
    /// `true` when `message` is non-empty — i.e. the caller should deny
    /// the attempt and surface `message` to the user.
    pub blocked: bool,
    pub message: String,
}

impl GateResponse {
    fn from_message(message: String) -> Self {
        Self { blocked: !message.is_empty(), message }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct InformRequest {
    pub address: String,
    pub account: String,
    pub success: bool,
}

/// `POST /v1/login/ask` — should this attempt be rejected outright?
pub async fn ask(state: web::Data<AppState>, body: web::Json<AskRequest>) -> HttpResponse {
    let mut sentry = state.new_sentry(&body.address, &body.account);
    let message = sentry.ask().await;
    HttpResponse::Ok().json(GateResponse::from_message(message))
}

/// `POST /v1/login/inform` — record the outcome of an attempt already
/// permitted by `ask`.
pub async fn inform(state: web::Data<AppState>, body: web::Json<InformRequest>) -> HttpResponse {
    let mut sentry: Sentry = state.new_sentry(&body.address, &body.account);
    let message = sentry.inform(body.success).await;
    HttpResponse::Ok().json(GateResponse::from_message(message))
}

pub async fn health() -> HttpResponse {
    let response = HealthResponse::healthy(env!("CARGO_PKG_VERSION"))
        .with_service("sentry", ServiceHealth::healthy());
    HttpResponse::Ok().json(response)
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "the requested resource was not found",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_web::test]
    async fn ask_permits_a_clean_pair() {
        let state = AppState::in_memory();
        let app = test::init_service(
            App::new().app_data(web::Data::new(state)).route("/v1/login/ask", web::post().to(ask)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/login/ask")
            .set_json(AskRequest { address: "1.2.3.4".to_string(), account: "alice".to_string() })
            .to_request();
        let resp: GateResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!resp.blocked);
        assert_eq!(resp.message, "");
    }

    #[actix_web::test]
    async fn inform_records_a_failure() {
        let state = AppState::in_memory();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .route("/v1/login/inform", web::post().to(inform)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/v1/login/inform")
            .set_json(InformRequest {
                address: "1.2.3.4".to_string(),
                account: "alice".to_string(),
                success: false,
            })
            .to_request();
        let resp: GateResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!resp.blocked);
    }
}
