use actix_web::{get, web, HttpResponse};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse<'a> {
    status: &'static str,
    service: &'a str,
    version: &'static str,
}

#[get("/health")]
pub async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        service: &state.config.service_name,
        version: env!("CARGO_PKG_VERSION"),
    })
}
