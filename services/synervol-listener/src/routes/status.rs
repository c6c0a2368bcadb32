use actix_web::{get, web, HttpResponse};
use serde::Serialize;
use synervol_core::now_epoch_millis;

use crate::state::{AppState, ReceivedMission};

#[derive(Debug, Serialize)]
struct StatusResponse {
    service: String,
    environment: String,
    timestamp_ms: u64,
    missions_accepted: u64,
    missions_rejected: u64,
    last_mission: Option<ReceivedMission>,
}

#[get("/v1/status")]
pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    let response = StatusResponse {
        service: state.config.service_name.clone(),
        environment: state.config.environment.to_string(),
        timestamp_ms: now_epoch_millis(),
        missions_accepted: state.stats.accepted(),
        missions_rejected: state.stats.rejected(),
        last_mission: state.last_mission(),
    };

    HttpResponse::Ok().json(response)
}
