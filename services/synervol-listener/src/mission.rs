use serde::Serialize;
use synervol_core::{now_epoch_millis, SessionId, SvError};
use synervol_geo::GeoPoint;
use synervol_mission::{MissionCommand, API_VERSION};

use crate::state::{AppState, ReceivedMission};

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Reply {
    Hello {
        version: &'static str,
    },
    Ok,
    Error {
        reason: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl Reply {
    pub fn hello() -> Self {
        Self::Hello {
            version: API_VERSION,
        }
    }

    pub fn error(reason: &'static str, detail: Option<String>) -> Self {
        Self::Error { reason, detail }
    }

    pub fn to_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"error"}"#.to_string())
    }
}

pub async fn handle_text(state: &AppState, session_id: SessionId, text: &str) -> Reply {
    let command = match MissionCommand::decode(text) {
        Ok(command) => command,
        Err(err) => return reject(state, session_id, "invalid_json", err),
    };
    if let Err(err) = command.validate() {
        return reject(state, session_id, err.code.as_str(), err);
    }
    if let Err(err) = state.sink.forward(&command).await {
        tracing::error!(
            %session_id,
            sink = state.sink.name(),
            error = %err,
            "mission forward failed"
        );
        let err = SvError::transport(err.to_string());
        return reject(state, session_id, "dispatch_failed", err);
    }

    let center = command.coordinates.map(GeoPoint::from);
    tracing::info!(
        %session_id,
        lat = center.map(|point| point.lat),
        lng = center.map(|point| point.lng),
        scan_type = %command.scan_type,
        dimensions = ?command.dimensions,
        sink = state.sink.name(),
        "mission received"
    );
    metrics::counter!("synervol_missions_received_total", "verdict" => "accepted").increment(1);
    state.stats.record_accepted();
    state.remember(ReceivedMission {
        session_id,
        received_at_ms: now_epoch_millis(),
        command,
    });
    Reply::Ok
}

fn reject(state: &AppState, session_id: SessionId, reason: &'static str, err: SvError) -> Reply {
    tracing::warn!(%session_id, reason, error = %err, "mission rejected");
    metrics::counter!("synervol_missions_received_total", "verdict" => "rejected").increment(1);
    state.stats.record_rejected();
    Reply::error(reason, Some(err.message))
}
