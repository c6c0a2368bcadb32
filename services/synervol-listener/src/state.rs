use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use synervol_config::ServiceConfig;
use synervol_core::{EpochMillis, SessionId};
use synervol_mission::MissionCommand;

use crate::sink::MissionSink;

#[derive(Debug, Clone, Serialize)]
pub struct ReceivedMission {
    pub session_id: SessionId,
    pub received_at_ms: EpochMillis,
    pub command: MissionCommand,
}

#[derive(Debug, Default)]
pub struct MissionStats {
    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl MissionStats {
    pub fn record_accepted(&self) {
        self.accepted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn accepted(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

pub struct AppState {
    pub config: ServiceConfig,
    pub stats: MissionStats,
    pub sink: Arc<dyn MissionSink>,
    last_mission: Mutex<Option<ReceivedMission>>,
}

impl AppState {
    pub fn new(config: ServiceConfig, sink: Arc<dyn MissionSink>) -> Self {
        Self {
            config,
            stats: MissionStats::default(),
            sink,
            last_mission: Mutex::new(None),
        }
    }

    pub fn remember(&self, mission: ReceivedMission) {
        if let Ok(mut slot) = self.last_mission.lock() {
            *slot = Some(mission);
        }
    }

    pub fn last_mission(&self) -> Option<ReceivedMission> {
        self.last_mission.lock().ok().and_then(|slot| slot.clone())
    }
}
