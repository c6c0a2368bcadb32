use std::time::{SystemTime, UNIX_EPOCH};

pub type EpochMillis = u64;

pub fn now_epoch_millis() -> EpochMillis {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as EpochMillis)
        .unwrap_or_default()
}

pub fn millis_since(started_at_ms: EpochMillis) -> u64 {
    now_epoch_millis().saturating_sub(started_at_ms)
}
