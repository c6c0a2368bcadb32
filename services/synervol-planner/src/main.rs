mod console;
mod render;
mod session;

use console::Console;
use session::PlannerSession;
use std::time::Duration;
use synervol_config::{DispatchConfig, ServiceConfig};
use synervol_mission::MissionDispatcher;
use synervol_observability::{init, log_startup, ObservabilityConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env("synervol-planner");
    let dispatch_config = DispatchConfig::from_env();
    let obs_config = ObservabilityConfig::from(&config);
    let handle = init(&obs_config);
    log_startup(&handle, &obs_config.environment);

    tracing::info!(
        endpoint = %dispatch_config.endpoint,
        connect_timeout_ms = dispatch_config.connect_timeout_ms,
        "mission dispatch target"
    );
    let dispatcher = MissionDispatcher::websocket(
        dispatch_config.endpoint,
        Duration::from_millis(dispatch_config.connect_timeout_ms),
    );

    console::run(Console::new(PlannerSession::new(), dispatcher)).await
}
